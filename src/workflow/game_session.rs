//! 游戏会话 - 流程层
//!
//! 核心职责：持有一次连接内的全部状态，定义"一道题"的完整流程
//!
//! 流程顺序：
//! 1. NewQuestion → 追加条目，清空当前判断
//! 2. 用户判断 → 本地判定 → 乐观写入 → 提交
//! 3. ReceiveResult → 按归属策略合并判分
//!
//! 会话在通道建立时创建，通道关闭时丢弃，历史不会跨会话保留

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::GameError;
use crate::infrastructure::ChannelAdapter;
use crate::models::{
    EntryUpdate, HistoryLedger, NewQuestionPayload, QuestionEntry, ReceiveResultPayload,
    UserAnswer,
};
use crate::services::{AnswerEvaluator, ReconcilePolicy, SubmissionDispatcher, SubmitAnswer};
use crate::utils::logging::truncate_text;

/// 已乐观写入、尚未发出的提交
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    /// 对应的历史下标
    pub index: usize,
    pub request: SubmitAnswer,
}

/// 游戏会话
///
/// - 独占历史记录
/// - 事件处理与用户判断串行执行，不需要加锁
/// - 通过 `SubmissionDispatcher` 与远端交互
pub struct GameSession {
    ledger: HistoryLedger,
    current_decision: Option<UserAnswer>,
    player_name: String,
    evaluator: AnswerEvaluator,
    dispatcher: SubmissionDispatcher,
    policy: ReconcilePolicy,
    rollback_on_submit_failure: bool,
}

impl GameSession {
    /// 通道建立后创建会话
    pub fn new(config: &Config, channel: Arc<dyn ChannelAdapter>) -> Self {
        debug!(
            "创建会话: 玩家={} 归属策略={} 失败回滚={}",
            config.player_name, config.reconcile_policy, config.rollback_on_submit_failure
        );
        Self {
            ledger: HistoryLedger::new(),
            current_decision: None,
            player_name: config.player_name.clone(),
            evaluator: AnswerEvaluator::from_config(config),
            dispatcher: SubmissionDispatcher::new(channel),
            policy: config.reconcile_policy,
            rollback_on_submit_failure: config.rollback_on_submit_failure,
        }
    }

    pub fn ledger(&self) -> &HistoryLedger {
        &self.ledger
    }

    /// 历史记录只读快照
    pub fn entries(&self) -> &[QuestionEntry] {
        self.ledger.all()
    }

    /// 用户对当前题目的判断，新题到达时清空
    pub fn current_decision(&self) -> Option<UserAnswer> {
        self.current_decision
    }

    /// 是否有等待用户判断的题目
    pub fn awaiting_decision(&self) -> bool {
        self.ledger
            .latest()
            .map(QuestionEntry::awaits_decision)
            .unwrap_or(false)
    }

    // ========== 入站事件 ==========

    /// 新题到达：追加条目
    pub fn apply_new_question(&mut self, payload: NewQuestionPayload) -> usize {
        let index = self.ledger.append(QuestionEntry::from(payload));
        self.current_decision = None;

        if let Some(entry) = self.ledger.get(index) {
            info!(
                "[题目 {}] 📝 {}",
                index + 1,
                truncate_text(&entry.expression, 60)
            );
        }
        index
    }

    /// 判分回执到达：按归属策略合并，找不到目标时不做任何修改
    pub fn apply_result(&mut self, payload: ReceiveResultPayload) -> Option<usize> {
        if self.ledger.is_empty() {
            debug!("历史为空，忽略判分回执");
            return None;
        }

        let Some(index) = self.policy.locate_target(&self.ledger, payload.request_id) else {
            warn!(
                "⚠️ 判分回执找不到对应题目 (策略: {}, 关联 ID: {:?})，已丢弃",
                self.policy, payload.request_id
            );
            return None;
        };

        self.ledger.update_at(
            index,
            EntryUpdate::Result {
                is_correct: payload.is_correct,
                user_answer: payload.user_answer,
            },
        );

        if let Some(entry) = self.ledger.get(index) {
            info!("[题目 {}] ✓ 判分: {}", index + 1, entry.status());
        }
        Some(index)
    }

    // ========== 用户判断 ==========

    /// 用户做出判断：乐观写入后提交
    pub async fn on_user_decision(&mut self, is_yes: bool) -> Result<(), GameError> {
        let pending = self.prepare_decision(is_yes)?;
        self.dispatch(pending).await
    }

    /// 判定并乐观写入用户判断，返回待发出的提交
    ///
    /// 表达式无法解析时不修改历史
    pub fn prepare_decision(&mut self, is_yes: bool) -> Result<PendingSubmission, GameError> {
        let index = self
            .ledger
            .len()
            .checked_sub(1)
            .ok_or(GameError::NoPendingQuestion)?;
        let entry = self.ledger.get(index).ok_or(GameError::NoPendingQuestion)?;
        if !entry.awaits_decision() {
            return Err(GameError::NoPendingQuestion);
        }

        let evaluation = self
            .evaluator
            .evaluate(&entry.expression, entry.correct_answer)?;
        let correct_answer = entry.correct_answer;

        let answer = UserAnswer::from_decision(is_yes);
        let request_id = self.policy.uses_correlation().then(Uuid::new_v4);

        self.ledger
            .update_latest(EntryUpdate::Decision { answer, request_id });
        self.current_decision = Some(answer);

        debug!(
            "[题目 {}] 用户判断={} 提议答案={} 本地判定={}",
            index + 1,
            answer,
            evaluation.proposed_answer,
            evaluation.is_correct
        );

        Ok(PendingSubmission {
            index,
            request: SubmitAnswer {
                player_name: self.player_name.clone(),
                correct_answer,
                proposed_answer: evaluation.proposed_answer,
                user_decision: is_yes,
                local_verdict: evaluation.is_correct,
                request_id,
            },
        })
    }

    /// 发出提交；失败时按配置决定是否撤销乐观写入
    pub async fn dispatch(&mut self, pending: PendingSubmission) -> Result<(), GameError> {
        match self.dispatcher.submit(&pending.request).await {
            Ok(()) => {
                info!("[题目 {}] 📤 已提交", pending.index + 1);
                Ok(())
            }
            Err(failure) => {
                warn!("[题目 {}] ⚠️ 提交失败: {}", pending.index + 1, failure);
                if self.rollback_on_submit_failure {
                    self.rollback(&pending);
                }
                Err(GameError::Submission(failure))
            }
        }
    }

    fn rollback(&mut self, pending: &PendingSubmission) {
        let still_ours = self.ledger.get(pending.index).is_some_and(|entry| {
            !entry.is_resolved() && entry.request_id == pending.request.request_id
        });
        if !still_ours {
            return;
        }

        self.ledger
            .update_at(pending.index, EntryUpdate::RevertDecision);
        if self.ledger.len() == pending.index + 1 {
            self.current_decision = None;
        }
        info!("[题目 {}] ↩️ 已撤销本地判断，可以重新作答", pending.index + 1);
    }
}
