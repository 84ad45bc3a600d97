//! 提交服务 - 业务能力层
//!
//! 只负责把用户的判断发给远端判分方，不修改历史记录

use std::sync::Arc;

use serde_json::{json, Value as JsonValue};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::SubmissionFailure;
use crate::infrastructure::ChannelAdapter;

/// 远端提交方法名
pub const SUBMIT_ANSWER: &str = "SubmitAnswer";

/// 一次提交的全部参数
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitAnswer {
    pub player_name: String,
    /// 远端给出的正确答案
    pub correct_answer: f64,
    /// 本地从表达式中解析出的提议答案
    pub proposed_answer: f64,
    /// 用户判断：true 表示"等式成立"
    pub user_decision: bool,
    /// 本地判定结果，供远端核对客户端计算
    pub local_verdict: bool,
    /// 关联 ID，启用关联匹配时才会发送
    pub request_id: Option<Uuid>,
}

impl SubmitAnswer {
    /// 按远端方法签名排列参数
    pub fn to_arguments(&self) -> Vec<JsonValue> {
        let mut args = vec![
            json!(self.player_name),
            json!(self.correct_answer),
            json!(self.proposed_answer),
            json!(self.user_decision),
            json!(self.local_verdict),
        ];
        if let Some(id) = self.request_id {
            args.push(json!(id.to_string()));
        }
        args
    }
}

/// 提交服务
///
/// 职责：
/// - 发出一次 fire-and-forget 的远端调用
/// - 把通道错误转换为提交失败
/// - 不持有题目状态
pub struct SubmissionDispatcher {
    channel: Arc<dyn ChannelAdapter>,
}

impl SubmissionDispatcher {
    pub fn new(channel: Arc<dyn ChannelAdapter>) -> Self {
        Self { channel }
    }

    pub async fn submit(&self, submission: &SubmitAnswer) -> Result<(), SubmissionFailure> {
        if !self.channel.is_ready() {
            warn!("⚠️ 通道未就绪，放弃提交");
            return Err(SubmissionFailure::ChannelNotReady {
                method: SUBMIT_ANSWER.to_string(),
            });
        }

        debug!(
            "📤 提交答案: 正确答案={} 提议答案={} 判断={} 本地判定={}",
            submission.correct_answer,
            submission.proposed_answer,
            submission.user_decision,
            submission.local_verdict
        );

        self.channel
            .invoke(SUBMIT_ANSWER, submission.to_arguments())
            .await
            .map_err(|source| {
                warn!("⚠️ 提交被拒绝: {}", source);
                SubmissionFailure::Rejected {
                    method: SUBMIT_ANSWER.to_string(),
                    source,
                }
            })
    }
}
