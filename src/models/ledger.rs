//! 历史记录
//!
//! 一次连接内所有题目的有序账本，只追加，不删除

use uuid::Uuid;

use super::question::{QuestionEntry, UserAnswer};

/// 对单个条目的受限修改
///
/// 条目创建后只有作答与判分字段可以变化
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntryUpdate {
    /// 记录用户判断（乐观写入）
    Decision {
        answer: UserAnswer,
        request_id: Option<Uuid>,
    },
    /// 撤销用户判断，允许重新作答
    RevertDecision,
    /// 合并远端判分
    Result {
        is_correct: bool,
        user_answer: UserAnswer,
    },
}

impl EntryUpdate {
    fn apply(self, entry: &mut QuestionEntry) {
        match self {
            EntryUpdate::Decision { answer, request_id } => {
                entry.user_answer = Some(answer);
                entry.request_id = request_id;
            }
            EntryUpdate::RevertDecision => {
                entry.user_answer = None;
                entry.request_id = None;
            }
            EntryUpdate::Result {
                is_correct,
                user_answer,
            } => {
                entry.is_correct = Some(is_correct);
                entry.user_answer = Some(user_answer);
            }
        }
    }
}

/// 历史统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerStats {
    pub total: usize,
    pub answered: usize,
    pub ok: usize,
    pub failed: usize,
    pub waiting: usize,
}

/// 题目历史账本
#[derive(Debug, Default)]
pub struct HistoryLedger {
    entries: Vec<QuestionEntry>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个条目，返回其下标
    pub fn append(&mut self, entry: QuestionEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    pub fn latest(&self) -> Option<&QuestionEntry> {
        self.entries.last()
    }

    pub fn get(&self, index: usize) -> Option<&QuestionEntry> {
        self.entries.get(index)
    }

    /// 修改最新条目，历史为空时返回 false
    pub fn update_latest(&mut self, update: EntryUpdate) -> bool {
        match self.entries.last_mut() {
            Some(entry) => {
                update.apply(entry);
                true
            }
            None => false,
        }
    }

    /// 修改指定条目，下标越界时返回 false
    pub fn update_at(&mut self, index: usize, update: EntryUpdate) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                update.apply(entry);
                true
            }
            None => false,
        }
    }

    /// 查找携带指定关联 ID 的条目
    pub fn position_of(&self, request_id: Uuid) -> Option<usize> {
        self.entries
            .iter()
            .rposition(|entry| entry.request_id == Some(request_id))
    }

    /// 最后一个已作答但尚未判分的条目
    pub fn last_unresolved(&self) -> Option<usize> {
        self.entries
            .iter()
            .rposition(|entry| entry.user_answer.is_some() && !entry.is_resolved())
    }

    /// 只读快照
    pub fn all(&self) -> &[QuestionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> LedgerStats {
        use super::question::ResultStatus;

        let mut stats = LedgerStats {
            total: self.entries.len(),
            ..Default::default()
        };
        for entry in &self.entries {
            if entry.user_answer.is_some() {
                stats.answered += 1;
            }
            match entry.status() {
                ResultStatus::Ok => stats.ok += 1,
                ResultStatus::Failed => stats.failed += 1,
                ResultStatus::Waiting => stats.waiting += 1,
            }
        }
        stats
    }
}
