//! 成绩回执归属策略
//!
//! 决定一条 `ReceiveResult` 应该写入历史中的哪个条目

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::models::HistoryLedger;

/// 回执归属策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcilePolicy {
    /// 总是写入最后一个条目，只在同一时刻最多一道题在途时成立
    Latest,
    /// 写入最后一个已作答但未判分的条目
    LatestUnresolved,
    /// 按提交时生成的关联 ID 匹配；回执不带 ID 时退回到最后一个在途条目
    #[default]
    Correlated,
}

impl ReconcilePolicy {
    /// 提交时是否需要携带关联 ID
    pub fn uses_correlation(self) -> bool {
        self == ReconcilePolicy::Correlated
    }

    /// 找到回执对应的条目下标，找不到时返回 None，条目保持不变
    pub fn locate_target(self, ledger: &HistoryLedger, request_id: Option<Uuid>) -> Option<usize> {
        let last = ledger.len().checked_sub(1)?;

        match self {
            ReconcilePolicy::Latest => Some(last),
            ReconcilePolicy::LatestUnresolved => ledger.last_unresolved(),
            ReconcilePolicy::Correlated => match request_id {
                Some(id) => ledger.position_of(id),
                None => {
                    debug!("回执未携带关联 ID，按最后一个已作答未判分的条目处理");
                    ledger.last_unresolved()
                }
            },
        }
    }
}

impl FromStr for ReconcilePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest" => Ok(ReconcilePolicy::Latest),
            "latest_unresolved" => Ok(ReconcilePolicy::LatestUnresolved),
            "correlated" => Ok(ReconcilePolicy::Correlated),
            other => Err(format!("未知的回执归属策略: {}", other)),
        }
    }
}

impl fmt::Display for ReconcilePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReconcilePolicy::Latest => "latest",
            ReconcilePolicy::LatestUnresolved => "latest_unresolved",
            ReconcilePolicy::Correlated => "correlated",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntryUpdate, QuestionEntry, UserAnswer};

    fn answered(ledger: &mut HistoryLedger, index: usize) -> Uuid {
        let id = Uuid::new_v4();
        ledger.update_at(
            index,
            EntryUpdate::Decision {
                answer: UserAnswer::Yes,
                request_id: Some(id),
            },
        );
        id
    }

    fn ledger_of(n: usize) -> HistoryLedger {
        let mut ledger = HistoryLedger::new();
        for i in 0..n {
            ledger.append(QuestionEntry::new(format!("{i}+0={i}"), i as f64));
        }
        ledger
    }

    #[test]
    fn test_empty_ledger_has_no_target() {
        let ledger = HistoryLedger::new();
        for policy in [
            ReconcilePolicy::Latest,
            ReconcilePolicy::LatestUnresolved,
            ReconcilePolicy::Correlated,
        ] {
            assert_eq!(policy.locate_target(&ledger, None), None);
            assert_eq!(policy.locate_target(&ledger, Some(Uuid::new_v4())), None);
        }
    }

    #[test]
    fn test_latest_ignores_request_id() {
        let mut ledger = ledger_of(3);
        let id = answered(&mut ledger, 0);
        assert_eq!(ReconcilePolicy::Latest.locate_target(&ledger, Some(id)), Some(2));
    }

    #[test]
    fn test_latest_unresolved_skips_unanswered_tail() {
        let mut ledger = ledger_of(3);
        answered(&mut ledger, 1);
        assert_eq!(
            ReconcilePolicy::LatestUnresolved.locate_target(&ledger, None),
            Some(1)
        );

        ledger.update_at(
            1,
            EntryUpdate::Result {
                is_correct: true,
                user_answer: UserAnswer::Yes,
            },
        );
        assert_eq!(ReconcilePolicy::LatestUnresolved.locate_target(&ledger, None), None);
    }

    #[test]
    fn test_correlated_matches_id_or_nothing() {
        let mut ledger = ledger_of(3);
        let id = answered(&mut ledger, 0);

        let policy = ReconcilePolicy::Correlated;
        assert_eq!(policy.locate_target(&ledger, Some(id)), Some(0));
        assert_eq!(policy.locate_target(&ledger, Some(Uuid::new_v4())), None);
        // 不带 ID 时只会落到已作答的条目上
        assert_eq!(policy.locate_target(&ledger, None), Some(0));
    }

    #[test]
    fn test_correlated_without_id_skips_unanswered_entries() {
        let ledger = ledger_of(2);
        assert_eq!(ReconcilePolicy::Correlated.locate_target(&ledger, None), None);

        let mut ledger = ledger_of(3);
        answered(&mut ledger, 1);
        ledger.update_at(
            1,
            EntryUpdate::Result {
                is_correct: false,
                user_answer: UserAnswer::Yes,
            },
        );
        assert_eq!(ReconcilePolicy::Correlated.locate_target(&ledger, None), None);
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!("Latest".parse::<ReconcilePolicy>(), Ok(ReconcilePolicy::Latest));
        assert_eq!(
            " latest_unresolved ".parse::<ReconcilePolicy>(),
            Ok(ReconcilePolicy::LatestUnresolved)
        );
        assert!("newest".parse::<ReconcilePolicy>().is_err());
        assert_eq!(ReconcilePolicy::Correlated.to_string(), "correlated");
    }
}
