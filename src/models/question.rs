use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户对"等式是否成立"的判断
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserAnswer {
    Yes,
    No,
}

impl UserAnswer {
    pub fn from_decision(is_yes: bool) -> Self {
        if is_yes {
            UserAnswer::Yes
        } else {
            UserAnswer::No
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UserAnswer::Yes => "Yes",
            UserAnswer::No => "No",
        }
    }
}

impl fmt::Display for UserAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单个题目在界面上的结果状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    /// 尚未收到判分
    Waiting,
    /// 用户判断与判分一致
    Ok,
    /// 用户判断与判分不一致
    Failed,
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultStatus::Waiting => f.write_str("Waiting for Answer"),
            ResultStatus::Ok => f.write_str("OK"),
            ResultStatus::Failed => f.write_str("FAILED"),
        }
    }
}

/// 一轮题目
///
/// 只有 `user_answer`、`is_correct` 和 `request_id` 会在创建后变化，
/// 且只能通过 [`HistoryLedger`](super::HistoryLedger) 修改
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionEntry {
    /// 形如 `<算式> = <提议答案>` 的表达式
    pub expression: String,
    /// 远端给出的正确答案
    pub correct_answer: f64,
    /// 用户的判断
    pub user_answer: Option<UserAnswer>,
    /// 远端判分结果
    pub is_correct: Option<bool>,
    /// 提交时生成的关联 ID
    pub request_id: Option<Uuid>,
    /// 收到题目的时间
    pub received_at: DateTime<Local>,
}

impl QuestionEntry {
    pub fn new(expression: impl Into<String>, correct_answer: f64) -> Self {
        Self {
            expression: expression.into(),
            correct_answer,
            user_answer: None,
            is_correct: None,
            request_id: None,
            received_at: Local::now(),
        }
    }

    /// 是否还在等待用户作答
    pub fn awaits_decision(&self) -> bool {
        self.user_answer.is_none()
    }

    /// 是否已收到判分
    pub fn is_resolved(&self) -> bool {
        self.is_correct.is_some()
    }

    pub fn status(&self) -> ResultStatus {
        match (self.is_correct, self.user_answer) {
            (None, _) => ResultStatus::Waiting,
            (Some(true), Some(UserAnswer::Yes)) | (Some(false), Some(UserAnswer::No)) => {
                ResultStatus::Ok
            }
            (Some(_), _) => ResultStatus::Failed,
        }
    }
}

impl From<NewQuestionPayload> for QuestionEntry {
    fn from(payload: NewQuestionPayload) -> Self {
        Self::new(payload.expression, payload.correct_answer)
    }
}

/// `NewQuestion` 事件载荷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestionPayload {
    pub expression: String,
    pub correct_answer: f64,
}

/// `ReceiveResult` 事件载荷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveResultPayload {
    pub is_correct: bool,
    pub user_answer: UserAnswer,
    /// 远端回显的关联 ID，旧版远端不带
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
}
