use std::fmt;

/// 入站事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// 远端推送新题目
    NewQuestion,
    /// 远端推送判分回执
    ReceiveResult,
}

impl EventKind {
    pub const ALL: [EventKind; 2] = [EventKind::NewQuestion, EventKind::ReceiveResult];

    /// 通道上的事件名
    pub fn name(self) -> &'static str {
        match self {
            EventKind::NewQuestion => "NewQuestion",
            EventKind::ReceiveResult => "ReceiveResult",
        }
    }

    pub fn from_target(target: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == target)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
