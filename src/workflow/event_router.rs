//! 入站事件路由
//!
//! 事件名 → 处理函数的分发表，把通道消息转换为会话上的修改。
//! 载荷有问题的事件只记录日志后丢弃，不会中断事件循环

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::error::PayloadError;
use crate::infrastructure::ChannelMessage;
use crate::models::{EventKind, NewQuestionPayload, ReceiveResultPayload};
use crate::workflow::GameSession;

/// 单个事件的处理函数
pub type EventHandler = fn(&mut GameSession, &JsonValue) -> Result<(), PayloadError>;

/// 路由结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// 事件已交给处理函数
    Applied(EventKind),
    /// 载荷有问题，事件被丢弃
    Dropped(EventKind),
    /// 没有注册处理函数的事件
    Ignored,
}

/// 事件路由器
pub struct EventRouter {
    handlers: HashMap<EventKind, EventHandler>,
}

impl EventRouter {
    /// 创建注册了 `NewQuestion` 与 `ReceiveResult` 的路由器
    pub fn new() -> Self {
        let mut router = Self::empty();
        router.register(EventKind::NewQuestion, handle_new_question);
        router.register(EventKind::ReceiveResult, handle_receive_result);
        router
    }

    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// 注册或替换处理函数
    pub fn register(&mut self, kind: EventKind, handler: EventHandler) {
        self.handlers.insert(kind, handler);
    }

    /// 分发一条通道消息
    pub fn route(&self, session: &mut GameSession, message: &ChannelMessage) -> RouteOutcome {
        let Some(kind) = EventKind::from_target(&message.target) else {
            debug!("忽略未知事件: {}", message.target);
            return RouteOutcome::Ignored;
        };
        let Some(handler) = self.handlers.get(&kind) else {
            debug!("事件 {} 没有处理函数", kind);
            return RouteOutcome::Ignored;
        };

        let result = match message.payload() {
            Some(payload) => handler(session, payload),
            None => Err(PayloadError::MissingArgument { event: kind.name() }),
        };

        match result {
            Ok(()) => RouteOutcome::Applied(kind),
            Err(e) => {
                warn!("⚠️ 丢弃事件: {}", e);
                RouteOutcome::Dropped(kind)
            }
        }
    }
}

impl Default for EventRouter {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_payload<T: DeserializeOwned>(
    kind: EventKind,
    payload: &JsonValue,
) -> Result<T, PayloadError> {
    T::deserialize(payload).map_err(|source| PayloadError::Invalid {
        event: kind.name(),
        source,
    })
}

fn handle_new_question(session: &mut GameSession, payload: &JsonValue) -> Result<(), PayloadError> {
    let question: NewQuestionPayload = parse_payload(EventKind::NewQuestion, payload)?;
    session.apply_new_question(question);
    Ok(())
}

fn handle_receive_result(
    session: &mut GameSession,
    payload: &JsonValue,
) -> Result<(), PayloadError> {
    let result: ReceiveResultPayload = parse_payload(EventKind::ReceiveResult, payload)?;
    session.apply_result(result);
    Ok(())
}
