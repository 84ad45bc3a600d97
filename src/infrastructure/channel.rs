//! 推送通道 - 基础设施层
//!
//! 只暴露"远端调用"的能力，入站事件通过 mpsc 通道交给调用方

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::ChannelError;

/// 入站消息
///
/// 与 hub 调用消息的外形一致：事件名加参数列表，载荷在第一个参数里
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMessage {
    pub target: String,
    #[serde(default)]
    pub arguments: Vec<JsonValue>,
}

impl ChannelMessage {
    pub fn new(target: impl Into<String>, arguments: Vec<JsonValue>) -> Self {
        Self {
            target: target.into(),
            arguments,
        }
    }

    /// 以单个可序列化载荷构造消息
    pub fn with_payload(
        target: impl Into<String>,
        payload: &impl Serialize,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(target, vec![serde_json::to_value(payload)?]))
    }

    pub fn payload(&self) -> Option<&JsonValue> {
        self.arguments.first()
    }
}

/// 推送通道适配器
///
/// 职责：
/// - 持有连接
/// - 暴露 fire-and-forget 的 invoke() 能力
/// - 不认识题目与历史记录
/// - 重连由实现自行处理
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// 通道是否可以发起调用
    fn is_ready(&self) -> bool;

    /// 调用远端方法，远端拒绝时返回错误
    async fn invoke(&self, method: &str, arguments: Vec<JsonValue>) -> Result<(), ChannelError>;
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_channel_message_wire_shape() {
        let msg: ChannelMessage = serde_json::from_value(json!({
            "target": "NewQuestion",
            "arguments": [{ "expression": "3+4=7", "correctAnswer": 7 }]
        }))
        .unwrap();

        assert_eq!(msg.target, "NewQuestion");
        assert_eq!(msg.payload().unwrap()["correctAnswer"], json!(7));
    }

    #[test]
    fn test_channel_message_without_arguments() {
        let msg: ChannelMessage = serde_json::from_value(json!({ "target": "ReceiveResult" })).unwrap();
        assert!(msg.payload().is_none());
    }
}
