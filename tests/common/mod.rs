//! 集成测试共用的通道替身

use std::sync::Mutex;

use async_trait::async_trait;
use math_game_client::error::ChannelError;
use math_game_client::ChannelAdapter;
use serde_json::Value as JsonValue;

/// 记录所有调用的通道
#[derive(Default)]
pub struct RecordingChannel {
    calls: Mutex<Vec<(String, Vec<JsonValue>)>>,
}

impl RecordingChannel {
    pub fn calls(&self) -> Vec<(String, Vec<JsonValue>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChannelAdapter for RecordingChannel {
    fn is_ready(&self) -> bool {
        true
    }

    async fn invoke(&self, method: &str, arguments: Vec<JsonValue>) -> Result<(), ChannelError> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), arguments));
        Ok(())
    }
}
