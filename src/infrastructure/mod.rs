pub mod channel;
pub mod local_hub;

pub use channel::{ChannelAdapter, ChannelMessage};
pub use local_hub::{HubSettings, LocalHub};
