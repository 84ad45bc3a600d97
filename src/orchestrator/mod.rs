//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一次会话的生命周期，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用主循环
//! - 建立通道，创建会话（通道关闭时会话一起丢弃）
//! - 在一个循环里串行处理通道事件和用户输入
//! - 输出会话统计信息
//!
//! ### `presenter` - 文本展示
//! - 把历史记录渲染为表格
//! - 解析用户命令
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (通道事件 + 用户输入)
//!     ↓
//! workflow::EventRouter / GameSession (一道题的流程)
//!     ↓
//! services (能力层：判定 / 归属 / 提交)
//!     ↓
//! infrastructure (基础设施：ChannelAdapter)
//! ```

pub mod app;
pub mod presenter;

pub use app::App;
pub use presenter::{parse_command, render_ledger, Command};
