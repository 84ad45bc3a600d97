//! # Math Game Client
//!
//! 一个算式判断游戏的实时会话客户端：远端推送 `a op b = v` 形式的题目，
//! 用户判断等式是否成立，客户端提交判断并把异步到达的判分回执对应到题目上
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有通道，只暴露能力
//! - `ChannelAdapter` - 推送通道抽象，提供 invoke() 能力
//! - `LocalHub` - 进程内的远端判分方
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个题目
//! - `AnswerEvaluator` - 从表达式取出提议答案并判定
//! - `ReconcilePolicy` - 判分回执归属策略
//! - `SubmissionDispatcher` - 提交能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一道题"的完整处理流程
//! - `GameSession` - 会话状态（历史记录 + 当前判断）
//! - `EventRouter` - 入站事件分发表
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 会话生命周期与主循环
//! - `orchestrator/presenter` - 表格渲染与命令解析
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, GameError};
pub use infrastructure::{ChannelAdapter, ChannelMessage, LocalHub};
pub use models::{HistoryLedger, QuestionEntry, ResultStatus, UserAnswer};
pub use orchestrator::App;
pub use services::{evaluate, ReconcilePolicy};
pub use workflow::{EventRouter, GameSession};
