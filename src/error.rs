use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 推送通道错误
    #[error("通道错误: {0}")]
    Channel(#[from] ChannelError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 游戏回合错误
///
/// 由用户决策路径产生，全部在本地处理，不会中断事件循环
#[derive(Debug, Error)]
pub enum GameError {
    /// 题目表达式中找不到可解析的提议答案
    #[error("无法解析表达式 '{expression}': {reason}")]
    MalformedExpression {
        expression: String,
        reason: &'static str,
    },
    /// 没有等待作答的题目（历史为空或最新题目已作答）
    #[error("当前没有等待作答的题目")]
    NoPendingQuestion,
    /// 提交失败
    #[error(transparent)]
    Submission(#[from] SubmissionFailure),
}

/// 提交失败
#[derive(Debug, Error)]
pub enum SubmissionFailure {
    /// 通道尚未就绪
    #[error("通道未就绪，无法调用 {method}")]
    ChannelNotReady { method: String },
    /// 远端拒绝了调用
    #[error("远端调用 {method} 被拒绝: {source}")]
    Rejected {
        method: String,
        #[source]
        source: ChannelError,
    },
}

/// 推送通道错误
#[derive(Debug, Error)]
pub enum ChannelError {
    /// 连接已关闭
    #[error("连接已关闭")]
    Closed,
    /// 远端不认识该方法
    #[error("未知的远端方法: {0}")]
    UnknownMethod(String),
    /// 调用参数不合法
    #[error("调用 {method} 的参数不合法: {message}")]
    InvalidArguments { method: String, message: String },
}

/// 入站事件载荷错误
#[derive(Debug, Error)]
pub enum PayloadError {
    /// 事件缺少参数
    #[error("事件 {event} 缺少参数")]
    MissingArgument { event: &'static str },
    /// 载荷字段缺失或类型不符
    #[error("事件 {event} 的载荷无法解析: {source}")]
    Invalid {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl GameError {
    /// 创建表达式解析错误
    pub fn malformed(expression: impl Into<String>, reason: &'static str) -> Self {
        GameError::MalformedExpression {
            expression: expression.into(),
            reason,
        }
    }

    /// 是否为提交失败
    pub fn is_submission_failure(&self) -> bool {
        matches!(self, GameError::Submission(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
