use std::str::FromStr;

use serde::Deserialize;

use crate::error::{AppResult, ConfigError};
use crate::services::ReconcilePolicy;

/// 指定 TOML 配置文件路径的环境变量
pub const CONFIG_PATH_VAR: &str = "MATH_GAME_CONFIG";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 提交答案时使用的玩家名
    pub player_name: String,
    /// 远端 hub 地址（仅用于日志显示）
    pub hub_url: String,
    /// 成绩回执的归属策略
    pub reconcile_policy: ReconcilePolicy,
    /// 提交失败时是否撤销本地已记录的答案
    pub rollback_on_submit_failure: bool,
    /// 比较答案的容差，为空时精确比较
    pub answer_tolerance: Option<f64>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 入站事件缓冲区大小
    pub event_buffer: usize,
    // --- 本地 hub 配置 ---
    /// 定时出题间隔（毫秒），0 表示只在每次判分后出题
    pub question_interval_ms: u64,
    /// 出题种子
    pub question_seed: u64,
    /// 最多出题数量，0 表示不限
    pub max_questions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),
            hub_url: "http://localhost:5168/gamehub".to_string(),
            reconcile_policy: ReconcilePolicy::Correlated,
            rollback_on_submit_failure: false,
            answer_tolerance: None,
            verbose_logging: false,
            event_buffer: 64,
            question_interval_ms: 0,
            question_seed: 1,
            max_questions: 0,
        }
    }
}

impl Config {
    /// 加载配置：先读 `MATH_GAME_CONFIG` 指向的 TOML 文件（如果有），再用环境变量覆盖
    pub fn load() -> AppResult<Self> {
        let base = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_toml_file(&path)?,
            Err(_) => Self::default(),
        };
        Ok(base.with_env_overrides()?)
    }

    /// 从 TOML 文件加载配置，缺失字段使用默认值
    pub fn from_toml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(v) = std::env::var("PLAYER_NAME") {
            self.player_name = v;
        }
        if let Ok(v) = std::env::var("HUB_URL") {
            self.hub_url = v;
        }
        if let Some(v) = env_parse("RECONCILE_POLICY", "latest | latest_unresolved | correlated")? {
            self.reconcile_policy = v;
        }
        if let Some(v) = env_parse("ROLLBACK_ON_SUBMIT_FAILURE", "bool")? {
            self.rollback_on_submit_failure = v;
        }
        if let Some(v) = env_parse("ANSWER_TOLERANCE", "f64")? {
            self.answer_tolerance = Some(v);
        }
        if let Some(v) = env_parse("VERBOSE_LOGGING", "bool")? {
            self.verbose_logging = v;
        }
        if let Some(v) = env_parse("EVENT_BUFFER", "usize")? {
            self.event_buffer = v;
        }
        if let Some(v) = env_parse("QUESTION_INTERVAL_MS", "u64")? {
            self.question_interval_ms = v;
        }
        if let Some(v) = env_parse("QUESTION_SEED", "u64")? {
            self.question_seed = v;
        }
        if let Some(v) = env_parse("MAX_QUESTIONS", "usize")? {
            self.max_questions = v;
        }
        Ok(self)
    }
}

/// 读取并解析环境变量，不存在时返回 None
fn env_parse<T: FromStr>(var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => {
            let parsed = value.trim().parse::<T>();
            parsed.map(Some).map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            })
        }
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.player_name, "Player");
        assert_eq!(config.reconcile_policy, ReconcilePolicy::Correlated);
        assert!(!config.rollback_on_submit_failure);
        assert!(config.answer_tolerance.is_none());
    }

    #[test]
    fn test_toml_partial_config_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            player_name = "Alice"
            reconcile_policy = "latest_unresolved"
            answer_tolerance = 0.001
            "#,
        )
        .unwrap();

        assert_eq!(config.player_name, "Alice");
        assert_eq!(config.reconcile_policy, ReconcilePolicy::LatestUnresolved);
        assert_eq!(config.answer_tolerance, Some(0.001));
        assert_eq!(config.event_buffer, 64);
    }

    #[test]
    fn test_toml_unknown_policy_is_rejected() {
        assert!(Config::from_toml_str(r#"reconcile_policy = "newest""#).is_err());
    }
}
