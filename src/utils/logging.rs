/// 日志工具模块
///
/// 提供日志初始化以及会话信息输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::LedgerStats;

/// 初始化日志
///
/// `RUST_LOG` 优先；未设置时默认 info，详细模式下为 debug。
/// 重复调用不会报错
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 当前配置
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 算式判断游戏");
    info!(
        "启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("👤 玩家: {}", config.player_name);
    info!("🔗 Hub: {}", config.hub_url);
    info!("📐 回执归属策略: {}", config.reconcile_policy);
    match config.answer_tolerance {
        Some(eps) => info!("📏 答案比较: 容差 {}", eps),
        None => info!("📏 答案比较: 精确"),
    }
    info!("{}", "=".repeat(60));
}

/// 记录操作提示
pub fn log_usage() {
    info!("💡 输入 y / yes 表示等式成立，n / no 表示不成立，l 查看历史，q 退出\n");
}

/// 打印最终统计信息
///
/// # 参数
/// - `stats`: 历史统计
pub fn print_final_stats(stats: &LedgerStats) {
    info!("\n{}", "=".repeat(60));
    info!("📊 本次会话统计");
    info!(
        "结束时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📝 题目: {}  已作答: {}", stats.total, stats.answered);
    info!("✅ OK: {}", stats.ok);
    info!("❌ FAILED: {}", stats.failed);
    info!("⏳ 等待判分: {}", stats.waiting);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
