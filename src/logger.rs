//! 日志初始化

use tracing_subscriber::EnvFilter;

/// 默认日志过滤规则，可通过 `RUST_LOG` 覆盖
const DEFAULT_FILTER: &str = "quiz_chain_solver=info,tower_http=info";

/// 初始化全局日志订阅器
///
/// 重复调用是安全的（测试中会多次调用）
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
