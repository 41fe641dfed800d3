pub mod api;
pub mod core;

/// 安装 env_logger，默认级别 info，可用 `RUST_LOG` 覆盖。重复调用无副作用
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
