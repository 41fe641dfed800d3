pub mod config;
#[cfg(feature = "desktop")]
pub mod desktop;
pub mod runtime;
pub mod vision;
