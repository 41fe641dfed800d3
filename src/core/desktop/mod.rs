//! 桌面后端（`desktop` feature）

pub mod capture;
pub mod clicker;

pub use capture::XcapCapture;
pub use clicker::EnigoClicker;
