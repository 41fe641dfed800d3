//! 外部协作者：屏幕采集、区域选择、鼠标点击

use super::error::{CaptureError, ClickError};
use super::region::{ScreenRegion, Selection};
use crate::core::vision::Frame;

/// 屏幕采集源
pub trait CaptureSource: Send {
    /// 屏幕尺寸 (width, height)
    fn screen_size(&self) -> Result<(u32, u32), CaptureError>;

    fn start(&mut self, region: ScreenRegion, target_fps: u32) -> Result<(), CaptureError>;

    /// `Ok(None)` means no new frame is ready yet.
    fn latest_frame(&mut self) -> Result<Option<Frame>, CaptureError>;

    fn stop(&mut self);
}

/// 让用户框选区域，取消时返回 None
pub trait RegionSelector {
    fn select(&mut self) -> Option<Selection>;
}

pub trait Clicker: Send {
    fn click(&mut self, x: i32, y: i32) -> Result<(), ClickError>;
}
