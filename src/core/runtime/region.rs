//! 采集区域与屏幕坐标换算

use crate::core::vision::BoundingBox;

/// 用户选定的区域 (x, y, width, height)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Selection {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Capture region in absolute screen pixels. `right` and `bottom` are
/// exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRegion {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ScreenRegion {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Clamps the selection into the screen, then grows it by `tolerance` on
    /// every side, stopping at the screen edges.
    pub fn from_selection(
        selection: Selection,
        screen_width: u32,
        screen_height: u32,
        tolerance: u32,
    ) -> Self {
        let sw = i32::try_from(screen_width.max(1)).unwrap_or(i32::MAX);
        let sh = i32::try_from(screen_height.max(1)).unwrap_or(i32::MAX);
        let tolerance = i32::try_from(tolerance).unwrap_or(i32::MAX);

        let left = selection.x.clamp(0, sw - 1);
        let top = selection.y.clamp(0, sh - 1);
        let width = i32::try_from(selection.width).unwrap_or(i32::MAX);
        let height = i32::try_from(selection.height).unwrap_or(i32::MAX);
        let right = selection.x.saturating_add(width).min(sw).max(left + 1);
        let bottom = selection.y.saturating_add(height).min(sh).max(top + 1);

        Self {
            left: left.saturating_sub(tolerance).max(0),
            top: top.saturating_sub(tolerance).max(0),
            right: right.saturating_add(tolerance).min(sw),
            bottom: bottom.saturating_add(tolerance).min(sh),
        }
    }

    pub fn width(&self) -> u32 {
        (self.right - self.left).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.bottom - self.top).max(0) as u32
    }

    /// 检测框中心对应的屏幕绝对坐标
    pub fn to_screen(&self, bbox: &BoundingBox) -> (i32, i32) {
        let (cx, cy) = bbox.center();
        (self.left + cx, self.top + cy)
    }
}
