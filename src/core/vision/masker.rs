//! 颜色范围提取：把一帧转换成目标颜色的二值掩码

use super::error::VisionError;
use super::frame::{Frame, Mask, BACKGROUND, FOREGROUND};

/// Inclusive per-channel color range, in B,G,R order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl ColorRange {
    pub fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    #[inline]
    pub fn contains(&self, bgr: &[u8]) -> bool {
        (0..3).all(|c| self.lower[c] <= bgr[c] && bgr[c] <= self.upper[c])
    }
}

impl Default for ColorRange {
    /// 青/黄色描边光效
    fn default() -> Self {
        Self {
            lower: [190, 190, 0],
            upper: [255, 255, 100],
        }
    }
}

pub struct FrameMasker {
    range: ColorRange,
}

impl FrameMasker {
    pub fn new(range: ColorRange) -> Self {
        Self { range }
    }

    pub fn range(&self) -> &ColorRange {
        &self.range
    }

    pub fn mask(&self, frame: &Frame) -> Result<Mask, VisionError> {
        frame.validate()?;

        let bgr = frame.to_bgr();
        let data: Vec<u8> = bgr
            .chunks_exact(3)
            .map(|px| {
                if self.range.contains(px) {
                    FOREGROUND
                } else {
                    BACKGROUND
                }
            })
            .collect();

        Mask::from_raw(frame.width, frame.height, data)
    }
}

impl Default for FrameMasker {
    fn default() -> Self {
        Self::new(ColorRange::default())
    }
}
