//! 时间合并：多帧掩码按位或，闪烁的光效也能合成稳定的块

use super::error::VisionError;
use super::frame::{Mask, BACKGROUND, FOREGROUND};

/// Pixel-wise OR of `masks`. Returns `Ok(None)` for an empty sequence.
pub fn merge_masks(masks: &[Mask]) -> Result<Option<Mask>, VisionError> {
    let Some(first) = masks.first() else {
        return Ok(None);
    };

    let expected = first.dimensions();
    let mut merged = first.as_raw().to_vec();

    for mask in &masks[1..] {
        if mask.dimensions() != expected {
            return Err(VisionError::DimensionMismatch {
                expected,
                actual: mask.dimensions(),
            });
        }
        for (dst, &src) in merged.iter_mut().zip(mask.as_raw()) {
            if src != BACKGROUND {
                *dst = FOREGROUND;
            }
        }
    }

    Mask::from_raw(expected.0, expected.1, merged).map(Some)
}
