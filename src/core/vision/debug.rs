//! 调试图输出
//!
//! 分析流程的可选旁路，默认不做任何事。`ImageDumpSink` 把最后一帧、合并掩码
//! 以及检测框纵向拼成一张 PNG 写入输出目录。

use super::error::VisionError;
use super::frame::{BoundingBox, Frame, Mask};
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const BOX_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const BOX_THICKNESS: u32 = 2;

pub trait DebugSink: Send + Sync {
    fn on_analysis(&self, last_frame: &Frame, merged: &Mask, boxes: &[BoundingBox]);
}

pub struct NoopDebugSink;

impl DebugSink for NoopDebugSink {
    fn on_analysis(&self, _last_frame: &Frame, _merged: &Mask, _boxes: &[BoundingBox]) {}
}

pub struct ImageDumpSink {
    output_dir: PathBuf,
}

impl ImageDumpSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// 写出一张调试图，返回文件路径
    pub fn dump(
        &self,
        last_frame: &Frame,
        merged: &Mask,
        boxes: &[BoundingBox],
    ) -> Result<PathBuf, VisionError> {
        fs::create_dir_all(&self.output_dir)?;

        let original = frame_to_image(last_frame)?;
        let mask_view = mask_to_image(merged);
        let mut mask_boxes = mask_view.clone();
        let mut frame_boxes = original.clone();
        for bbox in boxes {
            draw_box(&mut mask_boxes, bbox);
            draw_box(&mut frame_boxes, bbox);
        }

        let sheet = stack_vertically(&[original, mask_view, mask_boxes, frame_boxes]);

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let path = self.output_dir.join(format!("debug_{}.png", millis));
        sheet.save(&path)?;

        debug!("🖼️ Debug image written to {:?}", path);
        Ok(path)
    }
}

impl DebugSink for ImageDumpSink {
    fn on_analysis(&self, last_frame: &Frame, merged: &Mask, boxes: &[BoundingBox]) {
        if let Err(e) = self.dump(last_frame, merged, boxes) {
            warn!("⚠️ Failed to write debug image: {}", e);
        }
    }
}

fn frame_to_image(frame: &Frame) -> Result<RgbImage, VisionError> {
    frame.validate()?;
    RgbImage::from_raw(frame.width, frame.height, frame.to_rgb())
        .ok_or_else(|| VisionError::InvalidFrame("frame buffer too small".to_string()))
}

fn mask_to_image(mask: &Mask) -> RgbImage {
    let (w, h) = mask.dimensions();
    RgbImage::from_fn(w, h, |x, y| {
        let v = mask.as_image().get_pixel(x, y)[0];
        Rgb([v, v, v])
    })
}

fn draw_box(image: &mut RgbImage, bbox: &BoundingBox) {
    let (w, h) = image.dimensions();
    let t = BOX_THICKNESS as i64;
    let left = bbox.x as i64;
    let top = bbox.y as i64;
    let right = left + bbox.width as i64;
    let bottom = top + bbox.height as i64;

    for y in top.max(0)..=bottom.min(h as i64 - 1) {
        for x in left.max(0)..=right.min(w as i64 - 1) {
            let on_edge = x < left + t || x > right - t || y < top + t || y > bottom - t;
            if on_edge {
                image.put_pixel(x as u32, y as u32, BOX_COLOR);
            }
        }
    }
}

/// Scales every image to the widest one and stacks them top to bottom.
fn stack_vertically(images: &[RgbImage]) -> RgbImage {
    let max_width = images.iter().map(|img| img.width()).max().unwrap_or(0);
    let scaled: Vec<RgbImage> = images
        .iter()
        .map(|img| {
            if img.width() == max_width || img.width() == 0 {
                img.clone()
            } else {
                let scale = max_width as f32 / img.width() as f32;
                let new_height = (img.height() as f32 * scale) as u32;
                imageops::resize(img, max_width, new_height, FilterType::Triangle)
            }
        })
        .collect();

    let total_height = scaled.iter().map(|img| img.height()).sum();
    let mut sheet = RgbImage::new(max_width, total_height);
    let mut offset = 0i64;
    for img in &scaled {
        imageops::replace(&mut sheet, img, 0, offset);
        offset += img.height() as i64;
    }
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vision::frame::ChannelOrder;

    #[test]
    fn test_dump_writes_stacked_png() {
        let dir = tempfile::tempdir().unwrap();
        let sink = ImageDumpSink::new(dir.path().join("output"));

        let frame = Frame::filled(40, 30, [0, 0, 0], ChannelOrder::Rgb);
        let mut mask = Mask::new(40, 30);
        mask.fill_rect(5, 5, 10, 10);
        let boxes = [BoundingBox::new(5, 5, 10, 10)];

        let path = sink.dump(&frame, &mask, &boxes).unwrap();
        assert!(path.exists());
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("debug_"));

        let sheet = image::open(&path).unwrap().to_rgb8();
        assert_eq!(sheet.dimensions(), (40, 120));
        // 第 4 张图（带框的原图）左上角是红色
        assert_eq!(*sheet.get_pixel(5, 90 + 5), BOX_COLOR);
    }

    #[test]
    fn test_draw_box_is_clipped_to_image() {
        let mut img = RgbImage::new(10, 10);
        draw_box(&mut img, &BoundingBox::new(-5, -5, 30, 30));
        assert_eq!(*img.get_pixel(0, 0), Rgb([0, 0, 0]));
        draw_box(&mut img, &BoundingBox::new(2, 2, 4, 4));
        assert_eq!(*img.get_pixel(2, 2), BOX_COLOR);
        assert_eq!(*img.get_pixel(6, 6), BOX_COLOR);
        assert_eq!(*img.get_pixel(4, 4), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_invalid_frame_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let sink = ImageDumpSink::new(dir.path());
        let frame = Frame::new(10, 10, vec![0; 5], ChannelOrder::Rgb, 0, 0);
        assert!(sink.dump(&frame, &Mask::new(10, 10), &[]).is_err());
        // on_analysis swallows the error
        sink.on_analysis(&frame, &Mask::new(10, 10), &[]);
    }
}
