use super::error::VisionError;
use image::{DynamicImage, GrayImage, Luma};
use std::time::Duration;

/// 掩码前景值
pub const FOREGROUND: u8 = 255;
/// 掩码背景值
pub const BACKGROUND: u8 = 0;

/// 采集端给出的通道顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

/// 帧数据结构（3 通道，顺序由 `order` 声明）
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub order: ChannelOrder,
    pub timestamp: Duration,
    pub frame_number: u64,
}

impl Frame {
    pub fn new(
        width: u32,
        height: u32,
        data: Vec<u8>,
        order: ChannelOrder,
        timestamp_ms: u64,
        frame_number: u64,
    ) -> Self {
        Self {
            width,
            height,
            data,
            order,
            timestamp: Duration::from_millis(timestamp_ms),
            frame_number,
        }
    }

    /// 从 RGBA 缓冲构建 RGB 帧（丢弃 alpha）
    pub fn from_rgba(
        width: u32,
        height: u32,
        rgba: &[u8],
        timestamp_ms: u64,
        frame_number: u64,
    ) -> Self {
        let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
        for chunk in rgba.chunks_exact(4) {
            rgb.extend_from_slice(&chunk[..3]);
        }
        Self::new(width, height, rgb, ChannelOrder::Rgb, timestamp_ms, frame_number)
    }

    /// A frame of a single color, given in the frame's own channel order.
    pub fn filled(width: u32, height: u32, color: [u8; 3], order: ChannelOrder) -> Self {
        let data = color.repeat(width as usize * height as usize);
        Self::new(width, height, data, order, 0, 0)
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// 3 通道数据应有的字节数，尺寸溢出时为 None
    pub fn expected_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(3))
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn validate(&self) -> Result<(), VisionError> {
        let Some(expected) = self.expected_len() else {
            return Err(VisionError::InvalidFrame(format!(
                "frame #{} dimensions {}x{} overflow",
                self.frame_number, self.width, self.height
            )));
        };
        if self.data.len() != expected {
            return Err(VisionError::InvalidFrame(format!(
                "frame #{} is {}x{} but holds {} bytes (expected {})",
                self.frame_number,
                self.width,
                self.height,
                self.data.len(),
                expected
            )));
        }
        Ok(())
    }

    /// 通道重排：把帧数据统一成 B,G,R 顺序，供颜色范围比较使用
    pub fn to_bgr(&self) -> Vec<u8> {
        match self.order {
            ChannelOrder::Bgr => self.data.clone(),
            ChannelOrder::Rgb => swap_outer_channels(&self.data),
        }
    }

    /// Frame data as R,G,B regardless of the capture order.
    pub fn to_rgb(&self) -> Vec<u8> {
        match self.order {
            ChannelOrder::Rgb => self.data.clone(),
            ChannelOrder::Bgr => swap_outer_channels(&self.data),
        }
    }
}

// RGB <-> BGR
fn swap_outer_channels(data: &[u8]) -> Vec<u8> {
    let mut swapped = Vec::with_capacity(data.len());
    for px in data.chunks_exact(3) {
        swapped.extend_from_slice(&[px[2], px[1], px[0]]);
    }
    swapped
}

impl AsRef<Frame> for Frame {
    fn as_ref(&self) -> &Frame {
        self
    }
}

/// 单通道 8 位二值掩码
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    image: GrayImage,
}

impl Mask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: GrayImage::new(width, height),
        }
    }

    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, VisionError> {
        let len = data.len();
        let image = GrayImage::from_raw(width, height, data).ok_or_else(|| {
            VisionError::InvalidMask(format!(
                "{} bytes cannot back a {}x{} mask",
                len, width, height
            ))
        })?;
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.image.get_pixel(x, y)[0] != BACKGROUND
    }

    pub fn set(&mut self, x: u32, y: u32, foreground: bool) {
        let value = if foreground { FOREGROUND } else { BACKGROUND };
        self.image.put_pixel(x, y, Luma([value]));
    }

    /// Marks the rectangle `[x, x+w) × [y, y+h)` as foreground, clipped to the mask.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32) {
        for yy in y..y.saturating_add(h).min(self.height()) {
            for xx in x..x.saturating_add(w).min(self.width()) {
                self.set(xx, yy, true);
            }
        }
    }

    pub fn count_foreground(&self) -> usize {
        self.image.as_raw().iter().filter(|&&v| v != BACKGROUND).count()
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }

    pub fn into_image(self) -> GrayImage {
        self.image
    }
}

impl From<GrayImage> for Mask {
    fn from(image: GrayImage) -> Self {
        Self { image }
    }
}

/// 只接受单通道 8 位图像，其它格式一律视为非法输入
impl TryFrom<&DynamicImage> for Mask {
    type Error = VisionError;

    fn try_from(image: &DynamicImage) -> Result<Self, Self::Error> {
        match image {
            DynamicImage::ImageLuma8(gray) => Ok(Self {
                image: gray.clone(),
            }),
            other => Err(VisionError::InvalidMask(format!(
                "expected single-channel 8-bit image, got {:?}",
                other.color()
            ))),
        }
    }
}

/// 检测结果的外接矩形（掩码局部坐标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (i32, i32) {
        (
            self.x + (self.width / 2) as i32,
            self.y + (self.height / 2) as i32,
        )
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}
