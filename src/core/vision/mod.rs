//! 光效检测 - 在采集区域内找出方形的青/黄色描边光效
//!
//! 核心流程：
//! 1. 颜色范围提取 - 每帧生成目标颜色掩码
//! 2. 时间合并 - 多帧掩码按位或，抵消闪烁
//! 3. 轮廓筛选 - 面积、四边形逼近、宽高比、实度
//! 4. 尺寸过滤 - 宽高窗口

pub mod contour;
pub mod debug;
pub mod error;
pub mod extractor;
pub mod frame;
pub mod geometry;
pub mod masker;
pub mod merger;
pub mod pipeline;
pub mod size_filter;

pub use debug::{DebugSink, ImageDumpSink, NoopDebugSink};
pub use error::VisionError;
pub use extractor::{ContourExtractor, RectCriteria};
pub use frame::{BoundingBox, ChannelOrder, Frame, Mask};
pub use geometry::Point;
pub use masker::{ColorRange, FrameMasker};
pub use merger::merge_masks;
pub use pipeline::{AnalysisConfig, FrameAnalysisPipeline};
pub use size_filter::SizeWindow;
