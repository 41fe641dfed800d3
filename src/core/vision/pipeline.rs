use super::debug::{DebugSink, NoopDebugSink};
use super::error::VisionError;
use super::extractor::{ContourExtractor, RectCriteria};
use super::frame::{BoundingBox, Frame, Mask};
use super::geometry::bounding_rect;
use super::masker::{ColorRange, FrameMasker};
use super::merger::merge_masks;
use super::size_filter::SizeWindow;
use log::debug;
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub color_range: ColorRange,
    pub size_window: SizeWindow,
    pub aspect_ratio_range: (f64, f64),
    pub epsilon_factor: f64,
    pub min_solidity: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            color_range: ColorRange::default(),
            size_window: SizeWindow::default(),
            // 更严格的正方形要求（误差 20% 以内）
            aspect_ratio_range: (0.8, 1.2),
            epsilon_factor: 0.02,
            min_solidity: 0.7,
        }
    }
}

impl AnalysisConfig {
    /// 面积窗口由宽高窗口推出
    pub fn rect_criteria(&self) -> RectCriteria {
        RectCriteria {
            min_area: self.size_window.min_area(),
            max_area: self.size_window.max_area(),
            aspect_ratio_range: self.aspect_ratio_range,
            epsilon_factor: self.epsilon_factor,
            min_solidity: self.min_solidity,
        }
    }
}

/// 帧分析流水线：掩码 → 合并 → 轮廓筛选 → 尺寸过滤
///
/// Holds no per-call state, so one instance can be shared between threads.
pub struct FrameAnalysisPipeline {
    masker: FrameMasker,
    extractor: ContourExtractor,
    size_window: SizeWindow,
    debug_sink: Box<dyn DebugSink>,
}

impl FrameAnalysisPipeline {
    pub fn new() -> Self {
        Self::with_config(AnalysisConfig::default())
    }

    pub fn with_config(config: AnalysisConfig) -> Self {
        Self {
            masker: FrameMasker::new(config.color_range),
            extractor: ContourExtractor::new(config.rect_criteria()),
            size_window: config.size_window,
            debug_sink: Box::new(NoopDebugSink),
        }
    }

    pub fn with_debug_sink(mut self, sink: Box<dyn DebugSink>) -> Self {
        self.debug_sink = sink;
        self
    }

    /// Runs one full pass over `frames` and returns the surviving boxes in
    /// contour discovery order.
    pub fn analyze<F>(&self, frames: &[F]) -> Result<Vec<BoundingBox>, VisionError>
    where
        F: AsRef<Frame> + Sync,
    {
        let masks = self.mask_frames(frames)?;

        let Some(merged) = merge_masks(&masks)? else {
            return Ok(Vec::new());
        };

        let boxes = self.detect(&merged);
        debug!(
            "🔍 Analyzed {} frames: {} detection(s)",
            frames.len(),
            boxes.len()
        );

        if let Some(last) = frames.last() {
            self.debug_sink.on_analysis(last.as_ref(), &merged, &boxes);
        }

        Ok(boxes)
    }

    /// 每帧的掩码互不依赖，并行计算
    pub fn mask_frames<F>(&self, frames: &[F]) -> Result<Vec<Mask>, VisionError>
    where
        F: AsRef<Frame> + Sync,
    {
        frames
            .par_iter()
            .map(|frame| self.masker.mask(frame.as_ref()))
            .collect()
    }

    /// Contour extraction and size filtering on an already merged mask.
    pub fn detect(&self, merged: &Mask) -> Vec<BoundingBox> {
        self.extractor
            .extract(merged)
            .iter()
            .filter_map(|contour| bounding_rect(contour))
            .filter(|bbox| self.size_window.contains(bbox))
            .collect()
    }
}

impl Default for FrameAnalysisPipeline {
    fn default() -> Self {
        Self::new()
    }
}
