//! 辅助会话：选区 → 启动采集 → 三个工作线程

use crate::core::config::{AssistConfig, ConfigError};
use crate::core::runtime::{
    run_actuation_loop, run_analysis_loop, run_capture_loop, CancellationToken, CaptureError,
    CaptureSource, ClickError, Clicker, DetectionSlot, FrameRing, RegionSelector, ScreenRegion,
};
use crate::core::vision::{BoundingBox, FrameAnalysisPipeline, ImageDumpSink, VisionError};
use log::{error, info};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Click(#[from] ClickError),
    #[error(transparent)]
    Vision(#[from] VisionError),
    #[error("No region selected")]
    NoRegion,
    #[error("Failed to spawn thread: {0}")]
    ThreadSpawn(std::io::Error),
}

/// 运行中的辅助会话
///
/// ```no_run
/// # use glow_assist::api::AssistSession;
/// # use glow_assist::core::config::AssistConfig;
/// # use glow_assist::core::runtime::*;
/// let mut selector = FixedRegionSelector(Some(Selection::new(100, 100, 300, 300)));
/// let mut session = AssistSession::start(
///     &AssistConfig::default(),
///     &mut selector,
///     Box::new(MockCapture::new(Vec::new())),
///     Box::new(RecordingClicker::new()),
/// )?;
/// session.shutdown();
/// # Ok::<(), glow_assist::api::AssistError>(())
/// ```
pub struct AssistSession {
    region: ScreenRegion,
    cancel: CancellationToken,
    ring: Arc<FrameRing>,
    slot: Arc<DetectionSlot>,
    capture: Option<JoinHandle<Box<dyn CaptureSource>>>,
    analysis: Option<JoinHandle<u64>>,
    actuation: Option<JoinHandle<u64>>,
}

impl AssistSession {
    /// Selects the region, starts the capture source and spawns the capture,
    /// analysis and actuation threads.
    pub fn start(
        config: &AssistConfig,
        selector: &mut dyn RegionSelector,
        mut capture: Box<dyn CaptureSource>,
        mut clicker: Box<dyn Clicker>,
    ) -> Result<Self, AssistError> {
        config.validate()?;

        let selection = selector.select().ok_or(AssistError::NoRegion)?;
        info!("📐 Selected region: {:?}", selection);

        let (screen_width, screen_height) = capture.screen_size()?;
        let region = ScreenRegion::from_selection(
            selection,
            screen_width,
            screen_height,
            config.region_tolerance,
        );
        info!("📐 Capture region: {:?}", region);

        // 设备不可用在此直接失败
        capture.start(region, config.target_fps)?;

        let pipeline = Self::build_pipeline(config);
        let mut session = Self {
            region,
            cancel: CancellationToken::new(),
            ring: Arc::new(FrameRing::new(config.buffer_size)),
            slot: Arc::new(DetectionSlot::new()),
            capture: None,
            analysis: None,
            actuation: None,
        };

        // 之后的任何失败都会经 Drop 停掉已启动的线程
        let (ring, cancel, fps) = (session.ring.clone(), session.cancel.clone(), config.target_fps);
        session.capture = Some(spawn_named("glow-capture", move || {
            run_capture_loop(capture.as_mut(), &ring, &cancel, fps);
            capture
        })?);

        let (ring, slot, cancel) = (
            session.ring.clone(),
            session.slot.clone(),
            session.cancel.clone(),
        );
        let idle = config.analysis_idle();
        session.analysis = Some(spawn_named("glow-analysis", move || {
            run_analysis_loop(&pipeline, &ring, &slot, &cancel, idle)
        })?);

        let (slot, cancel, rate) = (session.slot.clone(), session.cancel.clone(), config.output_rate);
        session.actuation = Some(spawn_named("glow-actuation", move || {
            run_actuation_loop(clicker.as_mut(), &slot, region, &cancel, rate)
        })?);

        info!("🚀 AssistSession: started");
        Ok(session)
    }

    fn build_pipeline(config: &AssistConfig) -> FrameAnalysisPipeline {
        let pipeline = FrameAnalysisPipeline::with_config(config.analysis_config());
        if config.debug.enabled {
            info!("🖼️ Debug images enabled: {:?}", config.debug.output_dir);
            pipeline.with_debug_sink(Box::new(ImageDumpSink::new(&config.debug.output_dir)))
        } else {
            pipeline
        }
    }

    pub fn region(&self) -> ScreenRegion {
        self.region
    }

    pub fn latest_detections(&self) -> Vec<BoundingBox> {
        self.slot.latest()
    }

    pub fn buffered_frames(&self) -> usize {
        self.ring.len()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// 取消、等待所有线程退出并停止采集源。可重复调用
    pub fn shutdown(&mut self) {
        self.cancel.cancel();

        if let Some(handle) = self.actuation.take() {
            if handle.join().is_err() {
                error!("❌ Actuation thread panicked");
            }
        }
        if let Some(handle) = self.analysis.take() {
            if handle.join().is_err() {
                error!("❌ Analysis thread panicked");
            }
        }
        if let Some(handle) = self.capture.take() {
            match handle.join() {
                Ok(mut source) => source.stop(),
                Err(_) => error!("❌ Capture thread panicked"),
            }
            info!("🛑 AssistSession: stopped");
        }
    }
}

impl Drop for AssistSession {
    fn drop(&mut self) {
        self.shutdown();
        info!("🗑️ AssistSession: released");
    }
}

fn spawn_named<T, F>(name: &str, f: F) -> Result<JoinHandle<T>, AssistError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    thread::Builder::new()
        .name(name.to_string())
        .spawn(f)
        .map_err(AssistError::ThreadSpawn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::runtime::{FixedRegionSelector, MockCapture, RecordingClicker, Selection};

    #[test]
    fn test_cancelled_selection_is_no_region() {
        let mut selector = FixedRegionSelector(None);
        let result = AssistSession::start(
            &AssistConfig::default(),
            &mut selector,
            Box::new(MockCapture::new(Vec::new())),
            Box::new(RecordingClicker::new()),
        );
        assert!(matches!(result, Err(AssistError::NoRegion)));
    }

    #[test]
    fn test_unavailable_capture_is_fatal() {
        let mut selector = FixedRegionSelector(Some(Selection::new(0, 0, 100, 100)));
        let result = AssistSession::start(
            &AssistConfig::default(),
            &mut selector,
            Box::new(MockCapture::unavailable()),
            Box::new(RecordingClicker::new()),
        );
        assert!(matches!(
            result,
            Err(AssistError::Capture(CaptureError::Unavailable(_)))
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = AssistConfig {
            buffer_size: 0,
            ..Default::default()
        };
        let mut selector = FixedRegionSelector(Some(Selection::new(0, 0, 100, 100)));
        let result = AssistSession::start(
            &config,
            &mut selector,
            Box::new(MockCapture::new(Vec::new())),
            Box::new(RecordingClicker::new()),
        );
        assert!(matches!(result, Err(AssistError::Config(_))));
    }

    #[test]
    fn test_shutdown_stops_capture_source() {
        let capture = MockCapture::new(Vec::new()).with_screen_size(800, 600);
        let state = capture.state();
        let mut selector = FixedRegionSelector(Some(Selection::new(790, 10, 50, 50)));

        let mut session = AssistSession::start(
            &AssistConfig::default(),
            &mut selector,
            Box::new(capture),
            Box::new(RecordingClicker::new()),
        )
        .unwrap();

        assert_eq!(session.region(), ScreenRegion::new(770, 0, 800, 80));
        assert_eq!(state.region(), Some(session.region()));
        assert!(session.is_running());

        session.shutdown();
        assert!(!session.is_running());
        assert!(state.is_stopped());
        // 再次调用无副作用
        session.shutdown();
    }
}
