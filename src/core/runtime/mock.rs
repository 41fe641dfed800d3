//! 测试用协作者

use super::collaborators::{CaptureSource, Clicker, RegionSelector};
use super::error::{CaptureError, ClickError};
use super::region::{ScreenRegion, Selection};
use crate::core::vision::Frame;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Observable state of a [`MockCapture`], shared with the test after the
/// source has been moved into a capture thread.
#[derive(Debug, Default)]
pub struct MockCaptureState {
    started: AtomicBool,
    stopped: AtomicBool,
    delivered: AtomicU64,
    region: Mutex<Option<ScreenRegion>>,
}

impl MockCaptureState {
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::SeqCst)
    }

    pub fn region(&self) -> Option<ScreenRegion> {
        *self.region.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Replays a fixed list of frames in a loop. Every `gap_every`-th poll yields
/// no frame.
pub struct MockCapture {
    frames: Vec<Frame>,
    cursor: usize,
    polls: u64,
    gap_every: Option<u64>,
    screen: (u32, u32),
    available: bool,
    state: Arc<MockCaptureState>,
}

impl MockCapture {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            cursor: 0,
            polls: 0,
            gap_every: None,
            screen: (1920, 1080),
            available: true,
            state: Arc::new(MockCaptureState::default()),
        }
    }

    /// 模拟无法创建采集设备
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(Vec::new())
        }
    }

    pub fn with_screen_size(mut self, width: u32, height: u32) -> Self {
        self.screen = (width, height);
        self
    }

    pub fn with_gaps(mut self, every: u64) -> Self {
        self.gap_every = Some(every.max(1));
        self
    }

    pub fn state(&self) -> Arc<MockCaptureState> {
        self.state.clone()
    }
}

impl CaptureSource for MockCapture {
    fn screen_size(&self) -> Result<(u32, u32), CaptureError> {
        Ok(self.screen)
    }

    fn start(&mut self, region: ScreenRegion, _target_fps: u32) -> Result<(), CaptureError> {
        if !self.available {
            return Err(CaptureError::Unavailable("mock device".to_string()));
        }
        *self.state.region.lock().unwrap_or_else(|e| e.into_inner()) = Some(region);
        self.state.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn latest_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
        if !self.state.is_started() {
            return Err(CaptureError::Backend("not started".to_string()));
        }
        self.polls += 1;
        if self.gap_every.is_some_and(|every| self.polls % every == 0) {
            return Ok(None);
        }
        if self.frames.is_empty() {
            return Ok(None);
        }

        let mut frame = self.frames[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.frames.len();
        frame.frame_number = self.state.delivered.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Some(frame))
    }

    fn stop(&mut self) {
        self.state.stopped.store(true, Ordering::SeqCst);
    }
}

/// Records every click; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingClicker {
    clicks: Arc<Mutex<Vec<(i32, i32)>>>,
}

impl RecordingClicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clicks(&self) -> Vec<(i32, i32)> {
        self.clicks.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Clicker for RecordingClicker {
    fn click(&mut self, x: i32, y: i32) -> Result<(), ClickError> {
        self.clicks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((x, y));
        Ok(())
    }
}

pub struct FixedRegionSelector(pub Option<Selection>);

impl RegionSelector for FixedRegionSelector {
    fn select(&mut self) -> Option<Selection> {
        self.0
    }
}
