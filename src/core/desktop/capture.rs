//! 基于 xcap 的屏幕区域采集

use crate::core::runtime::{CaptureError, CaptureSource, ScreenRegion};
use crate::core::vision::Frame;
use log::info;
use std::time::{Duration, Instant};
use xcap::Monitor;

/// Captures a region of the primary monitor, paced at the target frame rate.
pub struct XcapCapture {
    monitor: Monitor,
    region: Option<ScreenRegion>,
    frame_interval: Duration,
    last_capture: Option<Instant>,
    started_at: Instant,
    frame_number: u64,
}

impl XcapCapture {
    pub fn primary() -> Result<Self, CaptureError> {
        let monitors = Monitor::all().map_err(|e| CaptureError::Unavailable(e.to_string()))?;
        let mut fallback = None;
        let mut primary = None;
        for monitor in monitors {
            if monitor.is_primary().unwrap_or(false) {
                primary = Some(monitor);
                break;
            }
            if fallback.is_none() {
                fallback = Some(monitor);
            }
        }
        let monitor = primary
            .or(fallback)
            .ok_or_else(|| CaptureError::Unavailable("no monitor found".to_string()))?;

        Ok(Self {
            monitor,
            region: None,
            frame_interval: Duration::from_millis(50),
            last_capture: None,
            started_at: Instant::now(),
            frame_number: 0,
        })
    }
}

impl CaptureSource for XcapCapture {
    fn screen_size(&self) -> Result<(u32, u32), CaptureError> {
        let width = self
            .monitor
            .width()
            .map_err(|e| CaptureError::Backend(e.to_string()))?;
        let height = self
            .monitor
            .height()
            .map_err(|e| CaptureError::Backend(e.to_string()))?;
        Ok((width, height))
    }

    fn start(&mut self, region: ScreenRegion, target_fps: u32) -> Result<(), CaptureError> {
        if region.width() == 0 || region.height() == 0 {
            return Err(CaptureError::Unavailable(format!("empty region {:?}", region)));
        }
        // 先试采一次，设备不可用时在启动阶段就失败
        self.monitor
            .capture_region(
                region.left as u32,
                region.top as u32,
                region.width(),
                region.height(),
            )
            .map_err(|e| CaptureError::Unavailable(e.to_string()))?;

        self.region = Some(region);
        self.frame_interval = Duration::from_secs_f64(1.0 / target_fps.max(1) as f64);
        self.started_at = Instant::now();
        self.last_capture = None;
        self.frame_number = 0;
        info!("🖥️ XcapCapture: started on {:?}", region);
        Ok(())
    }

    fn latest_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
        let Some(region) = self.region else {
            return Err(CaptureError::Backend("capture not started".to_string()));
        };
        if self
            .last_capture
            .is_some_and(|last| last.elapsed() < self.frame_interval)
        {
            return Ok(None);
        }
        self.last_capture = Some(Instant::now());

        let image = self
            .monitor
            .capture_region(
                region.left as u32,
                region.top as u32,
                region.width(),
                region.height(),
            )
            .map_err(|e| CaptureError::Backend(e.to_string()))?;

        self.frame_number += 1;
        let timestamp_ms = self.started_at.elapsed().as_millis() as u64;
        Ok(Some(Frame::from_rgba(
            image.width(),
            image.height(),
            image.as_raw(),
            timestamp_ms,
            self.frame_number,
        )))
    }

    fn stop(&mut self) {
        if self.region.take().is_some() {
            info!("🗑️ XcapCapture: stopped after {} frames", self.frame_number);
        }
    }
}
