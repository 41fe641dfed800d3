//! 三个工作循环：采集 → 分析 → 点击
//!
//! 各循环只通过显式传入的句柄共享状态，每次迭代开头检查取消标志。

use super::cancel::CancellationToken;
use super::collaborators::{CaptureSource, Clicker};
use super::region::ScreenRegion;
use super::ring::FrameRing;
use super::slot::DetectionSlot;
use crate::core::vision::{Frame, FrameAnalysisPipeline};
use log::{debug, info, warn};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const SLEEP_STEP: Duration = Duration::from_millis(10);

fn interval_for_rate(rate: u32) -> Duration {
    Duration::from_secs_f64(1.0 / rate.max(1) as f64)
}

/// Sleeps for `duration` in short steps so a cancellation is noticed quickly.
fn sleep_unless_cancelled(cancel: &CancellationToken, duration: Duration) {
    let deadline = Instant::now() + duration;
    loop {
        if cancel.is_cancelled() {
            return;
        }
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        thread::sleep(SLEEP_STEP.min(deadline - now));
    }
}

/// 采集循环，返回写入缓冲区的帧数
pub fn run_capture_loop(
    source: &mut dyn CaptureSource,
    ring: &FrameRing,
    cancel: &CancellationToken,
    target_fps: u32,
) -> u64 {
    let frame_interval = interval_for_rate(target_fps);
    let mut captured = 0u64;
    // 下一帧应就绪的时刻，从成功取帧的请求时刻算起
    let mut next_tick = Instant::now();

    info!("📸 Capture loop started ({} fps)", target_fps);
    while !cancel.is_cancelled() {
        let polled_at = Instant::now();
        match source.latest_frame() {
            Ok(Some(frame)) => {
                ring.push(frame);
                captured += 1;
                next_tick = polled_at + frame_interval;
            }
            Ok(None) => {
                let now = Instant::now();
                if now >= next_tick {
                    // 本该有帧却没有，顺延一个周期
                    next_tick = now + frame_interval;
                }
                sleep_unless_cancelled(cancel, next_tick - now);
            }
            Err(e) => {
                warn!("⚠️ Capture failed: {}", e);
                next_tick = Instant::now() + frame_interval;
                sleep_unless_cancelled(cancel, frame_interval);
            }
        }
    }
    info!("📸 Capture loop stopped, {} frames captured", captured);
    captured
}

/// 分析循环，返回完成的分析次数
pub fn run_analysis_loop(
    pipeline: &FrameAnalysisPipeline,
    ring: &FrameRing,
    slot: &DetectionSlot,
    cancel: &CancellationToken,
    idle: Duration,
) -> u64 {
    let mut passes = 0u64;
    let mut last_newest: Option<Arc<Frame>> = None;

    info!("🔍 Analysis loop started (window {} frames)", ring.capacity());
    while !cancel.is_cancelled() {
        let Some(frames) = ring.snapshot_if_full() else {
            sleep_unless_cancelled(cancel, idle);
            continue;
        };

        // 没有新帧时不重复分析同一窗口
        let newest = frames.last().cloned();
        let unchanged = match (&newest, &last_newest) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        if unchanged {
            sleep_unless_cancelled(cancel, idle);
            continue;
        }
        last_newest = newest;

        // 分析期间不持有结果锁
        match pipeline.analyze(&frames) {
            Ok(boxes) => {
                slot.replace(boxes);
                passes += 1;
            }
            Err(e) => {
                warn!("⚠️ Analysis failed: {}", e);
                sleep_unless_cancelled(cancel, idle);
            }
        }
    }
    info!("🔍 Analysis loop stopped after {} passes", passes);
    passes
}

/// 点击循环：按 `output_rate` 轮询结果，每次最多点击一个目标。返回点击次数
pub fn run_actuation_loop(
    clicker: &mut dyn Clicker,
    slot: &DetectionSlot,
    region: ScreenRegion,
    cancel: &CancellationToken,
    output_rate: u32,
) -> u64 {
    let poll_interval = interval_for_rate(output_rate);
    let mut clicks = 0u64;

    info!("🖱️ Actuation loop started ({} Hz)", output_rate);
    while !cancel.is_cancelled() {
        let started = Instant::now();

        match slot.first() {
            Some(bbox) => {
                let (x, y) = region.to_screen(&bbox);
                match clicker.click(x, y) {
                    Ok(()) => {
                        clicks += 1;
                        info!("🎯 Clicked at ({}, {})", x, y);
                    }
                    Err(e) => warn!("⚠️ Click failed: {}", e),
                }
            }
            None => debug!("no detection"),
        }

        sleep_unless_cancelled(cancel, poll_interval.saturating_sub(started.elapsed()));
    }
    info!("🖱️ Actuation loop stopped, {} clicks", clicks);
    clicks
}
