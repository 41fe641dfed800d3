use glow_assist::api::AssistSession;
use glow_assist::core::config::AssistConfig;
use glow_assist::core::runtime::{
    FixedRegionSelector, MockCapture, RecordingClicker, ScreenRegion, Selection,
};
use glow_assist::core::vision::{BoundingBox, ChannelOrder, Frame};
use std::thread;
use std::time::{Duration, Instant};

fn create_test_frame(block: bool) -> Frame {
    let mut frame = Frame::filled(96, 96, [0, 0, 0], ChannelOrder::Bgr);
    if block {
        for y in 10..74u32 {
            for x in 10..74u32 {
                let idx = ((y * 96 + x) * 3) as usize;
                frame.data[idx..idx + 3].copy_from_slice(&[220, 220, 50]);
            }
        }
    }
    frame
}

fn fast_config() -> AssistConfig {
    AssistConfig {
        target_fps: 200,
        output_rate: 50,
        analysis_idle_ms: 1,
        ..Default::default()
    }
}

fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn test_session_clicks_detected_marker() {
    // 闪烁 + 偶尔取不到帧
    let frames = vec![create_test_frame(false), create_test_frame(true)];
    let capture = MockCapture::new(frames).with_gaps(5);
    let state = capture.state();
    let clicker = RecordingClicker::new();
    let mut selector = FixedRegionSelector(Some(Selection::new(100, 100, 96, 96)));

    let mut session = AssistSession::start(
        &fast_config(),
        &mut selector,
        Box::new(capture),
        Box::new(clicker.clone()),
    )
    .unwrap();
    assert_eq!(session.region(), ScreenRegion::new(80, 80, 216, 216));

    assert!(wait_until(|| !clicker.clicks().is_empty()));
    assert_eq!(
        session.latest_detections(),
        vec![BoundingBox::new(10, 10, 64, 64)]
    );
    assert_eq!(session.buffered_frames(), 7);

    session.shutdown();
    assert!(state.is_stopped());
    assert!(state.delivered() >= 7);
    assert!(clicker.clicks().iter().all(|&c| c == (122, 122)));
}

#[test]
fn test_session_without_marker_never_clicks() {
    let capture = MockCapture::new(vec![create_test_frame(false)]);
    let state = capture.state();
    let clicker = RecordingClicker::new();
    let mut selector = FixedRegionSelector(Some(Selection::new(0, 0, 96, 96)));

    let session = AssistSession::start(
        &fast_config(),
        &mut selector,
        Box::new(capture),
        Box::new(clicker.clone()),
    )
    .unwrap();

    assert!(wait_until(|| session.buffered_frames() == 7));
    thread::sleep(Duration::from_millis(100));
    assert!(session.latest_detections().is_empty());

    // Drop 时自动关闭
    drop(session);
    assert!(state.is_stopped());
    assert!(clicker.clicks().is_empty());
}
