use glow_assist::core::vision::{
    merge_masks, AnalysisConfig, BoundingBox, ChannelOrder, ColorRange, Frame,
    FrameAnalysisPipeline, FrameMasker,
};

const MARKER_BGR: [u8; 3] = [220, 220, 50];

fn create_test_frame(width: u32, height: u32) -> Frame {
    Frame::filled(width, height, [0, 0, 0], ChannelOrder::Bgr)
}

fn paint(frame: &mut Frame, x0: u32, y0: u32, w: u32, h: u32, bgr: [u8; 3]) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            let idx = ((y * frame.width + x) * 3) as usize;
            frame.data[idx..idx + 3].copy_from_slice(&bgr);
        }
    }
}

fn frame_with_block(width: u32, height: u32, x: u32, y: u32, w: u32, h: u32) -> Frame {
    let mut frame = create_test_frame(width, height);
    paint(&mut frame, x, y, w, h, MARKER_BGR);
    frame
}

fn analyze_single(frame: Frame) -> Vec<BoundingBox> {
    FrameAnalysisPipeline::new().analyze(&[frame]).unwrap()
}

#[test]
fn test_end_to_end_seven_frames() {
    let frames: Vec<Frame> = (0..7)
        .map(|_| frame_with_block(96, 96, 10, 10, 64, 64))
        .collect();
    let boxes = FrameAnalysisPipeline::new().analyze(&frames).unwrap();
    assert_eq!(boxes, vec![BoundingBox::new(10, 10, 64, 64)]);
}

#[test]
fn test_flickering_marker_is_still_found() {
    // 只有第 2、4、6 帧出现光效
    let frames: Vec<Frame> = (1..=7)
        .map(|n| {
            if n % 2 == 0 {
                frame_with_block(96, 96, 10, 10, 64, 64)
            } else {
                create_test_frame(96, 96)
            }
        })
        .collect();
    let boxes = FrameAnalysisPipeline::new().analyze(&frames).unwrap();
    assert_eq!(boxes, vec![BoundingBox::new(10, 10, 64, 64)]);
}

#[test]
fn test_empty_input() {
    let frames: Vec<Frame> = Vec::new();
    assert!(FrameAnalysisPipeline::new().analyze(&frames).unwrap().is_empty());
}

#[test]
fn test_size_window_boundaries() {
    for (side, expected) in [(47, false), (48, true), (128, true), (129, false)] {
        let boxes = analyze_single(frame_with_block(200, 200, 30, 30, side, side));
        if expected {
            assert_eq!(boxes, vec![BoundingBox::new(30, 30, side, side)], "side {}", side);
        } else {
            assert!(boxes.is_empty(), "side {} should be rejected", side);
        }
    }
}

#[test]
fn test_elongated_block_is_rejected() {
    assert!(analyze_single(frame_with_block(200, 200, 30, 30, 48, 96)).is_empty());
}

#[test]
fn test_notched_square_is_rejected() {
    let mut frame = frame_with_block(200, 200, 20, 20, 96, 96);
    // 从上边挖出一个深槽
    paint(&mut frame, 43, 20, 50, 70, [0, 0, 0]);
    assert!(analyze_single(frame).is_empty());
}

/// 飞镖形凹四边形 (0,0),(70,60),(0,120),(120,60)，平移 `offset`
fn paint_dart(frame: &mut Frame, offset: u32) {
    for y in 0..=120u32 {
        let dy = (if y <= 60 { y } else { 120 - y }) as f64;
        let inner = (dy * 70.0 / 60.0).ceil() as u32;
        let outer = (dy * 2.0) as u32;
        paint(frame, inner + offset, y + offset, outer - inner + 1, 1, MARKER_BGR);
    }
}

#[test]
fn test_concave_quadrilateral_is_rejected_by_solidity() {
    let mut frame = create_test_frame(200, 200);
    paint_dart(&mut frame, 20);
    assert!(analyze_single(frame.clone()).is_empty());

    // 放开实度后同一形状被接受
    let lenient = FrameAnalysisPipeline::with_config(AnalysisConfig {
        min_solidity: 0.0,
        ..Default::default()
    });
    let boxes = lenient.analyze(&[frame]).unwrap();
    assert_eq!(boxes.len(), 1);
    assert!((48..=128).contains(&boxes[0].width));
}

#[test]
fn test_several_markers_in_discovery_order() {
    let mut frame = frame_with_block(300, 200, 180, 10, 64, 64);
    paint(&mut frame, 20, 100, 56, 56, MARKER_BGR);
    assert_eq!(
        analyze_single(frame),
        vec![BoundingBox::new(180, 10, 64, 64), BoundingBox::new(20, 100, 56, 56)]
    );
}

#[test]
fn test_off_color_block_is_ignored() {
    // R 超出上限
    let mut frame = create_test_frame(96, 96);
    paint(&mut frame, 10, 10, 64, 64, [220, 220, 150]);
    assert!(analyze_single(frame).is_empty());
}

#[test]
fn test_masking_extremes() {
    let masker = FrameMasker::new(ColorRange::default());

    let outside = masker.mask(&create_test_frame(32, 32)).unwrap();
    assert_eq!(outside.count_foreground(), 0);

    let inside = masker
        .mask(&Frame::filled(32, 32, MARKER_BGR, ChannelOrder::Bgr))
        .unwrap();
    assert_eq!(inside.count_foreground(), 32 * 32);
}

#[test]
fn test_merge_is_monotonic() {
    let masker = FrameMasker::default();
    let masks = vec![
        masker.mask(&frame_with_block(64, 64, 0, 0, 10, 10)).unwrap(),
        masker.mask(&frame_with_block(64, 64, 30, 30, 10, 10)).unwrap(),
    ];
    let merged = merge_masks(&masks).unwrap().unwrap();
    for mask in &masks {
        for y in 0..64 {
            for x in 0..64 {
                if mask.is_foreground(x, y) {
                    assert!(merged.is_foreground(x, y));
                }
            }
        }
    }
    assert_eq!(merged.count_foreground(), 200);
}

#[test]
fn test_analysis_is_deterministic() {
    let frames: Vec<Frame> = (0..7)
        .map(|n| {
            let mut frame = frame_with_block(160, 160, 40, 40, 70, 70);
            paint(&mut frame, 5 + n, 5, 3, 3, MARKER_BGR);
            frame
        })
        .collect();
    let pipeline = FrameAnalysisPipeline::new();
    let first = pipeline.analyze(&frames).unwrap();
    assert_eq!(first, vec![BoundingBox::new(40, 40, 70, 70)]);
    for _ in 0..3 {
        assert_eq!(pipeline.analyze(&frames).unwrap(), first);
    }
}
