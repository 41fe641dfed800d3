//! 运行时：区域、帧缓冲、结果槽、取消标志以及三个工作循环

pub mod cancel;
pub mod collaborators;
pub mod error;
pub mod loops;
pub mod mock;
pub mod region;
pub mod ring;
pub mod slot;

pub use cancel::CancellationToken;
pub use collaborators::{CaptureSource, Clicker, RegionSelector};
pub use error::{CaptureError, ClickError};
pub use loops::{run_actuation_loop, run_analysis_loop, run_capture_loop};
pub use mock::{FixedRegionSelector, MockCapture, MockCaptureState, RecordingClicker};
pub use region::{ScreenRegion, Selection};
pub use ring::FrameRing;
pub use slot::DetectionSlot;
