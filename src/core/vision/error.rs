use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),
    #[error("Invalid mask: {0}")]
    InvalidMask(String),
    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("Debug image error: {0}")]
    DebugImage(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
