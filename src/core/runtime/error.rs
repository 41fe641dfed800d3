use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Capture device unavailable: {0}")]
    Unavailable(String),
    #[error("Capture backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum ClickError {
    #[error("Click backend error: {0}")]
    Backend(String),
}
