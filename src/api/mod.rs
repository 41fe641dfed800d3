pub mod session;

pub use session::{AssistError, AssistSession};
