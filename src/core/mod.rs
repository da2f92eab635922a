pub mod pipeline;

pub use crate::domain::ports::{InputHandler, OutputHandler, RecordIter};
pub use crate::utils::error::Result;
