pub mod config;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod preview;

pub use error::{LinkPreviewError, Result};
