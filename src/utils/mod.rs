//! Utility module

mod contain;
mod error;
pub mod width;

pub use contain::contained;
pub use error::{Error, Result};
