//! Common utilities module
//!
//! This module contains the error type and the in-memory image types shared
//! by the unpacking, mixing and measurement stages.

pub mod error;
pub mod types;

pub use error::{ConversionError, Result};
pub use types::{ColorPlane, ImageData};
