//! Spot measurement module
//!
//! This module measures per-channel pixel statistics over named regions of
//! interest, one image at a time or across a directory tree.

mod batch;
mod stats;
pub mod types;

pub use batch::MeasurementBatch;
pub use stats::{channel_stats, PixelStatsMeasurer, RegionMeasurer};
pub use types::{BatchConfig, ChannelStats, MeasuredFile, RegionMeasurement, Roi};
