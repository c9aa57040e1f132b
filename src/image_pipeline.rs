//! Image processing pipeline module
//!
//! This module provides the numeric cores of the spot imaging workflow, with
//! separate modules for raw unpacking, TIFF I/O, pseudo-color mixing, region
//! measurement and conversion orchestration.

pub mod raw;
pub mod tiff;
pub mod mixing;
pub mod measure;
pub mod conversions;
pub mod common;

pub use common::{
    ColorPlane,
    ConversionError,
    ImageData,
    Result,
};

pub use raw::{
    BrcmReader,
    ColorPlanes,
    RawImageReader,
    SensorGeometry,
};

pub use self::tiff::{
    TiffCompression,
    ConversionConfig,
    ConversionConfigBuilder,
    TiffReader,
    TiffWriter,
    StandardTiffReader,
    StandardTiffWriter,
};

pub use mixing::{
    ChannelMixer,
    ExcitationImage,
    MixOutput,
    MixingConfig,
    MixingSpec,
};

pub use measure::{
    BatchConfig,
    MeasurementBatch,
    PixelStatsMeasurer,
    RegionMeasurer,
    Roi,
};

pub use conversions::{
    BatchReport,
    PseudocolorConfig,
    PseudocolorPipeline,
    RawToTiffPipeline,
};
