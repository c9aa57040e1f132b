//! Spot measurement types

use std::path::{Path, PathBuf};

use crate::image_pipeline::common::error::{ConversionError, Result};

/// A named rectangular region of interest, in pixel coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roi {
    pub name: String,
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Roi {
    pub fn new(name: impl Into<String>, x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            width,
            height,
        }
    }

    /// Parses `NAME=x,y,w,h`.
    pub fn parse(entry: &str) -> Result<Self> {
        let invalid = || ConversionError::ConfigurationError(format!("expected NAME=x,y,w,h, got {:?}", entry));

        let (name, coords) = entry.split_once('=').ok_or_else(invalid)?;
        let values = coords
            .split(',')
            .map(|v| v.trim().parse::<usize>().map_err(|_| invalid()))
            .collect::<Result<Vec<usize>>>()?;
        match values[..] {
            [x, y, width, height] if !name.trim().is_empty() => Ok(Self::new(name.trim(), x, y, width, height)),
            _ => Err(invalid()),
        }
    }
}

/// Pixel statistics of one channel inside one region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStats {
    pub mean: f64,
    /// Sample standard deviation
    pub std: f64,
    pub median: f64,
    pub min: u16,
    pub max: u16,
    /// Most frequent value, smallest on ties
    pub mode: u16,
}

/// Statistics of one region, one entry per image channel (R, G, B for color images)
#[derive(Debug, Clone, PartialEq)]
pub struct RegionMeasurement {
    pub roi: String,
    pub pixels: usize,
    pub channels: Vec<ChannelStats>,
}

/// Selection of the images measured by a batch run
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    /// Suffix a file name must end with, e.g. ".tiff"
    pub file_extension: String,
    /// Substring a file name must contain; empty matches everything
    pub name_filter: String,
    /// Mirror the source sub-directories below `dest_dir`
    pub keep_directory_structure: bool,
}

impl BatchConfig {
    pub fn new(source_dir: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            dest_dir: dest_dir.into(),
            file_extension: ".tiff".to_string(),
            name_filter: String::new(),
            keep_directory_structure: true,
        }
    }

    pub fn file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }

    pub fn name_filter(mut self, filter: impl Into<String>) -> Self {
        self.name_filter = filter.into();
        self
    }

    pub fn keep_directory_structure(mut self, keep: bool) -> Self {
        self.keep_directory_structure = keep;
        self
    }

    pub fn matches(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.file_extension) && file_name.contains(&self.name_filter)
    }

    /// Directory results for `file` belong in.
    pub fn output_dir_for(&self, file: &Path) -> PathBuf {
        if !self.keep_directory_structure {
            return self.dest_dir.clone();
        }
        match file.parent().and_then(|p| p.strip_prefix(&self.source_dir).ok()) {
            Some(relative) => self.dest_dir.join(relative),
            None => self.dest_dir.clone(),
        }
    }
}

/// Measurements of one image file
#[derive(Debug, Clone)]
pub struct MeasuredFile {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub regions: Vec<RegionMeasurement>,
}
