use rayon::prelude::*;
use tracing::{error, info, instrument, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    measure::stats::{PixelStatsMeasurer, RegionMeasurer},
    measure::types::{BatchConfig, MeasuredFile, RegionMeasurement, Roi},
    tiff::{StandardTiffReader, TiffReader},
};

/// Measures a fixed set of regions across every matching image below a directory.
pub struct MeasurementBatch<R: TiffReader, M: RegionMeasurer> {
    reader: R,
    measurer: M,
    config: BatchConfig,
}

impl MeasurementBatch<StandardTiffReader, PixelStatsMeasurer> {
    pub fn new(config: BatchConfig) -> Self {
        Self {
            reader: StandardTiffReader,
            measurer: PixelStatsMeasurer,
            config,
        }
    }
}

impl<R: TiffReader, M: RegionMeasurer> MeasurementBatch<R, M> {
    pub fn with_custom(reader: R, measurer: M, config: BatchConfig) -> Self {
        Self {
            reader,
            measurer,
            config,
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Matching files below `source_dir`, in file name order within each directory.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let source = &self.config.source_dir;
        if !source.is_dir() {
            return Err(ConversionError::InputReadError(format!(
                "{} is not a directory",
                source.display()
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(source).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_file()
                && entry.file_name().to_str().is_some_and(|name| self.config.matches(name))
            {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn measure_file(&self, path: &Path, rois: &[Roi]) -> Result<Vec<RegionMeasurement>> {
        let data = std::fs::read(path).map_err(|e| {
            ConversionError::InputReadError(format!("{}: {}", path.display(), e))
        })?;
        let image = self.reader.read_tiff(&data)?;
        self.measurer.measure(&image, rois)
    }
}

impl<R, M> MeasurementBatch<R, M>
where
    R: TiffReader + Sync,
    M: RegionMeasurer + Sync,
{
    /// Measures `rois` in every discovered image. Files that fail to decode or
    /// measure are logged and left out of the result.
    #[instrument(skip(self, rois), fields(source = %self.config.source_dir.display(), rois = rois.len()))]
    pub fn run(&self, rois: &[Roi]) -> Result<Vec<MeasuredFile>> {
        if rois.is_empty() {
            return Err(ConversionError::ConfigurationError("no regions of interest given".to_string()));
        }

        let files = self.discover()?;
        info!("Measuring {} regions in {} files", rois.len(), files.len());

        let measured: Vec<MeasuredFile> = files
            .par_iter()
            .filter_map(|path| match self.measure_file(path, rois) {
                Ok(regions) => Some(MeasuredFile {
                    source: path.clone(),
                    output_dir: self.config.output_dir_for(path),
                    regions,
                }),
                Err(e) => {
                    error!("Failed to measure {}: {}", path.display(), e);
                    None
                }
            })
            .collect();

        info!(measured = measured.len(), failed = files.len() - measured.len(), "Measurement complete");
        Ok(measured)
    }
}
