//! TIFF conversion configuration types

/// Files smaller than this cannot carry the embedded raw block
pub const DEFAULT_MIN_INPUT_SIZE: u64 = 16 * 1024 * 1024;

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level (good speed/size balance)
    DeflateFast,
    /// Deflate compression - best compression (slower)
    DeflateBest,
    /// Deflate compression - balanced
    DeflateBalanced,
}

/// Configuration for raw to TIFF conversion
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Compression method to use
    pub compression: TiffCompression,
    /// Predictor value for compression (typically 2 for horizontal differencing)
    /// Note: Predictor adds processing time, set to None for maximum speed
    pub predictor: Option<u16>,
    /// Whether to validate image dimensions before writing
    pub validate_dimensions: bool,
    /// Captures below this size are skipped by directory conversion
    pub min_input_size: u64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            compression: TiffCompression::None,
            predictor: None,
            validate_dimensions: true,
            min_input_size: DEFAULT_MIN_INPUT_SIZE,
        }
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }
}

/// Builder for ConversionConfig
#[derive(Default)]
pub struct ConversionConfigBuilder {
    compression: Option<TiffCompression>,
    predictor: Option<Option<u16>>,
    validate_dimensions: Option<bool>,
    min_input_size: Option<u64>,
}

impl ConversionConfigBuilder {
    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }
    
    pub fn predictor(mut self, predictor: Option<u16>) -> Self {
        self.predictor = Some(predictor);
        self
    }
    
    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn min_input_size(mut self, bytes: u64) -> Self {
        self.min_input_size = Some(bytes);
        self
    }
    
    pub fn build(self) -> ConversionConfig {
        let default = ConversionConfig::default();
        ConversionConfig {
            compression: self.compression.unwrap_or(default.compression),
            predictor: self.predictor.unwrap_or(default.predictor),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            min_input_size: self.min_input_size.unwrap_or(default.min_input_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ConversionConfig::builder()
            .compression(TiffCompression::Lzw)
            .predictor(Some(2))
            .validate_dimensions(false)
            .min_input_size(1024)
            .build();

        assert_eq!(config.compression, TiffCompression::Lzw);
        assert_eq!(config.predictor, Some(2));
        assert!(!config.validate_dimensions);
        assert_eq!(config.min_input_size, 1024);
    }

    #[test]
    fn test_builder_defaults() {
        let config = ConversionConfig::builder().build();
        assert_eq!(config.compression, TiffCompression::None);
        assert_eq!(config.predictor, None);
        assert!(config.validate_dimensions);
        assert_eq!(config.min_input_size, 16_777_216);
    }
}
