use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use spot_imaging_rs::image_pipeline::mixing::parse_weight_entry;
use spot_imaging_rs::image_pipeline::tiff::DEFAULT_MIN_INPUT_SIZE;
use spot_imaging_rs::image_pipeline::{
    BatchConfig, ConversionConfig, MeasurementBatch, MixingConfig, MixingSpec, PseudocolorConfig,
    PseudocolorPipeline, RawToTiffPipeline, Roi, TiffCompression,
};
use spot_imaging_rs::logger;

use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "spot_imaging", about = "Raw unpacking, pseudo-coloring and spot measurement for fluorescence captures")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum CompressionArg {
    None,
    Lzw,
    DeflateFast,
    Deflate,
    DeflateBest,
}

impl From<CompressionArg> for TiffCompression {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::None => TiffCompression::None,
            CompressionArg::Lzw => TiffCompression::Lzw,
            CompressionArg::DeflateFast => TiffCompression::DeflateFast,
            CompressionArg::Deflate => TiffCompression::DeflateBalanced,
            CompressionArg::DeflateBest => TiffCompression::DeflateBest,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Unpack the embedded raw data of every .jpg in DIR into DIR/raws/*.tiff
    Unpack {
        dir: PathBuf,
        /// Shortcut for --compression lzw
        #[arg(long, conflicts_with = "compression")]
        lzw: bool,
        #[arg(long, value_enum)]
        compression: Option<CompressionArg>,
        /// Captures smaller than this many bytes are skipped
        #[arg(long, default_value_t = DEFAULT_MIN_INPUT_SIZE)]
        min_size: u64,
    },
    /// Mix the excitation TIFFs in DIR into one RGB composite DIR/OUTPUT
    Pseudocolor {
        dir: PathBuf,
        output: String,
        /// Input weights, LABEL=r,g,b (repeatable; replaces the default table)
        #[arg(long = "in", value_parser = parse_weight_entry)]
        input_weights: Vec<(String, [f64; 3])>,
        /// Output weights, LABEL=r,g,b (repeatable; replaces the default table)
        #[arg(long = "out", value_parser = parse_weight_entry)]
        output_weights: Vec<(String, [f64; 3])>,
        /// Extension of the excitation images (with or without the leading dot)
        #[arg(long, default_value = "tiff")]
        ext: String,
        /// Also write each hidden plane as OUTPUT-stem_LABEL.tif
        #[arg(long)]
        hidden: bool,
        #[arg(long, value_enum, default_value = "none")]
        compression: CompressionArg,
    },
    /// Measure per-channel statistics of regions across the images below SRC
    Measure {
        src: PathBuf,
        dest: PathBuf,
        /// Region of interest, NAME=x,y,w,h (repeatable)
        #[arg(long = "roi", value_parser = Roi::parse, required = true)]
        rois: Vec<Roi>,
        #[arg(long, default_value = ".tiff")]
        ext: String,
        /// Only measure files whose name contains this string
        #[arg(long, default_value = "")]
        contains: String,
        /// Do not mirror the source directory structure below DEST
        #[arg(long)]
        flat: bool,
    },
}

fn spec_or_default(entries: Vec<(String, [f64; 3])>, default: MixingSpec) -> MixingSpec {
    if entries.is_empty() {
        default
    } else {
        entries.into_iter().collect()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match cli.command {
        Command::Unpack { dir, lzw, compression, min_size } => {
            let compression = match (lzw, compression) {
                (true, _) => TiffCompression::Lzw,
                (false, Some(c)) => c.into(),
                (false, None) => TiffCompression::None,
            };
            let config = ConversionConfig::builder()
                .compression(compression)
                .min_input_size(min_size)
                .build();
            let pipeline = RawToTiffPipeline::new(config);
            info!("Compression: {:?}", pipeline.config().compression);

            let dir = std::fs::canonicalize(&dir)
                .with_context(|| format!("invalid target directory {}", dir.display()))?;
            info!("Working in directory {}", dir.display());

            let report = pipeline.convert_directory(&dir)?;
            if !report.failed.is_empty() {
                warn!("{} captures could not be converted", report.failed.len());
            }
        }
        Command::Pseudocolor {
            dir,
            output,
            input_weights,
            output_weights,
            ext,
            hidden,
            compression,
        } => {
            let config = PseudocolorConfig {
                mixing: MixingConfig {
                    input: spec_or_default(input_weights, MixingSpec::default_input()),
                    output: spec_or_default(output_weights, MixingSpec::default_output()),
                },
                extension: ext,
                write_hidden_planes: hidden,
                compression: compression.into(),
            };
            let pipeline = PseudocolorPipeline::new(config).context("invalid mixing tables")?;
            pipeline
                .run(&dir, &output)
                .with_context(|| format!("pseudo-coloring {} failed", dir.display()))?;
        }
        Command::Measure {
            src,
            dest,
            rois,
            ext,
            contains,
            flat,
        } => {
            let config = BatchConfig::new(src, dest)
                .file_extension(ext)
                .name_filter(contains)
                .keep_directory_structure(!flat);
            let batch = MeasurementBatch::new(config);

            for file in batch.run(&rois)? {
                for region in &file.regions {
                    for (channel, stats) in region.channels.iter().enumerate() {
                        info!(
                            file = %file.source.display(),
                            roi = %region.roi,
                            channel,
                            mean = stats.mean,
                            std = stats.std,
                            median = stats.median,
                            min = stats.min,
                            max = stats.max,
                            mode = stats.mode,
                            "Measured"
                        );
                    }
                }
            }
        }
    }

    Ok(())
}
