//!
//! Command-line driver wiring the voxel-dump reader, raster codec, and
//! the histogram/segmentation core together.
#![allow(clippy::uninlined_format_args)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;

use multivox_core::{
    AlphaSource, ChannelSet, CountScale, HistogramConfig, JointHistogram, Rgb,
    SegmentationMaskStore,
};
use multivox_io::{decode_raster, encode_raster, read_channels, VolumeShape};

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I/O error: {0}")]
    MultivoxIo(#[from] multivox_io::Error),

    #[error("Core error: {0}")]
    Core(#[from] multivox_core::Error),
}

/// Interactive multi-channel volume histogram and segmentation engine.
#[derive(Parser)]
#[command(name = "multivox")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show per-channel value ranges of a voxel dump
    Info {
        /// Input voxel dump (little-endian f32 samples per channel)
        input: PathBuf,

        /// Volume dimensions, e.g. 100x100x100
        #[arg(long, value_parser = parse_shape)]
        shape: VolumeShape,

        /// Number of channels in the dump
        #[arg(short, long)]
        channels: usize,
    },

    /// Build the 2D joint histogram of two channels
    Histogram {
        /// Input voxel dump
        input: PathBuf,

        /// Volume dimensions, e.g. 100x100x100
        #[arg(long, value_parser = parse_shape)]
        shape: VolumeShape,

        /// Number of channels in the dump
        #[arg(short, long)]
        channels: usize,

        /// Channel binned on the row axis
        #[arg(long, default_value = "0")]
        row_channel: usize,

        /// Channel binned on the column axis
        #[arg(long, default_value = "1")]
        col_channel: usize,

        /// Output image path
        #[arg(short, long)]
        output: PathBuf,

        /// Grid resolution per axis
        #[arg(long, default_value = "32")]
        bins: usize,

        /// Fixed count-normalization ceiling
        #[arg(long, default_value = "1000.0")]
        ceiling: f32,

        /// Normalize counts logarithmically
        #[arg(long)]
        log_scale: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Load a segmentation mask and drive the mask store
    Segments {
        /// Color-coded mask image
        mask: PathBuf,

        /// Distance image supplying per-pixel alpha
        #[arg(long)]
        distance: Option<PathBuf>,

        /// Force a uniform alpha instead of the distance values
        #[arg(long)]
        uniform_alpha: Option<u8>,

        /// Hide the segment of this color, e.g. 10,20,30
        #[arg(long, value_parser = parse_rgb)]
        hide: Option<Rgb>,

        /// Stamp a disc: X,Y,RADIUS,R,G,B
        #[arg(long, value_parser = parse_paint)]
        paint: Option<PaintSpec>,

        /// Write the resulting output raster here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the per-segment color/alpha table
        #[arg(long)]
        print_table: bool,
    },
}

/// A parsed `--paint` argument.
#[derive(Debug, Clone, Copy)]
struct PaintSpec {
    x: i64,
    y: i64,
    radius: u32,
    color: Rgb,
}

fn parse_shape(arg: &str) -> std::result::Result<VolumeShape, String> {
    let parts: Vec<&str> = arg.split('x').collect();
    if parts.len() != 3 {
        return Err(format!("expected XxYxZ, got '{arg}'"));
    }
    let mut dims = [0usize; 3];
    for (slot, part) in dims.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("invalid dimension '{part}'"))?;
    }
    Ok(VolumeShape::new(dims[0], dims[1], dims[2]))
}

fn parse_rgb(arg: &str) -> std::result::Result<Rgb, String> {
    let parts: Vec<&str> = arg.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected R,G,B, got '{arg}'"));
    }
    let mut color = [0u8; 3];
    for (slot, part) in color.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("invalid color component '{part}'"))?;
    }
    Ok(color)
}

fn parse_paint(arg: &str) -> std::result::Result<PaintSpec, String> {
    let parts: Vec<&str> = arg.split(',').collect();
    if parts.len() != 6 {
        return Err(format!("expected X,Y,RADIUS,R,G,B, got '{arg}'"));
    }
    let parse = |part: &str| -> std::result::Result<i64, String> {
        part.parse()
            .map_err(|_| format!("invalid paint component '{part}'"))
    };
    let radius = parts[2]
        .parse()
        .map_err(|_| format!("invalid radius '{}'", parts[2]))?;
    let color = parse_rgb(&parts[3..].join(","))?;
    Ok(PaintSpec {
        x: parse(parts[0])?,
        y: parse(parts[1])?,
        radius,
        color,
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Info {
            input,
            shape,
            channels,
        } => {
            let set = read_channels(&input, shape, channels)?;
            print_info(&set)?;
        }

        Commands::Histogram {
            input,
            shape,
            channels,
            row_channel,
            col_channel,
            output,
            bins,
            ceiling,
            log_scale,
            verbose,
        } => {
            if verbose {
                eprintln!("Reading {} ({} channels)...", input.display(), channels);
            }
            let set = read_channels(&input, shape, channels)?;

            let config = HistogramConfig {
                size: bins,
                count_ceiling: ceiling,
                scale: if log_scale {
                    CountScale::Log
                } else {
                    CountScale::Linear
                },
                ..HistogramConfig::default()
            };
            let mut histogram = JointHistogram::new(config);
            histogram.rebuild(&set, row_channel, col_channel)?;

            if verbose {
                eprintln!(
                    "Binned {} samples into {}x{} bins",
                    set.samples_per_channel(),
                    bins,
                    bins
                );
            }
            encode_raster(&output, histogram.image())?;
            println!("Wrote {}", output.display());
        }

        Commands::Segments {
            mask,
            distance,
            uniform_alpha,
            hide,
            paint,
            output,
            print_table,
        } => {
            let mut store = SegmentationMaskStore::new();
            store.load_mask(decode_raster(&mask)?, Some(mask.as_path()));
            println!(
                "Loaded {}: {}x{}, {} segments",
                mask.display(),
                store.mask().width(),
                store.mask().height(),
                store.segment_count()
            );

            if let Some(path) = distance {
                store.load_distance(decode_raster(&path)?)?;
                let source = match uniform_alpha {
                    Some(alpha) => AlphaSource::Uniform(alpha),
                    None => AlphaSource::Distance,
                };
                store.apply_distance_alpha(source)?;
            }

            if let Some(color) = hide {
                let changed = store.set_region_color(color, [0, 0, 0]);
                println!(
                    "Hid segment ({}, {}, {}): {} pixels",
                    color[0], color[1], color[2], changed
                );
            }

            if let Some(spec) = paint {
                store.paint_disc(spec.x, spec.y, spec.radius, spec.color)?;
            }

            if print_table {
                for (id, entry) in store.export_segment_table().iter().enumerate() {
                    println!(
                        "{}\t({}, {}, {})\t{}",
                        id,
                        entry.color[0],
                        entry.color[1],
                        entry.color[2],
                        entry.alpha_modifier
                    );
                }
            }

            if let Some(path) = output {
                encode_raster(&path, store.output())?;
                println!("Wrote {}", path.display());
            }
        }
    }

    Ok(())
}

fn print_info(set: &ChannelSet) -> Result<()> {
    println!(
        "{} channels x {} samples",
        set.num_channels(),
        set.samples_per_channel()
    );
    for channel in 0..set.num_channels() {
        let (min, max) = set.value_range(channel)?;
        println!("channel {}: [{}, {}]", channel, min, max);
    }
    Ok(())
}
