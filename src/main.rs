//! ferrite-data command-line inspector.
//!
//! Decodes a dataset file and prints a JSON summary, or prints seeded random
//! draws. Set `RUST_LOG=debug` to see header details.
//!
//! Run with:
//!   cargo run -- images train-images-idx3-ubyte --scale-min -1 --x-pad 2 --y-pad 2
//!   cargo run -- batch cifar-10-batches-bin/data_batch_1.bin --color

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use ferrite_data::{
    decode_batch, decode_images, decode_labels, ColorMode, DatasetSummary, DecodeConfig,
    RandomEngine,
};

#[derive(Parser)]
#[command(name = "ferrite-data", version, about = "Decode IDX and batch-record datasets")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode an IDX1 label file.
    Labels { path: PathBuf },

    /// Decode an IDX3 image file with rescale and padding.
    Images {
        path: PathBuf,
        /// JSON decode config; explicit flags override its fields.
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, allow_hyphen_values = true)]
        scale_min: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        scale_max: Option<f64>,
        #[arg(long)]
        x_pad: Option<f64>,
        #[arg(long)]
        y_pad: Option<f64>,
    },

    /// Decode a 10000-record binary batch file.
    Batch {
        path: PathBuf,
        /// Keep the three colour planes interleaved instead of averaging them.
        #[arg(long)]
        color: bool,
    },

    /// Print seeded uniform draws.
    Sample {
        #[arg(value_enum)]
        kind: SampleKind,
        #[arg(long, allow_hyphen_values = true)]
        min: f64,
        #[arg(long, allow_hyphen_values = true)]
        max: f64,
        #[arg(long, default_value_t = 10)]
        count: usize,
        #[arg(long, default_value_t = ferrite_data::random::DEFAULT_SEED)]
        seed: u64,
    },

    /// Print seeded Bernoulli draws as 0/1.
    Bernoulli {
        p: f64,
        #[arg(long, default_value_t = 10)]
        count: usize,
        #[arg(long, default_value_t = ferrite_data::random::DEFAULT_SEED)]
        seed: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SampleKind {
    I32,
    I64,
    U32,
    U64,
    F32,
    F64,
}

/// Rejects bounds `RandomEngine::uniform` would panic on. Integer kinds
/// saturate at their range, which keeps `min <= max`; float kinds need a
/// finite width after narrowing.
fn check_bounds(kind: SampleKind, min: f64, max: f64) -> Result<(), String> {
    if !min.is_finite() || !max.is_finite() {
        return Err(format!("--min {} and --max {} must be finite", min, max));
    }
    if min > max {
        return Err(format!("--min {} is greater than --max {}", min, max));
    }
    let width_finite = match kind {
        SampleKind::F32 => (max as f32 - min as f32).is_finite(),
        SampleKind::F64 => (max - min).is_finite(),
        _ => true,
    };
    if !width_finite {
        return Err(format!("--min {} to --max {} is too wide to sample", min, max));
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Labels { path } => {
            let labels = decode_labels(&path)?;
            print_json(&DatasetSummary::from_labels(&labels))
        }
        Command::Images { path, config, scale_min, scale_max, x_pad, y_pad } => {
            let mut cfg = match config {
                Some(cfg_path) => DecodeConfig::load_json(cfg_path)?,
                None => DecodeConfig::default(),
            };
            if let Some(v) = scale_min {
                cfg.scale_min = v;
            }
            if let Some(v) = scale_max {
                cfg.scale_max = v;
            }
            if let Some(v) = x_pad {
                cfg.x_padding = v;
            }
            if let Some(v) = y_pad {
                cfg.y_padding = v;
            }

            let (scale, padding) = cfg.transform_params()?;
            let images = decode_images(&path, scale, padding)?;
            print_json(&DatasetSummary::from_images(&images))
        }
        Command::Batch { path, color } => {
            let dataset = decode_batch(&path, ColorMode::from_color_flag(color))?;
            print_json(&dataset.summary())
        }
        Command::Sample { kind, min, max, count, seed } => {
            check_bounds(kind, min, max)?;
            let mut rng = RandomEngine::new(seed);
            match kind {
                SampleKind::I32 => {
                    let mut buf = vec![0i32; count];
                    rng.fill_uniform(&mut buf, min as i32, max as i32);
                    print_json(&buf)
                }
                SampleKind::I64 => {
                    let mut buf = vec![0i64; count];
                    rng.fill_uniform(&mut buf, min as i64, max as i64);
                    print_json(&buf)
                }
                SampleKind::U32 => {
                    let mut buf = vec![0u32; count];
                    rng.fill_uniform(&mut buf, min as u32, max as u32);
                    print_json(&buf)
                }
                SampleKind::U64 => {
                    let mut buf = vec![0u64; count];
                    rng.fill_uniform(&mut buf, min as u64, max as u64);
                    print_json(&buf)
                }
                SampleKind::F32 => {
                    let mut buf = vec![0f32; count];
                    rng.fill_uniform(&mut buf, min as f32, max as f32);
                    print_json(&buf)
                }
                SampleKind::F64 => {
                    let mut buf = vec![0f64; count];
                    rng.fill_uniform(&mut buf, min, max);
                    print_json(&buf)
                }
            }
        }
        Command::Bernoulli { p, count, seed } => {
            let mut rng = RandomEngine::new(seed);
            let draws: Vec<u32> = (0..count).map(|_| rng.bernoulli_u32(p)).collect();
            print_json(&draws)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
