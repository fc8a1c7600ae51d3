use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use bm_core::{Image, Rgba};
use bm_diff::absdiff;
use bm_filter::Strategy;
use clap::{Args, Parser, Subcommand, ValueEnum};
use image::RgbaImage;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "bm_tools")]
#[command(about = "Box-mean filtering and pixel comparison for raster images")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Blur images with one or more filter strategies.
    Blur(BlurArgs),
    /// Compare two images pixel by pixel.
    Diff(DiffArgs),
}

#[derive(Args, Debug)]
struct BlurArgs {
    /// Filter mask radius.
    #[arg(short, long, default_value_t = 1)]
    radius: i32,

    /// Strategy to run; repeat to run several. Defaults to `fast`.
    #[arg(short, long, value_enum)]
    strategy: Vec<StrategyArg>,

    /// Input image files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct DiffArgs {
    /// First image to compare.
    a: PathBuf,

    /// Second image to compare.
    b: PathBuf,

    /// Where to write the difference image.
    #[arg(long, default_value = "diff.png")]
    out: PathBuf,

    /// Optional JSON summary of the comparison.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum StrategyArg {
    /// Direct convolution.
    Slow,
    /// Summed-area table.
    Fast,
    /// Summed-area table with an interior fast path.
    Optimized,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Slow => Strategy::Naive,
            StrategyArg::Fast => Strategy::Integral,
            StrategyArg::Optimized => Strategy::Optimized,
        }
    }
}

#[derive(Debug, Serialize)]
struct DiffSummary {
    max_diff: u8,
    width: usize,
    height: usize,
    clipped: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Command::Blur(args) => run_blur(args),
        Command::Diff(args) => run_diff(args),
    }
}

fn run_blur(args: BlurArgs) -> Result<()> {
    if args.radius < 0 {
        bail!("radius must be >= 0, got {}", args.radius);
    }

    let strategies: Vec<Strategy> = if args.strategy.is_empty() {
        vec![Strategy::Integral]
    } else {
        args.strategy.iter().map(|&s| Strategy::from(s)).collect()
    };

    for input in &args.inputs {
        println!(
            "processing {} with radius {}",
            input.display(),
            args.radius
        );
        let img = load_rgba(input)?;

        for strategy in &strategies {
            let out = strategy
                .apply(&img, args.radius)
                .with_context(|| format!("filtering {}", input.display()))?;

            let out_path = tagged_path(input, strategy.tag());
            save_rgba(&out, &out_path)?;
            println!("output written to {}", out_path.display());
        }
    }

    Ok(())
}

fn run_diff(args: DiffArgs) -> Result<()> {
    let a = load_rgba(&args.a)?;
    let b = load_rgba(&args.b)?;

    if a.width() != b.width() || a.height() != b.height() {
        eprintln!(
            "warning: dimensions differ ({}x{} vs {}x{}), comparing the intersection",
            a.width(),
            a.height(),
            b.width(),
            b.height()
        );
    }

    let report = absdiff(&a, &b);
    save_rgba(&report.image, &args.out)?;
    println!("max diff: {}", report.max_diff);

    if let Some(report_path) = &args.report {
        let summary = DiffSummary {
            max_diff: report.max_diff,
            width: report.image.width(),
            height: report.image.height(),
            clipped: report.clipped,
        };
        let bytes = serde_json::to_vec_pretty(&summary).context("serializing diff summary")?;
        fs::write(report_path, bytes)
            .with_context(|| format!("writing report {}", report_path.display()))?;
    }

    Ok(())
}

/// Prefixes the strategy tag onto the file name, keeping the parent
/// directory: `dir/cat.png` -> `dir/integral_cat.png`.
fn tagged_path(input: &Path, tag: &str) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{tag}{name}"))
}

fn load_rgba(path: &Path) -> Result<Image<Rgba>> {
    let decoded = image::open(path).with_context(|| format!("opening {}", path.display()))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    let pixels = rgba
        .pixels()
        .map(|px| Rgba::new(px.0[0], px.0[1], px.0[2], px.0[3]))
        .collect();

    Image::from_vec(width as usize, height as usize, pixels)
        .with_context(|| format!("constructing image buffer from {}", path.display()))
}

fn save_rgba(img: &Image<Rgba>, path: &Path) -> Result<()> {
    let mut raw = Vec::with_capacity(img.width() * img.height() * 4);
    for px in img.data() {
        raw.extend_from_slice(&[px.r, px.g, px.b, px.a]);
    }

    let out = RgbaImage::from_raw(img.width() as u32, img.height() as u32, raw)
        .context("constructing RgbaImage from raw bytes")?;
    out.save(path)
        .with_context(|| format!("saving image {}", path.display()))
}
