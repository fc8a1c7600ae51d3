//! Example: run all three box-filter strategies on one image.
//!
//! Loads an image, blurs it with the naive, integral, and optimized
//! strategies at the given radius, verifies the outputs are bit-identical,
//! and writes the filtered images next to the input. Per-strategy timing is
//! printed to stdout and written to a JSON file.
//!
//! Run from the workspace root:
//!   cargo run -p boxmean --example strategies -- --help
//!   cargo run -p boxmean --example strategies -- --input photo.png --radius 4

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, ensure};
use boxmean::{Image, Rgba, Strategy};
use clap::Parser;
use image::RgbaImage;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(about = "Compare box-filter strategy timings on one image")]
struct Args {
    /// Path to the input image.
    #[arg(long)]
    input: String,

    /// Filter mask radius.
    #[arg(long, default_value_t = 4)]
    radius: i32,

    /// Output JSON path (default: <input stem>_timings.json next to input)
    #[arg(long)]
    out: Option<String>,
}

#[derive(Serialize)]
struct StrategyTiming {
    strategy: String,
    elapsed_ms: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let img_path = Path::new(&args.input);
    let out_path = args.out.unwrap_or_else(|| {
        let stem = img_path.file_stem().unwrap_or_default().to_string_lossy();
        let dir = img_path.parent().unwrap_or(Path::new("."));
        dir.join(format!("{stem}_timings.json"))
            .to_string_lossy()
            .into_owned()
    });

    let decoded = image::open(img_path)
        .with_context(|| format!("opening {}", img_path.display()))?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    let pixels = decoded
        .pixels()
        .map(|px| Rgba::new(px.0[0], px.0[1], px.0[2], px.0[3]))
        .collect();
    let img = Image::from_vec(width as usize, height as usize, pixels)
        .context("constructing image buffer")?;

    println!(
        "loaded {}: {width}x{height}, radius {}",
        img_path.display(),
        args.radius
    );

    let mut timings: Vec<StrategyTiming> = Vec::with_capacity(Strategy::ALL.len());
    let mut reference: Option<Image<Rgba>> = None;

    for strategy in Strategy::ALL {
        let t0 = Instant::now();
        let out = strategy.apply(&img, args.radius)?;
        let elapsed_ms = t0.elapsed().as_secs_f64() * 1e3;

        println!("  {:?}: {elapsed_ms:.2} ms", strategy);

        if let Some(reference) = &reference {
            ensure!(
                out == *reference,
                "strategy {strategy:?} disagrees with the first strategy's output"
            );
        } else {
            reference = Some(out.clone());
        }

        let name = img_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let filtered_path = img_path.with_file_name(format!("{}{name}", strategy.tag()));
        save_rgba(&out, &filtered_path)?;

        timings.push(StrategyTiming {
            strategy: format!("{strategy:?}"),
            elapsed_ms,
        });
    }

    let out_file =
        std::fs::File::create(&out_path).with_context(|| format!("creating {out_path}"))?;
    serde_json::to_writer_pretty(out_file, &timings)
        .with_context(|| format!("writing JSON to {out_path}"))?;

    println!("timings written to {out_path}");
    Ok(())
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
