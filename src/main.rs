use clap::Parser;
use image::ImageReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use drawscan::Detector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "drawscan")]
#[command(about = "Detect labeled regions in engineering drawing images")]
struct Cli {
    /// Input image; runs one detection and prints the summary.
    /// Omit it to launch the interactive viewer.
    #[arg(value_name = "IMAGE")]
    image_path: Option<PathBuf>,

    /// Path to the ONNX detector weights
    #[arg(long, value_name = "PATH", default_value = "weights/best.onnx")]
    weights: PathBuf,

    /// Minimum confidence for a detection to be kept
    #[arg(long, default_value_t = 0.3, value_parser = check_confidence)]
    confidence: f32,

    /// Save the annotated image to this path (headless mode only)
    #[arg(long, value_name = "PATH")]
    save_annotated: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn check_confidence(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|e| format!("not a number: {e}"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("confidence must be within [0, 1], got {value}"))
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_filter = if args.verbose {
        "drawscan=debug"
    } else {
        "drawscan=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let detector = Detector::load(&args.weights).with_context(|| {
        format!("failed to load detector weights from {}", args.weights.display())
    })?;

    match args.image_path {
        Some(path) => run_headless(&detector, &path, args.confidence, args.save_annotated),
        None => launch_viewer(detector, args.confidence),
    }
}

fn run_headless(
    detector: &Detector,
    image_path: &Path,
    confidence: f32,
    save_annotated: Option<PathBuf>,
) -> anyhow::Result<()> {
    let img = ImageReader::open(image_path)
        .with_context(|| format!("failed to open image: {}", image_path.display()))?
        .decode()
        .map_err(|e| anyhow::anyhow!("failed to decode image: {e}"))?
        .to_rgb8();

    tracing::info!(
        path = %image_path.display(),
        width = img.width(),
        height = img.height(),
        "image loaded"
    );

    let result = detector.run_detection(&img, confidence)?;

    println!("Total detections: {}", result.detections.len());
    if result.detections.is_empty() {
        println!("No detections.");
    } else {
        for (i, det) in result.detections.iter().enumerate() {
            println!(
                "[{i}] class={}  conf={:.2}  box=({}, {}, {}, {})",
                det.class_name,
                det.confidence,
                det.bbox.x1,
                det.bbox.y1,
                det.bbox.x2,
                det.bbox.y2,
            );
        }
    }

    if let Some(out) = save_annotated {
        result
            .annotated
            .save(&out)
            .with_context(|| format!("failed to save annotated image to {}", out.display()))?;
        println!("Annotated image saved to {}", out.display());
    }

    Ok(())
}

#[cfg(feature = "gui")]
fn launch_viewer(detector: Detector, confidence: f32) -> anyhow::Result<()> {
    drawscan::gui::run(detector, confidence).map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}

#[cfg(not(feature = "gui"))]
fn launch_viewer(_detector: Detector, _confidence: f32) -> anyhow::Result<()> {
    anyhow::bail!("built without the `gui` feature; pass an IMAGE path to run headless")
}
