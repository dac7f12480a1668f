//! Bone Fracture Classification Example
//!
//! This example demonstrates how to classify bone X-ray images as fractured
//! or healthy using a pretrained ONNX model.
//!
//! Usage:
//! ```
//! cargo run --example classify -- --model-path <path_to_model> <image_paths>...
//! ```
//!
//! To pin the output tensor predictions are read from (for models exporting
//! more than one output), add `--output-name <name>`. To bound the wait on a
//! single model invocation, add `--timeout-ms <millis>`.

use clap::Parser;
use fracture_detect::core::init_tracing;
use fracture_detect::pipeline::FractureClassifier;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

/// Command-line arguments for the fracture classification example
#[derive(Parser)]
#[command(name = "classify")]
#[command(about = "Bone Fracture Classification Example - classifies X-ray images")]
struct Args {
    /// Path to the ONNX model file
    #[arg(short, long)]
    model_path: String,

    /// Image file paths to process
    #[arg(required = true)]
    images: Vec<String>,

    /// Output tensor name to read predictions from
    #[arg(long)]
    output_name: Option<String>,

    /// Bounded wait for a single model invocation, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging
    init_tracing();

    let args = Args::parse();

    info!("Bone Fracture Classification Example");

    if !Path::new(&args.model_path).exists() {
        error!("Model file not found: {}", args.model_path);
        return Err("Model file not found".into());
    }

    // Filter out non-existent image files and log errors for missing files
    let existing_images: Vec<String> = args
        .images
        .iter()
        .filter(|path| {
            let exists = Path::new(path).exists();
            if !exists {
                error!("Image file not found: {}", path);
            }
            exists
        })
        .cloned()
        .collect();

    if existing_images.is_empty() {
        error!("No valid image files found");
        return Err("No valid image files found".into());
    }

    let mut builder = FractureClassifier::builder().model_path(&args.model_path);
    if let Some(output_name) = &args.output_name {
        builder = builder.output_name(output_name);
    }
    if let Some(timeout_ms) = args.timeout_ms {
        builder = builder.timeout(Duration::from_millis(timeout_ms));
    }
    let classifier = builder.build()?;

    for (i, image_path) in existing_images.iter().enumerate() {
        info!(
            "Processing image {} of {}: {}",
            i + 1,
            existing_images.len(),
            image_path
        );
        match classifier.classify_path(image_path) {
            Ok(prediction) => {
                info!(
                    "   {} (confidence: {:.1}%)",
                    prediction.label,
                    prediction.confidence_percent()
                );
            }
            Err(e) => {
                error!("Classification failed for {}: {}", image_path, e);
                continue;
            }
        }
    }

    info!("Example completed!");
    Ok(())
}
