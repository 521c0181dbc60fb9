//! Model inspection utility for Heartysis ensemble artifacts.
//!
//! Loads an artifact, prints its SHA-256 digest (the value for
//! `HEARTYSIS_MODEL_SHA256`), its feature layout and members, and scores the
//! built-in sample patient as a smoke test.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin check_model -- [model_path] [--locale ru|en] [--expect-sha256 <hex>]
//! ```

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use heartysis::adapters::model::{EnsembleModel, DEFAULT_MODEL_PATH};
use heartysis::application::PredictionService;
use heartysis::domain::{FeatureEncoder, Locale, PatientRecord, FEATURE_NAMES};

struct Args {
    model_path: PathBuf,
    locale: Locale,
    expected_sha256: Option<String>,
}

fn usage() -> String {
    "Usage: check_model [model_path] [--locale ru|en] [--expect-sha256 <hex>]".to_string()
}

fn parse_args() -> Result<Args, String> {
    let mut args = env::args().skip(1);
    let mut model_path: Option<PathBuf> = None;
    let mut locale = Locale::default();
    let mut expected_sha256: Option<String> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--locale" => {
                let v = args.next().ok_or_else(usage)?;
                locale = v.parse()?;
            }
            "--expect-sha256" => {
                let v = args.next().ok_or_else(usage)?;
                expected_sha256 = Some(v.trim().to_ascii_lowercase());
            }
            "-h" | "--help" => return Err(usage()),
            _ => {
                if model_path.is_none() {
                    model_path = Some(PathBuf::from(arg));
                } else {
                    return Err(usage());
                }
            }
        }
    }

    Ok(Args {
        model_path: model_path.unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
        locale,
        expected_sha256,
    })
}

fn main() -> Result<(), String> {
    let args = parse_args()?;

    let model = EnsembleModel::load(&args.model_path, args.expected_sha256.as_deref())
        .map_err(|e| format!("Failed to load {:?}: {e}", args.model_path))?;

    println!("Model: {:?}", args.model_path);
    println!("SHA-256: {}", model.sha256());
    println!("Members: {}", model.member_count());

    for (i, (name, expected)) in model.feature_names().iter().zip(FEATURE_NAMES).enumerate() {
        if name == expected {
            println!("  [{i:2}] {name}");
        } else {
            println!("  [{i:2}] {name}  (form sends {expected})");
        }
    }
    if model.feature_names().len() != FEATURE_NAMES.len() {
        return Err(format!(
            "Artifact has {} features; the form produces {}",
            model.feature_names().len(),
            FEATURE_NAMES.len()
        ));
    }

    let service = PredictionService::new(Arc::new(model));
    let encoder = FeatureEncoder::new(args.locale);
    let sample = PatientRecord::sample(args.locale);
    let features = encoder.encode(&sample);

    let prediction = service
        .predict(features.as_slice())
        .map_err(|e| format!("Sample prediction failed: {e}"))?;

    println!("Sample features: {:?}", features.as_slice());
    println!(
        "Sample probability: {} ({})",
        prediction.rounded(),
        prediction.verdict().message(args.locale)
    );
    println!("HEARTYSIS_MODEL_SHA256={}", service.classifier().sha256());
    Ok(())
}
