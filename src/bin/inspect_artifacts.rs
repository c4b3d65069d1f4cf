//! Utility to load the model artifacts and print what the service would serve.

use dotenvy::dotenv;
use lead_scoring_api::model::artifacts::ModelArtifacts;
use lead_scoring_api::model::schema::FEATURE_SCHEMA;
use std::env;

/// Main entry point for the artifact inspection utility.
///
/// Reads `PREPROCESSOR_PATH` and `CLASSIFIER_PATH` (or the first two
/// arguments), validates both artifacts and prints their shape. Exits non-zero
/// when either artifact fails to load.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    let mut args = env::args().skip(1);
    let preprocessor_path = args
        .next()
        .or_else(|| env::var("PREPROCESSOR_PATH").ok())
        .unwrap_or_else(|| "artifacts/preprocessor.json".to_string());
    let classifier_path = args
        .next()
        .or_else(|| env::var("CLASSIFIER_PATH").ok())
        .unwrap_or_else(|| "artifacts/intent_classifier.json".to_string());

    println!("Preprocessor: {}", preprocessor_path);
    println!("Classifier:   {}", classifier_path);
    println!();

    let artifacts = ModelArtifacts::load(&preprocessor_path, &classifier_path)?;

    println!("Schema version:     {}", FEATURE_SCHEMA.version);
    println!("Schema fingerprint: {}", FEATURE_SCHEMA.fingerprint());
    println!("Feature width:      {}", artifacts.preprocessor.output_width());
    println!("Trees:              {}", artifacts.forest.tree_count());
    println!("Classes:            {}", artifacts.forest.classes().join(", "));
    println!();

    println!("Categorical vocabularies:");
    for encoding in &artifacts.preprocessor.artifact().categorical {
        println!("- {}: {}", encoding.column, encoding.categories.join(", "));
    }
    println!("Numeric scaling:");
    for scaling in &artifacts.preprocessor.artifact().numeric {
        println!(
            "- {}: mean {}, scale {}",
            scaling.column, scaling.mean, scaling.scale
        );
    }

    Ok(())
}
