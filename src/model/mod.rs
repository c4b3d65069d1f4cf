//! Intent classifier: the exported preprocessing transform and tree ensemble
//! behind a single trait seam.

pub mod artifacts;
pub mod forest;
pub mod preprocessor;
pub mod schema;

use crate::normalizer::FeatureVector;
use artifacts::ModelArtifacts;
use forest::InferenceError;
use preprocessor::PreprocessingError;

/// Internal pipeline failure. Never caller-correctable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("preprocessing failed: {0}")]
    Preprocessing(#[from] PreprocessingError),
    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),
}

/// Maps a feature vector to an intent label.
///
/// Implementations must be safe for concurrent use; the scorer shares one
/// instance across all requests.
pub trait IntentClassifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<String, ModelError>;
}

/// Classifier backed by the loaded model artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactClassifier {
    artifacts: ModelArtifacts,
}

impl ArtifactClassifier {
    pub fn new(artifacts: ModelArtifacts) -> Self {
        Self { artifacts }
    }
}

impl IntentClassifier for ArtifactClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<String, ModelError> {
        let transformed = self.artifacts.preprocessor.transform(features)?;
        if !transformed.unseen.is_empty() {
            tracing::debug!(
                columns = ?transformed.unseen,
                "Lead has categories outside the fitted vocabulary"
            );
        }

        let label = self.artifacts.forest.predict(&transformed.values)?;
        Ok(label.to_string())
    }
}
