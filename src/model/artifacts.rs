use crate::model::forest::{ForestArtifact, RandomForest};
use crate::model::preprocessor::{FittedPreprocessor, PreprocessorArtifact};
use crate::model::schema::{FeatureSchema, FEATURE_SCHEMA};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Startup-time failure to obtain a usable, schema-compatible model.
///
/// Always fatal: the service must not accept traffic without both artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactLoadError {
    #[error("failed to read artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse artifact {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{artifact} schema version {found} does not match expected {expected}")]
    SchemaVersion {
        artifact: &'static str,
        expected: u32,
        found: u32,
    },
    #[error("{artifact} schema fingerprint {found} does not match expected {expected}")]
    SchemaFingerprint {
        artifact: &'static str,
        expected: String,
        found: String,
    },
    #[error("{artifact} columns {found:?} do not match expected {expected:?}")]
    ColumnMismatch {
        artifact: &'static str,
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("preprocessor column {0} has no categories")]
    EmptyVocabulary(String),
    #[error("preprocessor column {column} has invalid scaling (mean {mean}, scale {scale})")]
    InvalidScaling { column: String, mean: f64, scale: f64 },
    #[error("classifier declares no classes")]
    NoClasses,
    #[error("classifier contains no trees")]
    EmptyForest,
    #[error("tree {tree} node {node}: {reason}")]
    MalformedTree {
        tree: usize,
        node: usize,
        reason: String,
    },
    #[error("classifier expects {classifier} features but preprocessor produces {preprocessor}")]
    FeatureWidth {
        classifier: usize,
        preprocessor: usize,
    },
}

impl ArtifactLoadError {
    pub(crate) fn check_schema(
        artifact: &'static str,
        schema: &FeatureSchema,
        version: u32,
        fingerprint: &str,
    ) -> Result<(), Self> {
        if version != schema.version {
            return Err(Self::SchemaVersion {
                artifact,
                expected: schema.version,
                found: version,
            });
        }

        let expected = schema.fingerprint();
        if !fingerprint.eq_ignore_ascii_case(&expected) {
            return Err(Self::SchemaFingerprint {
                artifact,
                expected,
                found: fingerprint.to_string(),
            });
        }

        Ok(())
    }

    pub(crate) fn check_columns(
        artifact: &'static str,
        expected: &[&str],
        found: &[&str],
    ) -> Result<(), Self> {
        if expected == found {
            return Ok(());
        }

        Err(Self::ColumnMismatch {
            artifact,
            expected: expected.iter().map(|s| s.to_string()).collect(),
            found: found.iter().map(|s| s.to_string()).collect(),
        })
    }
}

/// The fitted preprocessing transform and classifier, loaded once at startup
/// and read-only afterwards.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub preprocessor: FittedPreprocessor,
    pub forest: RandomForest,
}

impl ModelArtifacts {
    /// Reads both artifacts from disk and validates them against [`FEATURE_SCHEMA`].
    pub fn load(
        preprocessor_path: impl AsRef<Path>,
        classifier_path: impl AsRef<Path>,
    ) -> Result<Self, ArtifactLoadError> {
        let preprocessor: PreprocessorArtifact = read_json(preprocessor_path.as_ref())?;
        let forest: ForestArtifact = read_json(classifier_path.as_ref())?;

        Self::from_parts(preprocessor, forest)
    }

    /// Validates already-parsed artifacts against [`FEATURE_SCHEMA`].
    pub fn from_parts(
        preprocessor: PreprocessorArtifact,
        forest: ForestArtifact,
    ) -> Result<Self, ArtifactLoadError> {
        let preprocessor = FittedPreprocessor::from_artifact(preprocessor, &FEATURE_SCHEMA)?;
        let forest = RandomForest::from_artifact(forest, &FEATURE_SCHEMA)?;

        if forest.n_features() != preprocessor.output_width() {
            return Err(ArtifactLoadError::FeatureWidth {
                classifier: forest.n_features(),
                preprocessor: preprocessor.output_width(),
            });
        }

        tracing::info!(
            schema_version = FEATURE_SCHEMA.version,
            features = forest.n_features(),
            trees = forest.tree_count(),
            classes = ?forest.classes(),
            "Model artifacts validated"
        );

        Ok(Self {
            preprocessor,
            forest,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactLoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ArtifactLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| ArtifactLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
