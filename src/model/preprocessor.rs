use crate::model::artifacts::ArtifactLoadError;
use crate::model::schema::FeatureSchema;
use crate::normalizer::FeatureVector;
use serde::{Deserialize, Serialize};

// ============ Artifact Format ============

/// Exported state of the fitted encoder/scaler stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessorArtifact {
    pub schema_version: u32,
    pub schema_fingerprint: String,
    /// One-hot vocabularies, in schema order.
    pub categorical: Vec<CategoricalEncoding>,
    /// Standard-scaler parameters, in schema order.
    pub numeric: Vec<NumericScaling>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalEncoding {
    pub column: String,
    /// Known categories; output positions follow this order.
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericScaling {
    pub column: String,
    pub mean: f64,
    pub scale: f64,
}

// ============ Runtime ============

/// The consuming preprocessing stage rejected a feature vector.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PreprocessingError {
    #[error("feature column '{found}' at position {position} does not match expected '{expected}'")]
    ColumnMismatch {
        position: usize,
        expected: String,
        found: String,
    },
    #[error("feature column '{0}' is not a finite number")]
    NonFiniteValue(String),
}

/// Preprocessor output ready for the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedFeatures {
    pub values: Vec<f64>,
    /// Categorical columns whose value was not in the fitted vocabulary.
    pub unseen: Vec<&'static str>,
}

/// Validated encoder/scaler stage.
#[derive(Debug, Clone)]
pub struct FittedPreprocessor {
    artifact: PreprocessorArtifact,
    width: usize,
}

impl FittedPreprocessor {
    /// Checks the artifact against the compiled-in schema.
    pub fn from_artifact(
        artifact: PreprocessorArtifact,
        schema: &FeatureSchema,
    ) -> Result<Self, ArtifactLoadError> {
        const NAME: &str = "preprocessor";

        ArtifactLoadError::check_schema(
            NAME,
            schema,
            artifact.schema_version,
            &artifact.schema_fingerprint,
        )?;

        let categorical: Vec<&str> = artifact
            .categorical
            .iter()
            .map(|c| c.column.as_str())
            .collect();
        let numeric: Vec<&str> = artifact.numeric.iter().map(|n| n.column.as_str()).collect();
        ArtifactLoadError::check_columns(NAME, schema.categorical, &categorical)?;
        ArtifactLoadError::check_columns(NAME, schema.numeric, &numeric)?;

        for encoding in &artifact.categorical {
            if encoding.categories.is_empty() {
                return Err(ArtifactLoadError::EmptyVocabulary(encoding.column.clone()));
            }
        }

        for scaling in &artifact.numeric {
            if !scaling.mean.is_finite() || !scaling.scale.is_finite() || scaling.scale <= 0.0 {
                return Err(ArtifactLoadError::InvalidScaling {
                    column: scaling.column.clone(),
                    mean: scaling.mean,
                    scale: scaling.scale,
                });
            }
        }

        let width = artifact
            .categorical
            .iter()
            .map(|c| c.categories.len())
            .sum::<usize>()
            + artifact.numeric.len();

        Ok(Self { artifact, width })
    }

    /// Number of values produced per feature vector.
    pub fn output_width(&self) -> usize {
        self.width
    }

    pub fn artifact(&self) -> &PreprocessorArtifact {
        &self.artifact
    }

    /// One-hot encodes categoricals then standardizes numerics.
    ///
    /// A category missing from the vocabulary encodes as all zeros for its
    /// column.
    pub fn transform(
        &self,
        features: &FeatureVector,
    ) -> Result<TransformedFeatures, PreprocessingError> {
        let mut values = Vec::with_capacity(self.width);
        let mut unseen = Vec::new();

        for (position, ((name, value), encoding)) in features
            .categorical()
            .into_iter()
            .zip(&self.artifact.categorical)
            .enumerate()
        {
            if encoding.column != name {
                return Err(PreprocessingError::ColumnMismatch {
                    position,
                    expected: encoding.column.clone(),
                    found: name.to_string(),
                });
            }

            let hit = encoding.categories.iter().position(|c| c == value);
            if hit.is_none() {
                tracing::debug!(column = name, value, "Unseen category, encoding as no signal");
                unseen.push(name);
            }
            values.extend((0..encoding.categories.len()).map(|i| {
                if Some(i) == hit {
                    1.0
                } else {
                    0.0
                }
            }));
        }

        let offset = self.artifact.categorical.len();
        for (position, ((name, value), scaling)) in features
            .numeric()
            .into_iter()
            .zip(&self.artifact.numeric)
            .enumerate()
        {
            if scaling.column != name {
                return Err(PreprocessingError::ColumnMismatch {
                    position: offset + position,
                    expected: scaling.column.clone(),
                    found: name.to_string(),
                });
            }
            if !value.is_finite() {
                return Err(PreprocessingError::NonFiniteValue(name.to_string()));
            }
            values.push((value - scaling.mean) / scaling.scale);
        }

        Ok(TransformedFeatures { values, unseen })
    }
}
