use crate::model::artifacts::ArtifactLoadError;
use crate::model::schema::FeatureSchema;
use serde::{Deserialize, Serialize};

// ============ Artifact Format ============

/// Exported state of the fitted tree ensemble.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestArtifact {
    pub schema_version: u32,
    pub schema_fingerprint: String,
    /// Width of the preprocessed input the trees were fitted on.
    pub n_features: usize,
    /// Class labels; leaf `value` entries follow this order.
    pub classes: Vec<String>,
    pub trees: Vec<TreeArtifact>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeArtifact {
    /// Flat node array, root at index 0.
    pub nodes: Vec<NodeArtifact>,
}

/// One node of an exported tree. Leaves have `left == right == -1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeArtifact {
    pub feature: i64,
    pub threshold: f64,
    pub left: i64,
    pub right: i64,
    /// Per-class training weight reaching this node.
    pub value: Vec<f64>,
}

const LEAF: i64 = -1;

// ============ Runtime ============

/// Inference could not produce a label.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("classifier expects {expected} features, got {found}")]
    FeatureCount { expected: usize, found: usize },
    #[error("feature {0} is not a finite number")]
    NonFiniteFeature(usize),
}

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        distribution: Vec<f64>,
    },
}

#[derive(Debug, Clone)]
struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    fn from_artifact(
        index: usize,
        tree: &TreeArtifact,
        n_features: usize,
        n_classes: usize,
    ) -> Result<Self, ArtifactLoadError> {
        let malformed = |node: usize, reason: String| ArtifactLoadError::MalformedTree {
            tree: index,
            node,
            reason,
        };

        if tree.nodes.is_empty() {
            return Err(malformed(0, "tree has no nodes".to_string()));
        }

        let mut nodes = Vec::with_capacity(tree.nodes.len());
        for (i, node) in tree.nodes.iter().enumerate() {
            if node.left == LEAF && node.right == LEAF {
                if node.value.len() != n_classes {
                    return Err(malformed(
                        i,
                        format!(
                            "leaf has {} class weights, expected {}",
                            node.value.len(),
                            n_classes
                        ),
                    ));
                }
                let total: f64 = node.value.iter().sum();
                if !total.is_finite()
                    || total <= 0.0
                    || node.value.iter().any(|w| !w.is_finite() || *w < 0.0)
                {
                    return Err(malformed(
                        i,
                        "leaf weights must be non-negative with a positive sum".to_string(),
                    ));
                }
                nodes.push(Node::Leaf {
                    distribution: node.value.iter().map(|w| w / total).collect(),
                });
                continue;
            }

            // Children must come after their parent so traversal always terminates.
            let child = |raw: i64| -> Option<usize> {
                usize::try_from(raw)
                    .ok()
                    .filter(|c| *c > i && *c < tree.nodes.len())
            };
            let (Some(left), Some(right)) = (child(node.left), child(node.right)) else {
                return Err(malformed(
                    i,
                    format!("invalid children {} / {}", node.left, node.right),
                ));
            };
            let feature = usize::try_from(node.feature)
                .ok()
                .filter(|f| *f < n_features)
                .ok_or_else(|| {
                    malformed(i, format!("feature index {} out of range", node.feature))
                })?;
            if !node.threshold.is_finite() {
                return Err(malformed(i, "threshold is not finite".to_string()));
            }

            nodes.push(Node::Split {
                feature,
                threshold: node.threshold,
                left,
                right,
            });
        }

        Ok(Self { nodes })
    }

    fn leaf_distribution(&self, x: &[f64]) -> &[f64] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { distribution } => return distribution,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if x[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

/// Validated random-forest classifier.
#[derive(Debug, Clone)]
pub struct RandomForest {
    n_features: usize,
    classes: Vec<String>,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Checks the artifact against the compiled-in schema and its own structure.
    pub fn from_artifact(
        artifact: ForestArtifact,
        schema: &FeatureSchema,
    ) -> Result<Self, ArtifactLoadError> {
        ArtifactLoadError::check_schema(
            "classifier",
            schema,
            artifact.schema_version,
            &artifact.schema_fingerprint,
        )?;

        if artifact.classes.is_empty() {
            return Err(ArtifactLoadError::NoClasses);
        }
        if artifact.trees.is_empty() {
            return Err(ArtifactLoadError::EmptyForest);
        }

        let trees = artifact
            .trees
            .iter()
            .enumerate()
            .map(|(i, tree)| {
                DecisionTree::from_artifact(i, tree, artifact.n_features, artifact.classes.len())
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            n_features: artifact.n_features,
            classes: artifact.classes,
            trees,
        })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Mean of the per-tree leaf class distributions.
    pub fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if x.len() != self.n_features {
            return Err(InferenceError::FeatureCount {
                expected: self.n_features,
                found: x.len(),
            });
        }
        if let Some(i) = x.iter().position(|v| !v.is_finite()) {
            return Err(InferenceError::NonFiniteFeature(i));
        }

        let mut proba = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (acc, p) in proba.iter_mut().zip(tree.leaf_distribution(x)) {
                *acc += p;
            }
        }
        let n = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n);

        Ok(proba)
    }

    /// Most probable class label. Ties go to the earlier class.
    pub fn predict(&self, x: &[f64]) -> Result<&str, InferenceError> {
        let proba = self.predict_proba(x)?;
        let mut best = 0;
        for (i, p) in proba.iter().enumerate().skip(1) {
            if *p > proba[best] {
                best = i;
            }
        }
        Ok(self.classes[best].as_str())
    }
}
