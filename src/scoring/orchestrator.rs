//! Scoring pipeline for a single lead:
//! 1. Validate the submission
//! 2. Normalize it into a feature vector
//! 3. Predict the intent class
//! 4. Map the class to a base score
//! 5. Rerank using the comment

use crate::model::{IntentClassifier, ModelError};
use crate::models::{LeadSubmission, ScoreResult};
use crate::normalizer::normalize_lead;
use crate::scoring::mapper::map_intent_to_score;
use crate::scoring::reranker::{rerank_score, RerankPolicy};
use crate::validation::{LeadValidator, ValidationError};
use std::sync::Arc;

/// Failure of a scoring request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    /// The lead broke at least one rule. `first` is the highest-priority one.
    #[error("Validation error: {first}")]
    Validation {
        first: ValidationError,
        violations: Vec<ValidationError>,
    },
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Composes validation, normalization, inference, and reranking.
///
/// Holds only immutable state, so one instance can serve concurrent
/// requests.
#[derive(Clone)]
pub struct LeadScorer {
    validator: LeadValidator,
    classifier: Arc<dyn IntentClassifier>,
    rerank_policy: RerankPolicy,
}

impl LeadScorer {
    pub fn new(classifier: Arc<dyn IntentClassifier>) -> Self {
        Self {
            validator: LeadValidator::default(),
            classifier,
            rerank_policy: RerankPolicy::default(),
        }
    }

    pub fn with_validator(mut self, validator: LeadValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_rerank_policy(mut self, rerank_policy: RerankPolicy) -> Self {
        self.rerank_policy = rerank_policy;
        self
    }

    pub fn rerank_policy(&self) -> RerankPolicy {
        self.rerank_policy
    }

    /// Scores one lead. Validation failures short-circuit before any model work.
    pub fn score(&self, submission: &LeadSubmission) -> Result<ScoreResult, ScoringError> {
        let lead = self.validator.check(submission).map_err(|rejection| {
            tracing::warn!(
                "Lead rejected: {} ({} violation(s))",
                rejection.first,
                rejection.violations.len()
            );
            ScoringError::Validation {
                first: rejection.first,
                violations: rejection.violations,
            }
        })?;

        let features = normalize_lead(&lead);
        tracing::debug!(?features, "Lead normalized");

        let intent_class = self.classifier.predict(&features)?;
        let initial_score = map_intent_to_score(&intent_class);
        let reranked_score = rerank_score(initial_score, &lead.comments, self.rerank_policy);

        tracing::info!(
            "Lead scored: class={}, initial={}, reranked={}",
            intent_class,
            initial_score,
            reranked_score
        );

        Ok(ScoreResult {
            initial_score,
            reranked_score,
            intent_class,
        })
    }
}

impl std::fmt::Debug for LeadScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeadScorer")
            .field("validator", &self.validator)
            .field("rerank_policy", &self.rerank_policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::forest::InferenceError;
    use crate::normalizer::FeatureVector;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Returns a fixed label and records what it was asked to classify.
    struct FixedClassifier {
        label: &'static str,
        calls: AtomicUsize,
        last: Mutex<Option<FeatureVector>>,
    }

    impl FixedClassifier {
        fn new(label: &'static str) -> Arc<Self> {
            Arc::new(Self {
                label,
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            })
        }
    }

    impl IntentClassifier for FixedClassifier {
        fn predict(&self, features: &FeatureVector) -> Result<String, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(features.clone());
            Ok(self.label.to_string())
        }
    }

    struct BrokenClassifier;

    impl IntentClassifier for BrokenClassifier {
        fn predict(&self, _features: &FeatureVector) -> Result<String, ModelError> {
            Err(InferenceError::FeatureCount {
                expected: 16,
                found: 6,
            }
            .into())
        }
    }

    fn submission() -> LeadSubmission {
        LeadSubmission {
            phone: "+91-9876543210".to_string(),
            email: "meera@example.com".to_string(),
            credit_score: 750,
            age_group: "25–34".to_string(),
            marital_status: "Divorced–Remarried".to_string(),
            comments: "I'm very interested, please call asap".to_string(),
            consent: true,
            annual_income: 900_000.0,
            net_worth: 2_000_000.0,
            employment_status: "Employed".to_string(),
        }
    }

    #[test]
    fn test_end_to_end_medium_interested() {
        let classifier = FixedClassifier::new("Medium");
        let scorer = LeadScorer::new(classifier.clone());

        let result = scorer.score(&submission()).unwrap();
        assert_eq!(
            result,
            ScoreResult {
                initial_score: 50,
                reranked_score: 60,
                intent_class: "Medium".to_string(),
            }
        );

        let seen = classifier.last.lock().unwrap().clone().unwrap();
        assert_eq!(seen.marital_status, "Divorced-Remarried");
        assert_eq!(seen.age_group, "25-34");
        assert_eq!(seen.credit_score, 750.0);
    }

    #[test]
    fn test_validation_failure_skips_classifier() {
        let classifier = FixedClassifier::new("High");
        let scorer = LeadScorer::new(classifier.clone());
        let lead = LeadSubmission {
            consent: false,
            credit_score: 200,
            ..submission()
        };

        let err = scorer.score(&lead).unwrap_err();
        assert_eq!(
            err,
            ScoringError::Validation {
                first: ValidationError::CreditScoreOutOfRange(200),
                violations: vec![
                    ValidationError::CreditScoreOutOfRange(200),
                    ValidationError::ConsentRequired,
                ],
            }
        );
        assert_eq!(
            err.to_string(),
            "Validation error: Credit score must be between 300 and 850 (got 200)"
        );
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_model_failure_is_internal() {
        let scorer = LeadScorer::new(Arc::new(BrokenClassifier));

        let err = scorer.score(&submission()).unwrap_err();
        assert!(matches!(err, ScoringError::Model(ModelError::Inference(_))));
    }

    #[test]
    fn test_unknown_label_scores_zero_then_reranks() {
        let scorer = LeadScorer::new(FixedClassifier::new("Unknown"));

        let result = scorer.score(&submission()).unwrap();
        assert_eq!(result.initial_score, 0);
        assert_eq!(result.reranked_score, 10);
        assert_eq!(result.intent_class, "Unknown");
    }

    #[test]
    fn test_rerank_policy_is_applied() {
        let lead = LeadSubmission {
            comments: "Not interested, stop calling".to_string(),
            ..submission()
        };

        let legacy = LeadScorer::new(FixedClassifier::new("High"));
        assert_eq!(legacy.score(&lead).unwrap().reranked_score, 100);

        let corrected = LeadScorer::new(FixedClassifier::new("High"))
            .with_rerank_policy(RerankPolicy::SpecificFirst);
        assert_eq!(corrected.score(&lead).unwrap().reranked_score, 70);
    }

    #[test]
    fn test_custom_validator_is_used() {
        let lead = LeadSubmission {
            phone: "+44-7911123456".to_string(),
            ..submission()
        };

        let default_scorer = LeadScorer::new(FixedClassifier::new("Low"));
        assert!(default_scorer.score(&lead).is_err());

        let any_country = LeadScorer::new(FixedClassifier::new("Low"))
            .with_validator(LeadValidator::any_country());
        assert_eq!(any_country.score(&lead).unwrap().initial_score, 20);
    }
}
