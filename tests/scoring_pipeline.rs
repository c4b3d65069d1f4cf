/// End-to-end scoring with the bundled model artifacts
/// Covers validation gates, normalization, inference, and reranking together
use lead_scoring_api::model::artifacts::ModelArtifacts;
use lead_scoring_api::model::ArtifactClassifier;
use lead_scoring_api::models::{LeadSubmission, ScoreResult};
use lead_scoring_api::scoring::{LeadScorer, RerankPolicy, ScoringError};
use lead_scoring_api::validation::ValidationError;
use std::path::PathBuf;
use std::sync::Arc;

fn artifact_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("artifacts")
        .join(name)
}

fn scorer() -> LeadScorer {
    let artifacts = ModelArtifacts::load(
        artifact_path("preprocessor.json"),
        artifact_path("intent_classifier.json"),
    )
    .expect("bundled artifacts load");
    LeadScorer::new(Arc::new(ArtifactClassifier::new(artifacts)))
}

/// Helper to build a lead the bundled forest classifies as High
fn strong_lead() -> LeadSubmission {
    LeadSubmission {
        phone: "+91-9876543210".to_string(),
        email: "kavya.rao@example.com".to_string(),
        credit_score: 780,
        age_group: "35-44".to_string(),
        marital_status: "Married".to_string(),
        comments: "Looking to invest this quarter".to_string(),
        consent: true,
        annual_income: 1_500_000.0,
        net_worth: 5_000_000.0,
        employment_status: "Employed".to_string(),
    }
}

#[cfg(test)]
mod classification_tests {
    use super::*;

    #[test]
    fn test_strong_lead_is_high() {
        let result = scorer().score(&strong_lead()).unwrap();
        assert_eq!(
            result,
            ScoreResult {
                initial_score: 90,
                reranked_score: 90,
                intent_class: "High".to_string(),
            }
        );
    }

    #[test]
    fn test_weak_lead_is_low() {
        let lead = LeadSubmission {
            credit_score: 520,
            age_group: "18-24".to_string(),
            marital_status: "Single".to_string(),
            employment_status: "Unemployed".to_string(),
            annual_income: 0.0,
            net_worth: 0.0,
            comments: "maybe later".to_string(),
            ..strong_lead()
        };

        let result = scorer().score(&lead).unwrap();
        assert_eq!(result.intent_class, "Low");
        assert_eq!(result.initial_score, 20);
        assert_eq!(result.reranked_score, 10);
    }

    #[test]
    fn test_dashed_categories_reach_the_vocabulary() {
        // En-dashes are cleaned to hyphens, so both categories encode as known values
        let lead = LeadSubmission {
            marital_status: " Divorced–Remarried ".to_string(),
            employment_status: "Self—Employed".to_string(),
            age_group: "45–54".to_string(),
            credit_score: 720,
            annual_income: 900_000.0,
            net_worth: 2_000_000.0,
            comments: "I'm very interested, please call asap".to_string(),
            ..strong_lead()
        };

        let result = scorer().score(&lead).unwrap();
        assert_eq!(
            result,
            ScoreResult {
                initial_score: 50,
                reranked_score: 60,
                intent_class: "Medium".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_category_is_no_signal() {
        let lead = LeadSubmission {
            marital_status: "It's complicated".to_string(),
            ..strong_lead()
        };

        // The forest never splits on marital status, so an unseen value changes nothing
        let result = scorer().score(&lead).unwrap();
        assert_eq!(result.intent_class, "High");
    }

    #[test]
    fn test_missing_income_defaults_to_zero() {
        let lead: LeadSubmission = serde_json::from_value(serde_json::json!({
            "phone": "+91-9876543210",
            "email": "kavya.rao@example.com",
            "creditScore": 680,
            "ageGroup": "25-34",
            "maritalStatus": "Married",
            "comments": "",
            "consent": true
        }))
        .unwrap();

        assert_eq!(lead.annual_income, 0.0);
        assert_eq!(lead.employment_status, "Unemployed");
        assert!(scorer().score(&lead).is_ok());
    }
}

#[cfg(test)]
mod validation_gate_tests {
    use super::*;

    fn validation_failure(lead: &LeadSubmission) -> ValidationError {
        match scorer().score(lead) {
            Err(ScoringError::Validation { first, .. }) => first,
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_consent_false_always_fails() {
        let lead = LeadSubmission {
            consent: false,
            ..strong_lead()
        };
        assert_eq!(validation_failure(&lead), ValidationError::ConsentRequired);
    }

    #[test]
    fn test_credit_score_boundaries() {
        for credit_score in [300, 850] {
            let lead = LeadSubmission {
                credit_score,
                ..strong_lead()
            };
            assert!(scorer().score(&lead).is_ok(), "{} should pass", credit_score);
        }

        for credit_score in [299, 851, 0, -1] {
            let lead = LeadSubmission {
                credit_score,
                ..strong_lead()
            };
            assert_eq!(
                validation_failure(&lead),
                ValidationError::CreditScoreOutOfRange(credit_score)
            );
        }
    }

    #[test]
    fn test_phone_without_country_code_fails() {
        let lead = LeadSubmission {
            phone: "9876543210".to_string(),
            ..strong_lead()
        };
        assert_eq!(validation_failure(&lead), ValidationError::InvalidPhone);
    }

    #[test]
    fn test_phone_takes_priority_over_email() {
        let lead = LeadSubmission {
            phone: "+91 9876543210".to_string(),
            email: "not-an-email".to_string(),
            ..strong_lead()
        };

        match scorer().score(&lead) {
            Err(ScoringError::Validation { first, violations }) => {
                assert_eq!(first, ValidationError::InvalidPhone);
                assert_eq!(
                    violations,
                    vec![ValidationError::InvalidPhone, ValidationError::InvalidEmail]
                );
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }
}

#[cfg(test)]
mod rerank_tests {
    use super::*;

    #[test]
    fn test_legacy_not_interested_adds_ten() {
        let lead = LeadSubmission {
            comments: "Not interested right now".to_string(),
            ..strong_lead()
        };
        assert_eq!(scorer().score(&lead).unwrap().reranked_score, 100);
    }

    #[test]
    fn test_specific_first_not_interested_subtracts_twenty() {
        let lead = LeadSubmission {
            comments: "Not interested right now".to_string(),
            ..strong_lead()
        };
        let scorer = scorer().with_rerank_policy(RerankPolicy::SpecificFirst);
        assert_eq!(scorer.score(&lead).unwrap().reranked_score, 70);
    }

    #[test]
    fn test_submission_is_not_modified() {
        let lead = LeadSubmission {
            marital_status: "Divorced–Remarried".to_string(),
            ..strong_lead()
        };
        let before = lead.clone();
        scorer().score(&lead).unwrap();
        assert_eq!(lead, before);
    }
}
