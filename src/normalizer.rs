//! Projects a validated lead onto the classifier's feature schema.

use crate::model::schema::FEATURE_SCHEMA;
use crate::validation::Lead;

/// Ephemeral model input built per request.
///
/// Holds cleaned copies of the categorical labels; the submitted lead is
/// never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub marital_status: String,
    pub employment_status: String,
    pub age_group: String,
    pub credit_score: f64,
    pub annual_income: f64,
    pub net_worth: f64,
}

impl FeatureVector {
    /// Categorical columns paired with their schema names, in schema order.
    pub fn categorical(&self) -> [(&'static str, &str); 3] {
        let names = FEATURE_SCHEMA.categorical;
        [
            (names[0], self.marital_status.as_str()),
            (names[1], self.employment_status.as_str()),
            (names[2], self.age_group.as_str()),
        ]
    }

    /// Numeric columns paired with their schema names, in schema order.
    pub fn numeric(&self) -> [(&'static str, f64); 3] {
        let names = FEATURE_SCHEMA.numeric;
        [
            (names[0], self.credit_score),
            (names[1], self.annual_income),
            (names[2], self.net_worth),
        ]
    }
}

/// Replaces en/em dashes with `-` and trims surrounding whitespace.
///
/// Must stay in sync with the cleanup applied to the training data.
pub fn clean_category(value: &str) -> String {
    value.replace(['\u{2013}', '\u{2014}'], "-").trim().to_string()
}

/// Builds the feature vector for a validated lead.
pub fn normalize_lead(lead: &Lead<'_>) -> FeatureVector {
    FeatureVector {
        marital_status: clean_category(&lead.marital_status),
        employment_status: clean_category(&lead.employment_status),
        age_group: clean_category(&lead.age_group),
        credit_score: lead.credit_score as f64,
        annual_income: lead.annual_income,
        net_worth: lead.net_worth,
    }
}
