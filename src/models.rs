use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============ Lead Models ============

/// A lead exactly as it was submitted.
///
/// Field names follow the public API (camelCase). Nothing in the scoring
/// pipeline mutates these values; they are echoed back and stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    /// Phone number in `+<country code>-<10 digits>` form.
    pub phone: String,
    /// Contact email address.
    pub email: String,
    /// Bureau credit score, expected within 300..=850.
    pub credit_score: i64,
    /// Age bracket label (e.g. "25–34").
    pub age_group: String,
    /// Marital status label.
    pub marital_status: String,
    /// Free-text notes from the lead, scanned for intent cues.
    pub comments: String,
    /// Whether the lead agreed to be contacted.
    pub consent: bool,
    /// Yearly income, 0.0 when not provided.
    #[serde(default)]
    pub annual_income: f64,
    /// Net worth, 0.0 when not provided.
    #[serde(default)]
    pub net_worth: f64,
    /// Employment status label.
    #[serde(default = "default_employment_status")]
    pub employment_status: String,
}

fn default_employment_status() -> String {
    "Unemployed".to_string()
}

// ============ Scoring Results ============

/// Purchase-intent tier predicted by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentClass {
    Low,
    Medium,
    High,
}

impl IntentClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentClass::Low => "Low",
            IntentClass::Medium => "Medium",
            IntentClass::High => "High",
        }
    }
}

impl std::str::FromStr for IntentClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(IntentClass::Low),
            "Medium" => Ok(IntentClass::Medium),
            "High" => Ok(IntentClass::High),
            other => Err(format!("unknown intent class '{}'", other)),
        }
    }
}

impl std::fmt::Display for IntentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of scoring a single lead. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Score derived from the predicted intent class.
    pub initial_score: i32,
    /// Score after comment-based adjustment, always within 0..=100.
    pub reranked_score: i32,
    /// Label returned by the classifier, echoed verbatim.
    pub intent_class: String,
}

// ============ API Request/Response Models ============

/// Response payload for `POST /score`.
#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    #[serde(flatten)]
    pub result: ScoreResult,
    pub message: String,
}

/// A scored lead as kept by the lead store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredLead {
    /// Identifier assigned when the lead was stored.
    pub id: Uuid,
    /// Submitted values, unchanged.
    #[serde(flatten)]
    pub lead: LeadSubmission,
    /// Scoring outcome.
    #[serde(flatten)]
    pub result: ScoreResult,
    /// When the lead was scored.
    pub scored_at: DateTime<Utc>,
}

impl StoredLead {
    pub fn new(lead: LeadSubmission, result: ScoreResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            lead,
            result,
            scored_at: Utc::now(),
        }
    }
}

/// Response payload for `GET /leads`.
#[derive(Debug, Serialize)]
pub struct LeadsResponse {
    pub leads: Vec<StoredLead>,
    pub count: usize,
}

/// Response payload for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub models_loaded: bool,
    pub leads_count: usize,
    pub schema_version: u32,
}
