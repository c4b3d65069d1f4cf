use crate::errors::{AppError, ResultExt};
use crate::models::*;
use crate::scoring::LeadScorer;
use crate::store::LeadStore;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::Uri,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Scoring pipeline with its loaded model.
    pub scorer: LeadScorer,
    /// Scored leads, appended after every successful score.
    pub store: Arc<dyn LeadStore>,
    /// Version of the feature schema the loaded artifacts were validated against.
    pub schema_version: u32,
}

/// GET /
///
/// Liveness banner.
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Lead Scoring API is running!",
        "status": "healthy"
    }))
}

/// POST /score
///
/// Scores one lead and records it in the lead store.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `payload` - The submitted lead, or the extractor's rejection.
///
/// # Returns
///
/// * `Result<Json<ScoreResponse>, AppError>` - Both scores and the intent class,
///   422 when the lead breaks a validation rule, 500 when inference fails.
pub async fn score_lead(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LeadSubmission>, JsonRejection>,
) -> Result<Json<ScoreResponse>, AppError> {
    let Json(lead) = payload?;
    tracing::info!("POST /score - credit score: {}", lead.credit_score);

    let result = state
        .scorer
        .score(&lead)
        .context("Failed to score lead")?;

    state.store.append(StoredLead::new(lead, result.clone()));
    tracing::debug!("Lead stored, {} lead(s) total", state.store.count());

    Ok(Json(ScoreResponse {
        result,
        message: "Lead scored successfully!".to_string(),
    }))
}

/// GET /leads
///
/// Returns every scored lead in insertion order.
pub async fn list_leads(State(state): State<Arc<AppState>>) -> Json<LeadsResponse> {
    let leads = state.store.list();
    tracing::info!("GET /leads - {} lead(s)", leads.len());

    Json(LeadsResponse {
        count: leads.len(),
        leads,
    })
}

/// Health check endpoint.
///
/// State only exists once the artifacts have loaded, so `models_loaded` is
/// always true when this answers.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        models_loaded: true,
        leads_count: state.store.count(),
        schema_version: state.schema_version,
    })
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
