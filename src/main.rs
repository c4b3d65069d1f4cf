use anyhow::Context;
use lead_scoring_api::config::Config;
use lead_scoring_api::handlers::AppState;
use lead_scoring_api::model::artifacts::ModelArtifacts;
use lead_scoring_api::model::schema::FEATURE_SCHEMA;
use lead_scoring_api::model::ArtifactClassifier;
use lead_scoring_api::routes::{build_router, RouterLimits};
use lead_scoring_api::scoring::LeadScorer;
use lead_scoring_api::store::InMemoryLeadStore;
use lead_scoring_api::validation::LeadValidator;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - Model artifacts (fatal if missing or inconsistent with the feature schema).
/// - The scoring pipeline and lead store.
/// - HTTP routes and middleware (CORS, Rate Limiting).
///
/// It then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lead_scoring_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Load model artifacts before accepting any traffic
    let artifacts = ModelArtifacts::load(&config.preprocessor_path, &config.classifier_path)
        .with_context(|| {
            format!(
                "failed to load model artifacts ({}, {})",
                config.preprocessor_path.display(),
                config.classifier_path.display()
            )
        })?;
    tracing::info!(
        "✓ Model artifacts loaded: {} classes, {} trees",
        artifacts.forest.classes().len(),
        artifacts.forest.tree_count()
    );

    let scorer = LeadScorer::new(Arc::new(ArtifactClassifier::new(artifacts)))
        .with_validator(LeadValidator::new(config.allowed_country_codes.clone()))
        .with_rerank_policy(config.rerank_policy);
    tracing::info!("Rerank policy: {}", scorer.rerank_policy().as_str());

    // Build application state
    let app_state = Arc::new(AppState {
        scorer,
        store: Arc::new(InMemoryLeadStore::new()),
        schema_version: FEATURE_SCHEMA.version,
    });

    let app = build_router(app_state, &RouterLimits::from(&config))?;

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Connect info feeds the per-IP rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
