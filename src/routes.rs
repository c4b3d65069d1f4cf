use crate::handlers::{self, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Per-IP request budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub per_second: u64,
    pub burst: u32,
}

/// Limits applied to every route except `/health`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterLimits {
    pub max_body_bytes: usize,
    /// `None` disables rate limiting. The limiter keys on the client IP, so
    /// the router must then be served with connect info.
    pub rate_limit: Option<RateLimit>,
}

impl From<&crate::config::Config> for RouterLimits {
    fn from(config: &crate::config::Config) -> Self {
        Self {
            max_body_bytes: config.max_body_bytes,
            rate_limit: Some(RateLimit {
                per_second: config.rate_limit_per_second,
                burst: config.rate_limit_burst,
            }),
        }
    }
}

/// Builds the HTTP surface: `/`, `/score`, `/leads` behind the body limit and
/// rate limiter, `/health` outside them, then tracing and permissive CORS.
pub fn build_router(state: Arc<AppState>, limits: &RouterLimits) -> anyhow::Result<Router> {
    let mut protected_routes = Router::new()
        .route("/", get(handlers::root))
        .route("/score", post(handlers::score_lead))
        .route("/leads", get(handlers::list_leads));

    if let Some(rate_limit) = limits.rate_limit {
        let governor_conf = Arc::new(
            GovernorConfigBuilder::default()
                .per_second(rate_limit.per_second)
                .burst_size(rate_limit.burst)
                .key_extractor(SmartIpKeyExtractor)
                .finish()
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "invalid rate limit: {}/s with burst {}",
                        rate_limit.per_second,
                        rate_limit.burst
                    )
                })?,
        );
        // Rate limiting per client IP
        protected_routes = protected_routes.layer(GovernorLayer {
            config: governor_conf,
        });
    }

    let protected_routes =
        protected_routes.layer(RequestBodyLimitLayer::new(limits.max_body_bytes));

    // /health bypasses body and rate limits
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        );

    Ok(app)
}
