pub mod mapper;
pub mod orchestrator;
pub mod reranker;

pub use mapper::map_intent_to_score;
pub use orchestrator::{LeadScorer, ScoringError};
pub use reranker::{comment_adjustment, rerank_score, RerankPolicy};
