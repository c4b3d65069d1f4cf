use crate::models::IntentClass;

impl IntentClass {
    /// Base score for the class before comment reranking.
    pub fn base_score(&self) -> i32 {
        match self {
            IntentClass::High => 90,
            IntentClass::Medium => 50,
            IntentClass::Low => 20,
        }
    }
}

/// Maps a classifier label to its base score.
///
/// Total over all strings: anything other than an exact `High`, `Medium` or
/// `Low` maps to 0.
pub fn map_intent_to_score(label: &str) -> i32 {
    label
        .parse::<IntentClass>()
        .map(|class| class.base_score())
        .unwrap_or(0)
}
