//! Comment-driven score adjustment.
//!
//! The comment is lower-cased once and scanned for substrings from three
//! buckets. Only the first matching bucket applies.

const POSITIVE_CUES: [&str; 3] = ["urgent", "asap", "interested"];
const HESITANT_CUES: [&str; 3] = ["not sure", "maybe", "later"];
const NEGATIVE_CUES: [&str; 3] = ["not interested", "spam", "unsubscribe"];

const POSITIVE_ADJUSTMENT: i32 = 10;
const HESITANT_ADJUSTMENT: i32 = -10;
const NEGATIVE_ADJUSTMENT: i32 = -20;

pub const MIN_SCORE: i32 = 0;
pub const MAX_SCORE: i32 = 100;

/// Order in which the cue buckets are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RerankPolicy {
    /// positive, hesitant, negative. "not interested" contains "interested"
    /// and therefore lands in the positive bucket (+10).
    #[default]
    Legacy,
    /// negative, positive, hesitant. "not interested" scores -20.
    SpecificFirst,
}

impl RerankPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RerankPolicy::Legacy => "legacy",
            RerankPolicy::SpecificFirst => "specific_first",
        }
    }
}

impl std::str::FromStr for RerankPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(RerankPolicy::Legacy),
            "specific_first" | "specific-first" => Ok(RerankPolicy::SpecificFirst),
            other => Err(format!(
                "unknown rerank policy '{}' (expected 'legacy' or 'specific_first')",
                other
            )),
        }
    }
}

/// Adjustment implied by the comment under the given policy.
pub fn comment_adjustment(comment: &str, policy: RerankPolicy) -> i32 {
    let comment = comment.to_lowercase();
    let contains_any = |cues: &[&str]| cues.iter().any(|cue| comment.contains(cue));

    let buckets: [(&[&str], i32); 3] = match policy {
        RerankPolicy::Legacy => [
            (&POSITIVE_CUES[..], POSITIVE_ADJUSTMENT),
            (&HESITANT_CUES[..], HESITANT_ADJUSTMENT),
            (&NEGATIVE_CUES[..], NEGATIVE_ADJUSTMENT),
        ],
        RerankPolicy::SpecificFirst => [
            (&NEGATIVE_CUES[..], NEGATIVE_ADJUSTMENT),
            (&POSITIVE_CUES[..], POSITIVE_ADJUSTMENT),
            (&HESITANT_CUES[..], HESITANT_ADJUSTMENT),
        ],
    };

    buckets
        .iter()
        .find(|(cues, _)| contains_any(*cues))
        .map(|(_, adjustment)| *adjustment)
        .unwrap_or(0)
}

/// Applies the comment adjustment and clamps the result to `0..=100`.
pub fn rerank_score(base_score: i32, comment: &str, policy: RerankPolicy) -> i32 {
    base_score
        .saturating_add(comment_adjustment(comment, policy))
        .clamp(MIN_SCORE, MAX_SCORE)
}
