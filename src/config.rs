use crate::scoring::RerankPolicy;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_PREPROCESSOR_PATH: &str = "artifacts/preprocessor.json";
const DEFAULT_CLASSIFIER_PATH: &str = "artifacts/intent_classifier.json";
const DEFAULT_COUNTRY_CODES: &str = "91";
const DEFAULT_RATE_LIMIT_PER_SECOND: u64 = 10;
const DEFAULT_RATE_LIMIT_BURST: u32 = 20;
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub preprocessor_path: PathBuf,
    pub classifier_path: PathBuf,
    /// Phone country codes accepted by the validator. Empty accepts any.
    pub allowed_country_codes: Vec<String>,
    pub rerank_policy: RerankPolicy,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            port: match non_empty("PORT") {
                Some(port) => port
                    .trim()
                    .parse()
                    .ok()
                    .filter(|p: &u16| *p != 0)
                    .ok_or_else(|| {
                        anyhow::anyhow!("PORT must be a valid number between 1-65535")
                    })?,
                None => DEFAULT_PORT,
            },
            preprocessor_path: non_empty("PREPROCESSOR_PATH")
                .unwrap_or_else(|| DEFAULT_PREPROCESSOR_PATH.to_string())
                .into(),
            classifier_path: non_empty("CLASSIFIER_PATH")
                .unwrap_or_else(|| DEFAULT_CLASSIFIER_PATH.to_string())
                .into(),
            allowed_country_codes: parse_country_codes(
                &var("ALLOWED_COUNTRY_CODES")
                    .unwrap_or_else(|| DEFAULT_COUNTRY_CODES.to_string()),
            )?,
            rerank_policy: match non_empty("RERANK_POLICY") {
                Some(policy) => policy
                    .parse::<RerankPolicy>()
                    .map_err(|e| anyhow::anyhow!("RERANK_POLICY: {}", e))?,
                None => RerankPolicy::default(),
            },
            rate_limit_per_second: parse_positive(
                non_empty("RATE_LIMIT_PER_SECOND"),
                "RATE_LIMIT_PER_SECOND",
                DEFAULT_RATE_LIMIT_PER_SECOND,
            )?,
            rate_limit_burst: parse_positive(
                non_empty("RATE_LIMIT_BURST"),
                "RATE_LIMIT_BURST",
                DEFAULT_RATE_LIMIT_BURST,
            )?,
            max_body_bytes: parse_positive(
                non_empty("MAX_BODY_BYTES"),
                "MAX_BODY_BYTES",
                DEFAULT_MAX_BODY_BYTES,
            )?,
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Preprocessor artifact: {}", config.preprocessor_path.display());
        tracing::debug!("Classifier artifact: {}", config.classifier_path.display());
        if config.allowed_country_codes.is_empty() {
            tracing::debug!("Allowed country codes: any");
        } else {
            tracing::debug!("Allowed country codes: {:?}", config.allowed_country_codes);
        }
        tracing::debug!("Rerank policy: {}", config.rerank_policy.as_str());
        tracing::debug!(
            "Rate limit: {}/s, burst {}",
            config.rate_limit_per_second,
            config.rate_limit_burst
        );
        tracing::debug!("Max body size: {} bytes", config.max_body_bytes);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

fn parse_country_codes(raw: &str) -> anyhow::Result<Vec<String>> {
    raw.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| {
            let code = code.trim_start_matches('+');
            if code.is_empty() || code.len() > 3 || !code.chars().all(|c| c.is_ascii_digit()) {
                anyhow::bail!(
                    "ALLOWED_COUNTRY_CODES entries must be 1-3 digits (got '{}')",
                    code
                );
            }
            Ok(code.to_string())
        })
        .collect()
}

fn parse_positive<T>(raw: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => anyhow::bail!("{} must be a positive integer (got '{}')", key, raw),
    }
}
