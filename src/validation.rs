//! Lead record validation.
//!
//! Rules are evaluated in a fixed priority order so the first reported
//! violation is deterministic:
//! 1. phone format (`+<country code>-<10 digits>`)
//! 2. email structure
//! 3. credit score range
//! 4. consent
//! 5. non-negative income / net worth

use crate::models::LeadSubmission;
use regex::Regex;
use std::sync::OnceLock;

pub const MIN_CREDIT_SCORE: i64 = 300;
pub const MAX_CREDIT_SCORE: i64 = 850;

static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn phone_regex() -> &'static Regex {
    PHONE_REGEX.get_or_init(|| {
        Regex::new(r"^\+([0-9]{1,3})-[0-9]{10}$").expect("phone pattern is a valid regex")
    })
}

fn email_regex() -> &'static Regex {
    // RFC 5322 simplified: local@label(.label)+
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
        )
        .expect("email pattern is a valid regex")
    })
}

/// A caller-correctable defect in a submitted lead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Phone number must match +<country code>-xxxxxxxxxx format (e.g. +91-9876543210)")]
    InvalidPhone,
    #[error("Phone country code +{0} is not supported")]
    UnsupportedCountryCode(String),
    #[error("Email address is not valid")]
    InvalidEmail,
    #[error("Credit score must be between 300 and 850 (got {0})")]
    CreditScoreOutOfRange(i64),
    #[error("Consent is required")]
    ConsentRequired,
    #[error("{0} must be a non-negative number")]
    NegativeAmount(&'static str),
}

/// A lead that passed every validation rule.
///
/// Borrows the submission so the validated view can never diverge from what
/// was submitted.
#[derive(Debug, Clone, Copy)]
pub struct Lead<'a> {
    submission: &'a LeadSubmission,
}

impl<'a> Lead<'a> {
    pub fn submission(&self) -> &'a LeadSubmission {
        self.submission
    }
}

impl std::ops::Deref for Lead<'_> {
    type Target = LeadSubmission;

    fn deref(&self) -> &Self::Target {
        self.submission
    }
}

/// Every rule a lead broke, highest priority first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub first: ValidationError,
    pub violations: Vec<ValidationError>,
}

/// Validates raw lead submissions.
#[derive(Debug, Clone)]
pub struct LeadValidator {
    /// Accepted phone country codes (digits only). Empty accepts any.
    allowed_country_codes: Vec<String>,
}

impl Default for LeadValidator {
    fn default() -> Self {
        Self::new(vec!["91".to_string()])
    }
}

impl LeadValidator {
    pub fn new(allowed_country_codes: Vec<String>) -> Self {
        Self {
            allowed_country_codes,
        }
    }

    /// Validator that accepts any well-formed country code.
    pub fn any_country() -> Self {
        Self::new(Vec::new())
    }

    /// Returns the validated lead or the highest-priority violation.
    pub fn validate<'a>(&self, submission: &'a LeadSubmission) -> Result<Lead<'a>, ValidationError> {
        self.check(submission).map_err(|rejection| rejection.first)
    }

    /// Returns the validated lead or every violation, evaluating each rule once.
    pub fn check<'a>(&self, submission: &'a LeadSubmission) -> Result<Lead<'a>, Rejection> {
        let violations = self.violations(submission);
        match violations.first().cloned() {
            Some(first) => Err(Rejection { first, violations }),
            None => Ok(Lead { submission }),
        }
    }

    /// Every violated rule, in priority order. Empty when the lead is valid.
    pub fn violations(&self, submission: &LeadSubmission) -> Vec<ValidationError> {
        let mut violations = Vec::new();

        if let Err(e) = self.check_phone(&submission.phone) {
            violations.push(e);
        }
        if !is_valid_email(&submission.email) {
            violations.push(ValidationError::InvalidEmail);
        }
        if !(MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&submission.credit_score) {
            violations.push(ValidationError::CreditScoreOutOfRange(
                submission.credit_score,
            ));
        }
        if !submission.consent {
            violations.push(ValidationError::ConsentRequired);
        }
        if !is_non_negative(submission.annual_income) {
            violations.push(ValidationError::NegativeAmount("annualIncome"));
        }
        if !is_non_negative(submission.net_worth) {
            violations.push(ValidationError::NegativeAmount("netWorth"));
        }

        violations
    }

    fn check_phone(&self, phone: &str) -> Result<(), ValidationError> {
        let captures = phone_regex()
            .captures(phone)
            .ok_or(ValidationError::InvalidPhone)?;
        let country_code = &captures[1];

        if !self.allowed_country_codes.is_empty()
            && !self.allowed_country_codes.iter().any(|c| c == country_code)
        {
            return Err(ValidationError::UnsupportedCountryCode(
                country_code.to_string(),
            ));
        }

        Ok(())
    }
}

/// Checks that a phone number has the `+<digits>-<10 digits>` shape.
///
/// Country codes are not restricted here; see [`LeadValidator`].
pub fn is_valid_phone_format(phone: &str) -> bool {
    phone_regex().is_match(phone)
}

/// Validate email address structure.
///
/// Requires `local@domain` where the domain has at least two labels, the
/// local part does not start, end, or repeat dots, and the top-level label is
/// not purely numeric.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 {
        return false;
    }

    if !email_regex().is_match(email) {
        tracing::debug!("Invalid email format: {}", email);
        return false;
    }

    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };

    if local.len() > 64 || local.starts_with('.') || local.ends_with('.') || local.contains("..")
    {
        return false;
    }

    match domain.rsplit('.').next() {
        Some(tld) => !tld.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
