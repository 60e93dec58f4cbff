//! Failures of the insight gateway and their user-facing messages.
//!
//! Every variant keeps the raw provider detail for the logs, while `Display`
//! renders only the fixed message shown to the user.

use thiserror::Error;

pub const RATE_LIMITED: &str = "Rate limit exceeded, try again shortly";
pub const CONFIGURATION: &str = "Configuration error — verify credentials";
pub const INVALID_REQUEST: &str = "Request invalid — rephrase and retry";
pub const SAFETY_BLOCKED: &str = "Request blocked by safety filters";
pub const UPSTREAM: &str = "Upstream service overwhelmed, retry shortly";
pub const GENERIC: &str = "Error analyzing finances, please try again";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InsightError {
    #[error("{}", RATE_LIMITED)]
    RateLimited(String),
    #[error("{}", CONFIGURATION)]
    Configuration(String),
    #[error("{}", INVALID_REQUEST)]
    InvalidRequest(String),
    #[error("{}", SAFETY_BLOCKED)]
    SafetyBlocked(String),
    #[error("{}", UPSTREAM)]
    Upstream(String),
    /// The reply did not match the expected shape.
    #[error("{}", GENERIC)]
    Malformed(String),
    #[error("{}", GENERIC)]
    Other(String),
}

const RATE_LIMIT_MARKERS: &[&str] = &["429", "quota", "resource_exhausted", "rate limit"];
const CONFIGURATION_MARKERS: &[&str] = &[
    "api key",
    "401",
    "403",
    "permission_denied",
    "unauthenticated",
];
const SAFETY_MARKERS: &[&str] = &["safety", "blocked"];
const UPSTREAM_MARKERS: &[&str] = &["500", "502", "503", "unavailable", "overloaded", "internal"];
const INVALID_MARKERS: &[&str] = &["400", "invalid_argument"];

impl InsightError {
    /// Classifies a provider failure.
    ///
    /// The HTTP status decides when present; otherwise the raw text is
    /// matched case-insensitively against known markers. Single-word markers
    /// must appear as a whole word, so `4000ms` is not a `400`. Anything left
    /// is [`InsightError::Other`].
    pub fn classify(status: Option<u16>, raw: &str) -> InsightError {
        let detail = raw.to_string();
        let text = raw.to_lowercase();
        let words: Vec<&str> = text
            .split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .filter(|w| !w.is_empty())
            .collect();
        let mentions = |markers: &[&str]| {
            markers.iter().any(|m| {
                if m.contains(' ') {
                    text.contains(m)
                } else {
                    words.contains(m)
                }
            })
        };

        match status {
            Some(429) => return InsightError::RateLimited(detail),
            Some(401 | 403) => return InsightError::Configuration(detail),
            // Gemini reports a bad key as a 400.
            Some(400) if text.contains("api key") => return InsightError::Configuration(detail),
            Some(400) => return InsightError::InvalidRequest(detail),
            Some(500..=599) => return InsightError::Upstream(detail),
            _ => {}
        }

        if mentions(RATE_LIMIT_MARKERS) {
            InsightError::RateLimited(detail)
        } else if mentions(CONFIGURATION_MARKERS) {
            InsightError::Configuration(detail)
        } else if mentions(SAFETY_MARKERS) {
            InsightError::SafetyBlocked(detail)
        } else if mentions(UPSTREAM_MARKERS) {
            InsightError::Upstream(detail)
        } else if mentions(INVALID_MARKERS) {
            InsightError::InvalidRequest(detail)
        } else {
            InsightError::Other(detail)
        }
    }

    /// The message shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            InsightError::RateLimited(_) => RATE_LIMITED,
            InsightError::Configuration(_) => CONFIGURATION,
            InsightError::InvalidRequest(_) => INVALID_REQUEST,
            InsightError::SafetyBlocked(_) => SAFETY_BLOCKED,
            InsightError::Upstream(_) => UPSTREAM,
            InsightError::Malformed(_) | InsightError::Other(_) => GENERIC,
        }
    }

    /// Raw provider detail, for logs only.
    pub fn detail(&self) -> &str {
        match self {
            InsightError::RateLimited(d)
            | InsightError::Configuration(d)
            | InsightError::InvalidRequest(d)
            | InsightError::SafetyBlocked(d)
            | InsightError::Upstream(d)
            | InsightError::Malformed(d)
            | InsightError::Other(d) => d,
        }
    }
}

/// Maps raw error text to the message shown to the user.
pub fn translate_error(raw: &str) -> &'static str {
    InsightError::classify(None, raw).user_message()
}
