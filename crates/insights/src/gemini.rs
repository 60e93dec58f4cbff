use std::time::Duration;

use api_types::{
    gemini::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse},
    insight::{AnalysisContext, DeepAnalysis, QuestionContext, QuestionReply},
};
use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, warn};

use crate::{
    InsightError, InsightProvider, Result, prompt,
    validate::{parse_deep_analysis, parse_question_reply},
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";
pub const DEFAULT_QUESTION_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-3-pro-preview";

/// Finish reasons that mean the candidate was withheld by content filters.
const BLOCKED_FINISH_REASONS: [&str; 4] = ["SAFETY", "PROHIBITED_CONTENT", "BLOCKLIST", "SPII"];

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub question_model: String,
    pub analysis_model: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            question_model: DEFAULT_QUESTION_MODEL.to_string(),
            analysis_model: DEFAULT_ANALYSIS_MODEL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    base_url: Url,
    api_key: String,
    question_model: String,
    analysis_model: String,
    http: reqwest::Client,
}

impl GeminiClient {
    /// Fails with [`InsightError::Configuration`] when the key is missing or
    /// the base URL does not parse.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| InsightError::Configuration("missing API key".to_string()))?;

        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|err| InsightError::Configuration(format!("invalid base_url: {err}")))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| InsightError::Configuration(format!("http client: {err}")))?;

        Ok(Self {
            base_url,
            api_key,
            question_model: config.question_model,
            analysis_model: config.analysis_model,
            http,
        })
    }

    /// Sends one request and returns the answer text of the first candidate.
    async fn generate(&self, model: &str, request: &GenerateContentRequest) -> Result<String> {
        let endpoint = self
            .base_url
            .join(&format!("v1beta/models/{model}:generateContent"))
            .map_err(|err| InsightError::Configuration(format!("invalid model name: {err}")))?;

        debug!(%model, "sending generateContent request");
        let res = self
            .http
            .post(endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let raw = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => format!(
                    "{} {}: {}",
                    status.as_u16(),
                    envelope.error.status.unwrap_or_default(),
                    envelope.error.message
                ),
                Err(_) => format!("{} {body}", status.as_u16()),
            };
            warn!(%model, %raw, "generateContent failed");
            return Err(InsightError::classify(Some(status.as_u16()), &raw));
        }

        let response = res
            .json::<GenerateContentResponse>()
            .await
            .map_err(|err| InsightError::Malformed(err.to_string()))?;
        answer_text(response)
    }
}

fn transport_error(err: reqwest::Error) -> InsightError {
    if err.is_timeout() || err.is_connect() {
        InsightError::Upstream(err.to_string())
    } else {
        InsightError::classify(None, &err.to_string())
    }
}

/// Extracts the answer, turning content-filter outcomes into
/// [`InsightError::SafetyBlocked`].
fn answer_text(response: GenerateContentResponse) -> Result<String> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        return Err(InsightError::SafetyBlocked(format!(
            "prompt blocked: {reason}"
        )));
    }
    if let Some(reason) = response
        .candidates
        .first()
        .and_then(|c| c.finish_reason.as_deref())
        && BLOCKED_FINISH_REASONS.contains(&reason)
    {
        return Err(InsightError::SafetyBlocked(format!(
            "candidate finished with {reason}"
        )));
    }
    response
        .text()
        .ok_or_else(|| InsightError::Malformed("response has no text".to_string()))
}

#[async_trait]
impl InsightProvider for GeminiClient {
    async fn answer(&self, query: &str, context: &QuestionContext) -> Result<QuestionReply> {
        let request = prompt::question_request(query, context)?;
        let text = self.generate(&self.question_model, &request).await?;
        parse_question_reply(&text)
    }

    async fn analyze(&self, context: &AnalysisContext) -> Result<DeepAnalysis> {
        let request = prompt::analysis_request(context)?;
        let text = self.generate(&self.analysis_model, &request).await?;
        parse_deep_analysis(&text)
    }
}
