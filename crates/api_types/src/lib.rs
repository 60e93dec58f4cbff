use serde::{Deserialize, Serialize};

/// Payloads exchanged with the insight model: the context we send and the
/// structured replies we accept. Field names are camelCase on the wire.
pub mod insight {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AccountContext {
        pub name: String,
        pub balance: f64,
        /// `CHECKING`, `SAVINGS`, `CREDIT_CARD` or `INVESTMENT`.
        #[serde(rename = "type")]
        pub kind: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionContext {
        pub id: String,
        pub account_id: String,
        pub date: String,
        pub amount: f64,
        pub currency: String,
        pub category: String,
        pub merchant: String,
        pub description: String,
        pub is_recurring: bool,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MonthContext {
        pub month: String,
        pub income: f64,
        pub expenses: f64,
        pub savings: f64,
    }

    /// Context embedded in the system instruction of a question.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct QuestionContext {
        /// `YYYY-MM-DD`
        pub current_date: String,
        pub accounts: Vec<AccountContext>,
        pub recent_transactions: Vec<TransactionContext>,
        pub monthly_summary: Vec<MonthContext>,
    }

    /// Context embedded in the system instruction of a deep analysis.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AnalysisContext {
        pub transactions: Vec<TransactionContext>,
        pub summary: Vec<MonthContext>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct QuestionReply {
        pub answer: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub suggested_action: Option<String>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum Impact {
        Positive,
        Negative,
        Neutral,
    }

    impl Impact {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Positive => "POSITIVE",
                Self::Negative => "NEGATIVE",
                Self::Neutral => "NEUTRAL",
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Pattern {
        pub title: String,
        pub description: String,
        pub impact: Impact,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ForecastPoint {
        /// `YYYY-MM`
        pub month: String,
        /// Total expected expenses for the month.
        pub predicted_amount: f64,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DeepAnalysis {
        pub patterns: Vec<Pattern>,
        pub forecast: Vec<ForecastPoint>,
        pub summary: String,
    }
}

/// Subset of the Gemini `generateContent` REST API that the insight client
/// uses.
pub mod gemini {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Part {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub text: Option<String>,
        /// Set on reasoning parts that are not part of the answer.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub thought: Option<bool>,
    }

    impl Part {
        pub fn text(text: impl Into<String>) -> Self {
            Self {
                text: Some(text.into()),
                thought: None,
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Content {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub role: Option<String>,
        #[serde(default)]
        pub parts: Vec<Part>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GenerationConfig {
        pub response_mime_type: String,
        pub response_schema: serde_json::Value,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GenerateContentRequest {
        pub contents: Vec<Content>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub system_instruction: Option<Content>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub generation_config: Option<GenerationConfig>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Candidate {
        #[serde(default)]
        pub content: Option<Content>,
        #[serde(default)]
        pub finish_reason: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PromptFeedback {
        #[serde(default)]
        pub block_reason: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GenerateContentResponse {
        #[serde(default)]
        pub candidates: Vec<Candidate>,
        #[serde(default)]
        pub prompt_feedback: Option<PromptFeedback>,
    }

    impl GenerateContentResponse {
        /// Concatenated answer text of the first candidate, reasoning parts
        /// skipped.
        pub fn text(&self) -> Option<String> {
            let content = self.candidates.first()?.content.as_ref()?;
            let text: String = content
                .parts
                .iter()
                .filter(|p| p.thought != Some(true))
                .filter_map(|p| p.text.as_deref())
                .collect();
            (!text.is_empty()).then_some(text)
        }
    }

    /// Error body returned with non-2xx statuses.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ErrorEnvelope {
        pub error: ErrorBody,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ErrorBody {
        #[serde(default)]
        pub code: u16,
        #[serde(default)]
        pub message: String,
        /// Canonical status such as `RESOURCE_EXHAUSTED`.
        #[serde(default)]
        pub status: Option<String>,
    }
}
