//! Entry points used by the presentation layer.
//!
//! Questions never fail: a failure comes back as
//! [`QuestionOutcome::Failed`] carrying the user-facing message. Deep analysis
//! returns the classified [`InsightError`] so the caller can offer a retry.

use api_types::insight::{AnalysisContext, DeepAnalysis, QuestionContext};
use tracing::{error, info};

use crate::{InsightProvider, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuestionOutcome {
    Answered {
        answer: String,
        suggested_action: Option<String>,
    },
    Failed {
        message: String,
    },
}

impl QuestionOutcome {
    /// Text shown in the answer position: the answer, or the failure message.
    pub fn answer_text(&self) -> &str {
        match self {
            QuestionOutcome::Answered { answer, .. } => answer,
            QuestionOutcome::Failed { message } => message,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, QuestionOutcome::Failed { .. })
    }
}

pub async fn ask_question(
    provider: &dyn InsightProvider,
    query: &str,
    context: &QuestionContext,
) -> QuestionOutcome {
    match provider.answer(query, context).await {
        Ok(reply) => {
            info!("question answered");
            QuestionOutcome::Answered {
                answer: reply.answer,
                suggested_action: reply.suggested_action,
            }
        }
        Err(err) => {
            error!(detail = %err.detail(), "question failed: {err}");
            QuestionOutcome::Failed {
                message: err.user_message().to_string(),
            }
        }
    }
}

pub async fn request_deep_analysis(
    provider: &dyn InsightProvider,
    context: &AnalysisContext,
) -> Result<DeepAnalysis> {
    match provider.analyze(context).await {
        Ok(analysis) => {
            info!(
                patterns = analysis.patterns.len(),
                forecast = analysis.forecast.len(),
                "deep analysis received"
            );
            Ok(analysis)
        }
        Err(err) => {
            error!(detail = %err.detail(), "deep analysis failed: {err}");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use api_types::insight::QuestionReply;

    use super::*;
    use crate::{InsightError, StaticProvider, error::RATE_LIMITED};

    fn context() -> QuestionContext {
        QuestionContext {
            current_date: "2024-05-21".to_string(),
            accounts: vec![],
            recent_transactions: vec![],
            monthly_summary: vec![],
        }
    }

    #[tokio::test]
    async fn failures_become_failed_outcome() {
        let provider = StaticProvider::failing(InsightError::RateLimited("429".to_string()));
        let outcome = ask_question(&provider, "hi", &context()).await;
        assert_eq!(
            outcome,
            QuestionOutcome::Failed {
                message: RATE_LIMITED.to_string()
            }
        );
        assert_eq!(outcome.answer_text(), RATE_LIMITED);
        assert!(outcome.is_failure());
    }

    #[tokio::test]
    async fn answers_pass_through() {
        let provider = StaticProvider::new(
            QuestionReply {
                answer: "Yes".to_string(),
                suggested_action: None,
            },
            StaticProvider::demo()
                .analyze(&AnalysisContext {
                    transactions: vec![],
                    summary: vec![],
                })
                .await
                .unwrap(),
        );
        let outcome = ask_question(&provider, "hi", &context()).await;
        assert_eq!(outcome.answer_text(), "Yes");
        assert!(!outcome.is_failure());
    }

    #[tokio::test]
    async fn deep_analysis_surfaces_error() {
        let provider = StaticProvider::failing(InsightError::Upstream("503".to_string()));
        let err = request_deep_analysis(
            &provider,
            &AnalysisContext {
                transactions: vec![],
                summary: vec![],
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), crate::error::UPSTREAM);
    }
}
