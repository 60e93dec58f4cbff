use api_types::insight::{
    AnalysisContext, DeepAnalysis, ForecastPoint, Impact, Pattern, QuestionContext, QuestionReply,
};
use async_trait::async_trait;

use crate::{InsightError, Result};

/// A backend that can answer questions and analyse history.
#[async_trait]
pub trait InsightProvider: Send + Sync {
    async fn answer(&self, query: &str, context: &QuestionContext) -> Result<QuestionReply>;

    async fn analyze(&self, context: &AnalysisContext) -> Result<DeepAnalysis>;
}

/// Provider returning fixed replies, or a fixed error.
///
/// Used in offline mode, when the real provider cannot be configured, and in
/// tests.
#[derive(Clone, Debug)]
pub struct StaticProvider {
    reply: Result<QuestionReply>,
    analysis: Result<DeepAnalysis>,
}

impl StaticProvider {
    pub fn new(reply: QuestionReply, analysis: DeepAnalysis) -> Self {
        Self {
            reply: Ok(reply),
            analysis: Ok(analysis),
        }
    }

    /// Every call fails with `err`.
    pub fn failing(err: InsightError) -> Self {
        Self {
            reply: Err(err.clone()),
            analysis: Err(err),
        }
    }

    /// Canned content for running the dashboard without credentials.
    pub fn demo() -> Self {
        Self::new(
            QuestionReply {
                answer: "Offline mode: insights are canned. Housing is your largest \
                         expense and your savings rate has stayed positive every month."
                    .to_string(),
                suggested_action: Some("Set FLUXBOARD_API_KEY to ask real questions.".to_string()),
            },
            DeepAnalysis {
                patterns: vec![
                    Pattern {
                        title: "Stable housing costs".to_string(),
                        description: "Rent has been flat at 1,200 per month.".to_string(),
                        impact: Impact::Neutral,
                    },
                    Pattern {
                        title: "Dining spikes".to_string(),
                        description: "Dining out peaks around celebrations.".to_string(),
                        impact: Impact::Negative,
                    },
                    Pattern {
                        title: "Consistent saving".to_string(),
                        description: "Every month closed with positive savings.".to_string(),
                        impact: Impact::Positive,
                    },
                ],
                forecast: vec![
                    ForecastPoint {
                        month: "2024-06".to_string(),
                        predicted_amount: 4300.0,
                    },
                    ForecastPoint {
                        month: "2024-07".to_string(),
                        predicted_amount: 4400.0,
                    },
                    ForecastPoint {
                        month: "2024-08".to_string(),
                        predicted_amount: 4600.0,
                    },
                ],
                summary: "Offline mode: income comfortably covers expenses.".to_string(),
            },
        )
    }
}

#[async_trait]
impl InsightProvider for StaticProvider {
    async fn answer(&self, _query: &str, _context: &QuestionContext) -> Result<QuestionReply> {
        self.reply.clone()
    }

    async fn analyze(&self, _context: &AnalysisContext) -> Result<DeepAnalysis> {
        self.analysis.clone()
    }
}
