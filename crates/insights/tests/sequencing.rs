use std::{sync::Arc, time::Duration};

use api_types::insight::{AnalysisContext, DeepAnalysis, QuestionContext, QuestionReply};
use async_trait::async_trait;
use insights::{InsightProvider, RequestSequencer, Result, Ticket, request_deep_analysis};
use tokio::sync::mpsc;

/// Answers each analysis after a delay taken from the summary's month count,
/// so the test controls completion order.
struct DelayedProvider;

#[async_trait]
impl InsightProvider for DelayedProvider {
    async fn answer(&self, query: &str, _context: &QuestionContext) -> Result<QuestionReply> {
        Ok(QuestionReply {
            answer: query.to_string(),
            suggested_action: None,
        })
    }

    async fn analyze(&self, context: &AnalysisContext) -> Result<DeepAnalysis> {
        let delay = context.summary.len() as u64 * 50;
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok(DeepAnalysis {
            patterns: vec![],
            forecast: vec![],
            summary: format!("after {delay}ms"),
        })
    }
}

fn context_with_delay(steps: usize) -> AnalysisContext {
    AnalysisContext {
        transactions: vec![],
        summary: (0..steps)
            .map(|i| api_types::insight::MonthContext {
                month: format!("2024-{:02}", i + 1),
                income: 0.0,
                expenses: 0.0,
                savings: 0.0,
            })
            .collect(),
    }
}

#[tokio::test]
async fn stale_analysis_is_discarded() {
    let provider: Arc<dyn InsightProvider> = Arc::new(DelayedProvider);
    let sequencer = RequestSequencer::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<(Ticket, Result<DeepAnalysis>)>();

    // The first request is slow, the second fast: results arrive out of order.
    for steps in [4, 1] {
        let ticket = sequencer.issue();
        let provider = provider.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = request_deep_analysis(provider.as_ref(), &context_with_delay(steps)).await;
            let _ = tx.send((ticket, result));
        });
    }
    drop(tx);

    let mut applied = Vec::new();
    let mut discarded = 0;
    while let Some((ticket, result)) = rx.recv().await {
        if sequencer.is_current(ticket) {
            applied.push(result.unwrap().summary);
        } else {
            discarded += 1;
        }
    }

    assert_eq!(applied, vec!["after 50ms".to_string()]);
    assert_eq!(discarded, 1);
}
