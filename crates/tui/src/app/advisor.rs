//! Insight requests run on spawned tasks and report back over a channel.
//! Each request takes a ticket; only the newest ticket's result is applied.

use std::sync::Arc;

use api_types::insight::DeepAnalysis;
use insights::{
    QuestionOutcome, Ticket, analysis_context, ask_question, question_context,
    request_deep_analysis,
};
use tracing::{debug, info};

use super::{App, edit_text};
use crate::ui::keymap::AppAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsightsMode {
    #[default]
    Browse,
    Asking,
}

#[derive(Debug, Clone, Default)]
pub struct InsightsState {
    pub mode: InsightsMode,
    pub question: String,
    /// The question the current answer belongs to.
    pub asked: Option<String>,
    pub answer: Option<QuestionOutcome>,
    pub answering: bool,
    pub analysis: Option<DeepAnalysis>,
    pub analysis_error: Option<String>,
    pub analyzing: bool,
}

#[derive(Debug)]
pub enum InsightEvent {
    Answer {
        ticket: Ticket,
        outcome: QuestionOutcome,
    },
    Analysis {
        ticket: Ticket,
        result: insights::Result<DeepAnalysis>,
    },
}

impl App {
    pub(super) fn handle_insights_key(&mut self, action: AppAction) {
        let view = &mut self.state.insights;
        match view.mode {
            InsightsMode::Browse => match action {
                AppAction::Input('a') | AppAction::Input('/') => view.mode = InsightsMode::Asking,
                AppAction::Input('g') => self.request_analysis(),
                _ => {}
            },
            InsightsMode::Asking => match action {
                AppAction::Cancel => view.mode = InsightsMode::Browse,
                AppAction::Submit => self.ask(),
                other => {
                    edit_text(&mut view.question, other);
                }
            },
        }
    }

    /// Sends the typed question. Blank input is ignored.
    pub(super) fn ask(&mut self) {
        let query = self.state.insights.question.trim().to_string();
        if query.is_empty() {
            return;
        }
        let context = question_context(
            self.config.today(),
            &self.state.accounts,
            self.state.store.transactions(),
            &self.state.monthly,
            self.config.recent_transactions,
        );
        let ticket = self.questions.issue();
        let view = &mut self.state.insights;
        view.mode = InsightsMode::Browse;
        view.question.clear();
        view.asked = Some(query.clone());
        view.answering = true;
        info!(ticket = ticket.id(), "question sent");

        let provider = Arc::clone(&self.provider);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = ask_question(provider.as_ref(), &query, &context).await;
            let _ = events.send(InsightEvent::Answer { ticket, outcome });
        });
    }

    /// Starts a deep analysis. Pressing it again while one is pending
    /// supersedes the earlier request.
    pub(super) fn request_analysis(&mut self) {
        let context = analysis_context(self.state.store.transactions(), &self.state.monthly);
        let ticket = self.analyses.issue();
        let view = &mut self.state.insights;
        view.analyzing = true;
        view.analysis_error = None;
        info!(ticket = ticket.id(), "deep analysis requested");

        let provider = Arc::clone(&self.provider);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = request_deep_analysis(provider.as_ref(), &context).await;
            let _ = events.send(InsightEvent::Analysis { ticket, result });
        });
    }

    pub(super) fn apply_insight_event(&mut self, event: InsightEvent) {
        let view = &mut self.state.insights;
        match event {
            InsightEvent::Answer { ticket, outcome } => {
                if !self.questions.is_current(ticket) {
                    debug!(ticket = ticket.id(), "discarding stale answer");
                    return;
                }
                view.answer = Some(outcome);
                view.answering = false;
            }
            InsightEvent::Analysis { ticket, result } => {
                if !self.analyses.is_current(ticket) {
                    debug!(ticket = ticket.id(), "discarding stale analysis");
                    return;
                }
                view.analyzing = false;
                match result {
                    Ok(analysis) => view.analysis = Some(analysis),
                    Err(err) => view.analysis_error = Some(err.to_string()),
                }
            }
        }
    }

    pub(super) fn drain_insight_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_insight_event(event);
        }
    }
}
