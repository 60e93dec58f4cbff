//! AI insight gateway.
//!
//! Serializes the dashboard's financial context into a prompt, sends it to a
//! hosted model and validates the structured JSON that comes back. Failures
//! are classified into a small set of user-facing messages.

pub use context::{DEFAULT_RECENT_TRANSACTIONS, analysis_context, question_context};
pub use error::{InsightError, translate_error};
pub use gateway::{QuestionOutcome, ask_question, request_deep_analysis};
pub use gemini::{
    DEFAULT_ANALYSIS_MODEL, DEFAULT_BASE_URL, DEFAULT_QUESTION_MODEL, GeminiClient, GeminiConfig,
};
pub use provider::{InsightProvider, StaticProvider};
pub use sequencer::{RequestSequencer, Ticket};

mod context;
pub mod error;
mod gateway;
mod gemini;
pub mod prompt;
mod provider;
mod sequencer;
pub mod validate;

pub type Result<T> = std::result::Result<T, InsightError>;
