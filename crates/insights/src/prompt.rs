//! Prompt text and `generateContent` request bodies.

use api_types::{
    gemini::{Content, GenerateContentRequest, GenerationConfig, Part},
    insight::{AnalysisContext, QuestionContext},
};
use serde_json::{Value, json};

use crate::{InsightError, Result};

pub const ANALYSIS_PROMPT: &str = "Analyze the 9-month financial history provided. \
Identify 3-4 key spending patterns (e.g. subscription creep, dining trends, lifestyle inflation). \
Provide a 3-month forecast of total expenses. \
Provide a high-level summary of financial health.";

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|err| InsightError::Other(err.to_string()))
}

pub fn question_instruction(context: &QuestionContext) -> Result<String> {
    Ok(format!(
        "You are Fluxboard AI. Context: {}. Be concise, expert, and friendly.",
        to_json(context)?
    ))
}

pub fn analysis_instruction(context: &AnalysisContext) -> Result<String> {
    Ok(format!(
        "You are a Senior Financial Analyst. Data: {}. \
Return structured JSON only. Impact must be POSITIVE, NEGATIVE, or NEUTRAL.",
        to_json(context)?
    ))
}

pub fn question_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "answer": { "type": "STRING" },
            "suggestedAction": { "type": "STRING" }
        },
        "required": ["answer"]
    })
}

pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "patterns": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "impact": { "type": "STRING", "enum": ["POSITIVE", "NEGATIVE", "NEUTRAL"] }
                    },
                    "required": ["title", "description", "impact"]
                }
            },
            "forecast": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "month": { "type": "STRING" },
                        "predictedAmount": { "type": "NUMBER" }
                    },
                    "required": ["month", "predictedAmount"]
                }
            },
            "summary": { "type": "STRING" }
        },
        "required": ["patterns", "forecast", "summary"]
    })
}

fn json_request(user_text: &str, instruction: String, schema: Value) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![Part::text(user_text)],
        }],
        system_instruction: Some(Content {
            role: None,
            parts: vec![Part::text(instruction)],
        }),
        generation_config: Some(GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: schema,
        }),
    }
}

pub fn question_request(query: &str, context: &QuestionContext) -> Result<GenerateContentRequest> {
    Ok(json_request(
        query,
        question_instruction(context)?,
        question_schema(),
    ))
}

pub fn analysis_request(context: &AnalysisContext) -> Result<GenerateContentRequest> {
    Ok(json_request(
        ANALYSIS_PROMPT,
        analysis_instruction(context)?,
        analysis_schema(),
    ))
}
