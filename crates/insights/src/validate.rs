//! Strict parsing of model replies.
//!
//! Anything that does not deserialize into the expected shape, or carries
//! values outside their domain, is rejected as [`InsightError::Malformed`].

use api_types::insight::{DeepAnalysis, QuestionReply};
use chrono::NaiveDate;

use crate::{InsightError, Result};

fn malformed(message: impl Into<String>) -> InsightError {
    InsightError::Malformed(message.into())
}

pub fn parse_question_reply(text: &str) -> Result<QuestionReply> {
    let mut reply: QuestionReply =
        serde_json::from_str(text.trim()).map_err(|err| malformed(err.to_string()))?;
    if reply.answer.trim().is_empty() {
        return Err(malformed("empty answer"));
    }
    reply.answer = reply.answer.trim().to_string();
    reply.suggested_action = reply
        .suggested_action
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    Ok(reply)
}

/// `YYYY-MM` with a real month.
fn is_month(value: &str) -> bool {
    value.len() == 7 && NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").is_ok()
}

pub fn parse_deep_analysis(text: &str) -> Result<DeepAnalysis> {
    let analysis: DeepAnalysis =
        serde_json::from_str(text.trim()).map_err(|err| malformed(err.to_string()))?;

    if analysis.summary.trim().is_empty() {
        return Err(malformed("empty summary"));
    }
    if let Some(pattern) = analysis
        .patterns
        .iter()
        .find(|p| p.title.trim().is_empty())
    {
        return Err(malformed(format!("pattern without title: {pattern:?}")));
    }
    for point in &analysis.forecast {
        if !is_month(&point.month) {
            return Err(malformed(format!("invalid forecast month: {}", point.month)));
        }
        if !point.predicted_amount.is_finite() {
            return Err(malformed(format!(
                "invalid forecast amount for {}",
                point.month
            )));
        }
    }
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use api_types::insight::Impact;

    use super::*;

    #[test]
    fn question_reply_requires_answer() {
        let reply =
            parse_question_reply(r#"{"answer":" Spend less on dining. ","suggestedAction":""}"#)
                .unwrap();
        assert_eq!(reply.answer, "Spend less on dining.");
        assert_eq!(reply.suggested_action, None);

        assert!(matches!(
            parse_question_reply(r#"{"suggestedAction":"x"}"#),
            Err(InsightError::Malformed(_))
        ));
        assert!(matches!(
            parse_question_reply(r#"{"answer":"   "}"#),
            Err(InsightError::Malformed(_))
        ));
        assert!(parse_question_reply("not json").is_err());
    }

    #[test]
    fn deep_analysis_accepts_valid_payload() {
        let analysis = parse_deep_analysis(
            r#"{
                "patterns": [{"title":"Dining","description":"Up 20%","impact":"NEGATIVE"}],
                "forecast": [{"month":"2024-06","predictedAmount":4300.5}],
                "summary": "Healthy savings rate."
            }"#,
        )
        .unwrap();
        assert_eq!(analysis.patterns[0].impact, Impact::Negative);
        assert_eq!(analysis.forecast[0].predicted_amount, 4300.5);
    }

    #[test]
    fn deep_analysis_fails_closed() {
        let bad_impact = r#"{"patterns":[{"title":"t","description":"d","impact":"GREAT"}],
            "forecast":[],"summary":"s"}"#;
        let bad_month = r#"{"patterns":[],"forecast":[{"month":"June","predictedAmount":1}],
            "summary":"s"}"#;
        let missing_forecast = r#"{"patterns":[],"summary":"s"}"#;
        let string_amount = r#"{"patterns":[],"forecast":[{"month":"2024-06","predictedAmount":"1"}],
            "summary":"s"}"#;

        for payload in [bad_impact, bad_month, missing_forecast, string_amount] {
            assert!(
                matches!(parse_deep_analysis(payload), Err(InsightError::Malformed(_))),
                "{payload}"
            );
        }
        assert!(!is_month("2024-13"));
        assert!(!is_month("2024-6"));
    }
}
