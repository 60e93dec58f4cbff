use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::post,
};
use chrono::NaiveDate;
use serde_json::{Value, json};

use engine::seed;
use insights::{
    GeminiClient, GeminiConfig, InsightError, QuestionOutcome, analysis_context, ask_question,
    error::{GENERIC, RATE_LIMITED, SAFETY_BLOCKED},
    question_context, request_deep_analysis,
};

struct MockState {
    status: StatusCode,
    body: Value,
    seen: Mutex<Vec<(String, Option<String>, Value)>>,
}

async fn generate(
    State(state): State<Arc<MockState>>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.seen.lock().unwrap().push((call, key, body));
    (state.status, Json(state.body.clone()))
}

async fn spawn_mock(status: StatusCode, body: Value) -> (GeminiClient, Arc<MockState>) {
    let state = Arc::new(MockState {
        status,
        body,
        seen: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .route("/v1beta/models/{call}", post(generate))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            eprintln!("mock server failed: {err}");
        }
    });

    let client = GeminiClient::new(GeminiConfig {
        api_key: Some("test-key".to_string()),
        base_url: format!("http://{addr}"),
        ..GeminiConfig::default()
    })
    .unwrap();
    (client, state)
}

fn candidate(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "totalTokenCount": 42 }
    })
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 21).unwrap()
}

fn question_ctx() -> api_types::insight::QuestionContext {
    question_context(
        today(),
        &seed::accounts(),
        &seed::transactions(),
        &seed::monthly_summaries(),
        20,
    )
}

fn analysis_ctx() -> api_types::insight::AnalysisContext {
    analysis_context(&seed::transactions(), &seed::monthly_summaries())
}

#[tokio::test]
async fn question_is_answered_with_flash_model() {
    let (client, state) = spawn_mock(
        StatusCode::OK,
        candidate(r#"{"answer":"Dining is trending up.","suggestedAction":"Cook twice a week."}"#),
    )
    .await;

    let outcome = ask_question(&client, "Where does my money go?", &question_ctx()).await;
    assert_eq!(
        outcome,
        QuestionOutcome::Answered {
            answer: "Dining is trending up.".to_string(),
            suggested_action: Some("Cook twice a week.".to_string()),
        }
    );

    let seen = state.seen.lock().unwrap();
    let (call, key, body) = &seen[0];
    assert_eq!(call, "gemini-3-flash-preview:generateContent");
    assert_eq!(key.as_deref(), Some("test-key"));
    assert_eq!(
        body["contents"][0]["parts"][0]["text"],
        "Where does my money go?"
    );
    let instruction = body["systemInstruction"]["parts"][0]["text"].as_str().unwrap();
    assert!(instruction.contains("\"currentDate\":\"2024-05-21\""));
    assert!(instruction.contains("Whole Foods"));
}

#[tokio::test]
async fn deep_analysis_uses_pro_model_and_validates() {
    let payload = json!({
        "patterns": [
            {"title": "Subscription creep", "description": "Two streaming services.", "impact": "NEGATIVE"},
            {"title": "Steady salary", "description": "Income is regular.", "impact": "POSITIVE"}
        ],
        "forecast": [
            {"month": "2024-06", "predictedAmount": 4300},
            {"month": "2024-07", "predictedAmount": 4450.5},
            {"month": "2024-08", "predictedAmount": 4500}
        ],
        "summary": "Healthy overall."
    });
    let (client, state) = spawn_mock(StatusCode::OK, candidate(&payload.to_string())).await;

    let analysis = request_deep_analysis(&client, &analysis_ctx()).await.unwrap();
    assert_eq!(analysis.patterns.len(), 2);
    assert_eq!(analysis.forecast[1].predicted_amount, 4450.5);
    assert_eq!(analysis.summary, "Healthy overall.");

    let seen = state.seen.lock().unwrap();
    assert_eq!(seen[0].0, "gemini-3-pro-preview:generateContent");
    let prompt = seen[0].2["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.starts_with("Analyze the 9-month financial history provided."));
}

#[tokio::test]
async fn rate_limit_status_maps_to_message() {
    let (client, _state) = spawn_mock(
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}),
    )
    .await;

    let outcome = ask_question(&client, "hi", &question_ctx()).await;
    assert_eq!(outcome.answer_text(), RATE_LIMITED);

    let err = request_deep_analysis(&client, &analysis_ctx())
        .await
        .unwrap_err();
    assert!(matches!(err, InsightError::RateLimited(_)));
    assert!(err.detail().contains("RESOURCE_EXHAUSTED"));
}

#[tokio::test]
async fn server_errors_and_bad_keys_are_classified() {
    let (client, _state) = spawn_mock(
        StatusCode::SERVICE_UNAVAILABLE,
        json!({"error": {"code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE"}}),
    )
    .await;
    let err = request_deep_analysis(&client, &analysis_ctx())
        .await
        .unwrap_err();
    assert!(matches!(err, InsightError::Upstream(_)));

    let (client, _state) = spawn_mock(
        StatusCode::BAD_REQUEST,
        json!({"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}}),
    )
    .await;
    let err = request_deep_analysis(&client, &analysis_ctx())
        .await
        .unwrap_err();
    assert!(matches!(err, InsightError::Configuration(_)));
}

#[tokio::test]
async fn safety_block_is_reported() {
    let (client, _state) = spawn_mock(
        StatusCode::OK,
        json!({"promptFeedback": {"blockReason": "SAFETY"}}),
    )
    .await;
    let outcome = ask_question(&client, "something unsafe", &question_ctx()).await;
    assert_eq!(
        outcome,
        QuestionOutcome::Failed {
            message: SAFETY_BLOCKED.to_string()
        }
    );
}

#[tokio::test]
async fn malformed_reply_gets_generic_message() {
    let (client, _state) = spawn_mock(StatusCode::OK, candidate("Sure! Here is some prose.")).await;
    let outcome = ask_question(&client, "hi", &question_ctx()).await;
    assert_eq!(outcome.answer_text(), GENERIC);

    let (client, _state) = spawn_mock(
        StatusCode::OK,
        candidate(r#"{"patterns":[],"forecast":[{"month":"soon","predictedAmount":1}],"summary":"s"}"#),
    )
    .await;
    let err = request_deep_analysis(&client, &analysis_ctx())
        .await
        .unwrap_err();
    assert!(matches!(err, InsightError::Malformed(_)));
    assert_eq!(err.to_string(), GENERIC);
}
