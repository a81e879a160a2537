//! HTTP client tests against a local mock of the remote services.

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use fortune_core::api::{PredictionRequest, PredictorClient, SolscanClient, TranslatorClient};
use fortune_core::Error;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn token_meta(
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    if headers.get("token").and_then(|v| v.to_str().ok()) != Some("secret") {
        return Err(StatusCode::UNAUTHORIZED);
    }
    match params.get("tokenAddress").map(String::as_str) {
        Some("TOKEN123") => Ok(Json(json!({
            "symbol": "TKN",
            "market_cap": 2_000_000_000u64,
            "price": 50
        }))),
        Some("EMPTY") => Ok(Json(json!({}))),
        _ => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

async fn token_holders(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let limit: usize = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(0);
    let offset = params.get("offset").cloned().unwrap_or_default();
    Json(json!({
        "data": vec![json!({"owner": "holder"}); limit],
        "offset": offset
    }))
}

fn solscan_router() -> Router {
    Router::new()
        .route("/token/meta", get(token_meta))
        .route("/token/holders", get(token_holders))
}

#[tokio::test]
async fn test_token_meta_success() {
    let base = spawn_server(solscan_router()).await;
    let client = SolscanClient::new(base, Some("secret".to_string()));

    let meta = client.token_meta("TOKEN123").await.unwrap();
    assert_eq!(meta["symbol"], "TKN");
    assert_eq!(meta["price"], 50);
}

#[tokio::test]
async fn test_token_meta_server_error() {
    let base = spawn_server(solscan_router()).await;
    let client = SolscanClient::new(base, Some("secret".to_string()));

    let err = client.token_meta("BROKEN").await.unwrap_err();
    assert!(matches!(err, Error::Api { status: Some(500), .. }));
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_token_meta_empty_body_is_missing() {
    let base = spawn_server(solscan_router()).await;
    let client = SolscanClient::new(base, Some("secret".to_string()));

    let err = client.token_meta("EMPTY").await.unwrap_err();
    assert!(matches!(err, Error::MissingData { .. }));
}

#[tokio::test]
async fn test_token_meta_without_key() {
    let base = spawn_server(solscan_router()).await;
    let client = SolscanClient::new(base, None);

    let err = client.token_meta("TOKEN123").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_token_holders_pagination() {
    let base = spawn_server(solscan_router()).await;
    let client = SolscanClient::new(base, None);

    let page = client.token_holders("TOKEN123", 40, 7).await.unwrap();
    assert_eq!(page["data"].as_array().unwrap().len(), 7);
    assert_eq!(page["offset"], "40");

    let first_page = client.token_holders_page("TOKEN123").await.unwrap();
    assert_eq!(
        first_page["data"].as_array().unwrap().len(),
        SolscanClient::DEFAULT_HOLDERS_LIMIT as usize
    );
}

#[tokio::test]
async fn test_unreachable_host() {
    // Bind and drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = SolscanClient::new(format!("http://{}", addr), None);
    let err = client.token_meta("TOKEN123").await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}

async fn predict(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "prediction": format!("{} looks fine with {} holders", body["symbol"].as_str().unwrap_or("?"), body["holders_count"])
    }))
}

async fn slow_predict() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({"prediction": "too late"}))
}

#[tokio::test]
async fn test_predictor_round_trip() {
    let base = spawn_server(Router::new().route("/predict", post(predict))).await;
    let client = PredictorClient::new(format!("{}/predict", base), Duration::from_secs(2));

    let request = PredictionRequest::from_responses(
        &json!({"symbol": "TKN", "market_cap": 1, "price": 2}),
        &json!({"data": [{}, {}, {}]}),
    );
    let prediction = client.predict(&request).await.unwrap();
    assert_eq!(prediction.prediction, "TKN looks fine with 3 holders");
}

#[tokio::test]
async fn test_predictor_timeout() {
    let base = spawn_server(Router::new().route("/predict", post(slow_predict))).await;
    let client = PredictorClient::new(format!("{}/predict", base), Duration::from_millis(200));

    let request = PredictionRequest::from_responses(&json!({}), &json!({}));
    let err = client.predict(&request).await.unwrap_err();
    assert!(matches!(err, Error::Http(ref e) if e.is_timeout()));
}

#[tokio::test]
async fn test_predictor_empty_reply_is_missing() {
    let base = spawn_server(Router::new().route("/predict", post(|| async { Json(json!({})) }))).await;
    let client = PredictorClient::new(format!("{}/predict", base), Duration::from_secs(2));

    let request = PredictionRequest::from_responses(&json!({"symbol": "TKN"}), &json!({}));
    let err = client.predict(&request).await.unwrap_err();
    assert!(matches!(err, Error::MissingData { what: "prediction" }));
}

async fn translate(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "translated_text": format!(
            "[{}->{}] {}",
            body["source_lang"].as_str().unwrap_or_default(),
            body["target_lang"].as_str().unwrap_or_default(),
            body["text"].as_str().unwrap_or_default()
        )
    }))
}

#[tokio::test]
async fn test_translator_success_and_fallbacks() {
    let router = Router::new()
        .route("/translate", post(translate))
        .route("/blank", post(|| async { Json(json!({"detail": "none"})) }))
        .route("/down", post(|| async { StatusCode::SERVICE_UNAVAILABLE }));
    let base = spawn_server(router).await;

    let client = |path: &str| {
        TranslatorClient::new(
            format!("{}{}", base, path),
            "ja".to_string(),
            "en".to_string(),
            Duration::from_secs(2),
        )
    };

    assert_eq!(
        client("/translate").translate("こんにちは").await.unwrap(),
        "[ja->en] こんにちは"
    );
    assert_eq!(
        client("/blank").translate("text").await.unwrap(),
        TranslatorClient::UNAVAILABLE
    );
    assert_eq!(
        client("/down").translate_or_fallback("text").await,
        TranslatorClient::FAILED
    );
}
