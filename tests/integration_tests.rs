//! Integration tests for component interactions.
//!
//! These tests run the real HTTP clients against a local mock of the token
//! data, prediction, and translation services.

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use fortune_core::api::TranslatorClient;
use fortune_core::config::Config;
use fortune_core::types::{CommunityTrend, MarketCapTrend, PriceTrend};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use token_tracker::{Pipeline, PredictionLog, RefreshStatus, TrackOutcome, Tracker, TranslationSource};

async fn token_meta(Query(params): Query<HashMap<String, String>>) -> Result<Json<Value>, StatusCode> {
    match params.get("tokenAddress").map(String::as_str) {
        Some("TOKEN123") => Ok(Json(json!({
            "symbol": "TKN",
            "market_cap": "2000000000",
            "price": 50
        }))),
        Some("PENNY") => Ok(Json(json!({"symbol": "PNY", "market_cap": 1_000_000, "price": 0.004}))),
        _ => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

async fn token_holders(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let limit: usize = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(0);
    Json(json!({"data": vec![json!({"owner": "o"}); limit]}))
}

async fn predict(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({"prediction": format!("{} is trending", body["symbol"].as_str().unwrap_or("?"))}))
}

async fn translate(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({"translated_text": format!("EN: {}", body["text"].as_str().unwrap_or_default())}))
}

async fn spawn_services() -> String {
    let router = Router::new()
        .route("/token/meta", get(token_meta))
        .route("/token/holders", get(token_holders))
        .route("/predict", post(predict))
        .route("/translate", post(translate));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Test the full pipeline over HTTP for a large-cap token.
#[tokio::test]
async fn test_pipeline_end_to_end() {
    let base = spawn_services().await;
    let config = Config::local(&base);
    let pipeline = Pipeline::from_config(&config);

    let outcome = pipeline.run("TOKEN123").await.unwrap();

    let local = outcome.local.unwrap();
    assert_eq!(local.symbol, "TKN");
    // Default holder page of 20 records
    assert_eq!(local.holders_count, 20);
    assert_eq!(local.outlook.market, MarketCapTrend::VeryBullish);
    assert_eq!(local.outlook.community, CommunityTrend::HighRisk);
    assert_eq!(local.outlook.price, PriceTrend::Stable);
    assert_eq!(outcome.ai.unwrap().prediction, "TKN is trending");
}

/// A 500 from the metadata endpoint aborts the run without panicking.
#[tokio::test]
async fn test_pipeline_metadata_server_error() {
    let base = spawn_services().await;
    let pipeline = Pipeline::from_config(&Config::local(&base));

    let err = pipeline.run("UNKNOWN").await.unwrap_err();
    assert_eq!(err.status(), Some(500));

    // The pipeline stays usable for the next address
    assert!(pipeline.run("PENNY").await.is_ok());
}

/// With the predictor disabled only the local prediction is produced.
#[tokio::test]
async fn test_pipeline_without_predictor() {
    let base = spawn_services().await;
    let mut config = Config::local(&base);
    config.predictor.url = None;

    let outcome = Pipeline::from_config(&config).run("PENNY").await.unwrap();

    assert!(outcome.ai.is_none());
    assert_eq!(
        outcome.local.unwrap().prediction,
        "very bearish | high risk, low holders | declining, may affect sentiment"
    );
}

/// Test tracking, periodic refresh, and the prediction log together.
#[tokio::test]
async fn test_tracker_refresh_over_http() {
    let base = spawn_services().await;
    let dir = tempfile::tempdir().unwrap();
    let config = Config::local(&base);

    let tracker = Tracker::new(
        Arc::new(Pipeline::from_config(&config)),
        PredictionLog::new(dir.path().join("fortune_ai.log")),
        Duration::from_millis(50),
    );
    let mut reports = tracker.subscribe();

    assert_eq!(tracker.track("TOKEN123").await, TrackOutcome::Added);
    assert_eq!(tracker.track("TOKEN123").await, TrackOutcome::AlreadyTracked);
    assert_eq!(tracker.track("UNKNOWN").await, TrackOutcome::Added);
    assert_eq!(tracker.start_refresh_all().await, 2);

    let mut updated = 0;
    let mut failed = 0;
    while updated == 0 || failed == 0 {
        let report = tokio::time::timeout(Duration::from_secs(5), reports.recv())
            .await
            .expect("refresh report")
            .unwrap();
        match (report.address.as_str(), report.status) {
            ("TOKEN123", RefreshStatus::Updated(outcome)) => {
                assert!(outcome.local.is_some());
                updated += 1;
            }
            ("UNKNOWN", RefreshStatus::Failed { .. }) => failed += 1,
            (address, status) => panic!("unexpected report for {}: {:?}", address, status),
        }
    }

    tracker.shutdown();

    let log = std::fs::read_to_string(dir.path().join("fortune_ai.log")).unwrap();
    assert!(log.contains("Token address: TOKEN123"));
    assert!(log.contains("AI prediction: TKN is trending"));
    assert!(log.contains("ERROR - Refresh failed for UNKNOWN"));
}

/// The translator used by the menus falls back instead of failing.
#[tokio::test]
async fn test_translation_source() {
    let base = spawn_services().await;
    let config = Config::local(&base);

    let translator = TranslatorClient::from_config(&config.translator);
    assert_eq!(
        TranslationSource::translate(&translator, "強気").await,
        "EN: 強気"
    );

    let mut broken = config.translator.clone();
    broken.url = format!("{}/missing", base);
    let translator = TranslatorClient::from_config(&broken);
    assert_eq!(
        TranslationSource::translate(&translator, "強気").await,
        TranslatorClient::FAILED
    );
}
