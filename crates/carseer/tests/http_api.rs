//! Router tests driven in-process through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use carseer::market::test_support::ScriptedProvider;
use carseer::market::{Orchestrator, QuoteProvider};
use carseer::models::MarketConfig;
use carseer::pricing::PricingCalculator;
use carseer::server::{router, PredictResponse, TrimsResponse};
use tower::ServiceExt;

fn app(providers: Vec<Arc<dyn QuoteProvider>>) -> Router {
    let config = MarketConfig {
        provider_timeout_seconds: 1,
        ..MarketConfig::default()
    };
    let orchestrator = Orchestrator::new(Arc::new(PricingCalculator::default()), providers, config);
    router(
        Arc::new(orchestrator),
        &["http://localhost:3000".to_string()],
    )
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_and_welcome() {
    let response = app(vec![]).oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, serde_json::json!({"status": "ok"}));

    let response = app(vec![]).oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(json_body(response).await["message"].is_string());
}

#[tokio::test]
async fn predict_returns_catalog_valuation() {
    let body = r#"{"make": "Toyota", "model": "Camry", "year": 2018, "trim": "SE", "mileage": 60000, "condition": "Good"}"#;
    let response = app(vec![]).oneshot(post_json("/predict", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["category"], "Mainstream");
    assert_eq!(json["confidence"], "high");
    assert_eq!(json["source"], "catalog");
    assert!(json["predicted_value"].as_f64().unwrap() > 0.0);
    assert!(json["price_range"]["low"].as_f64() < json["price_range"]["high"].as_f64());
    assert!(json["factors"]["mileage_multiplier"].as_f64().unwrap() < 1.0);
    assert!(json["timestamp"].is_string());
    assert!(json.get("market").is_none());

    let parsed: PredictResponse = serde_json::from_value(json).unwrap();
    assert_eq!(parsed.valuation.factors.condition_multiplier, 1.0);
}

#[tokio::test]
async fn predict_uses_market_quotes() {
    let providers: Vec<Arc<dyn QuoteProvider>> = vec![
        Arc::new(ScriptedProvider::quoting("kbb", &[24_000.0, 23_500.0])),
        Arc::new(ScriptedProvider::failing("nada")),
        Arc::new(ScriptedProvider::quoting("cargurus", &[23_900.0])),
    ];
    let body = r#"{"make": "Toyota", "model": "Camry", "year": 2021}"#;

    let response = app(providers).oneshot(post_json("/predict", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["source"], "market");
    assert_eq!(json["predicted_value"], serde_json::json!(23900.0));
    assert_eq!(json["market"]["sample_size"], 3);
    assert_eq!(json["market"]["sources"]["kbb"], 2);
}

#[tokio::test]
async fn predict_rejects_malformed_body() {
    let response = app(vec![])
        .oneshot(post_json("/predict", r#"{"make": "Toyota"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["detail"].is_string());

    let response = app(vec![])
        .oneshot(post_json("/predict", "not json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn predict_rejects_invalid_query() {
    let body = r#"{"make": "Toyota", "model": "Camry", "year": 2020, "mileage": -10}"#;
    let response = app(vec![]).oneshot(post_json("/predict", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let detail = json_body(response).await["detail"].as_str().unwrap().to_string();
    assert!(detail.contains("mileage"));
}

#[tokio::test]
async fn trims_endpoint() {
    let providers: Vec<Arc<dyn QuoteProvider>> = vec![Arc::new(
        ScriptedProvider::quoting("marketcheck", &[]).with_trims(&["Nightshade"]),
    )];

    let response = app(providers)
        .oneshot(get("/api/trims/Toyota/Camry"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let trims: TrimsResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(trims.trims[0], "Base");
    assert!(trims.trims.contains(&"XSE".to_string()));
    assert!(trims.trims.contains(&"Nightshade".to_string()));
}

#[tokio::test]
async fn trims_path_segments_are_decoded() {
    let response = app(vec![])
        .oneshot(get("/api/trims/Aston%20Martin/DB11"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let trims: Vec<&str> = json["trims"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t.as_str())
        .collect();
    // "Aston Martin" classifies as super luxury only once decoded
    assert!(trims.contains(&"Mulliner"));
    assert!(trims.contains(&"Black Badge"));
    assert!(!trims.contains(&"LE"));
}

#[tokio::test]
async fn trims_for_hyphenated_names() {
    let response = app(vec![])
        .oneshot(get("/api/trims/Mercedes-Benz/C-Class"))
        .await
        .unwrap();
    let json = json_body(response).await;
    let trims: Vec<&str> = json["trims"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t.as_str())
        .collect();
    assert!(trims.contains(&"AMG"));
    assert!(trims.contains(&"Maybach"));
    assert!(trims.contains(&"AMG C 63"));
}

#[tokio::test]
async fn cors_allows_configured_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/predict")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app(vec![]).oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
}
