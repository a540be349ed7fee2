//! Integration tests for the bet proxy.
//!
//! Drive the full router over the mock and stub backends, and the HTTP
//! client against a wiremock stand-in for the remote API.
//!
//! One test talks to the real remote service.
//! Run with: cargo test --test integration -- --ignored

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::Value;
use tokio_test::{assert_err, assert_ok};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bet_proxy::api::{create_router, AppState};
use bet_proxy::config::{Backend, Config};
use bet_proxy::remote::{build_catalog, HttpCatalogClient, MockCatalog, MockCatalogBuilder};
use bet_proxy::service::BetValidationService;

fn world_cup() -> MockCatalog {
    MockCatalogBuilder::new()
        .bet(1, "England", 10, 1)
        .bet(2, "Brazil", 1, 1)
        .bet(3, "Germany", 3, 1)
        .bet(4, "Spain", 7, 4)
        .bet(5, "France", 2, 1)
        .bet(6, "Iceland", 17, 1)
        .build()
}

fn mock_app(mock: &MockCatalog) -> Router {
    let service = BetValidationService::new(Arc::new(mock.clone()));
    create_router(AppState::new(service))
}

fn stub_app() -> Router {
    let config = Config {
        backend: Backend::Stub,
        stub_folder: concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures").to_string(),
        ..Config::default()
    };
    let catalog = build_catalog(&config).unwrap();
    create_router(AppState::new(BetValidationService::new(catalog)))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Odds rendered as JSON number text, one per bet.
fn odds_column(body: &str) -> Vec<String> {
    let bets: Vec<Value> = serde_json::from_str(body).unwrap();
    bets.iter().map(|bet| bet["odds"].to_string()).collect()
}

#[tokio::test]
async fn available_lists_catalog_in_decimal() {
    let response = mock_app(&world_cup()).oneshot(get("/available")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        odds_column(&text(response).await),
        vec!["11", "2", "4", "2.75", "3", "18"]
    );
}

#[tokio::test]
async fn available_over_stub_fixtures() {
    let response = stub_app().oneshot(get("/available")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = text(response).await;
    assert_eq!(odds_column(&body).len(), 6);
    assert!(body.starts_with(r#"[{"bet_id":1,"event":"World Cup 2018","name":"England","odds":11}"#));
}

#[tokio::test]
async fn placing_matching_bet_is_created() {
    let mock = world_cup();
    let response = mock_app(&mock)
        .oneshot(post_json("/bets", r#"{"bet_id":1,"odds":11.0,"stake":2.50}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        text(response).await,
        r#"{"bet_id":1,"event":"World Cup 2018","name":"England","odds":11,"stake":2.50,"transaction_id":1000}"#
    );

    let forwarded = mock.placements();
    assert_eq!(forwarded.len(), 1);
    assert_eq!(forwarded[0].odds.to_string(), "10/1");
}

#[tokio::test]
async fn placing_over_stub_returns_fixture() {
    let response = stub_app()
        .oneshot(post_json("/bets", r#"{"bet_id":1,"odds":11,"stake":10}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let receipt: Value = serde_json::from_str(&text(response).await).unwrap();
    assert_eq!(receipt["bet_id"].to_string(), "1");
    assert_eq!(receipt["odds"].to_string(), "11");
}

#[tokio::test]
async fn incorrect_odds_is_teapot_and_not_forwarded() {
    let mock = world_cup();
    let response = mock_app(&mock)
        .oneshot(post_json("/bets", r#"{"bet_id":1,"odds":10,"stake":1}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(text(response).await, r#"{"error":"Incorrect Odds"}"#);
    assert!(mock.placements().is_empty());
}

#[tokio::test]
async fn unknown_bet_is_teapot_and_not_forwarded() {
    let mock = world_cup();
    let response = mock_app(&mock)
        .oneshot(post_json("/bets", r#"{"bet_id":42,"odds":11,"stake":1}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(text(response).await, r#"{"error":"Invalid Bet ID"}"#);
    assert!(mock.placements().is_empty());
}

#[tokio::test]
async fn malformed_body_is_invalid_bet_id() {
    let mock = world_cup();
    for body in ["not json", r#"{"bet_id":"one"}"#, ""] {
        let response = mock_app(&mock).oneshot(post_json("/bets", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT, "body {:?}", body);
        assert_eq!(text(response).await, r#"{"error":"Invalid Bet ID"}"#);
    }
    assert_eq!(mock.catalog_calls(), 0);
}

#[tokio::test]
async fn missing_content_type_is_invalid_bet_id() {
    let request = Request::builder()
        .method("POST")
        .uri("/bets")
        .body(Body::from(r#"{"bet_id":1,"odds":11,"stake":1}"#))
        .unwrap();
    let response = mock_app(&world_cup()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(text(response).await, r#"{"error":"Invalid Bet ID"}"#);
}

#[tokio::test]
async fn unusable_catalog_odds_are_opaque_500() {
    let mock = MockCatalogBuilder::new().bet(1, "England", 1, 3).build();
    let response = mock_app(&mock)
        .oneshot(post_json("/bets", r#"{"bet_id":1,"odds":1.3333,"stake":1}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(text(response).await, r#"{"error":"Internal Error"}"#);
    assert!(mock.placements().is_empty());
}

#[tokio::test]
async fn unsupported_methods_are_404() {
    let app = mock_app(&world_cup());

    let response = app
        .clone()
        .oneshot(post_json("/available", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(text(response).await, "Cannot POST /available\n");

    let request = Request::builder()
        .method("PUT")
        .uri("/bets")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(text(response).await, "Cannot PUT /bets\n");
}

#[tokio::test]
async fn remote_outage_is_opaque_500() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/available"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database on fire"))
        .mount(&server)
        .await;

    let client = assert_ok!(HttpCatalogClient::with_http(reqwest::Client::new(), &server.uri()));
    let app = create_router(AppState::new(BetValidationService::new(Arc::new(client))));
    let response = app.oneshot(get("/available")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(text(response).await, r#"{"error":"Internal Error"}"#);
}

#[tokio::test]
async fn remote_rejection_passes_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/available"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"[{"bet_id":4,"event":"World Cup 2018","name":"Spain","odds":{"numerator":7,"denominator":4}}]"#,
            "application/json",
        ))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/bets"))
        .and(body_partial_json(
            serde_json::json!({"bet_id": 4, "odds": {"numerator": 7, "denominator": 4}}),
        ))
        .respond_with(
            ResponseTemplate::new(418).set_body_raw(r#"{"error":"Invalid Stake"}"#, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = assert_ok!(HttpCatalogClient::with_http(reqwest::Client::new(), &server.uri()));
    let app = create_router(AppState::new(BetValidationService::new(Arc::new(client))));
    let response = app
        .oneshot(post_json("/bets", r#"{"bet_id":4,"odds":2.75,"stake":-1}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(text(response).await, r#"{"error":"Invalid Stake"}"#);
}

#[test]
fn client_rejects_unparseable_base_url() {
    assert_err!(HttpCatalogClient::with_http(reqwest::Client::new(), "not a url"));
}

/// Fetch the live catalog from the real remote service.
#[tokio::test]
#[ignore = "requires network access"]
async fn test_live_catalog() {
    dotenvy::dotenv().ok();
    let config = Config::load().unwrap_or_default();
    let catalog = build_catalog(&config).unwrap();
    let service = BetValidationService::new(catalog);

    match service.list_available().await {
        Ok(bets) => {
            println!("Found {} bets", bets.len());
            for bet in &bets {
                println!("  {} {} @ {}", bet.bet_id, bet.name, bet.odds);
            }
        }
        Err(e) => println!("Live catalog unavailable: {}", e),
    }
}
