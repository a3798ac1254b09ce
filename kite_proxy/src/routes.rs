use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method};
use axum::routing::{get, post};
use kite_common::net::{
    ANALYZE_CRYPTO_PATH, HEALTH_PATH, LOGIN_PATH, OPTION_CHAIN_PATH, ORDER_PATH, PORTFOLIO_PATH,
    QUOTE_PATH,
};
use tower_http::cors::{Any, CorsLayer};

use crate::handlers;
use crate::state::AppState;

/// CORS policy matching what browser and app clients send: any origin,
/// JSON bodies, bearer and client-info headers. Answers preflight `OPTIONS`.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(handlers::health))
        .route(LOGIN_PATH, post(handlers::login))
        .route(ORDER_PATH, post(handlers::place_order))
        .route(QUOTE_PATH, post(handlers::quote))
        .route(PORTFOLIO_PATH, post(handlers::portfolio))
        .route(OPTION_CHAIN_PATH, post(handlers::option_chain))
        .route(ANALYZE_CRYPTO_PATH, post(handlers::analyze_crypto))
        .with_state(state)
        .layer(cors())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiClient;
    use crate::kite::KiteClient;
    use kite_common::net::url;

    const ORIGIN: &str = "https://app.example";

    async fn spawn_proxy() -> String {
        let http = reqwest::Client::new();
        let kite = KiteClient::new(
            http.clone(),
            "http://127.0.0.1:1",
            "https://kite.example/connect/login",
            None,
            None,
        );
        let ai = AiClient::new(http, None, None, "test-model");
        let app = create_router(AppState::new(kite, ai, 25_000.0));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn preflight_allows_any_origin() {
        let base = spawn_proxy().await;

        let response = reqwest::Client::new()
            .request(reqwest::Method::OPTIONS, url(&base, QUOTE_PATH))
            .header("Origin", ORIGIN)
            .header("Access-Control-Request-Method", "POST")
            .header("Access-Control-Request-Headers", "content-type,apikey")
            .send()
            .await
            .unwrap();

        assert!(response.status().is_success());
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        let methods = headers["access-control-allow-methods"].to_str().unwrap();
        assert!(methods.contains("POST"));
        assert!(methods.contains("OPTIONS"));
        let allowed = headers["access-control-allow-headers"]
            .to_str()
            .unwrap()
            .to_ascii_lowercase();
        assert!(allowed.contains("content-type"));
        assert!(allowed.contains("apikey"));
        assert!(allowed.contains("x-client-info"));
    }

    #[tokio::test]
    async fn health_answers_with_cors_header() {
        let base = spawn_proxy().await;

        let response = reqwest::Client::new()
            .get(url(&base, HEALTH_PATH))
            .header("Origin", ORIGIN)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn error_bodies_carry_cors_header() {
        let base = spawn_proxy().await;

        let response = reqwest::Client::new()
            .post(url(&base, QUOTE_PATH))
            .header("Origin", ORIGIN)
            .json(&serde_json::json!({"instruments": [], "accessToken": "tok"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "No instruments specified");
    }
}
