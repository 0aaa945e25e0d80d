//! Router assembly with the cross-cutting HTTP layers.

use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::domain::payment::SIGNATURE_HEADER;

use super::payment::{payment_router, PaymentAppState};

const ALLOWED_METHODS: [Method; 3] = [Method::GET, Method::POST, Method::OPTIONS];

/// Builds the CORS layer for the browser checkout origins.
///
/// Origins that are not valid header values are skipped.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Skipping invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(SIGNATURE_HEADER),
        ])
        .allow_credentials(true)
}

/// Builds the complete application: routes, state and layers.
pub fn build_app(state: PaymentAppState, server: &ServerConfig) -> Router {
    payment_router()
        .with_state(state)
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(&server.cors_origins_list()))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::memory::InMemoryPaymentStore;
    use crate::adapters::razorpay::MockOrderGateway;
    use crate::domain::payment::WebhookVerifier;

    fn app() -> Router {
        let store = Arc::new(InMemoryPaymentStore::new());
        let state = PaymentAppState {
            customer_repository: store.clone(),
            payment_repository: store.clone(),
            payment_reader: store,
            order_gateway: Arc::new(MockOrderGateway::new()),
            webhook_verifier: WebhookVerifier::new("whsec_layers"),
            currency: "INR".to_string(),
        };
        build_app(state, &ServerConfig::default())
    }

    #[tokio::test]
    async fn preflight_from_allowed_origin_is_answered() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/create-order")
            .header("origin", "http://localhost:3000")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://localhost:3000"
        );
        assert_eq!(response.headers()["access-control-allow-credentials"], "true");
    }

    #[tokio::test]
    async fn unknown_origin_gets_no_cors_headers() {
        let request = Request::builder()
            .uri("/")
            .header("origin", "https://evil.example")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get("access-control-allow-origin")
            .is_none());
    }
}
