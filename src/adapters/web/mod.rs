//! HTTP front end. Implements InputPort by serving the consultation API with axum.
//!
//! Thin plumbing: boundary validation, error mapping, middleware. All decisions live in the
//! `ConsultationPort` implementation behind `AppState`.

pub mod dto;
pub mod error;
pub mod handlers;

use crate::domain::DomainError;
use crate::ports::{ConsultationPort, InputPort};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Router, middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub consultation: Arc<dyn ConsultationPort>,
    /// Deployment label reported by /health.
    pub environment: String,
}

/// Build the API router. `request_timeout` bounds a whole request, completion call included.
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/info", get(handlers::api_info))
        .route("/ask-question", post(handlers::ask_question))
        .route("/generate-report", post(handlers::generate_report))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            request_timeout,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(middleware::map_response(error::fill_timeout_body))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

pub struct HttpInputPort {
    addr: SocketAddr,
    state: AppState,
    request_timeout: Duration,
}

impl HttpInputPort {
    pub fn new(addr: SocketAddr, state: AppState, request_timeout: Duration) -> Self {
        Self {
            addr,
            state,
            request_timeout,
        }
    }
}

#[async_trait::async_trait]
impl InputPort for HttpInputPort {
    /// Serve until Ctrl+C / SIGTERM.
    async fn run(&self) -> Result<(), DomainError> {
        let app = router(self.state.clone(), self.request_timeout);
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|e| DomainError::Frontend(format!("bind {}: {}", self.addr, e)))?;

        info!(addr = %self.addr, "Legal Consultation API listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DomainError::Frontend(format!("server error: {}", e)))?;

        info!("server shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CompletionError;
    use crate::ports::{QuestionsReply, ReportReply};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use chrono::Utc;
    use serde_json::Value;
    use tower::ServiceExt;

    /// Consultation stub: echoes inputs, fails when the query mentions "quota", stalls on "stall".
    struct StubConsultation;

    #[async_trait::async_trait]
    impl ConsultationPort for StubConsultation {
        async fn ask_questions(&self, query: &str) -> Result<QuestionsReply, DomainError> {
            if query.contains("quota") {
                return Err(CompletionError::QuotaExceeded("daily limit".into()).into());
            }
            if query.contains("stall") {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
            Ok(QuestionsReply {
                questions: vec![format!("About '{}': which state?", query)],
                message: "answer please".into(),
            })
        }

        async fn generate_report(
            &self,
            query: &str,
            answers: &str,
        ) -> Result<ReportReply, DomainError> {
            Ok(ReportReply {
                report: format!("{} / {}", query, answers),
                generated_at: Utc::now(),
            })
        }
    }

    fn app() -> Router {
        app_with_timeout(Duration::from_secs(5))
    }

    fn app_with_timeout(request_timeout: Duration) -> Router {
        router(
            AppState {
                consultation: Arc::new(StubConsultation),
                environment: "test".into(),
            },
            request_timeout,
        )
    }

    async fn post_json(path: &str, body: &str) -> (StatusCode, Value) {
        let response = app()
            .oneshot(
                Request::post(path)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["environment"], "test");
    }

    #[tokio::test]
    async fn test_ask_question_trims_and_replies() {
        let (status, body) =
            post_json("/ask-question", r#"{"query":"  Can I use clips from a film?  "}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["questions"][0],
            "About 'Can I use clips from a film?': which state?"
        );
        assert_eq!(body["message"], "answer please");
    }

    #[tokio::test]
    async fn test_ask_question_rejects_short_query() {
        let (status, body) = post_json("/ask-question", r#"{"query":"   hi   "}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid input");
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_json_is_client_error() {
        let (status, body) = post_json("/ask-question", r#"{"q":1}"#).await;
        assert!(status.is_client_error());
        assert_eq!(body["error"], "Invalid request body");
    }

    #[tokio::test]
    async fn test_service_failure_maps_status() {
        let (status, body) =
            post_json("/ask-question", r#"{"query":"I hit my quota of leave days"}"#).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"], "Completion quota exceeded");
    }

    #[tokio::test]
    async fn test_generate_report_returns_timestamp() {
        let (status, body) = post_json(
            "/generate-report",
            r#"{"initial_query":"Can I use clips from a film?","answers":"Maharashtra, for a review"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["report"],
            "Can I use clips from a film? / Maharashtra, for a review"
        );
        assert!(body["generatedAt"].is_string());
    }

    #[tokio::test]
    async fn test_request_timeout_is_gateway_timeout_with_body() {
        let response = app_with_timeout(Duration::from_millis(50))
            .oneshot(
                Request::post("/ask-question")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"query":"Completion will stall forever"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        let request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        assert!(request_id.is_some());

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Request timed out");
        assert!(body["detail"].is_string());
        assert_eq!(body["request_id"].as_str(), request_id.as_deref());
    }
}
