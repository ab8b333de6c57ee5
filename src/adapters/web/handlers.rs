use crate::adapters::web::AppState;
use crate::adapters::web::dto::{LegalQuery, UserAnswers};
use crate::adapters::web::error::ApiError;
use crate::ports::{QuestionsReply, ReportReply};
use crate::usecases::prompts::JURISDICTION;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use serde_json::{Value, json};
use tracing::info;

const SERVICE_NAME: &str = "Legal Consultation API";
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": SERVICE_NAME,
        "version": VERSION,
        "health": "/health",
        "info": "/api/info"
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": VERSION,
        "environment": state.environment
    }))
}

pub async fn api_info() -> Json<Value> {
    Json(json!({
        "name": SERVICE_NAME,
        "version": VERSION,
        "description": format!("AI-powered legal consultation service specialising in the {}", JURISDICTION),
        "endpoints": {
            "POST /ask-question": "Submit a legal query and get probing questions",
            "POST /generate-report": "Generate a legal report from the query and your answers",
            "GET /health": "Health check endpoint",
            "GET /api/info": "API information"
        },
        "supported_legal_system": "Indian Law",
        "features": [
            "Structured clarifying questions",
            "Sectioned consultation reports",
            "Stateless two-phase flow"
        ]
    }))
}

/// Phase one. The caller must keep `query` and resubmit it to `/generate-report`.
pub async fn ask_question(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<LegalQuery>, JsonRejection>,
) -> Result<Json<QuestionsReply>, ApiError> {
    let request_id = request_id(&headers);
    let Json(body) = payload.map_err(|r| ApiError::rejected(r, request_id.clone()))?;
    let query = body
        .validate()
        .map_err(|e| ApiError::from_domain(e, request_id.clone()))?;

    info!(query_len = query.len(), "processing legal query");
    let reply = state
        .consultation
        .ask_questions(query)
        .await
        .map_err(|e| ApiError::from_domain(e, request_id))?;

    info!(
        questions = reply.questions.len(),
        "successfully generated questions for query"
    );
    Ok(Json(reply))
}

pub async fn generate_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<UserAnswers>, JsonRejection>,
) -> Result<Json<ReportReply>, ApiError> {
    let request_id = request_id(&headers);
    let Json(body) = payload.map_err(|r| ApiError::rejected(r, request_id.clone()))?;
    let (query, answers) = body
        .validate()
        .map_err(|e| ApiError::from_domain(e, request_id.clone()))?;

    info!(
        query_len = query.len(),
        answers_len = answers.len(),
        "generating report"
    );
    let reply = state
        .consultation
        .generate_report(query, answers)
        .await
        .map_err(|e| ApiError::from_domain(e, request_id))?;

    info!(
        report_len = reply.report.len(),
        "successfully generated legal report"
    );
    Ok(Json(reply))
}
