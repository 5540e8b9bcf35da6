use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::analyze::{AnalysisResult, IssueAnalyzer, IssueRequest};
use crate::error::AnalysisError;

pub type ServerState = Arc<IssueAnalyzer>;

pub fn router() -> Router<ServerState> {
    Router::new().route("/analyze-issue", post(analyze_issue))
}

async fn analyze_issue(
    State(analyzer): State<ServerState>,
    payload: Result<Json<IssueRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(request) = payload?;
    info!(
        "Analyzing issue #{} of {}",
        request.issue_number, request.repo_url
    );

    let result = analyzer.analyze(&request).await?;
    Ok(Json(result))
}

/// Error body returned by the API: `{"detail": "..."}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl From<AnalysisError> for ApiError {
    fn from(error: AnalysisError) -> Self {
        let status = StatusCode::from_u16(error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            warn!("Analysis failed: {}", error);
        } else {
            info!("Analysis rejected: {}", error);
        }
        ApiError {
            status,
            detail: error.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}
