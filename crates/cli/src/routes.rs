//! HTTP API routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use slotwatch_rewards::{BlockStatus, QueryError, RewardReport, SlotService};
use slotwatch_telemetry::Metrics;
use slotwatch_transport::CancelToken;
use tower_http::cors::CorsLayer;
use tracing::error;

#[derive(Clone)]
struct AppState {
    service: SlotService,
    metrics: Metrics,
}

/// Body of a successful `/blockreward` response.
#[derive(Debug, Serialize)]
pub struct RewardResponse {
    reward: String,
    status: BlockStatus,
}

impl From<&RewardReport> for RewardResponse {
    fn from(report: &RewardReport) -> Self {
        Self {
            reward: report.reward_gwei(),
            status: report.reward.status,
        }
    }
}

/// Maps query failures to status codes; internal failures get an empty 500.
struct ApiError(QueryError);

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            QueryError::SlotMissing => StatusCode::NOT_FOUND,
            QueryError::FutureSlot => StatusCode::BAD_REQUEST,
            other => {
                error!("Slot query failed: {}", other);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Build the API router.
pub fn router(service: SlotService, metrics: Metrics) -> Router {
    Router::new()
        .route("/blockreward/:slot_id", get(block_reward))
        .route("/syncduties/:slot_id", get(sync_duties))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(|| async { "ok" }))
        .layer(CorsLayer::permissive())
        .with_state(AppState { service, metrics })
}

// Axum drops the handler future when the client goes away, which abandons any
// pending limiter wait along with it.
async fn block_reward(
    State(state): State<AppState>,
    Path(slot_id): Path<String>,
) -> Result<Json<RewardResponse>, ApiError> {
    let report = state
        .service
        .block_reward(&slot_id, &CancelToken::new())
        .await?;
    Ok(Json(RewardResponse::from(&report)))
}

async fn sync_duties(
    State(state): State<AppState>,
    Path(slot_id): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let pubkeys = state
        .service
        .sync_duties(&slot_id, &CancelToken::new())
        .await?;
    Ok(Json(pubkeys))
}

async fn metrics_handler(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    match state.metrics.gather() {
        Ok(body) => Ok((StatusCode::OK, body)),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}
