//! Points balance and transaction log routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use kiloan_core::points::PointsError;
use kiloan_db::PointsRepository;
use kiloan_db::repositories::PointsRepoError;
use kiloan_shared::AppError;
use kiloan_shared::types::PageRequest;

/// Creates the points routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers/{customer_id}/points", get(get_balance))
        .route(
            "/customers/{customer_id}/points/transactions",
            get(list_transactions),
        )
        .route("/customers/{customer_id}/points/adjust", post(adjust_points))
}

/// Request body for a manual points adjustment.
#[derive(Debug, Deserialize)]
pub struct AdjustPointsRequest {
    /// Signed delta to apply. Zero is rejected.
    pub delta: i64,
    /// Optional reason recorded on the log entry.
    pub description: Option<String>,
}

/// GET `/customers/{customer_id}/points` - Current balance.
///
/// Never fails: an unknown customer or a storage outage reads as the
/// zero-valued default.
async fn get_balance(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PointsRepository::new((*state.db).clone());
    let balance = repo.get_balance(customer_id).await;

    (
        StatusCode::OK,
        Json(json!({
            "customer_id": customer_id,
            "current_balance": balance.current_balance,
            "total_earned": balance.total_earned,
            "total_redeemed": balance.total_redeemed,
        })),
    )
}

/// GET `/customers/{customer_id}/points/transactions` - Transaction log,
/// newest first.
async fn list_transactions(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Query(page): Query<PageRequest>,
) -> impl IntoResponse {
    let repo = PointsRepository::new((*state.db).clone());

    match repo.list_transactions(customer_id, &page).await {
        Ok(log) => (StatusCode::OK, Json(json!(log))).into_response(),
        Err(e) => {
            error!(customer_id = %customer_id, error = %e, "Failed to list transactions");
            points_error_response(&e)
        }
    }
}

/// POST `/customers/{customer_id}/points/adjust` - Manual adjustment.
async fn adjust_points(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Json(payload): Json<AdjustPointsRequest>,
) -> impl IntoResponse {
    let repo = PointsRepository::new((*state.db).clone());

    match repo
        .adjust(customer_id, payload.delta, payload.description)
        .await
    {
        Ok(applied) => {
            info!(
                customer_id = %customer_id,
                delta = payload.delta,
                balance = applied.balance.current_balance,
                "Points adjusted"
            );
            (
                StatusCode::OK,
                Json(json!({
                    "customer_id": customer_id,
                    "current_balance": applied.balance.current_balance,
                    "total_earned": applied.balance.total_earned,
                    "total_redeemed": applied.balance.total_redeemed,
                    "transaction": applied.entry,
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(customer_id = %customer_id, error = %e, "Failed to adjust points");
            points_error_response(&e)
        }
    }
}

/// Maps a points repository error onto the API error envelope.
pub(crate) fn points_error_response(e: &PointsRepoError) -> axum::response::Response {
    match e {
        PointsRepoError::Points(points) => points_rejection_response(points),
        PointsRepoError::CustomerNotFound(id) => {
            app_error_response(&AppError::NotFound(format!("Customer '{id}'")))
        }
        PointsRepoError::Database(_) => internal_error_response(),
    }
}

/// Maps a domain-level points rejection onto the API error envelope.
pub(crate) fn points_rejection_response(e: &PointsError) -> axum::response::Response {
    let status = match e {
        PointsError::InvalidAmount => StatusCode::BAD_REQUEST,
        PointsError::InsufficientBalance { .. } | PointsError::BelowMinimum { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    };
    (
        status,
        Json(json!({
            "error": e.error_code().to_lowercase(),
            "message": e.to_string(),
        })),
    )
        .into_response()
}

pub(crate) fn internal_error_response() -> axum::response::Response {
    app_error_response(&AppError::Internal("An error occurred".to_string()))
}

/// Renders a shared application error as the standard envelope.
pub(crate) fn app_error_response(e: &AppError) -> axum::response::Response {
    let status =
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": e.error_code().to_lowercase(),
            "message": e.to_string(),
        })),
    )
        .into_response()
}
