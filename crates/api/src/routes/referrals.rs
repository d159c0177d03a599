//! Referral code validation and usage recording routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use crate::routes::points::{
    app_error_response, internal_error_response, points_rejection_response,
};
use kiloan_db::ReferralRepository;
use kiloan_db::repositories::ReferralError;
use kiloan_shared::AppError;

/// Creates the referral routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/referrals/validate", post(validate_referral))
        .route("/referrals/usages", post(record_usage))
}

/// Request body for referral code validation.
#[derive(Debug, Deserialize)]
pub struct ValidateReferralRequest {
    /// The referral code entered by the customer.
    pub code: String,
    /// The customer attempting to use the code.
    pub customer_id: Uuid,
}

/// Request body for recording a referral usage.
#[derive(Debug, Deserialize)]
pub struct RecordUsageRequest {
    /// The referral code applied to the order.
    pub code: String,
    /// The referred customer who placed the order.
    pub customer_id: Uuid,
    /// Invoice id of the completed order.
    pub order_invoice_id: String,
}

/// POST `/referrals/validate` - Dry-run referral code check.
///
/// Rejections are expected outcomes, so they come back as `200` with
/// `valid: false` and a machine-readable reason rather than an error status.
async fn validate_referral(
    State(state): State<AppState>,
    Json(payload): Json<ValidateReferralRequest>,
) -> impl IntoResponse {
    let repo = ReferralRepository::new((*state.db).clone());

    match repo
        .validate_referral_code(&payload.code, payload.customer_id)
        .await
    {
        Ok(approval) => (
            StatusCode::OK,
            Json(json!({
                "valid": true,
                "referrer_customer_id": approval.referrer_customer_id,
                "discount_amount": approval.discount_amount,
                "points_awarded": approval.points_awarded,
            })),
        )
            .into_response(),
        Err(ReferralError::Rejected(rejection)) => (
            StatusCode::OK,
            Json(json!({
                "valid": false,
                "reason": rejection.reason(),
                "message": rejection.to_string(),
            })),
        )
            .into_response(),
        Err(e) => {
            error!(customer_id = %payload.customer_id, error = %e, "Referral validation failed");
            internal_error_response()
        }
    }
}

/// POST `/referrals/usages` - Record a referral usage for a completed order
/// and credit the referrer.
async fn record_usage(
    State(state): State<AppState>,
    Json(payload): Json<RecordUsageRequest>,
) -> impl IntoResponse {
    let repo = ReferralRepository::new((*state.db).clone());

    match repo
        .record_referral_usage(&payload.code, payload.customer_id, &payload.order_invoice_id)
        .await
    {
        Ok(recorded) => {
            info!(
                referrer = %recorded.usage.referrer_customer_id,
                referred = %payload.customer_id,
                order = %payload.order_invoice_id,
                points = recorded.points_awarded,
                "Referral usage recorded"
            );
            (
                StatusCode::CREATED,
                Json(json!({
                    "usage": recorded.usage,
                    "points_awarded": recorded.points_awarded,
                    "referrer_balance": recorded.referrer_balance,
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(
                customer_id = %payload.customer_id,
                order = %payload.order_invoice_id,
                error = %e,
                "Failed to record referral usage"
            );
            referral_error_response(&e)
        }
    }
}

/// Maps a referral repository error onto the API error envelope.
pub(crate) fn referral_error_response(e: &ReferralError) -> axum::response::Response {
    match e {
        ReferralError::Rejected(rejection) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": rejection.reason(),
                "message": rejection.to_string(),
            })),
        )
            .into_response(),
        ReferralError::AlreadyRecorded(order) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "already_recorded",
                "message": format!("Referral already recorded for order {order}")
            })),
        )
            .into_response(),
        ReferralError::Points(points) => points_rejection_response(points),
        ReferralError::CustomerNotFound(id) => {
            app_error_response(&AppError::NotFound(format!("Customer '{id}'")))
        }
        ReferralError::Database(_) => internal_error_response(),
    }
}
