//! Points redemption routes.

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
use crate::routes::points::internal_error_response;
use crate::routes::referrals::referral_error_response;
use kiloan_db::ReferralRepository;
use kiloan_db::repositories::ReferralError;

/// Creates the redemption routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/points/redemptions/validate", post(validate_redemption))
        .route("/points/redemptions", post(redeem_points))
}

/// Request body for redemption validation and execution.
#[derive(Debug, Deserialize)]
pub struct ValidateRedemptionRequest {
    /// The customer redeeming points.
    pub customer_id: Uuid,
    /// Points the customer wants to redeem.
    pub points_to_redeem: i64,
}

/// Request body for deducting redeemed points.
#[derive(Debug, Deserialize)]
pub struct RedeemPointsRequest {
    /// The customer redeeming points.
    pub customer_id: Uuid,
    /// Points to deduct.
    pub points_to_redeem: i64,
    /// Invoice id of the order the discount applies to.
    pub order_invoice_id: String,
}

/// POST `/points/redemptions/validate` - Quote a redemption without
/// debiting anything.
///
/// Like referral validation, rule failures are expected outcomes and come
/// back as `200` with `valid: false`.
async fn validate_redemption(
    State(state): State<AppState>,
    Json(payload): Json<ValidateRedemptionRequest>,
) -> impl IntoResponse {
    let repo = ReferralRepository::new((*state.db).clone());

    match repo
        .validate_points_redemption(payload.customer_id, payload.points_to_redeem)
        .await
    {
        Ok(quote) => (
            StatusCode::OK,
            Json(json!({
                "valid": true,
                "points_to_redeem": quote.points_to_redeem,
                "discount_value": quote.discount_value,
                "max_redeemable": quote.max_redeemable,
            })),
        )
            .into_response(),
        Err(ReferralError::Points(points)) => (
            StatusCode::OK,
            Json(json!({
                "valid": false,
                "reason": points.error_code().to_lowercase(),
                "message": points.to_string(),
            })),
        )
            .into_response(),
        Err(e) => {
            error!(customer_id = %payload.customer_id, error = %e, "Redemption validation failed");
            internal_error_response()
        }
    }
}

/// POST `/points/redemptions` - Deduct points spent as an order discount.
async fn redeem_points(
    State(state): State<AppState>,
    Json(payload): Json<RedeemPointsRequest>,
) -> impl IntoResponse {
    let repo = ReferralRepository::new((*state.db).clone());

    match repo
        .deduct_points(
            payload.customer_id,
            payload.points_to_redeem,
            &payload.order_invoice_id,
        )
        .await
    {
        Ok(mutation) => {
            info!(
                customer_id = %payload.customer_id,
                order = %payload.order_invoice_id,
                points = payload.points_to_redeem,
                balance = mutation.balance.current_balance,
                "Points redeemed"
            );
            (
                StatusCode::OK,
                Json(json!({
                    "customer_id": payload.customer_id,
                    "current_balance": mutation.balance.current_balance,
                    "total_redeemed": mutation.balance.total_redeemed,
                    "transaction": mutation.entry,
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(
                customer_id = %payload.customer_id,
                order = %payload.order_invoice_id,
                error = %e,
                "Failed to redeem points"
            );
            referral_error_response(&e)
        }
    }
}
