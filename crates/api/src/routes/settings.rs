//! Referral program settings routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use crate::routes::points::internal_error_response;
use kiloan_db::SettingsRepository;
use kiloan_db::repositories::UpdateSettingsInput;

/// Creates the settings routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/referral-settings",
        get(get_settings).put(update_settings),
    )
}

/// Request body for a partial settings update. Omitted fields keep their
/// current values.
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    /// Currency discount granted to the referred customer.
    pub referral_discount_amount: Option<Decimal>,
    /// Points credited to the referrer per referral.
    pub referrer_points_earned: Option<i64>,
    /// Minimum balance required before redemption.
    pub points_redemption_minimum: Option<i64>,
    /// Currency value of one point.
    pub points_redemption_value: Option<Decimal>,
}

/// GET `/referral-settings` - The active program parameters, falling back
/// to the defaults when no row is active or the lookup fails.
async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    let repo = SettingsRepository::new((*state.db).clone());
    let settings = repo.get_settings().await;

    (StatusCode::OK, Json(json!(settings)))
}

/// PUT `/referral-settings` - Update the active program parameters.
async fn update_settings(
    State(state): State<AppState>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> impl IntoResponse {
    let repo = SettingsRepository::new((*state.db).clone());

    let input = UpdateSettingsInput {
        referral_discount_amount: payload.referral_discount_amount,
        referrer_points_earned: payload.referrer_points_earned,
        points_redemption_minimum: payload.points_redemption_minimum,
        points_redemption_value: payload.points_redemption_value,
    };

    match repo.update_settings(input).await {
        Ok(row) => {
            info!(settings_id = %row.id, "Referral settings updated");
            (StatusCode::OK, Json(json!(row))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to update referral settings");
            internal_error_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use sea_orm::DatabaseConnection;
    use tower::ServiceExt;

    use crate::{AppState, create_router};

    // The settings read must answer with the defaults even when the
    // database is unreachable, never with a 500.
    #[tokio::test]
    async fn test_get_settings_degrades_without_storage() {
        let state = AppState {
            db: Arc::new(DatabaseConnection::default()),
        };
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/referral-settings")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["referrer_points_earned"], 10);
        assert_eq!(json["points_redemption_minimum"], 50);
    }
}
