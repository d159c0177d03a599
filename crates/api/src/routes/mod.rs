//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod health;
pub mod points;
pub mod redemptions;
pub mod referrals;
pub mod settings;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(points::routes())
        .merge(referrals::routes())
        .merge(redemptions::routes())
        .merge(settings::routes())
}
