//! License seat handlers.

use axum::Json;
use axum::extract::State;

use grchub_auth::seat::SeatStatus;

use crate::dto::response::{ApiResponse, UserResponse};
use crate::state::AppState;

/// GET /api/license/seats
pub async fn seat_status(State(state): State<AppState>) -> Json<ApiResponse<SeatStatus>> {
    Json(ApiResponse::ok(state.iam.seat_status().await))
}

/// GET /api/license/editors
pub async fn list_editors(State(state): State<AppState>) -> Json<ApiResponse<Vec<UserResponse>>> {
    let editors = state.iam.editors().await;
    Json(ApiResponse::ok(
        editors.into_iter().map(UserResponse::from).collect(),
    ))
}
