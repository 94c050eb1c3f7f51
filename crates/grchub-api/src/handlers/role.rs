//! Role handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use grchub_entity::role::{CreateRole, Role};

use crate::dto::request::CreateRoleRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{Caller, ValidatedJson};
use crate::state::AppState;

/// GET /api/roles
pub async fn list_roles(State(state): State<AppState>) -> Json<ApiResponse<Vec<Role>>> {
    Json(ApiResponse::ok(state.iam.list_roles().await))
}

/// POST /api/roles
pub async fn create_role(
    State(state): State<AppState>,
    caller: Caller,
    ValidatedJson(req): ValidatedJson<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Role>>)> {
    let role = state
        .iam
        .create_role(
            &caller,
            CreateRole {
                name: req.name,
                description: req.description,
                permissions: req.permissions,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(role))))
}
