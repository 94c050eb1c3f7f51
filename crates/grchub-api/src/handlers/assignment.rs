//! Role assignment handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use grchub_core::error::AppError;
use grchub_core::types::RoleAssignmentId;
use grchub_entity::role::{CreateRoleAssignment, Principal, RoleAssignment};

use crate::dto::request::{AssignmentQuery, CreateAssignmentRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{Caller, IdPath, ValidatedJson};
use crate::state::AppState;

/// GET /api/role-assignments?folder=...
pub async fn list_assignments(
    State(state): State<AppState>,
    Query(query): Query<AssignmentQuery>,
) -> Json<ApiResponse<Vec<RoleAssignment>>> {
    Json(ApiResponse::ok(
        state.iam.list_assignments(query.folder).await,
    ))
}

/// POST /api/role-assignments
pub async fn create_assignment(
    State(state): State<AppState>,
    caller: Caller,
    ValidatedJson(req): ValidatedJson<CreateAssignmentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<RoleAssignment>>)> {
    let principal = match (req.user_id, req.user_group_id) {
        (Some(user), None) => Principal::User(user),
        (None, Some(group)) => Principal::Group(group),
        _ => {
            return Err(AppError::validation(
                "Exactly one of user_id and user_group_id is required",
            )
            .into());
        }
    };

    let assignment = state
        .iam
        .assign_role(
            &caller,
            CreateRoleAssignment {
                role_id: req.role_id,
                principal,
                folder_id: req.folder_id,
                is_recursive: req.is_recursive,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(assignment))))
}

/// DELETE /api/role-assignments/{id}
pub async fn revoke_assignment(
    State(state): State<AppState>,
    caller: Caller,
    IdPath(id): IdPath<RoleAssignmentId>,
) -> ApiResult<Json<ApiResponse<RoleAssignment>>> {
    let revoked = state.iam.revoke_assignment(&caller, id).await?;
    Ok(Json(ApiResponse::ok(revoked)))
}
