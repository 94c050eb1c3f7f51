//! User group and membership handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use grchub_core::types::{UserGroupId, UserId};
use grchub_entity::group::{CreateUserGroup, UserGroup};

use crate::dto::request::{AddMemberRequest, CreateGroupRequest};
use crate::dto::response::{ApiResponse, MembershipResponse, UserResponse};
use crate::error::ApiResult;
use crate::extractors::{Caller, IdPath, ValidatedJson};
use crate::state::AppState;

/// GET /api/user-groups
pub async fn list_groups(State(state): State<AppState>) -> Json<ApiResponse<Vec<UserGroup>>> {
    Json(ApiResponse::ok(state.iam.list_groups().await))
}

/// POST /api/user-groups
pub async fn create_group(
    State(state): State<AppState>,
    caller: Caller,
    ValidatedJson(req): ValidatedJson<CreateGroupRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserGroup>>)> {
    let group = state
        .iam
        .create_group(
            &caller,
            CreateUserGroup {
                name: req.name,
                folder_id: req.folder_id,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(group))))
}

/// GET /api/user-groups/{id}/members
pub async fn list_members(
    State(state): State<AppState>,
    IdPath(id): IdPath<UserGroupId>,
) -> ApiResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let members = state.iam.group_members(id).await?;
    Ok(Json(ApiResponse::ok(
        members.into_iter().map(UserResponse::from).collect(),
    )))
}

/// POST /api/user-groups/{id}/members
///
/// Fails with `errorLicenseSeatsExceeded` when the group grants edit rights
/// and the user would need a seat that is not available.
pub async fn add_member(
    State(state): State<AppState>,
    caller: Caller,
    IdPath(id): IdPath<UserGroupId>,
    ValidatedJson(req): ValidatedJson<AddMemberRequest>,
) -> ApiResult<Json<ApiResponse<MembershipResponse>>> {
    let membership = state.iam.add_user_to_group(&caller, req.user_id, id).await?;
    Ok(Json(ApiResponse::ok(MembershipResponse {
        user_group_id: membership.user_group_id,
        user_id: membership.user_id,
        member: true,
    })))
}

/// DELETE /api/user-groups/{id}/members/{user_id}
pub async fn remove_member(
    State(state): State<AppState>,
    caller: Caller,
    IdPath((id, user_id)): IdPath<(UserGroupId, UserId)>,
) -> ApiResult<Json<ApiResponse<MembershipResponse>>> {
    state.iam.remove_user_from_group(&caller, user_id, id).await?;
    Ok(Json(ApiResponse::ok(MembershipResponse {
        user_group_id: id,
        user_id,
        member: false,
    })))
}
