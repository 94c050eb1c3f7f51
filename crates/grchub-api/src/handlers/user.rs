//! User handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use grchub_core::error::AppError;
use grchub_core::types::UserId;
use grchub_entity::user::CreateUser;

use crate::dto::request::{CreateUserRequest, PermissionQuery, UpdateUserRequest};
use crate::dto::response::{
    ApiResponse, PaginatedResponse, PermissionCheckResponse, UserGroupsResponse, UserResponse,
};
use crate::error::ApiResult;
use crate::extractors::{Caller, IdPath, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Json<ApiResponse<PaginatedResponse<UserResponse>>> {
    let page = state.iam.list_users(&params.into_page_request()).await;
    Json(ApiResponse::ok(PaginatedResponse::from_page(
        page,
        UserResponse::from,
    )))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    caller: Caller,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    let user = state
        .iam
        .create_user(
            &caller,
            CreateUser {
                email: req.email,
                first_name: req.first_name,
                last_name: req.last_name,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user.into()))))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    IdPath(id): IdPath<UserId>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = state.iam.get_user(id).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// PATCH /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    caller: Caller,
    IdPath(id): IdPath<UserId>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let user = match req.is_active {
        Some(active) => state.iam.set_user_active(&caller, id, active).await?,
        None => state.iam.get_user(id).await?,
    };
    Ok(Json(ApiResponse::ok(user.into())))
}

/// GET /api/users/{id}/groups
pub async fn list_user_groups(
    State(state): State<AppState>,
    IdPath(id): IdPath<UserId>,
) -> ApiResult<Json<ApiResponse<UserGroupsResponse>>> {
    let user_groups = state.iam.user_groups(id).await?;
    Ok(Json(ApiResponse::ok(UserGroupsResponse {
        user_id: id,
        user_groups,
    })))
}

/// GET /api/users/{id}/permissions?permission=...&folder=...
///
/// With `folder`, answers whether the user holds the permission there;
/// without it, lists every folder the permission covers.
pub async fn check_permission(
    State(state): State<AppState>,
    IdPath(id): IdPath<UserId>,
    Query(query): Query<PermissionQuery>,
) -> ApiResult<Json<ApiResponse<PermissionCheckResponse>>> {
    let permission = query.permission.trim().to_string();
    if permission.is_empty() {
        return Err(AppError::validation("permission is required").into());
    }

    let response = match query.folder {
        Some(folder) => {
            let allowed = state.iam.has_permission(id, &permission, folder).await?;
            PermissionCheckResponse {
                user_id: id,
                permission,
                folder: Some(folder),
                allowed: Some(allowed),
                folders: None,
            }
        }
        None => {
            let folders = state.iam.permitted_folders(id, &permission).await?;
            PermissionCheckResponse {
                user_id: id,
                permission,
                folder: None,
                allowed: None,
                folders: Some(folders.into_iter().collect()),
            }
        }
    };
    Ok(Json(ApiResponse::ok(response)))
}
