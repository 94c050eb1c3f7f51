//! Folder CRUD and tree handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use grchub_core::types::FolderId;
use grchub_entity::folder::{CreateFolder, Folder, FolderNode};
use grchub_service::UpdateFolder;

use crate::dto::request::{CreateFolderRequest, TreeQuery, UpdateFolderRequest};
use crate::dto::response::{ApiResponse, PaginatedResponse};
use crate::error::ApiResult;
use crate::extractors::{Caller, IdPath, PaginationParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/folders
pub async fn list_folders(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Json<ApiResponse<PaginatedResponse<Folder>>> {
    let page = state
        .folder_service
        .list(&params.into_page_request())
        .await;
    Json(ApiResponse::ok(page.into()))
}

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    caller: Caller,
    ValidatedJson(req): ValidatedJson<CreateFolderRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Folder>>)> {
    let folder = state
        .folder_service
        .create(
            &caller,
            CreateFolder {
                name: req.name,
                description: req.description,
                parent_id: req.parent_id,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(folder))))
}

/// GET /api/folders/{id}
pub async fn get_folder(
    State(state): State<AppState>,
    IdPath(id): IdPath<FolderId>,
) -> ApiResult<Json<ApiResponse<Folder>>> {
    let folder = state.folder_service.get(id).await?;
    Ok(Json(ApiResponse::ok(folder)))
}

/// PATCH /api/folders/{id}
pub async fn update_folder(
    State(state): State<AppState>,
    caller: Caller,
    IdPath(id): IdPath<FolderId>,
    ValidatedJson(req): ValidatedJson<UpdateFolderRequest>,
) -> ApiResult<Json<ApiResponse<Folder>>> {
    let folder = state
        .folder_service
        .update(
            &caller,
            id,
            UpdateFolder {
                name: req.name,
                description: req.description,
                parent_id: req.parent_id,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(folder)))
}

/// DELETE /api/folders/{id}
pub async fn delete_folder(
    State(state): State<AppState>,
    caller: Caller,
    IdPath(id): IdPath<FolderId>,
) -> ApiResult<Json<ApiResponse<Folder>>> {
    let removed = state.folder_service.delete(&caller, id).await?;
    Ok(Json(ApiResponse::ok(removed)))
}

/// GET /api/folders/{id}/children
pub async fn list_children(
    State(state): State<AppState>,
    IdPath(id): IdPath<FolderId>,
) -> ApiResult<Json<ApiResponse<Vec<Folder>>>> {
    let children = state.folder_service.children(id).await?;
    Ok(Json(ApiResponse::ok(children)))
}

/// GET /api/folders/{id}/descendants
pub async fn list_descendants(
    State(state): State<AppState>,
    IdPath(id): IdPath<FolderId>,
) -> ApiResult<Json<ApiResponse<Vec<Folder>>>> {
    let folders = state.folder_service.descendants(id).await?;
    Ok(Json(ApiResponse::ok(folders)))
}

/// GET /api/folders/{id}/ancestors
pub async fn list_ancestors(
    State(state): State<AppState>,
    IdPath(id): IdPath<FolderId>,
) -> ApiResult<Json<ApiResponse<Vec<Folder>>>> {
    let folders = state.folder_service.ancestors(id).await?;
    Ok(Json(ApiResponse::ok(folders)))
}

/// GET /api/folders/{id}/tree
pub async fn get_tree(
    State(state): State<AppState>,
    IdPath(id): IdPath<FolderId>,
    Query(query): Query<TreeQuery>,
) -> ApiResult<Json<ApiResponse<FolderNode>>> {
    let tree = state.tree_service.get_tree(id, query.max_depth).await?;
    Ok(Json(ApiResponse::ok(tree)))
}

/// GET /api/folders/{id}/breadcrumbs
pub async fn get_breadcrumbs(
    State(state): State<AppState>,
    IdPath(id): IdPath<FolderId>,
) -> ApiResult<Json<ApiResponse<Vec<Folder>>>> {
    let path = state.tree_service.get_breadcrumbs(id).await?;
    Ok(Json(ApiResponse::ok(path)))
}
