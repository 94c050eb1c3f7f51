//! Route definitions for the GRC Hub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    routing::{delete, get},
};

use crate::handlers;
use crate::state::AppState;

/// Build the API router without the middleware stack.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(folder_routes())
        .merge(user_routes())
        .merge(role_routes())
        .merge(group_routes())
        .merge(assignment_routes())
        .merge(license_routes())
        .merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Folder CRUD, hierarchy queries, and tree views
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/folders",
            get(handlers::folder::list_folders).post(handlers::folder::create_folder),
        )
        .route(
            "/folders/{id}",
            get(handlers::folder::get_folder)
                .patch(handlers::folder::update_folder)
                .delete(handlers::folder::delete_folder),
        )
        .route(
            "/folders/{id}/children",
            get(handlers::folder::list_children),
        )
        .route(
            "/folders/{id}/descendants",
            get(handlers::folder::list_descendants),
        )
        .route(
            "/folders/{id}/ancestors",
            get(handlers::folder::list_ancestors),
        )
        .route("/folders/{id}/tree", get(handlers::folder::get_tree))
        .route(
            "/folders/{id}/breadcrumbs",
            get(handlers::folder::get_breadcrumbs),
        )
}

/// User management and permission checks
fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            get(handlers::user::list_users).post(handlers::user::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::user::get_user).patch(handlers::user::update_user),
        )
        .route("/users/{id}/groups", get(handlers::user::list_user_groups))
        .route(
            "/users/{id}/permissions",
            get(handlers::user::check_permission),
        )
}

/// Role definitions
fn role_routes() -> Router<AppState> {
    Router::new().route(
        "/roles",
        get(handlers::role::list_roles).post(handlers::role::create_role),
    )
}

/// User groups and membership
fn group_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/user-groups",
            get(handlers::group::list_groups).post(handlers::group::create_group),
        )
        .route(
            "/user-groups/{id}/members",
            get(handlers::group::list_members).post(handlers::group::add_member),
        )
        .route(
            "/user-groups/{id}/members/{user_id}",
            delete(handlers::group::remove_member),
        )
}

/// Role grants
fn assignment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/role-assignments",
            get(handlers::assignment::list_assignments)
                .post(handlers::assignment::create_assignment),
        )
        .route(
            "/role-assignments/{id}",
            delete(handlers::assignment::revoke_assignment),
        )
}

/// License seat usage
fn license_routes() -> Router<AppState> {
    Router::new()
        .route("/license/seats", get(handlers::license::seat_status))
        .route("/license/editors", get(handlers::license::list_editors))
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
