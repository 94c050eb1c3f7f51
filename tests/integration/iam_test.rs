//! Integration tests for users, groups, role grants, and editor seats.

use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::helpers::TestApp;

/// `allowed` flag of a `view_asset` check on `folder`.
async fn allowed(app: &TestApp, user: &str, folder: &str) -> Value {
    let path = format!("/api/users/{user}/permissions?permission=view_asset&folder={folder}");
    app.request("GET", &path, None).await.body["data"]["allowed"].clone()
}

#[tokio::test]
async fn test_seat_cap_blocks_third_editor_but_not_viewer() {
    let app = TestApp::with_seats(2).await;
    let root = app.root_id().await;
    let editor = app.create_role("Editor", &["change_asset", "view_asset"]).await;
    let viewer = app.create_role("Viewer", &["view_asset"]).await;
    let u1 = app.create_user("u1@example.com").await;
    let u2 = app.create_user("u2@example.com").await;
    let u3 = app.create_user("u3@example.com").await;

    for user in [&u1, &u2] {
        let response = app.assign_to_user(&editor, user, &root, true).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    }

    let response = app.assign_to_user(&editor, &u3, &root, true).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "errorLicenseSeatsExceeded");

    let response = app.assign_to_user(&viewer, &u3, &root, true).await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app.request("GET", "/api/license/seats", None).await;
    assert_eq!(response.body["data"]["enforced"], true);
    assert_eq!(response.body["data"]["total_seats"], 2);
    assert_eq!(response.body["data"]["used_seats"], 2);
    assert_eq!(response.body["data"]["available_seats"], 0);

    let response = app.request("GET", "/api/license/editors", None).await;
    let mut editors = response.ids();
    editors.sort();
    let mut expected = vec![u1, u2];
    expected.sort();
    assert_eq!(editors, expected);
}

#[tokio::test]
async fn test_existing_editor_takes_no_extra_seat() {
    let app = TestApp::with_seats(1).await;
    let root = app.root_id().await;
    let folder = app.create_folder("Risks", None).await;
    let editor = app.create_role("Editor", &["change_risk"]).await;
    let u1 = app.create_user("u1@example.com").await;

    let response = app.assign_to_user(&editor, &u1, &root, false).await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app.assign_to_user(&editor, &u1, &folder, false).await;
    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_revoke_frees_a_seat() {
    let app = TestApp::with_seats(1).await;
    let root = app.root_id().await;
    let editor = app.create_role("Editor", &["delete_control"]).await;
    let u1 = app.create_user("u1@example.com").await;
    let u2 = app.create_user("u2@example.com").await;

    let granted = app.assign_to_user(&editor, &u1, &root, true).await;
    assert_eq!(granted.status, StatusCode::CREATED);
    let response = app.assign_to_user(&editor, &u2, &root, true).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "DELETE",
            &format!("/api/role-assignments/{}", granted.id()),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.assign_to_user(&editor, &u2, &root, true).await;
    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_group_grant_counts_every_new_member() {
    let app = TestApp::with_seats(2).await;
    let root = app.root_id().await;
    let editor = app.create_role("Editor", &["add_asset"]).await;
    let u1 = app.create_user("u1@example.com").await;
    let u2 = app.create_user("u2@example.com").await;
    let u3 = app.create_user("u3@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/user-groups",
            Some(json!({ "name": "Owners", "folder_id": root })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let group = response.id();

    for user in [&u1, &u2, &u3] {
        let response = app
            .request(
                "POST",
                &format!("/api/user-groups/{group}/members"),
                Some(json!({ "user_id": user })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let response = app
        .request(
            "POST",
            "/api/role-assignments",
            Some(json!({
                "role_id": editor,
                "user_group_id": group,
                "folder_id": root,
                "is_recursive": true,
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "errorLicenseSeatsExceeded");

    let response = app
        .request("DELETE", &format!("/api/user-groups/{group}/members/{u3}"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["member"], false);

    let response = app
        .request(
            "POST",
            "/api/role-assignments",
            Some(json!({
                "role_id": editor,
                "user_group_id": group,
                "folder_id": root,
                "is_recursive": true,
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app
        .request(
            "POST",
            &format!("/api/user-groups/{group}/members"),
            Some(json!({ "user_id": u3 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "errorLicenseSeatsExceeded");
}

#[tokio::test]
async fn test_assignment_needs_exactly_one_principal() {
    let app = TestApp::new().await;
    let root = app.root_id().await;
    let role = app.create_role("Viewer", &["view_asset"]).await;

    let response = app
        .request(
            "POST",
            "/api/role-assignments",
            Some(json!({ "role_id": role, "folder_id": root })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_assignment_to_unknown_user_is_404() {
    let app = TestApp::new().await;
    let root = app.root_id().await;
    let role = app.create_role("Viewer", &["view_asset"]).await;

    let response = app
        .assign_to_user(&role, &uuid::Uuid::new_v4().to_string(), &root, false)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recursive_grant_covers_subtree() {
    let app = TestApp::new().await;
    let root = app.root_id().await;
    let a = app.create_folder("A", Some(&root)).await;
    let b = app.create_folder("B", Some(&a)).await;
    let other = app.create_folder("Other", Some(&root)).await;
    let viewer = app.create_role("Viewer", &["view_asset"]).await;
    let user = app.create_user("auditor@example.com").await;

    let response = app.assign_to_user(&viewer, &user, &a, true).await;
    assert_eq!(response.status, StatusCode::CREATED);

    assert_eq!(allowed(&app, &user, &a).await, true);
    assert_eq!(allowed(&app, &user, &b).await, true);
    assert_eq!(allowed(&app, &user, &other).await, false);
    assert_eq!(allowed(&app, &user, &root).await, false);

    let response = app
        .request(
            "GET",
            &format!("/api/users/{user}/permissions?permission=view_asset"),
            None,
        )
        .await;
    let mut folders: Vec<String> = response.body["data"]["folders"]
        .as_array()
        .expect("folders")
        .iter()
        .filter_map(|f| f.as_str().map(str::to_string))
        .collect();
    folders.sort();
    let mut expected = vec![a, b];
    expected.sort();
    assert_eq!(folders, expected);
}

#[tokio::test]
async fn test_deactivated_user_loses_permissions() {
    let app = TestApp::new().await;
    let root = app.root_id().await;
    let viewer = app.create_role("Viewer", &["view_asset"]).await;
    let user = app.create_user("leaver@example.com").await;
    app.assign_to_user(&viewer, &user, &root, true).await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/users/{user}"),
            Some(json!({ "is_active": false })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["is_active"], false);

    let response = app
        .request(
            "GET",
            &format!("/api/users/{user}/permissions?permission=view_asset&folder={root}"),
            None,
        )
        .await;
    assert_eq!(response.body["data"]["allowed"], false);
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let app = TestApp::new().await;
    app.create_user("dup@example.com").await;

    let response = app
        .request("POST", "/api/users", Some(json!({ "email": "DUP@example.com" })))
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "CONFLICT");
}

#[tokio::test]
async fn test_user_groups_are_listed() {
    let app = TestApp::new().await;
    let root = app.root_id().await;
    let user = app.create_user("member@example.com").await;
    let response = app
        .request(
            "POST",
            "/api/user-groups",
            Some(json!({ "name": "Risk team", "folder_id": root })),
        )
        .await;
    let group = response.id();
    app.request(
        "POST",
        &format!("/api/user-groups/{group}/members"),
        Some(json!({ "user_id": user })),
    )
    .await;

    let response = app
        .request("GET", &format!("/api/users/{user}/groups"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["user_groups"], json!([group]));

    let response = app
        .request("GET", &format!("/api/user-groups/{group}/members"), None)
        .await;
    assert_eq!(response.ids(), vec![user]);
}

#[tokio::test]
async fn test_invalid_permission_codename_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/roles",
            Some(json!({ "name": "Broken", "permissions": ["Edit Everything"] })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_concurrent_grants_never_oversell() {
    let app = TestApp::with_seats(3).await;
    let root = app.root_id().await;
    let editor = app.create_role("Editor", &["change_asset"]).await;
    let mut users = Vec::new();
    for i in 0..8 {
        users.push(app.create_user(&format!("u{i}@example.com")).await);
    }

    let responses = futures::future::join_all(
        users
            .iter()
            .map(|user| app.assign_to_user(&editor, user, &root, true)),
    )
    .await;

    let granted = responses
        .iter()
        .filter(|r| r.status == StatusCode::CREATED)
        .count();
    let rejected = responses
        .iter()
        .filter(|r| r.error_code() == "errorLicenseSeatsExceeded")
        .count();
    assert_eq!(granted, 3);
    assert_eq!(rejected, 5);

    let response = app.request("GET", "/api/license/seats", None).await;
    assert_eq!(response.body["data"]["used_seats"], 3);
}
