//! Integration tests for the folder hierarchy endpoints.

use std::collections::BTreeSet;

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

/// Root R with chain A -> B -> C.
async fn chain(app: &TestApp) -> (String, String, String, String) {
    let root = app.root_id().await;
    let a = app.create_folder("A", Some(&root)).await;
    let b = app.create_folder("B", Some(&a)).await;
    let c = app.create_folder("C", Some(&b)).await;
    (root, a, b, c)
}

#[tokio::test]
async fn test_create_without_parent_lands_under_root() {
    let app = TestApp::new().await;
    let root = app.root_id().await;

    let response = app
        .request("POST", "/api/folders", Some(json!({ "name": "Finance" })))
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["parent_id"], root.as_str());
    assert_eq!(response.body["data"]["is_root"], false);
}

#[tokio::test]
async fn test_create_rejects_empty_name() {
    let app = TestApp::new().await;

    let response = app
        .request("POST", "/api/folders", Some(json!({ "name": "" })))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_under_unknown_parent_is_404() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "name": "Orphan", "parent_id": uuid::Uuid::new_v4() })),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_descendants_and_ancestors() {
    let app = TestApp::new().await;
    let (root, a, b, c) = chain(&app).await;

    let response = app
        .request("GET", &format!("/api/folders/{a}/descendants"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let found: BTreeSet<String> = response.ids().into_iter().collect();
    assert_eq!(found, BTreeSet::from([b.clone(), c.clone()]));

    let response = app
        .request("GET", &format!("/api/folders/{c}/ancestors"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.ids(), vec![b, a, root.clone()]);

    let response = app
        .request("GET", &format!("/api/folders/{root}/ancestors"), None)
        .await;
    assert_eq!(response.ids(), Vec::<String>::new());
}

#[tokio::test]
async fn test_move_under_own_descendant_is_rejected() {
    let app = TestApp::new().await;
    let (root, a, _b, c) = chain(&app).await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/folders/{a}"),
            Some(json!({ "parent_id": c })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "errorFolderGraphMustNotContainCycles");

    let response = app.request("GET", &format!("/api/folders/{a}"), None).await;
    assert_eq!(response.body["data"]["parent_id"], root.as_str());
}

#[tokio::test]
async fn test_move_under_itself_is_rejected() {
    let app = TestApp::new().await;
    let (_root, a, _b, _c) = chain(&app).await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/folders/{a}"),
            Some(json!({ "parent_id": a })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "errorFolderGraphMustNotContainCycles");
}

#[tokio::test]
async fn test_move_subtree_updates_queries() {
    let app = TestApp::new().await;
    let (root, a, b, c) = chain(&app).await;
    let d = app.create_folder("D", Some(&root)).await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/folders/{b}"),
            Some(json!({ "parent_id": d })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["parent_id"], d.as_str());

    let response = app
        .request("GET", &format!("/api/folders/{a}/descendants"), None)
        .await;
    assert!(response.ids().is_empty());

    let response = app
        .request("GET", &format!("/api/folders/{c}/ancestors"), None)
        .await;
    assert_eq!(response.ids(), vec![b, d, root]);
}

#[tokio::test]
async fn test_move_to_current_parent_is_a_no_op() {
    let app = TestApp::new().await;
    let (_root, a, b, _c) = chain(&app).await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/folders/{b}"),
            Some(json!({ "parent_id": a })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["parent_id"], a.as_str());
}

#[tokio::test]
async fn test_root_cannot_be_moved_or_deleted() {
    let app = TestApp::new().await;
    let (root, a, _b, _c) = chain(&app).await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/folders/{root}"),
            Some(json!({ "parent_id": a })),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "errorProtectedRootFolder");

    let response = app
        .request("DELETE", &format!("/api/folders/{root}"), None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "errorProtectedRootFolder");
}

#[tokio::test]
async fn test_root_can_be_renamed() {
    let app = TestApp::new().await;
    let root = app.root_id().await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/folders/{root}"),
            Some(json!({ "name": "Company" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["name"], "Company");
    assert_eq!(response.body["data"]["is_root"], true);
}

#[tokio::test]
async fn test_delete_requires_leaf() {
    let app = TestApp::new().await;
    let (_root, a, b, c) = chain(&app).await;

    let response = app.request("DELETE", &format!("/api/folders/{a}"), None).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "errorFolderHasChildren");

    let response = app.request("DELETE", &format!("/api/folders/{c}"), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["id"], c.as_str());

    let response = app.request("GET", &format!("/api/folders/{c}"), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app.request("DELETE", &format!("/api/folders/{b}"), None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_referenced_folder_is_conflict() {
    let app = TestApp::new().await;
    let folder = app.create_folder("Audit", None).await;

    let response = app
        .request(
            "POST",
            "/api/user-groups",
            Some(json!({ "name": "Auditors", "folder_id": folder })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app
        .request("DELETE", &format!("/api/folders/{folder}"), None)
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "CONFLICT");
}

#[tokio::test]
async fn test_malformed_id_is_validation_error() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/folders/not-a-uuid", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_tree_and_breadcrumbs() {
    let app = TestApp::new().await;
    let (root, a, b, c) = chain(&app).await;

    let response = app
        .request("GET", &format!("/api/folders/{root}/tree"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let tree = &response.body["data"];
    assert_eq!(tree["depth"], 0);
    assert_eq!(tree["child_count"], 1);
    assert_eq!(tree["children"][0]["id"], a.as_str());
    assert_eq!(tree["children"][0]["children"][0]["children"][0]["id"], c.as_str());

    let response = app
        .request("GET", &format!("/api/folders/{root}/tree?max_depth=1"), None)
        .await;
    let tree = &response.body["data"];
    assert_eq!(tree["children"][0]["child_count"], 1);
    assert_eq!(tree["children"][0]["children"], json!([]));

    let response = app
        .request("GET", &format!("/api/folders/{c}/breadcrumbs"), None)
        .await;
    assert_eq!(response.ids(), vec![root, a, b, c]);
}

#[tokio::test]
async fn test_tree_depth_above_limit_is_rejected() {
    let app = TestApp::new().await;
    let root = app.root_id().await;

    let response = app
        .request("GET", &format!("/api/folders/{root}/tree?max_depth=1000"), None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_huge_page_number_returns_empty_page() {
    let app = TestApp::new().await;
    app.create_folder("One", None).await;

    let response = app
        .request("GET", &format!("/api/folders?page={}", u64::MAX), None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["items"], json!([]));
}

#[tokio::test]
async fn test_list_is_paginated() {
    let app = TestApp::new().await;
    for name in ["One", "Two", "Three"] {
        app.create_folder(name, None).await;
    }

    let response = app
        .request("GET", "/api/folders?page=1&per_page=2", None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let page = &response.body["data"];
    assert_eq!(page["total"], 4);
    assert_eq!(page["per_page"], 2);
    assert_eq!(page["total_pages"], 2);
    assert_eq!(page["items"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_health_reports_folder_count() {
    let app = TestApp::new().await;
    app.create_folder("Ops", None).await;

    let response = app.request("GET", "/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["folders"], 2);
}
