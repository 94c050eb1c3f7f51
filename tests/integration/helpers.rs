//! Shared test helpers for integration tests.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use grchub_api::{AppState, build_app, build_state};
use grchub_core::config::AppConfig;
use grchub_database::Repositories;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for assertions that bypass HTTP
    pub state: AppState,
}

impl TestApp {
    /// Unlimited seats.
    pub async fn new() -> Self {
        Self::with_config(AppConfig::default()).await
    }

    /// Seat cap enforced at `seats`.
    pub async fn with_seats(seats: u32) -> Self {
        let mut config = AppConfig::default();
        config.license.enabled = true;
        config.license.seats = seats;
        Self::with_config(config).await
    }

    async fn with_config(config: AppConfig) -> Self {
        let state = build_state(config, Repositories::memory())
            .await
            .expect("Failed to build state");
        Self {
            router: build_app(state.clone()),
            state,
        }
    }

    /// Id of the root folder.
    pub async fn root_id(&self) -> String {
        self.state.hierarchy.root().await.id.to_string()
    }

    /// Create a folder and return its id.
    pub async fn create_folder(&self, name: &str, parent: Option<&str>) -> String {
        let response = self
            .request(
                "POST",
                "/api/folders",
                Some(json!({ "name": name, "parent_id": parent })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.id()
    }

    /// Create a user and return its id.
    pub async fn create_user(&self, email: &str) -> String {
        let response = self
            .request("POST", "/api/users", Some(json!({ "email": email })))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.id()
    }

    /// Create a role and return its id.
    pub async fn create_role(&self, name: &str, permissions: &[&str]) -> String {
        let response = self
            .request(
                "POST",
                "/api/roles",
                Some(json!({ "name": name, "permissions": permissions })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.id()
    }

    /// Grant `role` to `user` on `folder`.
    pub async fn assign_to_user(
        &self,
        role: &str,
        user: &str,
        folder: &str,
        is_recursive: bool,
    ) -> TestResponse {
        self.request(
            "POST",
            "/api/role-assignments",
            Some(json!({
                "role_id": role,
                "user_id": user,
                "folder_id": folder,
                "is_recursive": is_recursive,
            })),
        )
        .await
    }

    /// Send a JSON request through the router.
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// `data.id` of a success envelope.
    pub fn id(&self) -> String {
        self.body["data"]["id"]
            .as_str()
            .expect("response has no data.id")
            .to_string()
    }

    /// `error` code of an error body.
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }

    /// Ids of the objects in a `data` array.
    pub fn ids(&self) -> Vec<String> {
        self.body["data"]
            .as_array()
            .expect("data is not an array")
            .iter()
            .filter_map(|item| item["id"].as_str().map(str::to_string))
            .collect()
    }
}
