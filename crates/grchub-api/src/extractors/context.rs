//! `Caller` extractor: builds the request context from request headers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use grchub_core::error::AppError;
use grchub_core::types::UserId;
use grchub_service::context::RequestContext;

use crate::error::ApiError;

/// Header carrying the correlation id, set by the request-id middleware.
pub const REQUEST_ID_HEADER: &str = "x-request-id";
/// Header identifying the acting user.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Request context available in handlers.
#[derive(Debug, Clone)]
pub struct Caller(pub RequestContext);

impl std::ops::Deref for Caller {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let request_id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let actor = match parts.headers.get(ACTOR_HEADER) {
            Some(value) => {
                let raw = value
                    .to_str()
                    .map_err(|_| AppError::validation("Invalid x-actor-id header"))?;
                Some(
                    raw.parse::<UserId>()
                        .map_err(|_| AppError::validation(format!("Invalid x-actor-id: {raw}")))?,
                )
            }
            None => None,
        };

        Ok(Self(RequestContext::new(request_id, actor)))
    }
}
