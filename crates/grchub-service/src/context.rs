//! Request context carrying the caller identity and request correlation id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use grchub_core::types::UserId;

/// Context for the current request.
///
/// Built by the API layer and passed into mutating service methods so that
/// every logged change records which request and which user caused it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Correlation id, taken from `x-request-id` or generated.
    pub request_id: String,
    /// The acting user, when the caller identified one.
    pub actor: Option<UserId>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(request_id: impl Into<String>, actor: Option<UserId>) -> Self {
        Self {
            request_id: request_id.into(),
            actor,
            request_time: Utc::now(),
        }
    }

    /// Context for work the server does on its own behalf (startup, tests).
    pub fn system() -> Self {
        Self::new("system", None)
    }
}
