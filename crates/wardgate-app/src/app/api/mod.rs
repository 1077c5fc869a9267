mod auth;
mod capabilities;
mod session;

use salvo::Router;
use serde::Serialize;

use wardgate_core::util::validation::LoginField;

use wardgate_core::constants::API_ROUTE_COMPONENT;

/// ## Summary
/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Form field the error refers to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            field: None,
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: LoginField) -> Self {
        self.field = Some(field.as_str());
        self
    }
}

/// ## Summary
/// Constructs the JSON API router.
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .push(auth::routes())
        .push(session::routes())
        .push(capabilities::routes())
}
