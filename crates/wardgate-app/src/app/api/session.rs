use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};
use serde::Serialize;

use super::ErrorResponse;
use crate::cookies::client_session;
use crate::state::get_state_from_depot;
use wardgate_core::{Identity, Lifecycle};

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub lifecycle: Lifecycle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
}

/// ## Summary
/// GET /api/session - the lifecycle and, for the client holding the session
/// cookie, the identity. Never exposes the token.
#[handler]
async fn session_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let state = match get_state_from_depot(depot) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = ?e, "Failed to get application state");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse::new("Internal server error")));
            return;
        }
    };

    let session = client_session(req, &state);
    res.render(Json(SessionResponse {
        lifecycle: session.lifecycle(),
        identity: session.identity().cloned(),
    }));
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("session").get(session_handler)
}
