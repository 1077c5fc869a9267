use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};
use serde::Serialize;

use super::ErrorResponse;
use crate::cookies::client_session;
use crate::state::get_state_from_depot;
use wardgate_core::capability::Action;

#[derive(Debug, Serialize)]
pub struct CapabilityResponse {
    pub action: Action,
    pub allowed: bool,
}

/// ## Summary
/// GET /api/capabilities/{action} - whether the client's identity may perform `action`
///
/// ## Errors
/// Returns HTTP 401 without the session cookie
/// Returns HTTP 404 for unknown action names
#[handler]
async fn capability_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let state = match get_state_from_depot(depot) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = ?e, "Failed to get application state");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse::new("Internal server error")));
            return;
        }
    };

    let Some(role) = client_session(req, &state).identity().map(|i| i.role) else {
        res.status_code(StatusCode::UNAUTHORIZED);
        res.render(Json(ErrorResponse::new("Not signed in")));
        return;
    };

    let key = req.param::<String>("action").unwrap_or_default();
    let Some(action) = Action::from_key(&key) else {
        res.status_code(StatusCode::NOT_FOUND);
        res.render(Json(ErrorResponse::new(format!("Unknown action: {key}"))));
        return;
    };

    match state.policy.allows(role, action) {
        Ok(allowed) => res.render(Json(CapabilityResponse { action, allowed })),
        Err(e) => {
            tracing::error!(error = ?e, %role, %action, "Capability check failed");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse::new("Internal server error")));
        }
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("capabilities/{action}").get(capability_handler)
}
