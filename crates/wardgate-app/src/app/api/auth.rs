use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};
use serde::{Deserialize, Serialize};
use tracing::error;

use super::ErrorResponse;
use crate::cookies::{clear_session_cookie, client_session, set_session_cookie};
use crate::state::get_state_from_depot;
use wardgate_core::Role;
use wardgate_core::util::validation::LoginField;
use wardgate_service::auth::SignedIn;
use wardgate_service::error::ServiceError;

/// ## Summary
/// Login request payload. Missing fields deserialize as empty strings so the
/// form validation can report them.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub return_to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub display_name: String,
    pub role: Role,
    pub redirect_to: String,
}

/// ## Summary
/// POST /api/auth/login - verify credentials for the claimed role and start a session
///
/// The session token is returned only as an `HttpOnly` session cookie.
///
/// ## Errors
/// Returns HTTP 400 for form errors (with the offending `field`)
/// Returns HTTP 401 if credentials do not match the claimed role
/// Returns HTTP 409 if a newer login or logout finished first
/// Returns HTTP 504 if credential verification timed out
#[handler]
async fn login_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let login_req: LoginRequest = match req.parse_json().await {
        Ok(r) => r,
        Err(e) => {
            error!(error = ?e, "Failed to parse login request");
            res.status_code(StatusCode::BAD_REQUEST);
            res.render(Json(ErrorResponse::new("Invalid request body")));
            return;
        }
    };

    let state = match get_state_from_depot(depot) {
        Ok(state) => state,
        Err(e) => {
            error!(error = ?e, "Failed to get application state");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            res.render(Json(ErrorResponse::new("Internal server error")));
            return;
        }
    };

    match state
        .auth
        .login(&login_req.email, &login_req.password, &login_req.role)
        .await
    {
        Ok(SignedIn { identity, token }) => {
            let redirect_to = state
                .guard
                .post_login_destination(login_req.return_to.as_deref());
            set_session_cookie(res, &token);
            res.status_code(StatusCode::OK);
            res.render(Json(LoginResponse {
                display_name: identity.display_name,
                role: identity.role,
                redirect_to,
            }));
        }
        Err(e) => render_login_error(res, &e),
    }
}

fn render_login_error(res: &mut Response, err: &ServiceError) {
    let (status, body) = match err {
        ServiceError::MissingFields(fields) => {
            let first = fields.first().copied().unwrap_or(LoginField::Email);
            (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(first.required_message()).with_field(first),
            )
        }
        ServiceError::InvalidEmail => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(err.to_string()).with_field(LoginField::Email),
        ),
        ServiceError::InvalidRole(_) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(err.to_string()).with_field(LoginField::Role),
        ),
        ServiceError::InvalidCredentials => {
            (StatusCode::UNAUTHORIZED, ErrorResponse::new(err.to_string()))
        }
        ServiceError::Superseded => (StatusCode::CONFLICT, ErrorResponse::new(err.to_string())),
        ServiceError::Timeout => (
            StatusCode::GATEWAY_TIMEOUT,
            ErrorResponse::new(err.to_string()),
        ),
        other => {
            error!(error = ?other, "Login failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("Internal server error"),
            )
        }
    };

    res.status_code(status);
    res.render(Json(body));
}

/// ## Summary
/// POST /api/auth/logout - end the session. Always succeeds.
///
/// Only the client holding the session cookie ends the session; anyone else
/// just has their cookie cleared.
#[handler]
async fn logout_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match get_state_from_depot(depot) {
        Ok(state) => {
            if client_session(req, &state).identity().is_some() {
                state.auth.logout().await;
            } else {
                tracing::debug!("Logout without the session cookie, nothing to end");
            }
            clear_session_cookie(res);
            res.status_code(StatusCode::NO_CONTENT);
        }
        Err(e) => {
            error!(error = ?e, "Failed to get application state");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("auth")
        .push(Router::with_path("login").post(login_handler))
        .push(Router::with_path("logout").post(logout_handler))
}
