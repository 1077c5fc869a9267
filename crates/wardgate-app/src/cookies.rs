//! Session cookie.
//!
//! ## Summary
//! Login hands the session token to the client as an `HttpOnly` cookie. A
//! request is evaluated against the session only when it presents that token;
//! every other request is anonymous.

use salvo::http::cookie::time::Duration;
use salvo::http::cookie::{Cookie, SameSite};
use salvo::http::header::{COOKIE, SET_COOKIE};
use salvo::http::HeaderValue;
use salvo::{Request, Response};

use crate::state::AppState;
use wardgate_core::constants::{ROOT_PATH, SESSION_COOKIE_NAME};
use wardgate_service::session::{Session, SessionToken};

/// Token from the request's session cookie, if any.
#[must_use]
pub fn presented_token(req: &Request) -> Option<String> {
    req.headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
}

/// The current session as seen by the client that sent `req`.
#[must_use]
pub fn client_session(req: &Request, state: &AppState) -> Session {
    state.guard.session_for(presented_token(req).as_deref())
}

pub fn set_session_cookie(res: &mut Response, token: &SessionToken) {
    let cookie = Cookie::build((SESSION_COOKIE_NAME, token.expose().to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path(ROOT_PATH)
        .build();
    append_set_cookie(res, &cookie);
}

pub fn clear_session_cookie(res: &mut Response) {
    let cookie = Cookie::build((SESSION_COOKIE_NAME, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path(ROOT_PATH)
        .max_age(Duration::ZERO)
        .build();
    append_set_cookie(res, &cookie);
}

fn append_set_cookie(res: &mut Response, cookie: &Cookie<'_>) {
    match HeaderValue::from_str(&cookie.to_string()) {
        Ok(value) => {
            if res.add_header(SET_COOKIE, value, false).is_err() {
                tracing::warn!("Failed to add Set-Cookie header to response");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Session cookie is not a valid header value");
        }
    }
}
