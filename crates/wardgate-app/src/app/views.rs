//! View descriptors.
//!
//! Screens are rendered by the front-end; these handlers describe what each
//! screen should show for the signed-in role.

use std::sync::Arc;

use salvo::{Depot, Request, Response, Router, handler, http::StatusCode, writing::Json};
use serde::Serialize;
use serde_json::json;

use crate::app::api::ErrorResponse;
use crate::cookies::client_session;
use crate::middleware::guard::RouteGuardMiddleware;
use crate::state::{AppState, get_state_from_depot};
use wardgate_core::capability::{Action, ActivityKind, Widget};
use wardgate_core::constants::{
    BILLING_ROUTE_COMPONENT, DASHBOARD_ROUTE_COMPONENT, INSURANCE_CLAIMS_ROUTE_COMPONENT,
    LOGIN_ROUTE_COMPONENT, PATIENT_RECORDS_ROUTE_COMPONENT, RETURN_TO_PARAM, ROOT_PATH,
    UNAUTHORIZED_ROUTE_COMPONENT,
};
use wardgate_core::{Identity, Role};
use wardgate_service::authz::allowed_destinations;
use wardgate_service::guard::routes::View;

#[derive(Debug, Serialize)]
struct RoleOption {
    key: &'static str,
    label: &'static str,
}

#[derive(Debug, Serialize)]
struct NavLink {
    path: String,
    title: &'static str,
}

#[derive(Debug, Serialize)]
struct ActionLink {
    key: &'static str,
    label: &'static str,
    destination: &'static str,
}

#[derive(Debug, Serialize)]
struct DashboardView {
    view: View,
    title: &'static str,
    display_name: String,
    role: Role,
    widgets: &'static [Widget],
    actions: Vec<ActionLink>,
    activity: &'static [ActivityKind],
    navigation: Vec<NavLink>,
}

#[derive(Debug, Serialize)]
struct PageView {
    view: View,
    title: &'static str,
    display_name: String,
    role: Role,
    navigation: Vec<NavLink>,
}

fn navigation(state: &AppState, role: Role) -> Vec<NavLink> {
    allowed_destinations(role, state.guard.routes())
        .filter(|entry| entry.path != ROOT_PATH)
        .map(|entry| NavLink {
            path: entry.path.clone(),
            title: entry.view.title(),
        })
        .collect()
}

/// Identity of the session the guard just admitted, as seen by this client.
fn current_identity(
    req: &Request,
    depot: &Depot,
    res: &mut Response,
) -> Option<(Arc<AppState>, Identity)> {
    let state = match get_state_from_depot(depot) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = ?e, "Failed to get application state");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            return None;
        }
    };

    let identity = client_session(req, &state).identity().cloned();
    match identity {
        Some(identity) => Some((state, identity)),
        None => {
            // Logged out between the guard and this handler.
            res.status_code(StatusCode::UNAUTHORIZED);
            res.render(Json(ErrorResponse::new("Not signed in")));
            None
        }
    }
}

/// ## Summary
/// GET /login - the login form model: selectable roles and the pending return-to.
#[handler]
async fn login_view(req: &mut Request, res: &mut Response) {
    let roles: Vec<RoleOption> = Role::ALL
        .into_iter()
        .map(|role| RoleOption {
            key: role.as_str(),
            label: role.label(),
        })
        .collect();
    let return_to = req.query::<String>(RETURN_TO_PARAM);

    res.render(Json(json!({
        "view": View::Login,
        "title": View::Login.title(),
        "roles": roles,
        "return_to": return_to,
    })));
}

/// ## Summary
/// GET /unauthorized - shown when the signed-in role may not open a page.
#[handler]
async fn unauthorized_view(res: &mut Response) {
    res.status_code(StatusCode::FORBIDDEN);
    res.render(Json(json!({
        "view": View::Unauthorized,
        "title": View::Unauthorized.title(),
        "message": "You do not have permission to access this page.",
    })));
}

/// ## Summary
/// GET / and /dashboard - the role's dashboard.
#[handler]
async fn dashboard_view(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some((state, identity)) = current_identity(req, depot, res) else {
        return;
    };
    let caps = identity.role.capabilities();

    let actions = caps
        .actions
        .iter()
        .map(|action: &Action| ActionLink {
            key: action.as_str(),
            label: action.label(),
            destination: action.destination(),
        })
        .collect();

    res.render(Json(DashboardView {
        view: View::Dashboard,
        title: caps.title,
        navigation: navigation(&state, identity.role),
        display_name: identity.display_name,
        role: identity.role,
        widgets: caps.widgets,
        actions,
        activity: caps.activity,
    }));
}

/// ## Summary
/// GET /patient-records, /billing, /insurance-claims - section page descriptors.
#[handler]
async fn page_view(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some((state, identity)) = current_identity(req, depot, res) else {
        return;
    };
    let Some(view) = state
        .guard
        .routes()
        .lookup(req.uri().path())
        .map(|entry| entry.view)
    else {
        res.status_code(StatusCode::NOT_FOUND);
        return;
    };

    res.render(Json(PageView {
        view,
        title: view.title(),
        navigation: navigation(&state, identity.role),
        display_name: identity.display_name,
        role: identity.role,
    }));
}

/// Public views.
#[must_use]
pub fn public_routes() -> Router {
    Router::new()
        .push(Router::with_path(LOGIN_ROUTE_COMPONENT).get(login_view))
        .push(Router::with_path(UNAUTHORIZED_ROUTE_COMPONENT).get(unauthorized_view))
}

/// Views behind the route guard.
#[must_use]
pub fn guarded_routes() -> Router {
    Router::new()
        .hoop(RouteGuardMiddleware)
        .get(dashboard_view)
        .push(Router::with_path(DASHBOARD_ROUTE_COMPONENT).get(dashboard_view))
        .push(Router::with_path(PATIENT_RECORDS_ROUTE_COMPONENT).get(page_view))
        .push(Router::with_path(BILLING_ROUTE_COMPONENT).get(page_view))
        .push(Router::with_path(INSURANCE_CLAIMS_ROUTE_COMPONENT).get(page_view))
}
