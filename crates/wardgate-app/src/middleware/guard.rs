use salvo::http::header::{LOCATION, RETRY_AFTER};
use salvo::http::{HeaderValue, StatusCode};
use salvo::writing::Json;
use salvo::{Depot, FlowCtrl, Request, Response};
use serde_json::json;

use crate::cookies::client_session;
use crate::state::get_state_from_depot;
use wardgate_core::constants::{RETURN_TO_PARAM, ROOT_PATH};
use wardgate_service::guard::navigator::Navigator;

/// ## Summary
/// Runs every request for a guarded view through the route guard.
///
/// Requests are evaluated as the client presenting them: without the session
/// cookie a request is anonymous. Allowed requests continue to the view
/// handler. Anything else is answered here: 503 while the session is
/// hydrating, 302 for redirects.
pub struct RouteGuardMiddleware;

#[salvo::async_trait]
impl salvo::Handler for RouteGuardMiddleware {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        let state = match get_state_from_depot(depot) {
            Ok(state) => state,
            Err(e) => {
                tracing::error!(error = ?e, "Failed to get application state from depot");
                res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
                ctrl.skip_rest();
                return;
            }
        };

        state.auth.expire_stale_session().await;

        let session = client_session(req, &state);
        let target = req
            .uri()
            .path_and_query()
            .map_or_else(|| req.uri().path().to_string(), ToString::to_string);
        let mut navigator = ResponseNavigator::new(res);
        state.guard.navigate_for(&target, &session, &mut navigator);

        if !navigator.proceed {
            ctrl.skip_rest();
        }
    }
}

/// Applies guard outcomes to a Salvo response.
struct ResponseNavigator<'a> {
    res: &'a mut Response,
    proceed: bool,
}

impl<'a> ResponseNavigator<'a> {
    fn new(res: &'a mut Response) -> Self {
        Self {
            res,
            proceed: false,
        }
    }
}

impl Navigator for ResponseNavigator<'_> {
    fn navigate_to(&mut self, _path: &str) {
        self.proceed = true;
    }

    fn redirect_to(&mut self, path: &str, return_to: Option<&str>) {
        let location = match return_to {
            Some(return_to) => format!(
                "{path}?{RETURN_TO_PARAM}={}",
                urlencoding::encode(return_to)
            ),
            None => path.to_string(),
        };

        self.res.status_code(StatusCode::FOUND);
        match HeaderValue::from_str(&location) {
            Ok(value) => {
                if self.res.add_header(LOCATION, value, true).is_err() {
                    tracing::warn!("Failed to add Location header to response");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, %location, "Redirect target is not a valid header value");
                self.res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            }
        }
    }

    fn show_placeholder(&mut self) {
        self.res.status_code(StatusCode::SERVICE_UNAVAILABLE);
        if self
            .res
            .add_header(RETRY_AFTER, HeaderValue::from_static("1"), true)
            .is_err()
        {
            tracing::warn!("Failed to add Retry-After header to response");
        }
        self.res.render(Json(json!({ "status": "loading" })));
    }
}

/// ## Summary
/// Redirects anything that matched no other route to `/`.
#[salvo::handler]
pub async fn fallback(res: &mut Response) {
    ResponseNavigator::new(res).redirect_to(ROOT_PATH, None);
}
