pub mod api;
pub mod views;

use std::sync::Arc;

use salvo::{Router, handler};

use crate::middleware::guard::fallback;
use crate::state::{AppState, AppStateHandler};

#[handler]
async fn healthcheck() -> &'static str {
    "OK"
}

/// ## Summary
/// Constructs the full router: health check, JSON API, public and guarded
/// views, then the catch-all redirect to `/`.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .hoop(AppStateHandler { state })
        .push(Router::with_path("healthz").get(healthcheck))
        .push(api::routes())
        .push(views::public_routes())
        .push(views::guarded_routes())
        .push(Router::with_path("{**rest}").goal(fallback))
}
