use std::sync::Arc;

use salvo::async_trait;

use crate::error::AppResult;
use wardgate_core::error::CoreError;
use wardgate_service::auth::AuthService;
use wardgate_service::authz::CapabilityPolicy;
use wardgate_service::guard::RouteGuard;

/// Everything a handler needs, built once by the composition root.
pub struct AppState {
    pub auth: AuthService,
    pub guard: RouteGuard,
    pub policy: CapabilityPolicy,
}

pub struct AppStateHandler {
    pub state: Arc<AppState>,
}

#[async_trait]
impl salvo::Handler for AppStateHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(self.state.clone());
    }
}

/// ## Summary
/// Retrieves the application state from the depot.
///
/// ## Errors
/// Returns an error if the state is not found in the depot.
pub fn get_state_from_depot(depot: &salvo::Depot) -> AppResult<Arc<AppState>> {
    depot
        .obtain::<Arc<AppState>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Application state not found in depot").into())
}
