use tablero_application::{AccessService, ProxyService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub access_service: AccessService,
    pub proxy_service: ProxyService,
}
