use crate::handlers;
use crate::middleware;
use crate::AppState;
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Everything under /saml2/:uuid goes through tenant resolution; the
    // downstream SAML toolkit mounts its own endpoints on this group and
    // reads the TenantContext / ServiceProviderSettings extensions.
    let tenant_scoped = Router::new()
        .route("/saml2/:uuid/context", get(handlers::saml::resolved_context))
        .route_layer(from_fn_with_state(state.clone(), middleware::resolve_tenant));

    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))
        // One-shot carryover claim for the response cycle after resolution
        .route("/saml2/carryover", get(handlers::saml::claim_carryover))
        .merge(tenant_scoped)
        // Tenant administration
        .route(
            "/api/tenants",
            get(handlers::tenant::list_tenants).post(handlers::tenant::create_tenant),
        )
        .route(
            "/api/tenants/:id",
            get(handlers::tenant::get_tenant)
                .put(handlers::tenant::update_tenant)
                .delete(handlers::tenant::delete_tenant),
        )
        .route("/api/tenants/:id/restore", post(handlers::tenant::restore_tenant))
        .with_state(state)
}
