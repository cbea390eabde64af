use crate::bootstrap::ServiceProviderSettings;
use crate::flash::token_from_cookie_header;
use crate::handlers::ErrorResponse;
use crate::AppState;
use axum::{
    extract::{Extension, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use saml2_tenant::TenantContext;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct TenantSummary {
    pub id: i64,
    pub uuid: Uuid,
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct ResolvedContextResponse {
    pub tenant: TenantSummary,
    pub sp: ServiceProviderSettings,
}

/// The resolved tenant and its bootstrapped service-provider settings.
/// Downstream SAML endpoints read the same two extensions.
/// GET /saml2/:uuid/context
pub async fn resolved_context(
    Extension(context): Extension<TenantContext>,
    Extension(settings): Extension<ServiceProviderSettings>,
) -> Json<ResolvedContextResponse> {
    Json(ResolvedContextResponse {
        tenant: TenantSummary {
            id: context.tenant.id,
            uuid: context.uuid(),
            key: context.key().to_string(),
        },
        sp: settings,
    })
}

#[derive(Debug, Serialize)]
pub struct CarryoverResponse {
    pub tenant_uuid: String,
}

/// Claim the one-shot tenant carryover left by the previous request in
/// this flow. A second claim of the same token finds nothing.
/// GET /saml2/carryover
pub async fn claim_carryover(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<CarryoverResponse>, (StatusCode, Json<ErrorResponse>)> {
    let token = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(token_from_cookie_header);

    let not_found = || {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(
                "carryover_not_found",
                "No carryover value to claim",
            )),
        )
    };

    let token = token.ok_or_else(not_found)?;
    let tenant_uuid = state.flash.take(token).await.ok_or_else(not_found)?;

    Ok(Json(CarryoverResponse { tenant_uuid }))
}
