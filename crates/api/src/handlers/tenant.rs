use crate::handlers::ErrorResponse;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use saml2_database::DatabaseError;
use saml2_models::{CreateTenant, Tenant, UpdateTenant};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Serialize)]
pub struct TenantListResponse {
    pub tenants: Vec<Tenant>,
    pub total: i64,
}

/// List non-deleted tenants (Admin)
/// GET /api/tenants
pub async fn list_tenants(
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<TenantListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let tenants = state
        .tenants
        .list(pagination.limit.clamp(1, 200), pagination.offset.max(0))
        .await
        .map_err(db_error)?;
    let total = state.tenants.count().await.map_err(db_error)?;

    Ok(Json(TenantListResponse { tenants, total }))
}

/// Register a new identity-provider tenant (Admin)
/// POST /api/tenants
pub async fn create_tenant(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateTenant>,
) -> Result<(StatusCode, Json<Tenant>), (StatusCode, Json<ErrorResponse>)> {
    request.validate().map_err(validation_error)?;

    let tenant = state.tenants.create(&request).await.map_err(db_error)?;

    tracing::info!(tenant_id = tenant.id, key = %tenant.key, "Tenant created");

    Ok((StatusCode::CREATED, Json(tenant)))
}

/// GET /api/tenants/:id
pub async fn get_tenant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Tenant>, (StatusCode, Json<ErrorResponse>)> {
    let tenant = state.tenants.find_by_id(id).await.map_err(db_error)?;
    Ok(Json(tenant))
}

/// PUT /api/tenants/:id
pub async fn update_tenant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateTenant>,
) -> Result<Json<Tenant>, (StatusCode, Json<ErrorResponse>)> {
    request.validate().map_err(validation_error)?;

    let tenant = state.tenants.update(id, &request).await.map_err(db_error)?;
    Ok(Json(tenant))
}

/// Soft-delete: the tenant stops resolving but the row stays for audit
/// DELETE /api/tenants/:id
pub async fn delete_tenant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Tenant>, (StatusCode, Json<ErrorResponse>)> {
    let tenant = state.tenants.soft_delete(id).await.map_err(db_error)?;

    tracing::info!(tenant_id = tenant.id, key = %tenant.key, "Tenant soft-deleted");

    Ok(Json(tenant))
}

/// Clear a tenant's deletion mark
/// POST /api/tenants/:id/restore
pub async fn restore_tenant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Tenant>, (StatusCode, Json<ErrorResponse>)> {
    let tenant = state.tenants.restore(id).await.map_err(db_error)?;

    tracing::info!(tenant_id = tenant.id, key = %tenant.key, "Tenant restored");

    Ok(Json(tenant))
}

fn validation_error(err: validator::ValidationErrors) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new("validation_failed", &err.to_string())),
    )
}

fn db_error(err: DatabaseError) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        DatabaseError::NotFound(message) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("not_found", &message)),
        ),
        DatabaseError::DuplicateEntry(message) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::new("duplicate", &message)),
        ),
        DatabaseError::InvalidInput(message) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("invalid_input", &message)),
        ),
        DatabaseError::ConnectionError(sqlx::Error::Database(ref db))
            if db.is_unique_violation() =>
        {
            (
                StatusCode::CONFLICT,
                Json(ErrorResponse::new(
                    "duplicate",
                    "A tenant with this key already exists",
                )),
            )
        }
        other => {
            tracing::error!("Database error: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("internal_error", "Database error")),
            )
        }
    }
}
