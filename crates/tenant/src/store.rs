use async_trait::async_trait;
use saml2_database::{DatabaseError, TenantRepository};
use saml2_models::Tenant;
use thiserror::Error;

/// Failure of the store collaborator itself, as opposed to a query that
/// simply found nothing
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("tenant store unavailable: {0}")]
    Unavailable(String),

    #[error("tenant store query failed: {0}")]
    Query(String),
}

/// Narrow lookup contract the resolver depends on.
///
/// The lookup must search both the `uuid` and `key` fields, and when
/// `include_deleted` is set it must return soft-deleted rows too: rejecting
/// those is the resolver's job, not the store's.
#[async_trait]
pub trait TenantStore: Send + Sync {
    async fn find_by_any_identifier(
        &self,
        identifier: &str,
        include_deleted: bool,
    ) -> Result<Vec<Tenant>, StoreError>;
}

#[async_trait]
impl TenantStore for TenantRepository {
    async fn find_by_any_identifier(
        &self,
        identifier: &str,
        include_deleted: bool,
    ) -> Result<Vec<Tenant>, StoreError> {
        TenantRepository::find_by_any_identifier(self, identifier, include_deleted)
            .await
            .map_err(StoreError::from)
    }
}

impl From<DatabaseError> for StoreError {
    fn from(err: DatabaseError) -> Self {
        if err.is_unavailable() {
            StoreError::Unavailable(err.to_string())
        } else {
            StoreError::Query(err.to_string())
        }
    }
}
