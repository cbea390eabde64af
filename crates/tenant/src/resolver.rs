use crate::diagnostics::{Diagnostics, ResolveEvent};
use crate::store::{StoreError, TenantStore};
use chrono::{DateTime, Utc};
use saml2_models::Tenant;
use std::sync::Arc;
use thiserror::Error;

/// Why a resolution attempt failed.
///
/// Every kind is terminal for the attempt; callers map all of them except
/// `StoreUnavailable` to a uniform "not found" response so unauthenticated
/// callers cannot probe which tenants exist.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no tenant identifier present in the request")]
    IdentifierMissing,

    #[error("no tenant matches identifier {identifier:?}")]
    NotFound { identifier: String },

    #[error("identifier {identifier:?} matches {matches} tenants")]
    Ambiguous { identifier: String, matches: usize },

    #[error("tenant #{tenant_id} matched {identifier:?} but was deleted at {deleted_at}")]
    Deleted {
        identifier: String,
        tenant_id: i64,
        deleted_at: DateTime<Utc>,
    },

    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),
}

impl ResolveError {
    /// True for every kind a caller should render as "not found";
    /// false only for infrastructure failure.
    pub fn is_not_found_class(&self) -> bool {
        !matches!(self, Self::StoreUnavailable(_))
    }
}

/// Resolves a route identifier (UUID or key) to exactly one non-deleted
/// tenant.
///
/// Stateless and side-effect free: each call is a single store query plus
/// classification, so two calls with unchanged store contents yield the
/// same result.
pub struct TenantResolver {
    store: Arc<dyn TenantStore>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl TenantResolver {
    pub fn new(store: Arc<dyn TenantStore>, diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self { store, diagnostics }
    }

    pub async fn resolve(&self, identifier: Option<&str>) -> Result<Tenant, ResolveError> {
        let Some(identifier) = identifier.filter(|s| !s.is_empty()) else {
            self.diagnostics.emit(ResolveEvent::IdentifierMissing);
            return Err(ResolveError::IdentifierMissing);
        };

        // Soft-deleted rows are included on purpose: a deleted match must be
        // reported as deleted, not mistaken for absence.
        let mut matches = self
            .store
            .find_by_any_identifier(identifier, true)
            .await?;

        if matches.is_empty() {
            self.diagnostics.emit(ResolveEvent::NotFound { identifier });
            return Err(ResolveError::NotFound {
                identifier: identifier.to_string(),
            });
        }

        // The by-uuid-or-key query can legitimately match several rows when
        // the data is inconsistent; never pick one arbitrarily.
        if matches.len() > 1 {
            self.diagnostics.emit(ResolveEvent::Ambiguous {
                identifier,
                matches: matches.len(),
            });
            return Err(ResolveError::Ambiguous {
                identifier: identifier.to_string(),
                matches: matches.len(),
            });
        }

        let tenant = matches.remove(0);

        if let Some(deleted_at) = tenant.deleted_at {
            self.diagnostics.emit(ResolveEvent::Deleted {
                identifier,
                tenant_id: tenant.id,
                deleted_at,
            });
            return Err(ResolveError::Deleted {
                identifier: identifier.to_string(),
                tenant_id: tenant.id,
                deleted_at,
            });
        }

        self.diagnostics.emit(ResolveEvent::Resolved { tenant: &tenant });

        Ok(tenant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NoopDiagnostics;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    struct InMemoryStore {
        tenants: Vec<Tenant>,
        queries: AtomicUsize,
    }

    impl InMemoryStore {
        fn new(tenants: Vec<Tenant>) -> Self {
            Self {
                tenants,
                queries: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TenantStore for InMemoryStore {
        async fn find_by_any_identifier(
            &self,
            identifier: &str,
            include_deleted: bool,
        ) -> Result<Vec<Tenant>, StoreError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .tenants
                .iter()
                .filter(|t| t.uuid.to_string() == identifier || t.key == identifier)
                .filter(|t| include_deleted || t.deleted_at.is_none())
                .cloned()
                .collect())
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl TenantStore for BrokenStore {
        async fn find_by_any_identifier(
            &self,
            _identifier: &str,
            _include_deleted: bool,
        ) -> Result<Vec<Tenant>, StoreError> {
            Err(StoreError::Unavailable("connection pool timed out".to_string()))
        }
    }

    fn tenant(id: i64, uuid: &str, key: &str, deleted_at: Option<DateTime<Utc>>) -> Tenant {
        Tenant {
            id,
            uuid: Uuid::parse_str(uuid).expect("test uuid"),
            key: key.to_string(),
            idp_entity_id: "https://idp.example.test/metadata".to_string(),
            idp_login_url: "https://idp.example.test/sso".to_string(),
            idp_logout_url: "https://idp.example.test/slo".to_string(),
            idp_x509_cert: "MIIC...".to_string(),
            relay_state_url: None,
            name_id_format: saml2_models::tenant::DEFAULT_NAME_ID_FORMAT.to_string(),
            metadata: serde_json::json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at,
        }
    }

    const ACME_UUID: &str = "6f9619ff-8b86-4d01-b42d-00cf4fc964ff";

    fn resolver_with(store: Arc<InMemoryStore>) -> TenantResolver {
        TenantResolver::new(store, Arc::new(NoopDiagnostics))
    }

    #[tokio::test]
    async fn test_resolves_by_uuid() {
        let store = Arc::new(InMemoryStore::new(vec![tenant(1, ACME_UUID, "acme", None)]));
        let resolver = resolver_with(store);

        let resolved = resolver
            .resolve(Some(ACME_UUID))
            .await
            .expect("should resolve by uuid");
        assert_eq!(resolved.id, 1);
        assert_eq!(resolved.key, "acme");
    }

    #[tokio::test]
    async fn test_resolves_by_key() {
        let store = Arc::new(InMemoryStore::new(vec![tenant(1, ACME_UUID, "acme", None)]));
        let resolver = resolver_with(store);

        let resolved = resolver
            .resolve(Some("acme"))
            .await
            .expect("should resolve by key");
        assert_eq!(resolved.id, 1);
        assert_eq!(resolved.uuid.to_string(), ACME_UUID);
    }

    #[tokio::test]
    async fn test_unknown_identifier_is_not_found() {
        let store = Arc::new(InMemoryStore::new(vec![tenant(1, ACME_UUID, "acme", None)]));
        let resolver = resolver_with(store);

        let err = resolver.resolve(Some("missing")).await.unwrap_err();
        assert!(matches!(err, ResolveError::NotFound { ref identifier } if identifier == "missing"));
        assert!(err.is_not_found_class());
    }

    #[tokio::test]
    async fn test_absent_identifier_does_not_query_store() {
        let store = Arc::new(InMemoryStore::new(vec![tenant(1, ACME_UUID, "acme", None)]));
        let resolver = resolver_with(store.clone());

        let err = resolver.resolve(None).await.unwrap_err();
        assert!(matches!(err, ResolveError::IdentifierMissing));
        assert_eq!(store.queries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_identifier_treated_as_absent() {
        let store = Arc::new(InMemoryStore::new(vec![tenant(1, ACME_UUID, "acme", None)]));
        let resolver = resolver_with(store.clone());

        let err = resolver.resolve(Some("")).await.unwrap_err();
        assert!(matches!(err, ResolveError::IdentifierMissing));
        assert_eq!(store.queries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_duplicate_key_is_ambiguous() {
        let store = Arc::new(InMemoryStore::new(vec![
            tenant(1, ACME_UUID, "dup", None),
            tenant(2, "a54a0fc9-6b3f-4591-9ba9-26123a14cb29", "dup", None),
        ]));
        let resolver = resolver_with(store);

        let err = resolver.resolve(Some("dup")).await.unwrap_err();
        assert!(
            matches!(err, ResolveError::Ambiguous { ref identifier, matches } if identifier == "dup" && matches == 2)
        );
    }

    #[tokio::test]
    async fn test_deleted_tenant_is_rejected_by_uuid_and_key() {
        let deleted_at = Utc::now();
        let store = Arc::new(InMemoryStore::new(vec![tenant(
            1,
            ACME_UUID,
            "acme",
            Some(deleted_at),
        )]));
        let resolver = resolver_with(store);

        for identifier in [ACME_UUID, "acme"] {
            let err = resolver.resolve(Some(identifier)).await.unwrap_err();
            match err {
                ResolveError::Deleted {
                    tenant_id,
                    deleted_at: reported,
                    ..
                } => {
                    assert_eq!(tenant_id, 1);
                    assert_eq!(reported, deleted_at);
                }
                other => panic!("expected Deleted, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent() {
        let store = Arc::new(InMemoryStore::new(vec![tenant(1, ACME_UUID, "acme", None)]));
        let resolver = resolver_with(store);

        let first = resolver.resolve(Some("acme")).await.expect("first call");
        let second = resolver.resolve(Some("acme")).await.expect("second call");
        assert_eq!(first.id, second.id);
        assert_eq!(first.uuid, second.uuid);
    }

    #[tokio::test]
    async fn test_store_failure_is_not_reported_as_not_found() {
        let resolver = TenantResolver::new(Arc::new(BrokenStore), Arc::new(NoopDiagnostics));

        let err = resolver.resolve(Some("acme")).await.unwrap_err();
        assert!(matches!(err, ResolveError::StoreUnavailable(_)));
        assert!(!err.is_not_found_class());
    }
}
