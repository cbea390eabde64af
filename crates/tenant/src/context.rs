use saml2_models::Tenant;
use uuid::Uuid;

/// Resolved tenant attached to a request for downstream handlers
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub tenant: Tenant,
}

impl TenantContext {
    pub fn new(tenant: Tenant) -> Self {
        Self { tenant }
    }

    pub fn uuid(&self) -> Uuid {
        self.tenant.uuid
    }

    pub fn key(&self) -> &str {
        &self.tenant.key
    }
}
