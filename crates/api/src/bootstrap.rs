use async_trait::async_trait;
use saml2_models::Tenant;
use serde::Serialize;
use thiserror::Error;

/// Identity-provider side of a bootstrapped SAML exchange
#[derive(Debug, Clone, Serialize)]
pub struct IdpSettings {
    pub entity_id: String,
    pub login_url: String,
    pub logout_url: String,
    pub x509_cert: String,
}

/// Everything the downstream SAML toolkit needs to handle one tenant's
/// authentication flow
#[derive(Debug, Clone, Serialize)]
pub struct ServiceProviderSettings {
    pub sp_entity_id: String,
    pub acs_url: String,
    pub sls_url: String,
    pub name_id_format: String,
    pub relay_state_url: Option<String>,
    pub idp: IdpSettings,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("tenant #{tenant_id} has invalid IdP configuration: {reason}")]
    InvalidIdpConfig { tenant_id: i64, reason: String },
}

/// Configures a protocol handler with tenant-specific settings before the
/// authentication request/response is handled. The protocol itself lives
/// in the downstream toolkit.
#[async_trait]
pub trait SamlBootstrap: Send + Sync {
    async fn bootstrap(&self, tenant: &Tenant) -> Result<ServiceProviderSettings, BootstrapError>;
}

/// Derives per-tenant service-provider settings from this service's base
/// URL and the tenant's stored IdP configuration
pub struct SettingsBootstrap {
    sp_entity_id: String,
    base_url: String,
}

impl SettingsBootstrap {
    pub fn new(sp_entity_id: String, base_url: String) -> Self {
        Self {
            sp_entity_id,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn require(tenant: &Tenant, field: &str, value: &str) -> Result<(), BootstrapError> {
        if value.trim().is_empty() {
            return Err(BootstrapError::InvalidIdpConfig {
                tenant_id: tenant.id,
                reason: format!("{} is empty", field),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SamlBootstrap for SettingsBootstrap {
    async fn bootstrap(&self, tenant: &Tenant) -> Result<ServiceProviderSettings, BootstrapError> {
        Self::require(tenant, "idp_entity_id", &tenant.idp_entity_id)?;
        Self::require(tenant, "idp_login_url", &tenant.idp_login_url)?;
        Self::require(tenant, "idp_x509_cert", &tenant.idp_x509_cert)?;

        Ok(ServiceProviderSettings {
            sp_entity_id: self.sp_entity_id.clone(),
            acs_url: format!("{}/saml2/{}/acs", self.base_url, tenant.uuid),
            sls_url: format!("{}/saml2/{}/sls", self.base_url, tenant.uuid),
            name_id_format: tenant.name_id_format.clone(),
            relay_state_url: tenant.relay_state_url.clone(),
            idp: IdpSettings {
                entity_id: tenant.idp_entity_id.clone(),
                login_url: tenant.idp_login_url.clone(),
                logout_url: tenant.idp_logout_url.clone(),
                x509_cert: tenant.idp_x509_cert.clone(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn tenant() -> Tenant {
        Tenant {
            id: 7,
            uuid: Uuid::parse_str("6f9619ff-8b86-4d01-b42d-00cf4fc964ff").unwrap(),
            key: "acme".to_string(),
            idp_entity_id: "https://idp.acme.test/metadata".to_string(),
            idp_login_url: "https://idp.acme.test/sso".to_string(),
            idp_logout_url: "https://idp.acme.test/slo".to_string(),
            idp_x509_cert: "MIIC...".to_string(),
            relay_state_url: Some("https://app.acme.test/home".to_string()),
            name_id_format: saml2_models::tenant::DEFAULT_NAME_ID_FORMAT.to_string(),
            metadata: serde_json::json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn test_settings_derived_from_base_url_and_tenant() {
        let bootstrap = SettingsBootstrap::new(
            "https://sp.example.test/saml2/metadata".to_string(),
            "https://sp.example.test/".to_string(),
        );

        let settings = bootstrap.bootstrap(&tenant()).await.expect("should bootstrap");
        assert_eq!(
            settings.acs_url,
            "https://sp.example.test/saml2/6f9619ff-8b86-4d01-b42d-00cf4fc964ff/acs"
        );
        assert_eq!(
            settings.sls_url,
            "https://sp.example.test/saml2/6f9619ff-8b86-4d01-b42d-00cf4fc964ff/sls"
        );
        assert_eq!(settings.idp.entity_id, "https://idp.acme.test/metadata");
        assert_eq!(settings.relay_state_url.as_deref(), Some("https://app.acme.test/home"));
    }

    #[tokio::test]
    async fn test_empty_idp_cert_is_rejected() {
        let bootstrap = SettingsBootstrap::new(
            "https://sp.example.test/saml2/metadata".to_string(),
            "https://sp.example.test".to_string(),
        );

        let mut broken = tenant();
        broken.idp_x509_cert = "   ".to_string();

        let err = bootstrap.bootstrap(&broken).await.unwrap_err();
        assert!(matches!(err, BootstrapError::InvalidIdpConfig { tenant_id: 7, .. }));
    }
}
