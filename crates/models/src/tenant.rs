use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Tenant: an identity-provider context scoping a SAML authentication flow
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    pub id: i64,

    /// Globally unique, immutable once assigned
    pub uuid: Uuid,

    /// Human-readable alternate identifier, unique among non-deleted tenants
    pub key: String,

    // Identity-provider settings consumed by the service-provider bootstrap
    pub idp_entity_id: String,
    pub idp_login_url: String,
    pub idp_logout_url: String,
    pub idp_x509_cert: String,

    /// Where the IdP should send the user after login when no explicit
    /// RelayState was carried through the flow
    pub relay_state_url: Option<String>,

    pub name_id_format: String,

    #[sqlx(json)]
    pub metadata: serde_json::Value,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Presence marks the tenant as soft-deleted: retained for audit,
    /// invisible to resolution
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Tenant {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Create new tenant request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTenant {
    #[validate(length(min = 3, max = 63), regex(path = *KEY_REGEX))]
    pub key: String,

    #[validate(length(min = 1, max = 255))]
    pub idp_entity_id: String,

    #[validate(url)]
    pub idp_login_url: String,

    #[validate(url)]
    pub idp_logout_url: String,

    #[validate(length(min = 1))]
    pub idp_x509_cert: String,

    #[validate(url)]
    pub relay_state_url: Option<String>,

    pub name_id_format: Option<String>,

    pub metadata: Option<serde_json::Value>,
}

/// Update tenant request (partial)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateTenant {
    #[validate(length(min = 3, max = 63), regex(path = *KEY_REGEX))]
    pub key: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub idp_entity_id: Option<String>,

    #[validate(url)]
    pub idp_login_url: Option<String>,

    #[validate(url)]
    pub idp_logout_url: Option<String>,

    pub idp_x509_cert: Option<String>,

    #[validate(url)]
    pub relay_state_url: Option<String>,

    pub name_id_format: Option<String>,

    pub metadata: Option<serde_json::Value>,
}

pub const DEFAULT_NAME_ID_FORMAT: &str =
    "urn:oasis:names:tc:SAML:2.0:nameid-format:persistent";

lazy_static::lazy_static! {
    static ref KEY_REGEX: regex::Regex = regex::Regex::new(r"^[a-z0-9][a-z0-9_-]*$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateTenant {
        CreateTenant {
            key: "acme".to_string(),
            idp_entity_id: "https://idp.acme.test/metadata".to_string(),
            idp_login_url: "https://idp.acme.test/sso".to_string(),
            idp_logout_url: "https://idp.acme.test/slo".to_string(),
            idp_x509_cert: "MIIC...".to_string(),
            relay_state_url: None,
            name_id_format: None,
            metadata: None,
        }
    }

    #[test]
    fn test_valid_create_request() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn test_key_rejects_uppercase_and_leading_dash() {
        let mut req = valid_create();
        req.key = "Acme".to_string();
        assert!(req.validate().is_err());

        req.key = "-acme".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_login_url_must_be_url() {
        let mut req = valid_create();
        req.idp_login_url = "not a url".to_string();
        assert!(req.validate().is_err());
    }
}
