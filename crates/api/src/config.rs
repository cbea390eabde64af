use saml2_database::DatabaseConfig;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database: DatabaseConfig,
    /// Base URL of this service provider, used to derive per-tenant
    /// ACS/SLS endpoints
    pub sp_base_url: String,
    /// Entity ID this service provider announces to identity providers
    pub sp_entity_id: String,
    /// Verbose tenant-resolution tracing
    pub debug: bool,
    /// How long an unclaimed carryover value survives
    pub flash_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let sp_base_url = std::env::var("SAML2_SP_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        let sp_entity_id = std::env::var("SAML2_SP_ENTITY_ID")
            .unwrap_or_else(|_| format!("{}/saml2/metadata", sp_base_url));

        Self {
            server_host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database: DatabaseConfig::from_env(),
            sp_base_url,
            sp_entity_id,
            debug: std::env::var("SAML2_DEBUG")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            flash_ttl: std::env::var("SAML2_FLASH_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(300)),
        }
    }
}
