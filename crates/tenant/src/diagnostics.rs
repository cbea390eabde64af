use chrono::{DateTime, Utc};
use saml2_models::Tenant;
use std::sync::Arc;

/// Trace-level events emitted during a resolution attempt
#[derive(Debug)]
pub enum ResolveEvent<'a> {
    /// Request carried no identifier to resolve against
    IdentifierMissing,
    /// No tenant matched the identifier
    NotFound { identifier: &'a str },
    /// More than one tenant matched (data-integrity anomaly)
    Ambiguous { identifier: &'a str, matches: usize },
    /// Exactly one match, but it is soft-deleted
    Deleted {
        identifier: &'a str,
        tenant_id: i64,
        deleted_at: DateTime<Utc>,
    },
    /// Resolution succeeded
    Resolved { tenant: &'a Tenant },
}

/// Diagnostics sink for resolution events.
///
/// Replaces the usual "global debug flag around every log call": callers
/// inject either a tracing-backed sink or the no-op one, and the resolver
/// stays free of logging configuration.
pub trait Diagnostics: Send + Sync {
    fn emit(&self, event: ResolveEvent<'_>);
}

/// Emits events through `tracing` at debug level
#[derive(Debug, Clone, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn emit(&self, event: ResolveEvent<'_>) {
        match event {
            ResolveEvent::IdentifierMissing => {
                tracing::debug!("[saml2] tenant UUID or key is not present in the URL so cannot be resolved");
            }
            ResolveEvent::NotFound { identifier } => {
                tracing::debug!(identifier, "[saml2] tenant doesn't exist");
            }
            ResolveEvent::Ambiguous { identifier, matches } => {
                tracing::debug!(identifier, matches, "[saml2] tenant is not unique");
            }
            ResolveEvent::Deleted {
                identifier,
                tenant_id,
                deleted_at,
            } => {
                tracing::debug!(
                    identifier,
                    tenant_id,
                    deleted_at = %deleted_at,
                    "[saml2] tenant resolved but marked as deleted"
                );
            }
            ResolveEvent::Resolved { tenant } => {
                tracing::debug!(
                    uuid = %tenant.uuid,
                    id = tenant.id,
                    key = %tenant.key,
                    "[saml2] tenant resolved"
                );
            }
        }
    }
}

/// Drops every event; used when verbose tracing is disabled
#[derive(Debug, Clone, Default)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn emit(&self, _event: ResolveEvent<'_>) {}
}

/// Pick a sink from the service's debug flag
pub fn from_debug_flag(debug: bool) -> Arc<dyn Diagnostics> {
    if debug {
        Arc::new(TracingDiagnostics)
    } else {
        Arc::new(NoopDiagnostics)
    }
}
