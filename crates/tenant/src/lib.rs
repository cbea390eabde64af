// Request-scoped tenant resolution.
//
// The resolver turns a route identifier (UUID or key) into exactly one
// non-deleted tenant, or a typed failure saying why it could not. Store
// access and diagnostics are injected collaborators.

pub mod context;
pub mod diagnostics;
pub mod resolver;
pub mod store;

pub use context::TenantContext;
pub use diagnostics::{
    from_debug_flag, Diagnostics, NoopDiagnostics, ResolveEvent, TracingDiagnostics,
};
pub use resolver::{ResolveError, TenantResolver};
pub use store::{StoreError, TenantStore};
