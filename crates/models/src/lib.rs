// Core modules
pub mod tenant;

// Re-export commonly used types
pub use tenant::{CreateTenant, Tenant, UpdateTenant};
