pub mod tenants;

pub use tenants::TenantRepository;
