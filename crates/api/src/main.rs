// SAML2 broker API server
// Resolves tenants from incoming requests and serves tenant administration

mod bootstrap;
mod config;
mod flash;
mod handlers;
mod middleware;
mod routes;

use bootstrap::SamlBootstrap;
use config::Config;
use dotenvy::dotenv;
use flash::FlashStore;
use saml2_database::TenantRepository;
use saml2_tenant::TenantResolver;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub struct AppState {
    pub tenants: Arc<TenantRepository>,
    pub resolver: TenantResolver,
    pub flash: FlashStore,
    pub bootstrap: Arc<dyn SamlBootstrap>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,saml2_api=debug,tower_http=debug".to_string()),
        )
        .init();

    tracing::info!("Starting SAML2 broker API");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::from_env();
    tracing::info!("Server: {}:{}", config.server_host, config.server_port);
    tracing::info!("SP entity id: {}", config.sp_entity_id);

    // Initialize database
    tracing::info!("Connecting to database...");
    let database = saml2_database::Database::new(config.database.clone())
        .await
        .expect("Failed to connect to database");
    database.ping().await.expect("Database ping failed");
    tracing::info!("Database connected");

    let tenants = Arc::new(TenantRepository::new(database.pool().clone()));

    // Diagnostics verbosity follows the debug flag; the resolver itself
    // never consults configuration
    let diagnostics = saml2_tenant::from_debug_flag(config.debug);
    let resolver = TenantResolver::new(tenants.clone(), diagnostics);

    let state = Arc::new(AppState {
        tenants,
        resolver,
        flash: FlashStore::new(config.flash_ttl),
        bootstrap: Arc::new(bootstrap::SettingsBootstrap::new(
            config.sp_entity_id.clone(),
            config.sp_base_url.clone(),
        )),
    });

    let app = routes::create_router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server ready at http://{}", addr);

    axum::serve(listener, app).await.expect("Server error");

    Ok(())
}
