use std::sync::Arc;

use auth::PasswordHasher;
use auth::TokenIssuer;
use identity_service::config::Config;
use identity_service::domain::user::ports::AuthServicePort;
use identity_service::domain::user::ports::CredentialStore;
use identity_service::domain::user::service::AuthService;
use identity_service::inbound::http::responder::ErrorResponder;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::PostgresCredentialStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        environment = %config.environment,
        http_port = config.server.http_port,
        access_expires_in = %config.jwt.access_expires_in,
        refresh_expires_in = %config.jwt.refresh_expires_in,
        "Configuration loaded"
    );

    let token_issuer = Arc::new(TokenIssuer::new(&config.jwt.issuer_config())?);

    let hashing_params = config.hashing.params(config.environment);
    let password_hasher = Arc::new(PasswordHasher::new(hashing_params)?);
    tracing::info!(
        memory_cost_kib = hashing_params.memory_cost_kib,
        time_cost = hashing_params.time_cost,
        parallelism = hashing_params.parallelism,
        "Password hasher configured"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let credential_store = Arc::new(PostgresCredentialStore::new(pg_pool));
    if credential_store.count_users().await? == 0 {
        tracing::info!("No users yet; the first registration will be granted ADMIN");
    }

    let auth_service: Arc<dyn AuthServicePort> = Arc::new(AuthService::new(
        credential_store,
        password_hasher,
        Arc::clone(&token_issuer),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        auth_service,
        token_issuer,
        ErrorResponder::new(config.environment),
    );

    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited successfully");

    Ok(())
}
