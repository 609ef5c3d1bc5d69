use std::io::{Error, ErrorKind};
use std::net::TcpListener;

use authcore::configuration::get_configuration;
use authcore::startup::{build_service, run};
use authcore::telemetry::init_telemetry;
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        Error::new(ErrorKind::InvalidInput, "Configuration error")
    })?;

    if let Err(e) = init_telemetry(&configuration.logging) {
        eprintln!("Failed to install tracing subscriber: {}", e);
    }
    tracing::info!(settings = ?configuration, "Configuration loaded");

    if configuration.auth.token_secret == "secret" {
        tracing::warn!("Using the default token secret; set AUTH__AUTH__TOKEN_SECRET");
    }

    let pool = PgPoolOptions::new()
        .max_connections(configuration.database.max_connections)
        .connect(&configuration.database.connection_string())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create connection pool");
            Error::new(ErrorKind::ConnectionRefused, "Database connection error")
        })?;

    sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to run migrations");
        Error::new(ErrorKind::Other, "Migration error")
    })?;

    let service = build_service(&configuration.auth, pool);

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;
    tracing::info!(address = %address, "Server listening");

    run(listener, service)?.await
}
