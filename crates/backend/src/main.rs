pub mod domain;
pub mod handlers;
pub mod routes;
pub mod shared;

use axum::http::{header, HeaderName, Method};
use axum::middleware;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(handlers::collections::ACTOR_HEADER),
        ])
        .expose_headers([header::CONTENT_DISPOSITION])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shared::logging::init_tracing(&std::path::Path::new("target").join("logs"))?;

    let config = shared::config::load_config()?;
    shared::data::db::initialize_database(&config)
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;
    let server = config.server.clone();
    shared::config::install(config);

    let app = routes::configure_routes()
        .layer(middleware::from_fn(shared::logging::request_logger))
        .layer(cors_layer());

    let addr: SocketAddr = format!("{}:{}", server.host, server.port).parse()?;
    tracing::info!("Binding CRM backend to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
            tracing::error!(
                "Port {} is already in use. Stop the other process or change [server] port in config.toml.",
                server.port
            );
            return Err(e.into());
        }
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;
    Ok(())
}
