use std::net::SocketAddr;
use std::time::Duration;

use http::{Method, header};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use records_gateway::{build_router, config::Config, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    tracing::info!("✅ Configuration loaded successfully");

    let state = AppState::new(&config)?;
    tracing::info!("✅ AppState initialized");

    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse().unwrap(),
            "http://127.0.0.1:3000".parse().unwrap(),
        ])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::COOKIE,
            "x-request-id".parse().unwrap(),
            "x-gateway-signature-alg".parse().unwrap(),
            "x-gateway-signature".parse().unwrap(),
            "x-gateway-timestamp".parse().unwrap(),
            "x-gateway-nonce".parse().unwrap(),
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400));

    let app = build_router(state).layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], 8080));
    tracing::info!("🚀 Gateway listening on http://{}", addr);
    tracing::info!("✅ Admission pipeline active: HMAC → session → role");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
