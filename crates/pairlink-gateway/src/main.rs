//! pairlink gateway binary.
//!
//! Bootstrap only:
//! - Config load + validation
//! - Tracing subscriber
//! - TCP bind + axum serve
//!
//! TLS termination and static asset hosting belong to the deployment layer,
//! not this process.

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use pairlink_gateway::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cfg = config::load_from_file("pairlink.yaml").expect("config load failed");
    let listen: SocketAddr = cfg
        .gateway
        .listen
        .parse()
        .expect("gateway.listen must be a valid SocketAddr");

    let state = app_state::AppState::new(cfg).expect("app state build failed");
    let app = router::build_router(state);

    tracing::info!(%listen, "pairlink-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app).await.expect("server failed");
}
