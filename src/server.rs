use crate::config::Config;
use crate::routes::{AppState, router};
use crate::store::Store;
use axum::http::{HeaderValue, Method, header::CONTENT_TYPE};
use eyre::{Error, WrapErr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal::{self, ctrl_c};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub async fn serve(config: &Config) -> Result<(), Error> {
    info!("Connecting to database...");
    let store = Store::connect(&config.database)
        .await
        .wrap_err("cannot open student database")?;
    let state = Arc::new(AppState {
        store,
        client_dir: config.server.client_dir.clone(),
    });

    let mut app = router(state).layer(TraceLayer::new_for_http());
    if let Some(origin) = &config.server.cors_origin {
        let origin = origin
            .parse::<HeaderValue>()
            .wrap_err_with(|| format!("invalid CORS origin {origin:?}"))?;
        app = app.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([CONTENT_TYPE]),
        );
    }

    let address = config.server.address;
    let listener = TcpListener::bind(address)
        .await
        .wrap_err_with(|| format!("cannot bind to {address}"))?;
    info!("Server is running on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("server failure")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "cannot listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "cannot install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
