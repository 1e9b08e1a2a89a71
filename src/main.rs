use flashcards_backend::config::Config;
use flashcards_backend::db::config::DbConfig;
use flashcards_backend::db::{gate, schema, Database};
use flashcards_backend::logging;
use flashcards_backend::state::AppState;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = logging::init_tracing(&config.log);

    let db_config = match DbConfig::from_env() {
        Ok(db_config) => db_config,
        Err(err) => {
            tracing::error!(error = %err, "invalid database configuration");
            std::process::exit(1);
        }
    };
    let auto_schema = db_config.auto_schema;

    let database = match Database::connect_lazy(db_config) {
        Ok(database) => database,
        Err(err) => {
            tracing::error!(error = %err, "database pool not initialized");
            std::process::exit(1);
        }
    };

    if let Err(err) = gate::wait_for_database(&database).await {
        tracing::error!(error = %err, "database never became reachable, not serving");
        std::process::exit(1);
    }

    if auto_schema {
        if let Err(err) = schema::ensure_schema(&database).await {
            tracing::error!(error = %err, "schema bootstrap failed");
            std::process::exit(1);
        }
    }

    let app = flashcards_backend::create_app(AppState::new(database.clone()));

    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(%addr, error = %err, "bind listener failed");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, "flashcards backend listening");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    if let Err(e) = server.await {
        tracing::error!(error = %e, "server error");
    }

    tracing::info!("HTTP server stopped, closing database pool");
    database.close().await;
    tracing::info!("Graceful shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
