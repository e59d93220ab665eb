//! Kokoro CLI and REST API entry point.
//!
//! Binary name: `kokoro`
//!
//! Loads `.env` and `kokoro.toml`, initializes tracing, then dispatches to
//! the requested command or starts the HTTP server.

mod cli;
mod http;
mod state;

use clap::Parser;

use kokoro_core::persona::PersonaRegistry;
use kokoro_infra::config::load_config;
use kokoro_observe::tracing_setup::{filter_for_verbosity, init_tracing, shutdown_tracing};
use kokoro_types::config::AppConfig;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is normal; variables may come from the real environment.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    init_tracing(filter_for_verbosity(cli.verbose), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    if let Ok(path) = &dotenv {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let mut config = load_config(&cli.config).await;

    let result = match cli.command {
        Commands::Personas => cli::persona::list_personas(&PersonaRegistry::builtin(), cli.json),

        Commands::Check => cli::check::check_provider(&config, cli.json).await,

        Commands::Serve { port, host } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            serve(config).await
        }
    };

    shutdown_tracing();
    result
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::init(config)?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        %addr,
        production = state.config.server.production,
        model = %state.config.chat.model,
        "server listening"
    );
    println!(
        "  {} Kokoro API listening on {}",
        console::style("♥").magenta().bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let sweeper = state.spawn_session_sweeper();
    let router = http::router::build_router(state);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    sweeper.abort();
    served?;

    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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

    tracing::info!("shutdown signal received");
}
