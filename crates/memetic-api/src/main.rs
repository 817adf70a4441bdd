//! Memetic CLI and REST API entry point.
//!
//! Binary name: `memetic`
//!
//! Parses CLI arguments, initializes database and services, then dispatches
//! to the appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "memetic", &mut std::io::stdout());
        return Ok(());
    }

    match cli.command {
        Commands::Init => {
            init_logging(cli.verbose, cli.quiet, false)?;
            let state = AppState::init().await?;
            let api_key = http::extractors::auth::ensure_api_key(&state).await?;
            println!("Data directory: {}", state.data_dir.display());
            if api_key.starts_with("memetic_") {
                println!();
                println!("API key generated (save this -- it won't be shown again):");
                println!();
                println!("  {api_key}");
                println!();
            } else {
                println!("API key: {api_key}");
            }
        }

        Commands::Serve { port, host, otel } => {
            init_logging(cli.verbose, cli.quiet, otel)?;
            let state = AppState::init().await?;

            // Ensure an API key exists, print it if new
            let api_key = http::extractors::auth::ensure_api_key(&state).await?;
            if api_key.starts_with("memetic_") {
                println!();
                println!("API key generated (save this -- it won't be shown again):");
                println!();
                println!("  {api_key}");
                println!();
            }

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            tracing::info!("Memetic API listening on http://{addr}");

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            memetic_observe::tracing_setup::shutdown_tracing();
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Initialize logging from verbosity flags, optionally with the OTel bridge.
fn init_logging(verbose: u8, quiet: bool, otel: bool) -> anyhow::Result<()> {
    let filter = match verbose {
        0 if quiet => "error",
        0 => "warn,memetic=info",
        1 => "info,memetic=debug",
        _ => "trace",
    };

    memetic_observe::tracing_setup::init_tracing(filter, otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
