//! Agora demo site entry point.
//!
//! Binary name: `agora`
//!
//! Parses CLI arguments, loads the site configuration, then either starts
//! the HTTP server (with the visitor simulator, when enabled) or runs one
//! of the utility commands.

mod cli;
mod config;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use agora_core::visitor::VisitorSimulator;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need config or logging
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "agora", &mut std::io::stdout());
        return Ok(());
    }

    agora_observe::init_tracing(cli.verbose, cli.quiet, cli.json_logs)?;

    let mut config = config::load_site_config(&cli.config).await;

    match cli.command {
        Commands::Serve { port, host } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }

            let state = AppState::new(config);

            // Synthetic visitors keep the demo chat lively.
            let simulator = state.config.visitors.enabled.then(|| {
                VisitorSimulator::new(
                    state.bus.clone(),
                    state.registry.clone(),
                    state.config.visitors.clone(),
                )
                .spawn()
            });

            let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Agora listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if let Some(token) = simulator {
                token.cancel();
            }
            println!("\n  Server stopped.");
        }

        Commands::Sitemap => {
            let xml = agora_render::sitemap::generate(&config.base_url, &config.docs_dir)?;
            println!("{xml}");
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
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
