use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use retouch_cli::config::SessionConfig;
use retouch_cli::session::Session;
use retouch_core::orchestrator::EditOrchestrator;
use retouch_gateway::config::GatewayConfig;
use retouch_gateway::gateway::GenerativeGateway;
use tokio::io::BufReader;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Edit a photo with natural-language instructions.
///
/// Commands are read from stdin one per line; type `help` for the list.
#[derive(Debug, Parser)]
#[command(name = "retouch", version)]
struct Cli {
    /// Image to edit (PNG, JPEG or WEBP).
    input: PathBuf,

    /// Where `save` writes when no path is given [env: EDIT_OUTPUT].
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Seconds to wait for each generative edit [env: EDIT_TIMEOUT_SECS].
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "retouch_cli=info,retouch_core=info,retouch_gateway=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = SessionConfig::from_env()
        .context("Invalid session configuration")?
        .with_overrides(cli.timeout_secs, cli.output)
        .context("Invalid command-line option")?;
    let gateway_config = GatewayConfig::from_env().context("Invalid generator configuration")?;
    let gateway =
        GenerativeGateway::new(&gateway_config).context("Failed to build generator client")?;
    tracing::info!(
        model = %gateway_config.model,
        timeout_secs = config.edit_timeout.as_secs(),
        "Generator client ready",
    );

    let orchestrator = Arc::new(EditOrchestrator::with_timeout(
        gateway,
        config.edit_timeout,
    ));
    spawn_event_logger(&orchestrator);

    let mut session = Session::new(Arc::clone(&orchestrator), config);
    let loaded = session
        .load_file(&cli.input)
        .await
        .with_context(|| format!("Failed to load {}", cli.input.display()))?;
    println!(
        "loaded {}: {}x{} {} (type 'help' for commands)",
        cli.input.display(),
        loaded.width(),
        loaded.height(),
        loaded.content_type()
    );

    session
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
        .context("Session I/O failed")?;

    tracing::info!("Session ended");
    Ok(())
}

/// Log every session event at debug level as JSON.
fn spawn_event_logger(orchestrator: &EditOrchestrator<GenerativeGateway>) {
    let mut rx = orchestrator.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => tracing::debug!(event = %json, "Session event"),
                    Err(e) => tracing::warn!(error = %e, "Failed to serialize session event"),
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event logger lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}
