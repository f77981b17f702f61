use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use linkwatch::watch_file_with_config;
use linkwatch_cli::{cli::Cli, config, output};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over flags
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = cli.level().to_string().to_lowercase();
        EnvFilter::new(format!("linkwatch={},linkwatch_cli={}", level, level))
    });
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = config::load(&cli)?;
    debug!("Using {} backend", config.backend.as_str());

    let cancel = CancellationToken::new();
    let (tx, mut events) = mpsc::channel(config.channel_capacity);
    let dispatcher = watch_file_with_config(cancel.clone(), &cli.path, tx, &config)
        .await
        .with_context(|| format!("Failed to watch {}", cli.path.display()))?;
    dispatcher.request_snapshot()?;

    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, stopping watch");
        }
        ctrl_c.cancel();
    });

    #[cfg(unix)]
    spawn_snapshot_on_hangup(dispatcher.clone());

    while let Some(event) = events.recv().await {
        println!("{}", output::render(&event, cli.print_content));
    }
    Ok(())
}

/// Re-announce the current state whenever the process receives SIGHUP.
#[cfg(unix)]
fn spawn_snapshot_on_hangup(dispatcher: linkwatch::Dispatcher) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(hangup) => hangup,
            Err(e) => {
                tracing::warn!("Cannot listen for SIGHUP: {}", e);
                return;
            }
        };
        while hangup.recv().await.is_some() {
            if dispatcher.request_snapshot().is_err() {
                break;
            }
        }
    });
}
