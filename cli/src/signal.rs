use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Returns a token cancelled on the first termination signal.
///
/// Must be called from within the runtime.
#[cfg(unix)]
pub fn shutdown_token() -> anyhow::Result<CancellationToken> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt()).context("registering SIGINT")?;
    let mut terminate = signal(SignalKind::terminate()).context("registering SIGTERM")?;
    let mut quit = signal(SignalKind::quit()).context("registering SIGQUIT")?;

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        let name: &str = tokio::select! {
            _ = interrupt.recv() => "SIGINT",
            _ = terminate.recv() => "SIGTERM",
            _ = quit.recv() => "SIGQUIT",
        };
        info!("received {name}, shutting down");
        trigger.cancel();
    });
    Ok(token)
}

#[cfg(not(unix))]
pub fn shutdown_token() -> anyhow::Result<CancellationToken> {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl-C, shutting down");
            trigger.cancel();
        }
    });
    Ok(token)
}
