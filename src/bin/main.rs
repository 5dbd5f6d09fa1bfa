use eyre::WrapErr;
use listenfd::ListenFd;
use mimalloc::MiMalloc;
use tracing_subscriber::EnvFilter;

use plaintext_listener::{AnyResult, Server, ServerConfig};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> AnyResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    run().await
}

async fn run() -> AnyResult<()> {
    let config = ServerConfig::from_env()?;

    // prefer a socket handed over by systemfd/systemd over binding our own
    let server = match ListenFd::from_env()
        .take_tcp_listener(0)
        .wrap_err("failed to take inherited listener")?
    {
        Some(listener) => Server::from_std(listener, config)?,
        None => Server::bind(config).await?,
    };

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for ctrl-c; err = {e:?}");
            }
        })
        .await
}
