use std::sync::Arc;
use std::time::Duration;

use arena_dashboard::adapters::{MemoryPage, ReqwestHttpClient, TungsteniteTransport};
use arena_dashboard::cli::{parse_args, run_cli_command};
use arena_dashboard::config::DashboardConfig;
use arena_dashboard::dashboard::Dashboard;
use arena_dashboard::page::{start_page_server_on, PageServerState};

use color_eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

/// Give up connecting to the backend after this long.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Send every line typed on stdin over the status channel.
async fn forward_stdin(dashboard: Arc<Dashboard>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim_end();
                if line.is_empty() {
                    continue;
                }
                match dashboard.send_message(line).await {
                    Ok(()) => {}
                    Err(e) if e.is_retryable() => {
                        warn!("Message not sent, retry once the channel is open: {}", e)
                    }
                    Err(e) => error!("Message not sent: {}", e),
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!("Reading stdin failed: {}", e);
                break;
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arena_dashboard=info".into()),
        )
        .init();

    let overrides = match run_cli_command(parse_args(std::env::args())?) {
        Some(overrides) => overrides,
        None => return Ok(()),
    };
    let config = overrides.apply(DashboardConfig::from_env()?);
    info!("Using arena backend at {}", config.http_base());

    let page = Arc::new(MemoryPage::new());
    let http = Arc::new(ReqwestHttpClient::with_connect_timeout(CONNECT_TIMEOUT)?);
    let transport = Arc::new(TungsteniteTransport::new().secure_only(config.secure_sockets()));

    let listen = config.listen;
    let dashboard = Arc::new(Dashboard::start(config, http, transport, page.clone()).await);

    let (server, _addr) = start_page_server_on(
        listen,
        PageServerState {
            page,
            dashboard: dashboard.clone(),
        },
    )
    .await?;

    let stdin_task = tokio::spawn(forward_stdin(dashboard.clone()));

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    stdin_task.abort();
    dashboard.shutdown().await;
    server.abort();

    Ok(())
}
