//! Dashboard controller.
//!
//! Owns the two update loops and exposes the user actions the page and the
//! terminal trigger. The loops share nothing but the page surface.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::channel::{ChannelClient, ChannelState, StatusDisplay};
use crate::config::DashboardConfig;
use crate::error::{ChannelError, DashboardResult, ResultsError};
use crate::results::{Poller, PollerHandle};
use crate::traits::{element_ids, ChannelTransport, Headers, HttpClient, PageSurface};

/// How long shutdown waits for the closing handshake.
const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// The running dashboard.
pub struct Dashboard {
    config: DashboardConfig,
    http: Arc<dyn HttpClient>,
    transport: Arc<dyn ChannelTransport>,
    display: Arc<StatusDisplay>,
    poller: PollerHandle,
    channel: RwLock<Option<ChannelClient>>,
}

impl Dashboard {
    /// Start the results poller and open the status channel.
    ///
    /// A channel that cannot be constructed is not fatal: the poller keeps
    /// running and the failure stays visible as the status line.
    pub async fn start(
        config: DashboardConfig,
        http: Arc<dyn HttpClient>,
        transport: Arc<dyn ChannelTransport>,
        page: Arc<dyn PageSurface>,
    ) -> Self {
        let poller = Poller::new(http.clone(), page.clone(), config.poller_config()).spawn();
        let display = Arc::new(StatusDisplay::new(page, element_ids::STATUS));

        let channel = Self::open_channel(&config, &transport, &display).await;

        Self {
            config,
            http,
            transport,
            display,
            poller,
            channel: RwLock::new(channel),
        }
    }

    async fn open_channel(
        config: &DashboardConfig,
        transport: &Arc<dyn ChannelTransport>,
        display: &Arc<StatusDisplay>,
    ) -> Option<ChannelClient> {
        match ChannelClient::init(transport.clone(), config.channel_config(), display.clone()).await
        {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("Status channel unavailable: {}", e);
                None
            }
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn poller(&self) -> &PollerHandle {
        &self.poller
    }

    pub fn status(&self) -> &Arc<StatusDisplay> {
        &self.display
    }

    /// Current channel state; `Errored` when no socket could be constructed.
    pub async fn channel_state(&self) -> ChannelState {
        match self.channel.read().await.as_ref() {
            Some(client) => client.state(),
            None => ChannelState::Errored,
        }
    }

    /// Send one line of user input over the status channel.
    pub async fn send_message(&self, text: &str) -> DashboardResult<()> {
        let channel = self.channel.read().await;
        let client = channel.as_ref().ok_or(ChannelError::NotConnected)?;
        client.send_message(text).await?;
        Ok(())
    }

    /// Close the current socket (if any) and construct a new one.
    pub async fn reconnect(&self) -> DashboardResult<ChannelState> {
        let mut channel = self.channel.write().await;
        if let Some(old) = channel.take() {
            old.teardown();
            // The old socket's close line must land before the new one opens
            if tokio::time::timeout(CLOSE_GRACE, old.closed()).await.is_err() {
                warn!("Previous status channel did not close within {:?}", CLOSE_GRACE);
                old.detach();
            }
        }

        info!("Reconnecting status channel");
        let client = ChannelClient::init(
            self.transport.clone(),
            self.config.channel_config(),
            self.display.clone(),
        )
        .await?;
        let state = client.state();
        *channel = Some(client);
        Ok(state)
    }

    /// Wake the poller now instead of after its delay.
    pub fn refresh(&self) {
        self.poller.refresh_now();
    }

    /// Ask the backend to drop its stored results, then refresh the table.
    pub async fn clear_results(&self) -> DashboardResult<()> {
        let url = self.config.clear_results_url();
        let response = self
            .http
            .post(&url, "", &Headers::new())
            .await
            .map_err(ResultsError::from)?;

        if !response.is_success() {
            return Err(ResultsError::HttpStatus {
                status: response.status,
            }
            .into());
        }

        info!("Cleared results on the backend");
        self.refresh();
        Ok(())
    }

    /// Stop polling and close the channel.
    pub async fn shutdown(&self) {
        self.poller.stop();

        let channel = self.channel.read().await;
        if let Some(client) = channel.as_ref() {
            client.teardown();
            if tokio::time::timeout(CLOSE_GRACE, client.closed())
                .await
                .is_err()
            {
                warn!("Status channel did not finish closing within {:?}", CLOSE_GRACE);
                client.detach();
            }
        }
        info!("Dashboard stopped");
    }
}
