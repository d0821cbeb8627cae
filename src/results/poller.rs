//! Results poller.
//!
//! One task fetches the results collection, renders it, then waits before
//! the next fetch. The wait starts only after the render, so a slow backend
//! slows the polling rate instead of stacking requests.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::row::ResultsCollection;
use super::table::{render_results, ResultsView, TableOptions};
use crate::error::ResultsError;
use crate::traits::{element_ids, Headers, HttpClient, PageSurface};

/// Default delay between the end of one poll and the start of the next.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Default ceiling for the failure backoff.
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(240);

/// Configuration for the results poller.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Absolute URL of the results endpoint
    pub results_url: String,
    /// Delay after a successful poll
    pub interval: Duration,
    /// Longest delay after repeated failures
    pub max_backoff: Duration,
    /// Element the table is rendered into
    pub container_id: String,
    pub table: TableOptions,
}

impl PollerConfig {
    pub fn new(results_url: impl Into<String>) -> Self {
        Self {
            results_url: results_url.into(),
            interval: DEFAULT_POLL_INTERVAL,
            max_backoff: DEFAULT_MAX_BACKOFF,
            container_id: element_ids::RESULTS.to_string(),
            table: TableOptions::default(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    pub fn with_table_options(mut self, table: TableOptions) -> Self {
        self.table = table;
        self
    }

    /// Delay before the next poll given the current failure streak.
    ///
    /// No failures: the interval. Otherwise the interval doubled per failure
    /// after the first, capped at `max_backoff` (never below the interval).
    pub fn next_delay(&self, consecutive_failures: u32) -> Duration {
        if consecutive_failures == 0 {
            return self.interval;
        }
        let factor = 1u32 << (consecutive_failures - 1).min(16);
        self.interval
            .saturating_mul(factor)
            .min(self.max_backoff.max(self.interval))
    }
}

/// Result of one poll cycle.
#[derive(Debug, Clone)]
pub enum PollOutcome {
    /// The table (or the empty placeholder) was rendered from fresh data
    Rendered { rows: usize },
    /// The fetch or payload failed and the placeholder was rendered instead
    Failed(ResultsError),
}

impl PollOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PollOutcome::Rendered { .. })
    }

    /// A failure that later polls will not fix on their own (bad URL, 4xx).
    pub fn needs_attention(&self) -> bool {
        matches!(self, PollOutcome::Failed(e) if !e.is_retryable())
    }
}

/// Fetches and renders the results collection.
pub struct Poller {
    client: Arc<dyn HttpClient>,
    page: Arc<dyn PageSurface>,
    config: PollerConfig,
}

impl Poller {
    pub fn new(
        client: Arc<dyn HttpClient>,
        page: Arc<dyn PageSurface>,
        config: PollerConfig,
    ) -> Self {
        Self {
            client,
            page,
            config,
        }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Request the current results collection.
    pub async fn fetch(&self) -> Result<ResultsCollection, ResultsError> {
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), "application/json".to_string());

        let response = self.client.get(&self.config.results_url, &headers).await?;
        if !response.is_success() {
            return Err(ResultsError::HttpStatus {
                status: response.status,
            });
        }
        ResultsCollection::from_slice(&response.body)
    }

    /// Run one fetch-and-render cycle.
    ///
    /// Failures never propagate: they render the "No Results" placeholder so
    /// the loop stays alive.
    pub async fn poll_once(&self) -> PollOutcome {
        match self.fetch().await {
            Ok(collection) => {
                let view = render_results(
                    self.page.as_ref(),
                    &self.config.container_id,
                    &collection,
                    &self.config.table,
                );
                let rows = match view {
                    ResultsView::NoResults => 0,
                    ResultsView::Table(table) => table.rows.len(),
                };
                debug!("Rendered {} result rows", rows);
                PollOutcome::Rendered { rows }
            }
            Err(e) => {
                warn!("Results poll failed: {}", e);
                render_results(
                    self.page.as_ref(),
                    &self.config.container_id,
                    &ResultsCollection::default(),
                    &self.config.table,
                );
                PollOutcome::Failed(e)
            }
        }
    }

    /// Start the polling loop on the runtime.
    pub fn spawn(self) -> PollerHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let (cycles_tx, cycles_rx) = watch::channel(0u64);
        let refresh = Arc::new(Notify::new());

        info!(
            "Polling {} every {:?}",
            self.config.results_url, self.config.interval
        );

        let task = tokio::spawn(run_poll_loop(self, stop_rx, Arc::clone(&refresh), cycles_tx));

        PollerHandle {
            stop_tx,
            refresh,
            cycles_rx,
            task,
        }
    }
}

/// Control handle for a running poller.
///
/// Dropping the handle stops the loop after its current cycle.
pub struct PollerHandle {
    stop_tx: watch::Sender<bool>,
    refresh: Arc<Notify>,
    cycles_rx: watch::Receiver<u64>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Cut the current delay short and poll again.
    ///
    /// A refresh requested while a poll is in flight runs right after it;
    /// polls never overlap.
    pub fn refresh_now(&self) {
        self.refresh.notify_one();
    }

    /// Number of completed poll cycles.
    pub fn completed_cycles(&self) -> u64 {
        *self.cycles_rx.borrow()
    }

    /// Subscribe to the completed cycle counter.
    pub fn cycle_receiver(&self) -> watch::Receiver<u64> {
        self.cycles_rx.clone()
    }

    /// Ask the loop to exit. An in-flight poll still completes.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// Stop the loop and wait for the task to finish.
    pub async fn stop_and_wait(self) {
        self.stop();
        let _ = self.task.await;
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

async fn run_poll_loop(
    poller: Poller,
    mut stop_rx: watch::Receiver<bool>,
    refresh: Arc<Notify>,
    cycles_tx: watch::Sender<u64>,
) {
    let mut failures: u32 = 0;

    loop {
        if *stop_rx.borrow() {
            break;
        }

        let outcome = poller.poll_once().await;
        match &outcome {
            PollOutcome::Rendered { .. } => failures = 0,
            PollOutcome::Failed(_) => failures = failures.saturating_add(1),
        }
        cycles_tx.send_modify(|cycles| *cycles += 1);

        let delay = poller.config.next_delay(failures);
        if outcome.needs_attention() {
            error!(
                "{} will not recover on its own; next attempt in {:?}",
                poller.config.results_url, delay
            );
        } else {
            debug!("Next results poll in {:?}", delay);
        }

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = refresh.notified() => {
                debug!("Results refresh requested");
            }
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
            }
        }
    }

    info!("Results poller stopped");
}
