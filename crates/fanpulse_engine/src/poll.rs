//! Interval polling with one cancellation token per tick.
//!
//! When a tick fires while the previous request is still running, that
//! request is cancelled before the next one starts, so results never
//! arrive out of order.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fanpulse_core::model::{RealtimeSnapshot, TrendPeriod, TrendView};
use fanpulse_logging::{pulse_debug, pulse_info};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::resources::{dashboard, trends};
use crate::{ApiClient, ApiError};

/// Refresh rate of the live totals.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Refresh rate of the trend view.
pub const TREND_POLL_INTERVAL: Duration = Duration::from_secs(30);

#[async_trait]
pub trait PollTask: Send + Sync + 'static {
    type Output: Send + 'static;

    async fn poll(&self) -> Result<Self::Output, ApiError>;
}

/// Polls comment and sentiment totals for the live dashboard.
pub struct RealtimeMonitor {
    api: ApiClient,
}

impl RealtimeMonitor {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PollTask for RealtimeMonitor {
    type Output = RealtimeSnapshot;

    async fn poll(&self) -> Result<RealtimeSnapshot, ApiError> {
        dashboard::realtime_snapshot(&self.api).await
    }
}

/// Polls trend analysis and insights for one period.
pub struct TrendMonitor {
    api: ApiClient,
    period: TrendPeriod,
}

impl TrendMonitor {
    pub fn new(api: ApiClient, period: TrendPeriod) -> Self {
        Self { api, period }
    }

    pub fn period(&self) -> TrendPeriod {
        self.period
    }
}

#[async_trait]
impl PollTask for TrendMonitor {
    type Output = TrendView;

    async fn poll(&self) -> Result<TrendView, ApiError> {
        trends::trend_view(&self.api, self.period).await
    }
}

pub struct Poller {
    interval: Duration,
    shutdown: CancellationToken,
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Cancelling this token stops the poller and any request in flight.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Starts polling on the current runtime. The first poll runs immediately.
    pub fn start<T: PollTask>(&self, task: Arc<T>) -> PollHandle<T::Output> {
        let (tx, rx) = mpsc::unbounded_channel();
        let join = tokio::spawn(drive(task, self.interval, self.shutdown.clone(), tx));
        PollHandle {
            results: rx,
            join,
            shutdown: self.shutdown.clone(),
        }
    }
}

impl Default for Poller {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

pub struct PollHandle<O> {
    results: mpsc::UnboundedReceiver<Result<O, ApiError>>,
    join: JoinHandle<()>,
    shutdown: CancellationToken,
}

impl<O> PollHandle<O> {
    /// Next completed poll; `None` once the poller has stopped.
    pub async fn next(&mut self) -> Option<Result<O, ApiError>> {
        self.results.recv().await
    }

    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    pub async fn join(self) {
        self.shutdown.cancel();
        if let Err(err) = self.join.await {
            pulse_debug!("poll loop ended abnormally: {}", err);
        }
    }
}

async fn drive<T: PollTask>(
    task: Arc<T>,
    interval: Duration,
    shutdown: CancellationToken,
    tx: mpsc::UnboundedSender<Result<T::Output, ApiError>>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut current: Option<CancellationToken> = None;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {}
        }
        if tx.is_closed() {
            break;
        }
        if let Some(previous) = current.take() {
            previous.cancel();
        }

        let tick = shutdown.child_token();
        current = Some(tick.clone());
        let task = Arc::clone(&task);
        let tx = tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tick.cancelled() => pulse_debug!("poll cancelled before completion"),
                result = task.poll() => {
                    let _ = tx.send(result);
                }
            }
        });
    }

    if let Some(previous) = current {
        previous.cancel();
    }
    pulse_info!("poller stopped");
}
