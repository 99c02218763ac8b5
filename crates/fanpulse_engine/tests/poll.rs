mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::client;
use fanpulse_core::model::TrendPeriod;
use fanpulse_engine::{ApiError, PollTask, Poller, TrendMonitor, TREND_POLL_INTERVAL};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Counter {
    started: AtomicUsize,
    finished: AtomicUsize,
    delay: Duration,
}

impl Counter {
    fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            started: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
            delay,
        })
    }
}

#[async_trait]
impl PollTask for Counter {
    type Output = usize;

    async fn poll(&self) -> Result<usize, ApiError> {
        let n = self.started.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        self.finished.fetch_add(1, Ordering::SeqCst);
        Ok(n)
    }
}

#[tokio::test(start_paused = true)]
async fn delivers_one_result_per_tick() {
    common::init_logging();
    let task = Counter::new(Duration::from_millis(10));
    let poller = Poller::new(Duration::from_secs(30));
    let mut handle = poller.start(Arc::clone(&task));

    assert_eq!(handle.next().await, Some(Ok(1)));
    assert_eq!(handle.next().await, Some(Ok(2)));
    assert_eq!(handle.next().await, Some(Ok(3)));
    handle.join().await;
}

#[tokio::test(start_paused = true)]
async fn slow_poll_is_cancelled_by_the_next_tick() {
    common::init_logging();
    let task = Counter::new(Duration::from_secs(45));
    let poller = Poller::new(Duration::from_secs(30));
    let handle = poller.start(Arc::clone(&task));

    tokio::time::sleep(Duration::from_secs(100)).await;
    assert!(task.started.load(Ordering::SeqCst) >= 3);
    assert_eq!(task.finished.load(Ordering::SeqCst), 0);
    handle.join().await;
}

#[tokio::test(start_paused = true)]
async fn stop_ends_the_result_stream() {
    common::init_logging();
    let task = Counter::new(Duration::from_millis(1));
    let poller = Poller::new(Duration::from_secs(1));
    let mut handle = poller.start(Arc::clone(&task));

    assert_eq!(handle.next().await, Some(Ok(1)));
    handle.stop();
    while handle.next().await.is_some() {}
    assert!(poller.shutdown_token().is_cancelled());
}

// Real time: paused time would fire the client timeouts while waiting on sockets.
#[tokio::test]
async fn trend_monitor_polls_the_selected_period() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/trends/analysis"))
        .and(query_param("period", "90d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"teams": [
            {"team_name": "Beşiktaş", "overall": {"total_comments": 7}}
        ]})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/trends/insights"))
        .and(query_param("period", "90d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"insights": null})))
        .mount(&server)
        .await;

    let (api, _rx) = client(&server);
    let monitor = Arc::new(TrendMonitor::new(api, TrendPeriod::Quarter));
    let poller = Poller::new(Duration::from_millis(200));
    let mut handle = poller.start(monitor);

    for _ in 0..2 {
        let view = handle.next().await.expect("running").expect("trend view");
        assert_eq!(view.period, TrendPeriod::Quarter);
        assert_eq!(view.analysis.teams[0].overall.total_comments, 7);
        assert!(view.insights.is_empty());
    }
    handle.join().await;
}

#[test]
fn live_totals_refresh_faster_than_trends() {
    assert_eq!(Poller::default().interval(), Duration::from_secs(5));
    assert_eq!(TREND_POLL_INTERVAL, Duration::from_secs(30));
}
