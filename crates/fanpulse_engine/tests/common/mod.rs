#![allow(dead_code)]

use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Once};
use std::time::Duration;

use fanpulse_core::Notice;
use fanpulse_engine::{ApiClient, ChannelNotificationSink, GatewaySettings, QueryCache};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-key";

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(fanpulse_logging::initialize_for_tests);
}

pub fn settings(base_url: &str) -> GatewaySettings {
    GatewaySettings {
        base_url: base_url.to_string(),
        api_key: TEST_API_KEY.to_string(),
        connect_timeout: Duration::from_secs(2),
        request_timeout: Duration::from_secs(5),
    }
}

/// Client pointed at `server` plus the receiving end of its notices.
pub fn client(server: &MockServer) -> (ApiClient, Receiver<Notice>) {
    init_logging();
    let (tx, rx) = mpsc::channel();
    let api = ApiClient::new(
        &settings(&server.uri()),
        Arc::new(ChannelNotificationSink::new(tx)),
    )
    .expect("client builds");
    (api, rx)
}

pub fn cache() -> Arc<QueryCache> {
    Arc::new(QueryCache::new())
}

pub fn notices(rx: &Receiver<Notice>) -> Vec<Notice> {
    rx.try_iter().collect()
}

pub fn comment_json(id: &str, text: &str) -> Value {
    json!({
        "id": id,
        "text": text,
        "author": "taraftar",
        "source": "reddit",
        "team_id": "galatasaray",
        "url": "",
        "is_processed": false,
        "created_at": "2024-05-01T12:00:00Z"
    })
}

pub fn page_json(ids: &[&str], total_pages: u32) -> Value {
    let comments: Vec<Value> = ids
        .iter()
        .map(|id| comment_json(id, &format!("yorum {id}")))
        .collect();
    json!({
        "comments": comments,
        "total": ids.len(),
        "page": 1,
        "limit": 20,
        "total_pages": total_pages
    })
}

pub fn comment_stats_json() -> Value {
    json!({
        "total_comments": 120,
        "processed_comments": 100,
        "unprocessed_comments": 20,
        "sentiment_breakdown": {"POSITIVE": 50, "NEGATIVE": 30, "NEUTRAL": 20},
        "source_breakdown": {"reddit": 80, "youtube": 40}
    })
}

pub fn sentiment_stats_json() -> Value {
    json!({
        "total_comments": 120,
        "total_analyzed": 100,
        "overall_sentiment": 0.2,
        "sentiment_breakdown": {"POSITIVE": 50, "NEGATIVE": 30, "NEUTRAL": 20},
        "recent_trends": null,
        "team_comparison": []
    })
}

pub fn result_json(label: &str, confidence: f64) -> Value {
    json!({"label": label, "confidence": confidence, "score": 0.5})
}
