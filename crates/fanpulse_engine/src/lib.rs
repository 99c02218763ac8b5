//! FanPulse engine: HTTP gateway, query cache and the sessions that execute
//! core effects.
mod cache;
mod comments_session;
mod error;
mod gateway;
mod notify;
mod poll;
pub mod resources;
mod sentiment_session;

pub use cache::{CacheKey, QueryCache, COMMENTS_TTL, REPORT_TTL, STATS_TTL, SUMMARY_TTL};
pub use comments_session::{CommentsSession, MarkOutcome};
pub use error::{ApiError, ConfigError, DashboardError};
pub use gateway::{
    ApiClient, GatewaySettings, API_KEY_HEADER, DEFAULT_API_KEY, DEFAULT_BASE_URL, ENV_API_KEY,
    ENV_BASE_URL, ENV_TIMEOUT_SECS,
};
pub use notify::{failure_notice, ChannelNotificationSink, LogNotificationSink, NotificationSink};
pub use poll::{
    PollHandle, PollTask, Poller, RealtimeMonitor, TrendMonitor, DEFAULT_POLL_INTERVAL,
    TREND_POLL_INTERVAL,
};
pub use sentiment_session::SentimentSession;
