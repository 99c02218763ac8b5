use chrono::Utc;
use fanpulse_core::model::{
    CollectionSummary, CommentStats, RealtimeSnapshot, SentimentStats, TeamComparison,
    TeamComparisonEntry,
};
use fanpulse_core::{metrics, QueryParams};
use serde_json::Value as JsonValue;

use crate::{ApiClient, ApiError};

pub async fn dashboard_data(api: &ApiClient) -> Result<JsonValue, ApiError> {
    api.get("/dashboard/data", &QueryParams::new()).await
}

pub async fn overall_stats(api: &ApiClient) -> Result<SentimentStats, ApiError> {
    api.get("/dashboard/stats", &QueryParams::new()).await
}

pub async fn team_comparison(api: &ApiClient) -> Result<TeamComparison, ApiError> {
    api.get("/dashboard/comparison", &QueryParams::new()).await
}

/// The backend mounts its health check at the server root, outside the API base path.
pub async fn health(api: &ApiClient) -> Result<JsonValue, ApiError> {
    api.get_at_root("/health").await
}

/// Best-rated teams by average sentiment.
pub async fn top_teams(api: &ApiClient, limit: usize) -> Result<Vec<TeamComparisonEntry>, ApiError> {
    let comparison = team_comparison(api).await?;
    Ok(metrics::top_teams(&comparison.teams, limit))
}

async fn both_stats(api: &ApiClient) -> Result<(CommentStats, SentimentStats), ApiError> {
    let params = QueryParams::new();
    let comments = api.get::<CommentStats>("/comments/stats", &params);
    let sentiments = api.get::<SentimentStats>("/sentiments/stats", &params);
    tokio::try_join!(comments, sentiments)
}

/// Comment and sentiment statistics fetched concurrently.
pub async fn realtime_snapshot(api: &ApiClient) -> Result<RealtimeSnapshot, ApiError> {
    let (comments, sentiments) = both_stats(api).await?;
    Ok(RealtimeSnapshot {
        timestamp: Utc::now(),
        comments_total: comments.total_comments,
        comments_unprocessed: comments.unprocessed_comments,
        sentiments_total: sentiments.total_analyzed,
        breakdown: sentiments.sentiment_breakdown.unwrap_or_default(),
    })
}

pub async fn collection_summary(api: &ApiClient) -> Result<CollectionSummary, ApiError> {
    let (comments, sentiments) = both_stats(api).await?;
    Ok(metrics::collection_summary(&comments, &sentiments))
}
