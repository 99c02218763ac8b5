use fanpulse_core::model::{
    Ack, AnalyzeResponse, BatchAnalyzeResponse, CommentPage, DateRange, SentimentResult,
    SentimentStats, Source, TeamComparison, TeamReport,
};
use fanpulse_core::QueryParams;
use serde::Serialize;
use serde_json::Value as JsonValue;

use super::format_date;
use crate::{ApiClient, ApiError};

pub const DEFAULT_LANGUAGE: &str = "tr";

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
    language: &'a str,
}

#[derive(Serialize)]
struct BatchRequest<'a> {
    texts: &'a [String],
}

#[derive(Serialize)]
struct SaveRequest<'a> {
    comment_id: &'a str,
    team_id: Option<&'a str>,
    result: &'a SentimentResult,
}

pub async fn analyze_text(
    api: &ApiClient,
    text: &str,
    language: &str,
) -> Result<SentimentResult, ApiError> {
    let response: AnalyzeResponse = api
        .post("/sentiments/analyze", &AnalyzeRequest { text, language })
        .await?;
    Ok(response.result)
}

pub async fn analyze_batch(
    api: &ApiClient,
    texts: &[String],
) -> Result<BatchAnalyzeResponse, ApiError> {
    api.post("/sentiments/analyze/batch", &BatchRequest { texts })
        .await
}

pub async fn sentiment_stats(api: &ApiClient) -> Result<SentimentStats, ApiError> {
    api.get("/sentiments/stats", &QueryParams::new()).await
}

/// Report for one team; either end of `range` may be open.
pub async fn team_report(
    api: &ApiClient,
    team_id: &str,
    range: DateRange,
) -> Result<TeamReport, ApiError> {
    let params = QueryParams::new()
        .with_opt("start_date", range.start.map(format_date))
        .with_opt("end_date", range.end.map(format_date));
    api.get(&format!("/sentiments/report/{team_id}"), &params)
        .await
}

pub async fn save_sentiment(
    api: &ApiClient,
    comment_id: &str,
    team_id: Option<&str>,
    result: &SentimentResult,
) -> Result<Ack, ApiError> {
    let body = SaveRequest {
        comment_id,
        team_id,
        result,
    };
    api.post("/sentiments", &body).await
}

pub async fn team_breakdown(api: &ApiClient) -> Result<TeamComparison, ApiError> {
    api.get("/dashboard/comparison", &QueryParams::new()).await
}

/// Dashboard payload backing the sentiment summary panel.
pub async fn sentiment_summary(api: &ApiClient) -> Result<JsonValue, ApiError> {
    api.get("/dashboard/data", &QueryParams::new()).await
}

/// Analysed comments from one platform.
pub async fn comments_by_sentiment_source(
    api: &ApiClient,
    source: Source,
    params: &QueryParams,
) -> Result<CommentPage, ApiError> {
    let params = params
        .clone()
        .with("has_sentiment", true)
        .with("source", source);
    api.get("/comments", &params).await
}
