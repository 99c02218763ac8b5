use fanpulse_core::model::{CategoryStats, DailySummary, DataEnvelope};
use fanpulse_core::QueryParams;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::{ApiClient, ApiError};

fn team_path(base: &str, team_id: Option<&str>) -> String {
    match team_id {
        Some(team_id) => format!("{base}/{team_id}"),
        None => base.to_string(),
    }
}

pub async fn enhanced_stats(api: &ApiClient, team_id: Option<&str>) -> Result<JsonValue, ApiError> {
    let envelope: DataEnvelope<JsonValue> = api
        .get(
            &team_path("/sentiments/enhanced-stats", team_id),
            &QueryParams::new(),
        )
        .await?;
    Ok(envelope.data)
}

pub async fn generate_daily_summary(
    api: &ApiClient,
    team_id: Option<&str>,
) -> Result<DailySummary, ApiError> {
    let envelope: DataEnvelope<DailySummary> = api
        .post_empty(
            &team_path("/sentiments/summary/generate", team_id),
            &QueryParams::new(),
        )
        .await?;
    Ok(envelope.data)
}

pub async fn trend_insights(api: &ApiClient, team_id: Option<&str>) -> Result<JsonValue, ApiError> {
    let envelope: DataEnvelope<JsonValue> = api
        .get(
            &team_path("/sentiments/trends/insights", team_id),
            &QueryParams::new(),
        )
        .await?;
    Ok(envelope.data)
}

pub async fn category_stats(
    api: &ApiClient,
    team_id: Option<&str>,
) -> Result<CategoryStats, ApiError> {
    let params = QueryParams::new().with_opt("team_id", team_id);
    api.get("/sentiments/categories/stats", &params).await
}

#[derive(Serialize)]
struct TestModelRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct TestModelResponse {
    #[serde(default)]
    results: JsonValue,
}

/// Runs `text` through the backend's model comparison endpoint.
pub async fn test_model(api: &ApiClient, text: &str) -> Result<JsonValue, ApiError> {
    let response: TestModelResponse = api
        .post("/sentiments/test-grok", &TestModelRequest { text })
        .await?;
    Ok(response.results)
}
