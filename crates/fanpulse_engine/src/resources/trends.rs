use chrono::Utc;
use fanpulse_core::model::{
    PeriodInsight, PeriodInsights, ReportFormat, TrendAnalysis, TrendPeriod, TrendView,
};
use fanpulse_core::QueryParams;

use crate::{ApiClient, ApiError};

fn period_params(period: TrendPeriod) -> QueryParams {
    QueryParams::new().with("period", period.as_str())
}

/// Daily comment volume per team over `period`.
pub async fn trend_analysis(api: &ApiClient, period: TrendPeriod) -> Result<TrendAnalysis, ApiError> {
    api.get("/trends/analysis", &period_params(period)).await
}

pub async fn period_insights(
    api: &ApiClient,
    period: TrendPeriod,
) -> Result<Vec<PeriodInsight>, ApiError> {
    let response: PeriodInsights = api.get("/trends/insights", &period_params(period)).await?;
    Ok(response.insights)
}

/// Trend analysis and insights fetched concurrently.
pub async fn trend_view(api: &ApiClient, period: TrendPeriod) -> Result<TrendView, ApiError> {
    let (analysis, insights) =
        tokio::try_join!(trend_analysis(api, period), period_insights(api, period))?;
    Ok(TrendView {
        period,
        fetched_at: Utc::now(),
        analysis,
        insights,
    })
}

/// Rendered executive report, HTML or JSON text as the server produced it.
pub async fn executive_report(
    api: &ApiClient,
    period: TrendPeriod,
    format: ReportFormat,
) -> Result<String, ApiError> {
    let params = period_params(period).with("format", format.as_str());
    api.get_text("/reports/executive/download", &params).await
}
