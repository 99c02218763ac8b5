//! Transport-level view models exchanged with the dashboard backend.
//!
//! Persistence lives in the backend; these types only mirror the JSON shapes it
//! returns. Unknown fields are ignored and missing optional fields default.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

pub type CommentId = String;
pub type TeamId = String;

/// Raw per-label counts as reported by the backend (`{"POSITIVE": 12, ...}`).
pub type LabelCounts = BTreeMap<String, u64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Reddit,
    Twitter,
    Youtube,
    Instagram,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Reddit => "reddit",
            Source::Twitter => "twitter",
            Source::Youtube => "youtube",
            Source::Instagram => "instagram",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "reddit" => Some(Source::Reddit),
            "twitter" => Some(Source::Twitter),
            "youtube" => Some(Source::Youtube),
            "instagram" => Some(Source::Instagram),
            _ => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Neutral => "NEUTRAL",
            SentimentLabel::Negative => "NEGATIVE",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" => Some(SentimentLabel::Positive),
            "NEUTRAL" => Some(SentimentLabel::Neutral),
            "NEGATIVE" => Some(SentimentLabel::Negative),
            _ => None,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one sentiment analysis, embedded in a comment or produced ad hoc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toxicity_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    #[serde(default)]
    pub author: String,
    pub source: Source,
    #[serde(default)]
    pub team_id: Option<TeamId>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default)]
    pub sentiment: Option<SentimentResult>,
    #[serde(default)]
    pub is_processed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub is_active: bool,
}

/// One page of `GET /comments`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CommentPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommentStats {
    #[serde(default)]
    pub total_comments: u64,
    #[serde(default)]
    pub processed_comments: u64,
    #[serde(default)]
    pub unprocessed_comments: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sentiment_breakdown: LabelCounts,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_breakdown: BTreeMap<String, u64>,
}

/// One point of the trailing daily trend series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrendPoint {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub positive: u64,
    #[serde(default)]
    pub negative: u64,
    #[serde(default)]
    pub neutral: u64,
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamComparisonEntry {
    #[serde(default)]
    pub team_id: TeamId,
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub avg_sentiment: f64,
    #[serde(default)]
    pub total_comments: u64,
    #[serde(default)]
    pub ranking: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamComparison {
    #[serde(default, deserialize_with = "null_as_default")]
    pub teams: Vec<TeamComparisonEntry>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentStats {
    #[serde(default)]
    pub total_comments: u64,
    #[serde(default)]
    pub total_analyzed: u64,
    #[serde(default)]
    pub overall_sentiment: f64,
    /// `None` when the backend sent no breakdown at all.
    #[serde(default)]
    pub sentiment_breakdown: Option<LabelCounts>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recent_trends: Vec<TrendPoint>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub team_comparison: Vec<TeamComparisonEntry>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KeywordStat {
    pub keyword: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub avg_sentiment: f64,
}

/// `GET /sentiments/report/{team}` and `GET /teams/{id}/sentiment`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamReport {
    #[serde(default)]
    pub team_id: TeamId,
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub total_analyzed: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sentiment_counts: LabelCounts,
    #[serde(default)]
    pub average_sentiment: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_keywords: Vec<KeywordStat>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamStats {
    #[serde(default)]
    pub team_id: TeamId,
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub total_comments: u64,
    #[serde(default)]
    pub positive_count: u64,
    #[serde(default)]
    pub negative_count: u64,
    #[serde(default)]
    pub neutral_count: u64,
    #[serde(default)]
    pub avg_sentiment: f64,
    #[serde(default)]
    pub sentiment_trend: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UnprocessedComments {
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BulkUpdateResponse {
    #[serde(default)]
    pub updated_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub result: SentimentResult,
}

/// `POST /sentiments/analyze/batch` response.
///
/// The dashboard backend analyses and saves server-side and answers with
/// counts only; `results` is filled by backends that echo per-text results.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchAnalyzeResponse {
    #[serde(default)]
    pub message: Option<String>,
    /// Aligned with the submitted texts; `None` where analysis failed.
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<Option<SentimentResult>>,
    #[serde(default)]
    pub total_texts: usize,
    #[serde(default)]
    pub success_count: Option<usize>,
    #[serde(default)]
    pub failed_count: Option<usize>,
}

impl BatchAnalyzeResponse {
    /// Counts reported by the server when no per-text results came back.
    pub fn server_counts(&self) -> Option<(usize, usize)> {
        if !self.results.is_empty() {
            return None;
        }
        let success = self.success_count?;
        let failed = self
            .failed_count
            .unwrap_or_else(|| self.total_texts.saturating_sub(success));
        Some((success, failed))
    }

    /// Texts analysed successfully.
    pub fn analyzed(&self) -> usize {
        match self.server_counts() {
            Some((success, _)) => success,
            None => self.results.iter().filter(|result| result.is_some()).count(),
        }
    }
}

/// `POST /comments` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedComment {
    pub comment: Comment,
}

/// `POST /teams` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedTeam {
    pub team: Team,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeedResult {
    #[serde(default)]
    pub inserted_count: u64,
    #[serde(default)]
    pub total_teams: u64,
}

/// Generic `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}

/// `{ "data": ... }` wrapper used by the AI insight endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DailySummary {
    #[serde(default)]
    pub team_id: Option<TeamId>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub total_comments: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub main_topics: Vec<String>,
    #[serde(default)]
    pub generated_by: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryStats {
    #[serde(default)]
    pub categories: JsonValue,
    #[serde(default)]
    pub toxicity: JsonValue,
}

/// Body of `POST /comments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub source_id: String,
    pub source: Source,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<TeamId>,
    pub author: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub language: String,
}

/// Body of `PUT /comments/{id}`; only present fields are changed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CommentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_processed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_sentiment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<TeamId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewTeam {
    pub name: String,
    pub slug: String,
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub league: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// One manual analysis kept in the in-memory history.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisEntry {
    pub text: String,
    pub result: SentimentResult,
    pub analyzed_at: DateTime<Utc>,
}

/// Counts gathered by one real-time poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealtimeSnapshot {
    pub timestamp: DateTime<Utc>,
    pub comments_total: u64,
    pub comments_unprocessed: u64,
    pub sentiments_total: u64,
    pub breakdown: LabelCounts,
}

/// Look-back window of the trend view and executive report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrendPeriod {
    #[default]
    Week,
    Month,
    Quarter,
}

impl TrendPeriod {
    pub const ALL: [TrendPeriod; 3] = [TrendPeriod::Week, TrendPeriod::Month, TrendPeriod::Quarter];

    pub fn as_str(self) -> &'static str {
        match self {
            TrendPeriod::Week => "7d",
            TrendPeriod::Month => "30d",
            TrendPeriod::Quarter => "90d",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|period| period.as_str() == raw.trim())
    }
}

impl fmt::Display for TrendPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyVolume {
    pub date: String,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamTrendTotals {
    #[serde(default)]
    pub total_comments: u64,
}

/// Per-team daily comment volume.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamTrend {
    #[serde(default)]
    pub team_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<DailyVolume>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overall: TeamTrendTotals,
}

/// `GET /trends/analysis` response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrendAnalysis {
    #[serde(default, deserialize_with = "null_as_default")]
    pub teams: Vec<TeamTrend>,
}

/// One generated observation from `GET /trends/insights`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PeriodInsight {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub value: JsonValue,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PeriodInsights {
    #[serde(default, deserialize_with = "null_as_default")]
    pub insights: Vec<PeriodInsight>,
}

/// Trend analysis and insights fetched together for one period.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendView {
    pub period: TrendPeriod,
    pub fetched_at: DateTime<Utc>,
    pub analysis: TrendAnalysis,
    pub insights: Vec<PeriodInsight>,
}

/// Download format of the executive report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Html,
    Json,
}

impl ReportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "html" => Some(ReportFormat::Html),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }

    /// File name the dashboard offers for a downloaded report.
    pub fn file_name(self, period: TrendPeriod) -> String {
        format!("executive-report-{}.{}", period.as_str(), self.as_str())
    }
}

/// Inclusive date window used by report endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Collection totals merged from the comment and sentiment statistics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollectionSummary {
    pub total_comments: u64,
    pub processed_comments: u64,
    pub unprocessed_comments: u64,
    pub total_analyzed: u64,
    pub source_breakdown: BTreeMap<String, u64>,
    pub sentiment_breakdown: LabelCounts,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.trim().is_empty()))
}

/// Go backends encode empty slices and maps as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
