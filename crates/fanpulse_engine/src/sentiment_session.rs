use std::sync::Arc;

use chrono::Utc;
use fanpulse_core::model::{
    BatchAnalyzeResponse, DateRange, SentimentResult, SentimentStats, TeamComparison, TeamReport,
};
use fanpulse_core::{
    update_sentiment, BatchOutcome, CacheScope, Effect, ProcessOutcome, SentimentMsg,
    SentimentState, SentimentViewModel,
};
use fanpulse_logging::{pulse_debug, pulse_info};
use futures_util::future::join_all;
use serde_json::Value as JsonValue;

use crate::cache::{CacheKey, QueryCache, REPORT_TTL, STATS_TTL, SUMMARY_TTL};
use crate::resources::{comments, dashboard, sentiments};
use crate::{ApiClient, ApiError, DashboardError};

enum Executed {
    Stats {
        ticket: u64,
        result: Result<SentimentStats, ApiError>,
    },
    Summary {
        ticket: u64,
        result: Result<JsonValue, ApiError>,
    },
    Analyzed {
        text: String,
        result: Result<SentimentResult, ApiError>,
    },
    Batch(Result<BatchAnalyzeResponse, ApiError>),
    Processed(Result<ProcessOutcome, ApiError>),
}

#[derive(Default)]
struct Report {
    analyzed: Option<Result<SentimentResult, ApiError>>,
    batch: Option<Result<BatchAnalyzeResponse, ApiError>>,
    processed: Option<Result<ProcessOutcome, ApiError>>,
}

/// Drives [`SentimentState`]: statistics, manual analysis and backlog processing.
pub struct SentimentSession {
    api: ApiClient,
    cache: Arc<QueryCache>,
    state: SentimentState,
}

impl SentimentSession {
    pub fn new(api: ApiClient, cache: Arc<QueryCache>) -> Self {
        Self {
            api,
            cache,
            state: SentimentState::new(),
        }
    }

    pub fn state(&self) -> &SentimentState {
        &self.state
    }

    pub fn view(&self) -> SentimentViewModel {
        self.state.view()
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    pub async fn refresh(&mut self) {
        self.dispatch(SentimentMsg::Refresh).await;
    }

    pub async fn refetch(&mut self) {
        self.dispatch(SentimentMsg::Refetch).await;
    }

    pub fn clear_history(&mut self) {
        let (next, _) = update_sentiment(std::mem::take(&mut self.state), SentimentMsg::ClearHistory);
        self.state = next;
    }

    /// Analyses one text; too-short input is rejected before any request.
    pub async fn analyze_text(
        &mut self,
        text: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<SentimentResult, DashboardError> {
        let msg = SentimentMsg::AnalyzeText {
            text: text.into(),
            language: language.into(),
        };
        let report = self.dispatch(msg).await;
        match report.analyzed {
            Some(result) => result.map_err(Into::into),
            None => Err(self.rejected()),
        }
    }

    pub async fn analyze_batch(
        &mut self,
        texts: Vec<String>,
    ) -> Result<BatchAnalyzeResponse, DashboardError> {
        let report = self.dispatch(SentimentMsg::AnalyzeBatch(texts)).await;
        match report.batch {
            Some(result) => result.map_err(Into::into),
            None => Err(self.rejected()),
        }
    }

    /// Analyses and saves up to 50 unprocessed comments.
    pub async fn process_unprocessed(&mut self) -> Result<ProcessOutcome, DashboardError> {
        let report = self.dispatch(SentimentMsg::ProcessUnprocessed).await;
        match report.processed {
            Some(result) => result.map_err(Into::into),
            None => Err(not_issued().into()),
        }
    }

    pub async fn team_report(
        &self,
        team_id: &str,
        range: DateRange,
    ) -> Result<TeamReport, DashboardError> {
        let key = CacheKey::new(format!(
            "team-report:{team_id}:{:?}:{:?}",
            range.start, range.end
        ));
        let report = self
            .cache
            .get_or_fetch(key, REPORT_TTL, || {
                sentiments::team_report(&self.api, team_id, range)
            })
            .await?;
        Ok(report)
    }

    pub async fn team_comparison(&self) -> Result<TeamComparison, DashboardError> {
        let comparison = self
            .cache
            .get_or_fetch(CacheKey::new("team-comparison"), REPORT_TTL, || {
                dashboard::team_comparison(&self.api)
            })
            .await?;
        Ok(comparison)
    }

    fn rejected(&self) -> DashboardError {
        match self.state.rejection() {
            Some(rejection) => DashboardError::Validation(rejection.clone()),
            None => not_issued().into(),
        }
    }

    async fn dispatch(&mut self, msg: SentimentMsg) -> Report {
        let mut report = Report::default();
        let mut pending = vec![msg];
        while !pending.is_empty() {
            let mut requests = Vec::new();
            for msg in pending.drain(..) {
                let (next, effects) = update_sentiment(std::mem::take(&mut self.state), msg);
                self.state = next;
                for effect in effects {
                    match effect {
                        Effect::Invalidate(scope) => {
                            self.cache.invalidate_scope(scope.as_str());
                        }
                        Effect::Notify(notice) => self.api.notifier().notify(notice),
                        other => requests.push(other),
                    }
                }
            }

            let executed = join_all(
                requests
                    .into_iter()
                    .map(|effect| execute(&self.api, &self.cache, effect)),
            )
            .await;
            for outcome in executed.into_iter().flatten() {
                pending.push(record(outcome, &mut report));
            }
        }
        report
    }
}

async fn execute(api: &ApiClient, cache: &QueryCache, effect: Effect) -> Option<Executed> {
    let executed = match effect {
        Effect::FetchSentimentStats { ticket } => {
            let result = cache
                .get_or_fetch(CacheScope::SentimentStats.into(), STATS_TTL, || {
                    sentiments::sentiment_stats(api)
                })
                .await;
            Executed::Stats { ticket, result }
        }
        Effect::FetchSentimentSummary { ticket } => {
            let result = cache
                .get_or_fetch(CacheScope::SentimentSummary.into(), SUMMARY_TTL, || {
                    sentiments::sentiment_summary(api)
                })
                .await;
            Executed::Summary { ticket, result }
        }
        Effect::AnalyzeText { text, language } => {
            let result = sentiments::analyze_text(api, &text, &language).await;
            Executed::Analyzed { text, result }
        }
        Effect::AnalyzeBatch { texts } => Executed::Batch(sentiments::analyze_batch(api, &texts).await),
        Effect::ProcessUnprocessed { limit } => {
            Executed::Processed(process_backlog(api, limit).await)
        }
        other => {
            pulse_debug!("sentiment session ignoring {:?}", other);
            return None;
        }
    };
    Some(executed)
}

/// Fetches the backlog, analyses it in one batch and saves each result.
///
/// Saves are independent; a failed save is counted, earlier saves stay.
async fn process_backlog(api: &ApiClient, limit: u32) -> Result<ProcessOutcome, ApiError> {
    let backlog = comments::unprocessed_comments(api, limit).await?;
    if backlog.comments.is_empty() {
        return Ok(ProcessOutcome::default());
    }

    let texts: Vec<String> = backlog
        .comments
        .iter()
        .map(|comment| comment.text.clone())
        .collect();
    let analysis = sentiments::analyze_batch(api, &texts).await?;
    let processed = backlog.comments.len();

    // The backend saved the results itself.
    if let Some((saved, failed)) = analysis.server_counts() {
        pulse_info!("backend processed {} comments, {} saved", processed, saved);
        return Ok(ProcessOutcome {
            processed,
            saved,
            failed,
        });
    }

    let saves = backlog
        .comments
        .iter()
        .zip(analysis.results.iter().map(Some).chain(std::iter::repeat(None)))
        .filter_map(|(comment, result)| {
            let result = result.and_then(Option::as_ref)?;
            Some(sentiments::save_sentiment(
                api,
                &comment.id,
                comment.team_id.as_deref(),
                result,
            ))
        });
    let saved = join_all(saves)
        .await
        .into_iter()
        .filter(Result::is_ok)
        .count();

    pulse_info!("processed {} comments, {} saved", processed, saved);
    Ok(ProcessOutcome {
        processed,
        saved,
        failed: processed - saved,
    })
}

fn record(outcome: Executed, report: &mut Report) -> SentimentMsg {
    match outcome {
        Executed::Stats { ticket, result } => SentimentMsg::StatsLoaded {
            ticket,
            result: result.map_err(|err| err.message()),
        },
        Executed::Summary { ticket, result } => SentimentMsg::SummaryLoaded {
            ticket,
            result: result.map_err(|err| err.message()),
        },
        Executed::Analyzed { text, result } => {
            report.analyzed = Some(result.clone());
            SentimentMsg::AnalysisFinished {
                text,
                result: result.map_err(|err| err.message()),
                analyzed_at: Utc::now(),
            }
        }
        Executed::Batch(result) => {
            let outcome = result
                .as_ref()
                .map(batch_outcome)
                .map_err(ApiError::message);
            report.batch = Some(result);
            SentimentMsg::BatchFinished(outcome)
        }
        Executed::Processed(result) => {
            report.processed = Some(result.clone());
            SentimentMsg::ProcessingFinished(result.map_err(|err| err.message()))
        }
    }
}

fn batch_outcome(response: &BatchAnalyzeResponse) -> BatchOutcome {
    let total = if response.total_texts == 0 {
        response.results.len()
    } else {
        response.total_texts
    };
    BatchOutcome {
        analyzed: response.analyzed(),
        total,
    }
}

fn not_issued() -> ApiError {
    ApiError::Unexpected("request was not issued".to_string())
}
