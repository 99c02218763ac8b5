use serde_json::Value as JsonValue;

use crate::model::{CommentPage, CommentStats, SentimentStats};
use crate::view_model::{CommentsViewModel, SentimentViewModel};
use crate::{
    metrics, AnalysisHistory, BatchOutcome, FetchState, FilterState, ProcessOutcome,
    SelectionSet, ValidationError,
};

/// Owner of the comment listing: Filter State, Selection Set and the two
/// cached reads behind the listing screen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommentsState {
    pub(crate) filter: FilterState,
    pub(crate) selection: SelectionSet,
    pub(crate) list: FetchState<CommentPage>,
    pub(crate) stats: FetchState<CommentStats>,
    pub(crate) bulk_in_flight: bool,
    pub(crate) creating: bool,
    pub(crate) updating: bool,
    pub(crate) last_processed_count: Option<u64>,
    pub(crate) mutation_error: Option<String>,
    dirty: bool,
}

impl CommentsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(filter: FilterState) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn list(&self) -> &FetchState<CommentPage> {
        &self.list
    }

    pub fn stats(&self) -> &FetchState<CommentStats> {
        &self.stats
    }

    /// Count reported by the most recent successful bulk update.
    pub fn last_processed_count(&self) -> Option<u64> {
        self.last_processed_count
    }

    /// Error of the most recent failed mutation, cleared when the next one starts.
    pub fn mutation_error(&self) -> Option<&str> {
        self.mutation_error.as_deref()
    }

    /// Pages reported by the last successful listing, if any.
    pub fn known_total_pages(&self) -> Option<u32> {
        self.list.data().map(|page| page.total_pages)
    }

    pub fn view(&self) -> CommentsViewModel {
        let page = self.list.data();
        let total_pages = page.map(|page| page.total_pages).unwrap_or(0);
        CommentsViewModel {
            comments: page.map(|page| page.comments.clone()).unwrap_or_default(),
            stats: self.stats.data().cloned(),
            total_comments: page.map(|page| page.total).unwrap_or(0),
            total_pages,
            filter: self.filter.clone(),
            selected: self.selection.ids().to_vec(),
            is_loading: self.list.is_loading(),
            is_refreshing: self.list.is_refreshing(),
            stats_loading: self.stats.is_loading(),
            is_bulk_updating: self.bulk_in_flight,
            is_creating: self.creating,
            is_updating: self.updating,
            error: self.list.error().map(str::to_owned),
            stats_error: self.stats.error().map(str::to_owned),
            mutation_error: self.mutation_error.clone(),
            has_next_page: self.filter.page() < total_pages,
            has_previous_page: self.filter.page() > 1,
            dirty: self.dirty,
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

/// Owner of the Analysis History and the sentiment statistics reads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SentimentState {
    pub(crate) history: AnalysisHistory,
    pub(crate) stats: FetchState<SentimentStats>,
    pub(crate) summary: FetchState<JsonValue>,
    pub(crate) analyzing: bool,
    pub(crate) batch_analyzing: bool,
    pub(crate) processing: bool,
    pub(crate) rejection: Option<ValidationError>,
    pub(crate) action_error: Option<String>,
    pub(crate) last_batch: Option<BatchOutcome>,
    pub(crate) last_processing: Option<ProcessOutcome>,
    dirty: bool,
}

impl SentimentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &AnalysisHistory {
        &self.history
    }

    pub fn stats(&self) -> &FetchState<SentimentStats> {
        &self.stats
    }

    pub fn summary(&self) -> &FetchState<JsonValue> {
        &self.summary
    }

    /// Validation error raised by the most recent action, if it was rejected.
    pub fn rejection(&self) -> Option<&ValidationError> {
        self.rejection.as_ref()
    }

    /// Network failure of the most recent action.
    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    pub fn last_batch(&self) -> Option<BatchOutcome> {
        self.last_batch
    }

    pub fn last_processing(&self) -> Option<ProcessOutcome> {
        self.last_processing
    }

    pub fn view(&self) -> SentimentViewModel {
        let stats = self.stats.data();
        let breakdown =
            metrics::sentiment_breakdown(stats.and_then(|stats| stats.sentiment_breakdown.as_ref()));
        let trend = stats
            .map(|stats| metrics::trend_direction(&stats.recent_trends))
            .unwrap_or(metrics::TrendDirection::Stable);
        SentimentViewModel {
            stats: stats.cloned(),
            summary: self.summary.data().cloned(),
            overall_score: metrics::overall_score(breakdown.as_ref()),
            breakdown,
            trend,
            history: self.history.iter().cloned().collect(),
            is_loading: self.stats.is_loading() || self.summary.is_loading(),
            is_analyzing: self.analyzing,
            is_batch_analyzing: self.batch_analyzing,
            is_processing: self.processing,
            stats_error: self.stats.error().map(str::to_owned),
            summary_error: self.summary.error().map(str::to_owned),
            action_error: self.action_error.clone(),
            rejection: self.rejection.clone(),
            dirty: self.dirty,
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
