use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use crate::model::{
    CommentId, CommentPage, CommentStats, CommentUpdate, NewComment, SentimentResult,
    SentimentStats,
};
use crate::{FetchTicket, FilterPatch, SortOrder};

/// Inputs to the comment listing state.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentsMsg {
    /// Load the current page and statistics, using cached values when fresh.
    Refresh,
    /// User asked for fresh data regardless of cache age.
    Refetch,
    UpdateFilters(FilterPatch),
    SetPage(u32),
    SetLimit(u32),
    SetSorting { sort_by: String, sort_order: SortOrder },
    ClearFilters,
    ToggleSelection(CommentId),
    SelectAll,
    ClearSelection,
    MarkSelectedProcessed,
    MarkProcessed(Vec<CommentId>),
    CreateComment(NewComment),
    UpdateComment { id: CommentId, update: CommentUpdate },
    /// Engine result for a listing fetch.
    CommentsLoaded {
        ticket: FetchTicket,
        result: Result<CommentPage, String>,
    },
    /// Engine result for a statistics fetch.
    StatsLoaded {
        ticket: FetchTicket,
        result: Result<CommentStats, String>,
    },
    /// Engine result for a bulk mark-as-processed call (affected count).
    MarkProcessedDone(Result<u64, String>),
    CommentCreated(Result<CommentId, String>),
    CommentUpdated(Result<CommentId, String>),
}

/// Outcome of a batch analysis as reported back by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchOutcome {
    pub analyzed: usize,
    pub total: usize,
}

/// Outcome of processing the unprocessed-comment backlog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProcessOutcome {
    /// Comments fetched from the backlog.
    pub processed: usize,
    /// Sentiment results saved successfully.
    pub saved: usize,
    /// Saves that failed or had no analysis result.
    pub failed: usize,
}

/// Inputs to the sentiment analytics state.
#[derive(Debug, Clone, PartialEq)]
pub enum SentimentMsg {
    Refresh,
    Refetch,
    AnalyzeText { text: String, language: String },
    AnalyzeBatch(Vec<String>),
    ProcessUnprocessed,
    ClearHistory,
    StatsLoaded {
        ticket: FetchTicket,
        result: Result<SentimentStats, String>,
    },
    SummaryLoaded {
        ticket: FetchTicket,
        result: Result<JsonValue, String>,
    },
    AnalysisFinished {
        text: String,
        result: Result<SentimentResult, String>,
        analyzed_at: DateTime<Utc>,
    },
    BatchFinished(Result<BatchOutcome, String>),
    ProcessingFinished(Result<ProcessOutcome, String>),
}
