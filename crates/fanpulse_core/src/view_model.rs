use serde_json::Value as JsonValue;

use crate::metrics::{OverallScore, SentimentBreakdown, TrendDirection};
use crate::model::{AnalysisEntry, Comment, CommentId, CommentStats, SentimentStats};
use crate::{FilterState, ValidationError};

#[derive(Debug, Clone, PartialEq)]
pub struct CommentsViewModel {
    pub comments: Vec<Comment>,
    pub stats: Option<CommentStats>,
    pub total_comments: u64,
    pub total_pages: u32,
    pub filter: FilterState,
    pub selected: Vec<CommentId>,
    pub is_loading: bool,
    pub is_refreshing: bool,
    pub stats_loading: bool,
    pub is_bulk_updating: bool,
    pub is_creating: bool,
    pub is_updating: bool,
    /// Inline listing error; `comments` still holds the last good page.
    pub error: Option<String>,
    pub stats_error: Option<String>,
    pub mutation_error: Option<String>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub dirty: bool,
}

impl CommentsViewModel {
    pub fn has_error(&self) -> bool {
        self.error.is_some() || self.stats_error.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentViewModel {
    pub stats: Option<SentimentStats>,
    pub summary: Option<JsonValue>,
    /// `None` when nothing has been counted yet.
    pub breakdown: Option<SentimentBreakdown>,
    pub overall_score: OverallScore,
    pub trend: TrendDirection,
    pub history: Vec<AnalysisEntry>,
    pub is_loading: bool,
    pub is_analyzing: bool,
    pub is_batch_analyzing: bool,
    pub is_processing: bool,
    pub stats_error: Option<String>,
    pub summary_error: Option<String>,
    pub action_error: Option<String>,
    pub rejection: Option<ValidationError>,
    pub dirty: bool,
}

impl SentimentViewModel {
    pub fn has_error(&self) -> bool {
        self.stats_error.is_some() || self.summary_error.is_some()
    }
}
