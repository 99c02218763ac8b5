use crate::model::{CommentId, CommentUpdate, NewComment};
use crate::{FetchTicket, FilterState};

/// Work requested by `update`; executed by the engine sessions.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchComments { ticket: FetchTicket, filter: FilterState },
    FetchCommentStats { ticket: FetchTicket },
    MarkProcessed { ids: Vec<CommentId> },
    CreateComment(NewComment),
    UpdateComment { id: CommentId, update: CommentUpdate },
    FetchSentimentStats { ticket: FetchTicket },
    FetchSentimentSummary { ticket: FetchTicket },
    AnalyzeText { text: String, language: String },
    AnalyzeBatch { texts: Vec<String> },
    ProcessUnprocessed { limit: u32 },
    Invalidate(CacheScope),
    Notify(Notice),
}

/// Cache namespaces shared between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheScope {
    Comments,
    CommentStats,
    SentimentStats,
    SentimentSummary,
}

impl CacheScope {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheScope::Comments => "comments",
            CacheScope::CommentStats => "comment-stats",
            CacheScope::SentimentStats => "sentiment-stats",
            CacheScope::SentimentSummary => "sentiment-summary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Transient user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}
