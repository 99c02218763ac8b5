//! FanPulse core: transport models, pure state machines and view-model helpers.
pub mod display;
mod effect;
mod fetch;
mod filter;
mod history;
pub mod metrics;
pub mod model;
mod msg;
mod query;
mod selection;
mod state;
pub mod teams;
mod update;
pub mod validate;
mod view_model;

pub use effect::{CacheScope, Effect, Notice, NoticeLevel};
pub use fetch::{FetchState, FetchStatus, FetchTicket};
pub use filter::{
    CommentPredicates, FilterPatch, FilterState, SortOrder, DEFAULT_PAGE_SIZE, DEFAULT_SORT_FIELD,
};
pub use history::{AnalysisHistory, HISTORY_LIMIT};
pub use msg::{BatchOutcome, CommentsMsg, ProcessOutcome, SentimentMsg};
pub use query::QueryParams;
pub use selection::SelectionSet;
pub use state::{CommentsState, SentimentState};
pub use update::{update_comments, update_sentiment, UNPROCESSED_BATCH_LIMIT};
pub use validate::ValidationError;
pub use view_model::{CommentsViewModel, SentimentViewModel};
