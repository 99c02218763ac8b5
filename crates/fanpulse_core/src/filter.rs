use chrono::NaiveDate;

use crate::model::{SentimentLabel, Source, TeamId};
use crate::QueryParams;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_SORT_FIELD: &str = "created_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Optional listing predicates; `None` means "not filtered".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CommentPredicates {
    pub team_id: Option<TeamId>,
    pub source: Option<Source>,
    pub sentiment: Option<SentimentLabel>,
    pub search: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Partial update of [`CommentPredicates`].
///
/// The outer `Option` says whether the predicate is touched at all; the inner
/// one is the new value, where `None` clears the predicate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterPatch {
    pub team_id: Option<Option<TeamId>>,
    pub source: Option<Option<Source>>,
    pub sentiment: Option<Option<SentimentLabel>>,
    pub search: Option<Option<String>>,
    pub start_date: Option<Option<NaiveDate>>,
    pub end_date: Option<Option<NaiveDate>>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn team(mut self, team_id: Option<TeamId>) -> Self {
        self.team_id = Some(team_id);
        self
    }

    pub fn source(mut self, source: Option<Source>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn sentiment(mut self, sentiment: Option<SentimentLabel>) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    pub fn search(mut self, query: Option<String>) -> Self {
        self.search = Some(query);
        self
    }

    pub fn date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &FilterPatch::default()
    }
}

/// Filter State of the comment listing.
///
/// `page` and `limit` are always at least 1. Every predicate change goes
/// through [`FilterState::apply`], which returns to page 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterState {
    page: u32,
    limit: u32,
    sort_by: String,
    sort_order: SortOrder,
    predicates: CommentPredicates,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            sort_by: DEFAULT_SORT_FIELD.to_string(),
            sort_order: SortOrder::Desc,
            predicates: CommentPredicates::default(),
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default filter narrowed by `patch`, as an initial listing state.
    pub fn with_patch(patch: FilterPatch) -> Self {
        let mut state = Self::default();
        state.apply(patch);
        state
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn sort_by(&self) -> &str {
        &self.sort_by
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn predicates(&self) -> &CommentPredicates {
        &self.predicates
    }

    /// Merges `patch` into the predicates and returns to page 1.
    pub fn apply(&mut self, patch: FilterPatch) {
        let FilterPatch {
            team_id,
            source,
            sentiment,
            search,
            start_date,
            end_date,
        } = patch;
        let predicates = &mut self.predicates;
        if let Some(team_id) = team_id {
            predicates.team_id = team_id.filter(|id| !id.trim().is_empty());
        }
        if let Some(source) = source {
            predicates.source = source;
        }
        if let Some(sentiment) = sentiment {
            predicates.sentiment = sentiment;
        }
        if let Some(search) = search {
            predicates.search = search
                .map(|query| query.trim().to_string())
                .filter(|query| !query.is_empty());
        }
        if let Some(start_date) = start_date {
            predicates.start_date = start_date;
        }
        if let Some(end_date) = end_date {
            predicates.end_date = end_date;
        }
        self.page = 1;
    }

    /// Moves to `page` (at least 1) without touching anything else.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Changes the page size and returns to page 1.
    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit.max(1);
        self.page = 1;
    }

    pub fn set_sorting(&mut self, sort_by: impl Into<String>, sort_order: SortOrder) {
        self.sort_by = sort_by.into();
        self.sort_order = sort_order;
    }

    /// Back to defaults, keeping the page size.
    pub fn reset(&mut self) {
        *self = Self {
            limit: self.limit,
            ..Self::default()
        };
    }

    /// Clamps the page into `[1, total_pages]`; returns whether it moved.
    ///
    /// A result set with zero pages clamps to page 1.
    pub fn clamp_page(&mut self, total_pages: u32) -> bool {
        let clamped = self.page.clamp(1, total_pages.max(1));
        let moved = clamped != self.page;
        self.page = clamped;
        moved
    }

    /// Query string for `GET /comments`; unset predicates are omitted.
    pub fn to_query(&self) -> QueryParams {
        let predicates = &self.predicates;
        QueryParams::new()
            .with("page", self.page)
            .with("limit", self.limit)
            .with("sort_by", &self.sort_by)
            .with("sort_order", self.sort_order.as_str())
            .with_opt("team_id", predicates.team_id.as_deref())
            .with_opt("source", predicates.source.map(Source::as_str))
            .with_opt("sentiment", predicates.sentiment.map(SentimentLabel::as_str))
            .with_opt("search", predicates.search.as_deref())
            .with_opt("start_date", predicates.start_date.map(format_date))
            .with_opt("end_date", predicates.end_date.map(format_date))
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
