use std::sync::Arc;

use fanpulse_core::model::{Comment, CommentId, CommentPage, CommentStats, CommentUpdate, NewComment};
use fanpulse_core::{
    update_comments, CacheScope, CommentsMsg, CommentsState, CommentsViewModel, Effect,
    FilterPatch, FilterState, SortOrder,
};
use fanpulse_logging::pulse_debug;
use futures_util::future::join_all;

use crate::cache::{CacheKey, QueryCache, COMMENTS_TTL, STATS_TTL};
use crate::resources::comments;
use crate::{ApiClient, ApiError, DashboardError};

/// Result of a bulk mark-as-processed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// Nothing was selected; no request was made.
    NothingSelected,
    /// Affected count reported by the backend.
    Updated(u64),
}

enum Executed {
    Listing {
        ticket: u64,
        result: Result<CommentPage, ApiError>,
    },
    Stats {
        ticket: u64,
        result: Result<CommentStats, ApiError>,
    },
    Marked(Result<u64, ApiError>),
    Created(Result<Comment, ApiError>),
    Updated {
        id: CommentId,
        result: Result<(), ApiError>,
    },
}

#[derive(Default)]
struct Report {
    marked: Option<Result<u64, ApiError>>,
    created: Option<Result<Comment, ApiError>>,
    updated: Option<Result<(), ApiError>>,
}

/// Drives [`CommentsState`] against the API and the shared cache.
pub struct CommentsSession {
    api: ApiClient,
    cache: Arc<QueryCache>,
    state: CommentsState,
}

impl CommentsSession {
    pub fn new(api: ApiClient, cache: Arc<QueryCache>) -> Self {
        Self::with_filter(api, cache, FilterState::default())
    }

    pub fn with_filter(api: ApiClient, cache: Arc<QueryCache>, filter: FilterState) -> Self {
        Self {
            api,
            cache,
            state: CommentsState::with_filter(filter),
        }
    }

    pub fn state(&self) -> &CommentsState {
        &self.state
    }

    pub fn view(&self) -> CommentsViewModel {
        self.state.view()
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    /// Loads the listing and statistics, serving fresh cache entries.
    pub async fn refresh(&mut self) {
        self.dispatch(CommentsMsg::Refresh).await;
    }

    pub async fn refetch(&mut self) {
        self.dispatch(CommentsMsg::Refetch).await;
    }

    pub async fn update_filters(&mut self, patch: FilterPatch) {
        self.dispatch(CommentsMsg::UpdateFilters(patch)).await;
    }

    pub async fn set_page(&mut self, page: u32) {
        self.dispatch(CommentsMsg::SetPage(page)).await;
    }

    pub async fn set_limit(&mut self, limit: u32) {
        self.dispatch(CommentsMsg::SetLimit(limit)).await;
    }

    pub async fn set_sorting(&mut self, sort_by: impl Into<String>, sort_order: SortOrder) {
        self.dispatch(CommentsMsg::SetSorting {
            sort_by: sort_by.into(),
            sort_order,
        })
        .await;
    }

    pub async fn clear_filters(&mut self) {
        self.dispatch(CommentsMsg::ClearFilters).await;
    }

    pub fn toggle_selection(&mut self, id: impl Into<CommentId>) {
        self.apply_local(CommentsMsg::ToggleSelection(id.into()));
    }

    pub fn select_all(&mut self) {
        self.apply_local(CommentsMsg::SelectAll);
    }

    pub fn clear_selection(&mut self) {
        self.apply_local(CommentsMsg::ClearSelection);
    }

    pub async fn mark_selected_processed(&mut self) -> Result<MarkOutcome, DashboardError> {
        let report = self.dispatch(CommentsMsg::MarkSelectedProcessed).await;
        mark_outcome(report)
    }

    pub async fn mark_processed(
        &mut self,
        ids: Vec<CommentId>,
    ) -> Result<MarkOutcome, DashboardError> {
        let report = self.dispatch(CommentsMsg::MarkProcessed(ids)).await;
        mark_outcome(report)
    }

    pub async fn create_comment(&mut self, comment: NewComment) -> Result<Comment, DashboardError> {
        let report = self.dispatch(CommentsMsg::CreateComment(comment)).await;
        report.created.unwrap_or_else(not_issued).map_err(Into::into)
    }

    pub async fn update_comment(
        &mut self,
        id: impl Into<CommentId>,
        update: CommentUpdate,
    ) -> Result<(), DashboardError> {
        let msg = CommentsMsg::UpdateComment {
            id: id.into(),
            update,
        };
        let report = self.dispatch(msg).await;
        report.updated.unwrap_or_else(not_issued).map_err(Into::into)
    }

    fn apply_local(&mut self, msg: CommentsMsg) {
        let (next, effects) = update_comments(std::mem::take(&mut self.state), msg);
        self.state = next;
        debug_assert!(effects.is_empty());
    }

    /// Feeds `msg` through `update`, executing effects until the state settles.
    async fn dispatch(&mut self, msg: CommentsMsg) -> Report {
        let mut report = Report::default();
        let mut pending = vec![msg];
        while !pending.is_empty() {
            let mut requests = Vec::new();
            for msg in pending.drain(..) {
                let (next, effects) = update_comments(std::mem::take(&mut self.state), msg);
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
        Effect::FetchComments { ticket, filter } => {
            let query = filter.to_query();
            let key = CacheKey::with_params(CacheScope::Comments.as_str(), &query);
            let result = cache
                .get_or_fetch(key, COMMENTS_TTL, || comments::list_comments(api, &query))
                .await;
            Executed::Listing { ticket, result }
        }
        Effect::FetchCommentStats { ticket } => {
            let result = cache
                .get_or_fetch(CacheScope::CommentStats.into(), STATS_TTL, || {
                    comments::comment_stats(api)
                })
                .await;
            Executed::Stats { ticket, result }
        }
        Effect::MarkProcessed { ids } => {
            Executed::Marked(comments::bulk_update_processed(api, &ids).await)
        }
        Effect::CreateComment(comment) => {
            Executed::Created(comments::create_comment(api, &comment).await)
        }
        Effect::UpdateComment { id, update } => {
            let result = comments::update_comment(api, &id, &update)
                .await
                .map(|_| ());
            Executed::Updated { id, result }
        }
        other => {
            pulse_debug!("comments session ignoring {:?}", other);
            return None;
        }
    };
    Some(executed)
}

fn record(outcome: Executed, report: &mut Report) -> CommentsMsg {
    match outcome {
        Executed::Listing { ticket, result } => CommentsMsg::CommentsLoaded {
            ticket,
            result: result.map_err(|err| err.message()),
        },
        Executed::Stats { ticket, result } => CommentsMsg::StatsLoaded {
            ticket,
            result: result.map_err(|err| err.message()),
        },
        Executed::Marked(result) => {
            report.marked = Some(result.clone());
            CommentsMsg::MarkProcessedDone(result.map_err(|err| err.message()))
        }
        Executed::Created(result) => {
            let msg = CommentsMsg::CommentCreated(
                result
                    .as_ref()
                    .map(|comment| comment.id.clone())
                    .map_err(ApiError::message),
            );
            report.created = Some(result);
            msg
        }
        Executed::Updated { id, result } => {
            report.updated = Some(result.clone());
            CommentsMsg::CommentUpdated(result.map(|()| id).map_err(|err| err.message()))
        }
    }
}

fn mark_outcome(report: Report) -> Result<MarkOutcome, DashboardError> {
    match report.marked {
        None => Ok(MarkOutcome::NothingSelected),
        Some(Ok(count)) => Ok(MarkOutcome::Updated(count)),
        Some(Err(err)) => Err(err.into()),
    }
}

fn not_issued<T>() -> Result<T, ApiError> {
    Err(ApiError::Unexpected("request was not issued".to_string()))
}
