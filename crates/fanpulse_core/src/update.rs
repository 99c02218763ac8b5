use crate::model::AnalysisEntry;
use crate::validate::{validate_analysis_text, validate_batch};
use crate::{CacheScope, CommentsMsg, CommentsState, Effect, Notice, SentimentMsg, SentimentState};

/// Backlog size requested by a single "process unprocessed" run.
pub const UNPROCESSED_BATCH_LIMIT: u32 = 50;

/// Pure update function for the comment listing.
pub fn update_comments(mut state: CommentsState, msg: CommentsMsg) -> (CommentsState, Vec<Effect>) {
    let effects = match msg {
        CommentsMsg::Refresh => {
            let mut effects = Vec::with_capacity(2);
            effects.push(begin_list_fetch(&mut state));
            effects.push(begin_stats_fetch(&mut state));
            effects
        }
        CommentsMsg::Refetch => {
            let mut effects = vec![
                Effect::Invalidate(CacheScope::Comments),
                Effect::Invalidate(CacheScope::CommentStats),
            ];
            effects.push(begin_list_fetch(&mut state));
            effects.push(begin_stats_fetch(&mut state));
            effects
        }
        CommentsMsg::UpdateFilters(patch) => {
            state.filter.apply(patch);
            vec![begin_list_fetch(&mut state)]
        }
        CommentsMsg::SetPage(page) => {
            let page = match state.known_total_pages() {
                Some(total_pages) => page.min(total_pages.max(1)),
                None => page,
            };
            state.filter.set_page(page);
            vec![begin_list_fetch(&mut state)]
        }
        CommentsMsg::SetLimit(limit) => {
            state.filter.set_limit(limit);
            vec![begin_list_fetch(&mut state)]
        }
        CommentsMsg::SetSorting {
            sort_by,
            sort_order,
        } => {
            state.filter.set_sorting(sort_by, sort_order);
            vec![begin_list_fetch(&mut state)]
        }
        CommentsMsg::ClearFilters => {
            state.filter.reset();
            vec![begin_list_fetch(&mut state)]
        }
        CommentsMsg::ToggleSelection(id) => {
            state.selection.toggle(&id);
            state.mark_dirty();
            Vec::new()
        }
        CommentsMsg::SelectAll => {
            let displayed = state
                .list
                .data()
                .map(|page| page.comments.iter().map(|c| c.id.clone()).collect::<Vec<_>>())
                .unwrap_or_default();
            state.selection.replace_with(displayed);
            state.mark_dirty();
            Vec::new()
        }
        CommentsMsg::ClearSelection => {
            if !state.selection.is_empty() {
                state.selection.clear();
                state.mark_dirty();
            }
            Vec::new()
        }
        CommentsMsg::MarkSelectedProcessed => {
            let ids = state.selection.ids().to_vec();
            begin_mark_processed(&mut state, ids)
        }
        CommentsMsg::MarkProcessed(ids) => begin_mark_processed(&mut state, ids),
        CommentsMsg::CreateComment(comment) => {
            state.creating = true;
            state.mutation_error = None;
            state.mark_dirty();
            vec![Effect::CreateComment(comment)]
        }
        CommentsMsg::UpdateComment { id, update } => {
            state.updating = true;
            state.mutation_error = None;
            state.mark_dirty();
            vec![Effect::UpdateComment { id, update }]
        }
        CommentsMsg::CommentsLoaded { ticket, result } => {
            let applied = match result {
                Ok(page) => {
                    let total_pages = page.total_pages;
                    state.list.succeed(ticket, page) && state.filter.clamp_page(total_pages)
                }
                Err(reason) => {
                    state.list.fail(ticket, reason);
                    false
                }
            };
            state.mark_dirty();
            if applied {
                // Requested page no longer exists; fetch the clamped one.
                vec![begin_list_fetch(&mut state)]
            } else {
                Vec::new()
            }
        }
        CommentsMsg::StatsLoaded { ticket, result } => {
            match result {
                Ok(stats) => state.stats.succeed(ticket, stats),
                Err(reason) => state.stats.fail(ticket, reason),
            };
            state.mark_dirty();
            Vec::new()
        }
        CommentsMsg::MarkProcessedDone(result) => {
            state.bulk_in_flight = false;
            state.mark_dirty();
            match result {
                Ok(count) => {
                    state.selection.clear();
                    state.last_processed_count = Some(count);
                    let mut effects = refetch_after_mutation(&mut state);
                    effects.push(Effect::Notify(Notice::success(format!(
                        "{count} comments marked as processed"
                    ))));
                    effects
                }
                Err(reason) => {
                    state.mutation_error = Some(reason);
                    Vec::new()
                }
            }
        }
        CommentsMsg::CommentCreated(result) => {
            state.creating = false;
            finish_comment_mutation(&mut state, result, "Comment added")
        }
        CommentsMsg::CommentUpdated(result) => {
            state.updating = false;
            finish_comment_mutation(&mut state, result, "Comment updated")
        }
    };

    (state, effects)
}

fn begin_list_fetch(state: &mut CommentsState) -> Effect {
    let ticket = state.list.begin();
    state.mark_dirty();
    Effect::FetchComments {
        ticket,
        filter: state.filter.clone(),
    }
}

fn begin_stats_fetch(state: &mut CommentsState) -> Effect {
    let ticket = state.stats.begin();
    state.mark_dirty();
    Effect::FetchCommentStats { ticket }
}

fn begin_mark_processed(state: &mut CommentsState, ids: Vec<String>) -> Vec<Effect> {
    if ids.is_empty() {
        return Vec::new();
    }
    state.bulk_in_flight = true;
    state.mutation_error = None;
    state.mark_dirty();
    vec![Effect::MarkProcessed { ids }]
}

fn refetch_after_mutation(state: &mut CommentsState) -> Vec<Effect> {
    vec![
        Effect::Invalidate(CacheScope::Comments),
        Effect::Invalidate(CacheScope::CommentStats),
        begin_list_fetch(state),
        begin_stats_fetch(state),
    ]
}

fn finish_comment_mutation(
    state: &mut CommentsState,
    result: Result<String, String>,
    success: &str,
) -> Vec<Effect> {
    state.mark_dirty();
    match result {
        Ok(_) => {
            let mut effects = refetch_after_mutation(state);
            effects.push(Effect::Notify(Notice::success(success)));
            effects
        }
        Err(reason) => {
            state.mutation_error = Some(reason);
            Vec::new()
        }
    }
}

/// Pure update function for sentiment analytics.
pub fn update_sentiment(
    mut state: SentimentState,
    msg: SentimentMsg,
) -> (SentimentState, Vec<Effect>) {
    let effects = match msg {
        SentimentMsg::Refresh => vec![
            begin_sentiment_stats(&mut state),
            begin_summary(&mut state),
        ],
        SentimentMsg::Refetch => vec![
            Effect::Invalidate(CacheScope::SentimentStats),
            Effect::Invalidate(CacheScope::SentimentSummary),
            begin_sentiment_stats(&mut state),
            begin_summary(&mut state),
        ],
        SentimentMsg::AnalyzeText { text, language } => {
            state.mark_dirty();
            match validate_analysis_text(&text) {
                Ok(()) => {
                    state.rejection = None;
                    state.action_error = None;
                    state.analyzing = true;
                    vec![Effect::AnalyzeText { text, language }]
                }
                Err(rejection) => reject(&mut state, rejection),
            }
        }
        SentimentMsg::AnalyzeBatch(texts) => {
            state.mark_dirty();
            match validate_batch(&texts) {
                Ok(()) => {
                    state.rejection = None;
                    state.action_error = None;
                    state.batch_analyzing = true;
                    vec![Effect::AnalyzeBatch { texts }]
                }
                Err(rejection) => reject(&mut state, rejection),
            }
        }
        SentimentMsg::ProcessUnprocessed => {
            state.rejection = None;
            state.action_error = None;
            state.processing = true;
            state.mark_dirty();
            vec![Effect::ProcessUnprocessed {
                limit: UNPROCESSED_BATCH_LIMIT,
            }]
        }
        SentimentMsg::ClearHistory => {
            if !state.history.is_empty() {
                state.history.clear();
                state.mark_dirty();
            }
            Vec::new()
        }
        SentimentMsg::StatsLoaded { ticket, result } => {
            match result {
                Ok(stats) => state.stats.succeed(ticket, stats),
                Err(reason) => state.stats.fail(ticket, reason),
            };
            state.mark_dirty();
            Vec::new()
        }
        SentimentMsg::SummaryLoaded { ticket, result } => {
            match result {
                Ok(summary) => state.summary.succeed(ticket, summary),
                Err(reason) => state.summary.fail(ticket, reason),
            };
            state.mark_dirty();
            Vec::new()
        }
        SentimentMsg::AnalysisFinished {
            text,
            result,
            analyzed_at,
        } => {
            state.analyzing = false;
            state.mark_dirty();
            match result {
                Ok(result) => {
                    state.history.record(AnalysisEntry {
                        text,
                        result,
                        analyzed_at,
                    });
                    vec![
                        Effect::Invalidate(CacheScope::SentimentStats),
                        begin_sentiment_stats(&mut state),
                        Effect::Notify(Notice::success("Sentiment analysis complete")),
                    ]
                }
                Err(reason) => {
                    state.action_error = Some(reason);
                    Vec::new()
                }
            }
        }
        SentimentMsg::BatchFinished(result) => {
            state.batch_analyzing = false;
            state.mark_dirty();
            match result {
                Ok(outcome) => {
                    state.last_batch = Some(outcome);
                    vec![
                        Effect::Invalidate(CacheScope::SentimentStats),
                        begin_sentiment_stats(&mut state),
                        Effect::Notify(Notice::success(format!(
                            "{}/{} texts analyzed",
                            outcome.analyzed, outcome.total
                        ))),
                    ]
                }
                Err(reason) => {
                    state.action_error = Some(reason);
                    Vec::new()
                }
            }
        }
        SentimentMsg::ProcessingFinished(result) => {
            state.processing = false;
            state.mark_dirty();
            match result {
                Ok(outcome) => {
                    state.last_processing = Some(outcome);
                    if outcome.processed > 0 {
                        vec![
                            Effect::Invalidate(CacheScope::SentimentStats),
                            Effect::Invalidate(CacheScope::CommentStats),
                            begin_sentiment_stats(&mut state),
                            Effect::Notify(Notice::success(format!(
                                "{} comments processed",
                                outcome.processed
                            ))),
                        ]
                    } else {
                        vec![Effect::Notify(Notice::info("No new comments to process"))]
                    }
                }
                Err(reason) => {
                    state.action_error = Some(reason);
                    Vec::new()
                }
            }
        }
    };

    (state, effects)
}

fn reject(state: &mut SentimentState, rejection: crate::ValidationError) -> Vec<Effect> {
    let notice = Notice::warning(rejection.to_string());
    state.rejection = Some(rejection);
    vec![Effect::Notify(notice)]
}

fn begin_sentiment_stats(state: &mut SentimentState) -> Effect {
    let ticket = state.stats.begin();
    state.mark_dirty();
    Effect::FetchSentimentStats { ticket }
}

fn begin_summary(state: &mut SentimentState) -> Effect {
    let ticket = state.summary.begin();
    state.mark_dirty();
    Effect::FetchSentimentSummary { ticket }
}
