use chrono::NaiveDate;
use fanpulse_core::model::{
    Ack, BulkUpdateResponse, Comment, CommentId, CommentPage, CommentStats, CommentUpdate,
    CreatedComment, NewComment, SentimentLabel, Source, UnprocessedComments,
};
use fanpulse_core::{QueryParams, DEFAULT_SORT_FIELD};
use serde::Serialize;

use super::format_date;
use crate::{ApiClient, ApiError};

pub const DEFAULT_UNPROCESSED_LIMIT: u32 = 50;
pub const DEFAULT_RECENT_LIMIT: u32 = 10;

pub async fn list_comments(api: &ApiClient, params: &QueryParams) -> Result<CommentPage, ApiError> {
    api.get("/comments", params).await
}

pub async fn create_comment(api: &ApiClient, comment: &NewComment) -> Result<Comment, ApiError> {
    let created: CreatedComment = api.post("/comments", comment).await?;
    Ok(created.comment)
}

pub async fn unprocessed_comments(
    api: &ApiClient,
    limit: u32,
) -> Result<UnprocessedComments, ApiError> {
    api.get(
        "/comments/unprocessed",
        &QueryParams::new().with("limit", limit),
    )
    .await
}

pub async fn comment_stats(api: &ApiClient) -> Result<CommentStats, ApiError> {
    api.get("/comments/stats", &QueryParams::new()).await
}

pub async fn get_comment(api: &ApiClient, id: &str) -> Result<Comment, ApiError> {
    api.get(&format!("/comments/{id}"), &QueryParams::new()).await
}

pub async fn update_comment(
    api: &ApiClient,
    id: &str,
    update: &CommentUpdate,
) -> Result<Ack, ApiError> {
    api.put(&format!("/comments/{id}"), update).await
}

#[derive(Serialize)]
struct BulkProcessedRequest<'a> {
    comment_ids: &'a [CommentId],
}

/// Marks `ids` processed in one call and returns the affected count.
pub async fn bulk_update_processed(api: &ApiClient, ids: &[CommentId]) -> Result<u64, ApiError> {
    let response: BulkUpdateResponse = api
        .post(
            "/comments/bulk/processed",
            &BulkProcessedRequest { comment_ids: ids },
        )
        .await?;
    Ok(response.updated_count)
}

pub async fn recent_comments(api: &ApiClient, limit: u32) -> Result<CommentPage, ApiError> {
    let params = QueryParams::new()
        .with("limit", limit)
        .with("sort_by", DEFAULT_SORT_FIELD)
        .with("sort_order", "desc");
    list_comments(api, &params).await
}

pub async fn comments_by_team(
    api: &ApiClient,
    team_id: &str,
    params: &QueryParams,
) -> Result<CommentPage, ApiError> {
    list_comments(api, &params.clone().with("team_id", team_id)).await
}

pub async fn comments_by_source(
    api: &ApiClient,
    source: Source,
    params: &QueryParams,
) -> Result<CommentPage, ApiError> {
    list_comments(api, &params.clone().with("source", source)).await
}

pub async fn comments_by_sentiment(
    api: &ApiClient,
    sentiment: SentimentLabel,
    params: &QueryParams,
) -> Result<CommentPage, ApiError> {
    list_comments(api, &params.clone().with("sentiment", sentiment)).await
}

pub async fn comments_by_date_range(
    api: &ApiClient,
    start: NaiveDate,
    end: NaiveDate,
    params: &QueryParams,
) -> Result<CommentPage, ApiError> {
    let params = params
        .clone()
        .with("start_date", format_date(start))
        .with("end_date", format_date(end));
    list_comments(api, &params).await
}

pub async fn search_comments(
    api: &ApiClient,
    query: &str,
    params: &QueryParams,
) -> Result<CommentPage, ApiError> {
    list_comments(api, &params.clone().with("search", query)).await
}
