mod common;

use common::{cache, client, comment_stats_json, notices, page_json};
use fanpulse_core::model::Source;
use fanpulse_core::{FilterPatch, Notice};
use fanpulse_engine::{ApiError, CommentsSession, DashboardError, MarkOutcome};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_listing(server: &MockServer, ids: &[&str], calls: u64) {
    Mock::given(method("GET"))
        .and(path("/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(ids, 1)))
        .expect(calls)
        .mount(server)
        .await;
}

async fn mount_stats(server: &MockServer, calls: u64) {
    Mock::given(method("GET"))
        .and(path("/comments/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(comment_stats_json()))
        .expect(calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn refresh_loads_page_and_stats_then_serves_cache() {
    let server = MockServer::start().await;
    mount_listing(&server, &["c1", "c2"], 1).await;
    mount_stats(&server, 1).await;

    let (api, rx) = client(&server);
    let mut session = CommentsSession::new(api, cache());
    session.refresh().await;
    session.refresh().await;

    let view = session.view();
    assert_eq!(view.comments.len(), 2);
    assert_eq!(view.stats.as_ref().map(|stats| stats.total_comments), Some(120));
    assert!(!view.is_loading);
    assert!(!view.has_error());
    assert!(notices(&rx).is_empty());
}

#[tokio::test]
async fn refetch_bypasses_the_cache() {
    let server = MockServer::start().await;
    mount_listing(&server, &["c1"], 2).await;
    mount_stats(&server, 2).await;

    let (api, _rx) = client(&server);
    let mut session = CommentsSession::new(api, cache());
    session.refresh().await;
    session.refetch().await;
}

#[tokio::test]
async fn bulk_mark_processed_clears_selection_and_reloads() {
    let server = MockServer::start().await;
    mount_listing(&server, &["c1", "c2", "c3"], 2).await;
    mount_stats(&server, 2).await;
    Mock::given(method("POST"))
        .and(path("/comments/bulk/processed"))
        .and(body_json(json!({"comment_ids": ["c1", "c3"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Comments marked as processed",
            "updated_count": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (api, rx) = client(&server);
    let mut session = CommentsSession::new(api, cache());
    session.refresh().await;
    session.toggle_selection("c1");
    session.toggle_selection("c3");
    assert_eq!(session.view().selected, vec!["c1".to_string(), "c3".to_string()]);

    let outcome = session.mark_selected_processed().await.expect("bulk update");
    assert_eq!(outcome, MarkOutcome::Updated(2));
    assert!(session.state().selection().is_empty());
    assert_eq!(session.state().last_processed_count(), Some(2));
    assert_eq!(
        notices(&rx),
        vec![Notice::success("2 comments marked as processed")]
    );
}

#[tokio::test]
async fn nothing_selected_sends_no_request() {
    let server = MockServer::start().await;
    Mock::given(path("/comments/bulk/processed"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (api, rx) = client(&server);
    let mut session = CommentsSession::new(api, cache());
    let outcome = session.mark_selected_processed().await.expect("no-op");
    assert_eq!(outcome, MarkOutcome::NothingSelected);
    assert!(notices(&rx).is_empty());
}

#[tokio::test]
async fn failed_bulk_update_keeps_selection() {
    let server = MockServer::start().await;
    mount_listing(&server, &["c1"], 1).await;
    mount_stats(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/comments/bulk/processed"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (api, rx) = client(&server);
    let mut session = CommentsSession::new(api, cache());
    session.refresh().await;
    session.select_all();

    let err = session.mark_selected_processed().await.unwrap_err();
    assert!(matches!(
        err,
        DashboardError::Api(ApiError::Http { status: 500, .. })
    ));
    assert_eq!(session.state().selection().ids(), ["c1".to_string()]);
    assert!(session.view().mutation_error.is_some());
    assert_eq!(
        notices(&rx),
        vec![Notice::error("Server error. Please try again later.")]
    );
}

#[tokio::test]
async fn filter_change_queries_page_one_with_predicates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/comments"))
        .and(query_param("team_id", "fenerbahce"))
        .and(query_param("source", "youtube"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&["c9"], 1)))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _rx) = client(&server);
    let mut session = CommentsSession::new(api, cache());
    let patch = FilterPatch::new()
        .team(Some("fenerbahce".to_string()))
        .source(Some(Source::Youtube));
    session.update_filters(patch).await;

    let view = session.view();
    assert_eq!(view.filter.page(), 1);
    assert_eq!(view.comments[0].id, "c9");
}

#[tokio::test]
async fn listing_failure_is_reported_inline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/comments"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"error": "maintenance"})))
        .mount(&server)
        .await;
    mount_stats(&server, 1).await;

    let (api, rx) = client(&server);
    let mut session = CommentsSession::new(api, cache());
    session.refresh().await;

    let view = session.view();
    assert_eq!(view.error.as_deref(), Some("maintenance"));
    assert!(view.has_error());
    assert!(view.stats.is_some());
    assert_eq!(notices(&rx), vec![Notice::error("maintenance")]);
}

#[tokio::test]
async fn update_comment_puts_fields_and_reloads() {
    let server = MockServer::start().await;
    mount_listing(&server, &["c1"], 1).await;
    mount_stats(&server, 1).await;
    Mock::given(method("PUT"))
        .and(path("/comments/c1"))
        .and(body_json(json!({"is_processed": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let (api, rx) = client(&server);
    let mut session = CommentsSession::new(api, cache());
    let update = fanpulse_core::model::CommentUpdate {
        is_processed: Some(true),
        ..Default::default()
    };
    session.update_comment("c1", update).await.expect("updated");
    assert_eq!(notices(&rx), vec![Notice::success("Comment updated")]);
}
