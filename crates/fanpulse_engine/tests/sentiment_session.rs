mod common;

use common::{cache, client, comment_json, notices, result_json, sentiment_stats_json};
use fanpulse_core::model::SentimentLabel;
use fanpulse_core::{Notice, ProcessOutcome, ValidationError};
use fanpulse_engine::{DashboardError, SentimentSession};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_stats(server: &MockServer, calls: u64) {
    Mock::given(method("GET"))
        .and(path("/sentiments/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sentiment_stats_json()))
        .expect(calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn short_text_is_rejected_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(path("/sentiments/analyze"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (api, rx) = client(&server);
    let mut session = SentimentSession::new(api, cache());
    let err = session.analyze_text("hi", "tr").await.unwrap_err();
    assert_eq!(
        err,
        DashboardError::Validation(ValidationError::TextTooShort { min: 5, actual: 2 })
    );
    assert_eq!(
        notices(&rx),
        vec![Notice::warning(
            "text must be at least 5 characters (got 2)"
        )]
    );
    assert!(session.view().history.is_empty());
}

#[tokio::test]
async fn analysis_is_recorded_and_stats_reloaded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sentiments/analyze"))
        .and(body_json(json!({"text": "Harika bir maç!", "language": "tr"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"result": result_json("POSITIVE", 0.92)})),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_stats(&server, 1).await;

    let (api, rx) = client(&server);
    let mut session = SentimentSession::new(api, cache());
    let result = session
        .analyze_text("Harika bir maç!", "tr")
        .await
        .expect("analysis");
    assert_eq!(result.label, SentimentLabel::Positive);

    let view = session.view();
    assert_eq!(view.history.len(), 1);
    assert_eq!(view.history[0].text, "Harika bir maç!");
    assert!(!view.is_analyzing);
    assert!(view.stats.is_some());
    assert_eq!(notices(&rx), vec![Notice::success("Sentiment analysis complete")]);
}

#[tokio::test]
async fn oversized_batch_is_rejected() {
    let server = MockServer::start().await;
    let (api, _rx) = client(&server);
    let mut session = SentimentSession::new(api, cache());

    let texts = vec!["güzel gol".to_string(); 51];
    let err = session.analyze_batch(texts).await.unwrap_err();
    assert_eq!(
        err,
        DashboardError::Validation(ValidationError::BatchTooLarge { max: 50, actual: 51 })
    );
    let err = session.analyze_batch(Vec::new()).await.unwrap_err();
    assert_eq!(err, DashboardError::Validation(ValidationError::EmptyBatch));
}

#[tokio::test]
async fn batch_counts_only_successful_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sentiments/analyze/batch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [result_json("NEGATIVE", 0.8), null, result_json("NEUTRAL", 0.6)],
            "total_texts": 3
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_stats(&server, 1).await;

    let (api, rx) = client(&server);
    let mut session = SentimentSession::new(api, cache());
    let texts = vec![
        "Hakem rezaletti".to_string(),
        "???".to_string(),
        "Berabere bitti".to_string(),
    ];
    let response = session.analyze_batch(texts).await.expect("batch");
    assert_eq!(response.results.len(), 3);

    let outcome = session.state().last_batch().expect("recorded");
    assert_eq!((outcome.analyzed, outcome.total), (2, 3));
    assert_eq!(notices(&rx), vec![Notice::success("2/3 texts analyzed")]);
}

#[tokio::test]
async fn batch_uses_server_counts_when_results_are_absent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sentiments/analyze/batch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Batch analysis completed",
            "total_texts": 3,
            "success_count": 3,
            "failed_count": 0
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_stats(&server, 1).await;

    let (api, rx) = client(&server);
    let mut session = SentimentSession::new(api, cache());
    let texts = vec!["Harika maç".to_string(); 3];
    let response = session.analyze_batch(texts).await.expect("batch");
    assert!(response.results.is_empty());

    let outcome = session.state().last_batch().expect("recorded");
    assert_eq!((outcome.analyzed, outcome.total), (3, 3));
    assert_eq!(notices(&rx), vec![Notice::success("3/3 texts analyzed")]);
}

#[tokio::test]
async fn processing_trusts_server_side_saves() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/comments/unprocessed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "comments": [
                comment_json("c1", "Muhteşem bir galibiyet"),
                comment_json("c2", "Berbat oyun"),
            ],
            "count": 2
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/sentiments/analyze/batch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Batch analysis completed",
            "total_texts": 2,
            "success_count": 1,
            "failed_count": 1
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/sentiments"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    mount_stats(&server, 1).await;

    let (api, _rx) = client(&server);
    let mut session = SentimentSession::new(api, cache());
    let outcome = session.process_unprocessed().await.expect("processed");
    assert_eq!(
        outcome,
        ProcessOutcome {
            processed: 2,
            saved: 1,
            failed: 1
        }
    );
}

#[tokio::test]
async fn processing_saves_each_result_and_counts_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/comments/unprocessed"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "comments": [
                comment_json("c1", "Muhteşem bir galibiyet"),
                comment_json("c2", "Berbat oyun"),
                comment_json("c3", "idare eder"),
            ],
            "count": 3
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/sentiments/analyze/batch"))
        .and(body_json(json!({
            "texts": ["Muhteşem bir galibiyet", "Berbat oyun", "idare eder"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [result_json("POSITIVE", 0.9), result_json("NEGATIVE", 0.85), null],
            "total_texts": 3
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/sentiments"))
        .and(body_partial_json(json!({"comment_id": "c1", "team_id": "galatasaray"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "saved"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/sentiments"))
        .and(body_partial_json(json!({"comment_id": "c2"})))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_stats(&server, 1).await;

    let (api, rx) = client(&server);
    let mut session = SentimentSession::new(api, cache());
    let outcome = session.process_unprocessed().await.expect("processed");
    assert_eq!(
        outcome,
        ProcessOutcome {
            processed: 3,
            saved: 1,
            failed: 2
        }
    );
    assert!(!session.view().is_processing);
    assert_eq!(
        notices(&rx),
        vec![
            Notice::error("Server error. Please try again later."),
            Notice::success("3 comments processed"),
        ]
    );
}

#[tokio::test]
async fn empty_backlog_skips_analysis() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/comments/unprocessed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"comments": null, "count": 0})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/sentiments/analyze/batch"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (api, rx) = client(&server);
    let mut session = SentimentSession::new(api, cache());
    let outcome = session.process_unprocessed().await.expect("processed");
    assert_eq!(outcome, ProcessOutcome::default());
    assert_eq!(notices(&rx), vec![Notice::info("No new comments to process")]);
}

#[tokio::test]
async fn refresh_loads_stats_and_summary_once() {
    let server = MockServer::start().await;
    mount_stats(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/dashboard/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"stats": {"total": 3}})))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _rx) = client(&server);
    let mut session = SentimentSession::new(api, cache());
    session.refresh().await;
    session.refresh().await;

    let view = session.view();
    assert_eq!(view.summary, Some(json!({"stats": {"total": 3}})));
    assert!(view.breakdown.is_some());
    assert!(!view.has_error());
}
