mod common;

use chrono::NaiveDate;
use common::{client, comment_stats_json, sentiment_stats_json};
use fanpulse_core::model::{DateRange, NewTeam, ReportFormat, TrendPeriod};
use fanpulse_engine::resources::{collect, dashboard, insights, sentiments, teams, trends};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn teams_json() -> serde_json::Value {
    json!({
        "teams": [
            {"id": "gs", "name": "Galatasaray", "slug": "galatasaray",
             "keywords": ["cimbom", "aslan"], "is_active": true},
            {"id": "fb", "name": "Fenerbahçe", "slug": "fenerbahce",
             "keywords": ["kanarya"], "is_active": true},
            {"id": "bjk", "name": "Beşiktaş", "slug": "besiktas",
             "keywords": null, "is_active": false}
        ],
        "count": 3
    })
}

#[tokio::test]
async fn team_report_sends_date_bounds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sentiments/report/gs"))
        .and(query_param("start_date", "2024-05-01"))
        .and(query_param("end_date", "2024-05-31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "team_id": "gs",
            "team_name": "Galatasaray",
            "total_analyzed": 40,
            "sentiment_counts": {"POSITIVE": 30, "NEGATIVE": 10},
            "average_sentiment": 0.4,
            "top_keywords": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _rx) = client(&server);
    let range = DateRange {
        start: NaiveDate::from_ymd_opt(2024, 5, 1),
        end: NaiveDate::from_ymd_opt(2024, 5, 31),
    };
    let report = sentiments::team_report(&api, "gs", range).await.expect("report");
    assert_eq!(report.total_analyzed, 40);
    assert!(report.top_keywords.is_empty());
}

#[tokio::test]
async fn team_search_ignores_case_and_turkish_letters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/teams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(teams_json()))
        .mount(&server)
        .await;

    let (api, _rx) = client(&server);
    let found = teams::search_teams(&api, "FENERBAHCE").await.expect("search");
    assert_eq!(found.count, 1);
    assert_eq!(found.teams[0].id, "fb");

    let by_keyword = teams::search_teams(&api, "Cimbom").await.expect("search");
    assert_eq!(by_keyword.teams[0].id, "gs");

    let active = teams::active_teams(&api).await.expect("active");
    assert_eq!(active.count, 2);
    assert!(active.teams.iter().all(|team| team.is_active));
}

#[test]
fn team_validation_runs_locally() {
    let team = NewTeam {
        name: "G".to_string(),
        slug: "galatasaray".to_string(),
        keywords: vec!["cimbom".to_string()],
        ..NewTeam::default()
    };
    assert!(teams::validate_team(&team).is_err());
    let team = NewTeam {
        name: "Galatasaray".to_string(),
        ..team
    };
    assert_eq!(teams::validate_team(&team), Ok(()));
}

#[tokio::test]
async fn subreddit_prefix_is_stripped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/reddit/subreddit/galatasaray"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"collected": 12})))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _rx) = client(&server);
    let response = collect::collect_subreddit(&api, " r/galatasaray ")
        .await
        .expect("collect");
    assert_eq!(response["collected"], 12);
}

#[tokio::test]
async fn realtime_snapshot_merges_both_statistics() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/comments/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(comment_stats_json()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sentiments/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sentiment_stats_json()))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _rx) = client(&server);
    let snapshot = dashboard::realtime_snapshot(&api).await.expect("snapshot");
    assert_eq!(snapshot.comments_total, 120);
    assert_eq!(snapshot.comments_unprocessed, 20);
    assert_eq!(snapshot.sentiments_total, 100);
    assert_eq!(snapshot.breakdown.get("POSITIVE"), Some(&50));
}

#[tokio::test]
async fn insight_envelopes_are_unwrapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sentiments/enhanced-stats/gs"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"toxicity": 0.1}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (api, _rx) = client(&server);
    let stats = insights::enhanced_stats(&api, Some("gs")).await.expect("stats");
    assert_eq!(stats, json!({"toxicity": 0.1}));
}

#[tokio::test]
async fn top_teams_are_ranked_by_average_sentiment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dashboard/comparison"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"teams": [
            {"team_id": "fb", "team_name": "Fenerbahçe", "avg_sentiment": 0.1},
            {"team_id": "gs", "team_name": "Galatasaray", "avg_sentiment": 0.6},
            {"team_id": "bjk", "team_name": "Beşiktaş", "avg_sentiment": -0.2}
        ]})))
        .mount(&server)
        .await;

    let (api, _rx) = client(&server);
    let top = dashboard::top_teams(&api, 2).await.expect("top");
    let ids: Vec<&str> = top.iter().map(|entry| entry.team_id.as_str()).collect();
    assert_eq!(ids, vec!["gs", "fb"]);
}

#[tokio::test]
async fn trend_view_loads_analysis_and_insights_for_the_period() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/trends/analysis"))
        .and(query_param("period", "30d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"teams": [
            {
                "team_name": "Galatasaray",
                "data": [{"date": "2024-05-01", "total": 4}, {"date": "2024-05-02", "total": 6}],
                "overall": {"total_comments": 10}
            },
            {"team_name": "Trabzonspor", "data": null}
        ]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/trends/insights"))
        .and(query_param("period", "30d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"insights": [
            {"type": "spike", "severity": "high", "team_name": "Galatasaray",
             "value": "+45%", "description": "Derbi sonrası yorum patlaması"}
        ]})))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _rx) = client(&server);
    let view = trends::trend_view(&api, TrendPeriod::Month).await.expect("trends");
    assert_eq!(view.period, TrendPeriod::Month);
    assert_eq!(view.analysis.teams.len(), 2);
    assert_eq!(view.analysis.teams[0].overall.total_comments, 10);
    assert!(view.analysis.teams[1].data.is_empty());
    assert_eq!(view.insights[0].kind.as_deref(), Some("spike"));
    assert_eq!(view.insights[0].value, json!("+45%"));
}

#[tokio::test]
async fn executive_report_is_downloaded_as_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reports/executive/download"))
        .and(query_param("period", "7d"))
        .and(query_param("format", "html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rapor</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _rx) = client(&server);
    let report = trends::executive_report(&api, TrendPeriod::Week, ReportFormat::Html)
        .await
        .expect("report");
    assert_eq!(report, "<html>rapor</html>");
    assert_eq!(
        ReportFormat::Json.file_name(TrendPeriod::Quarter),
        "executive-report-90d.json"
    );
}

#[tokio::test]
async fn live_stream_is_restarted_with_the_subreddit_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/live/reddit/start"))
        .and(body_json(json!({"subreddits": ["superlig", "galatasaray"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "started"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/live/reddit/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"running": true})))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _rx) = client(&server);
    let started = collect::start_live_stream(&api, &["superlig", "galatasaray"])
        .await
        .expect("start");
    assert_eq!(started["status"], "started");
    let status = collect::live_stream_status(&api).await.expect("status");
    assert_eq!(status["running"], true);
}
