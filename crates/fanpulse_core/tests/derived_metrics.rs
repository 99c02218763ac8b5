use std::collections::BTreeMap;

use chrono::NaiveDate;
use fanpulse_core::display::{format_compact, score_band_color};
use fanpulse_core::metrics::{
    collection_summary, confidence_level, overall_score, score_band, sentiment_breakdown,
    toxicity_level, top_teams, trend_from_scores, ConfidenceLevel, ScoreBand, ToxicityLevel,
    TrendDirection, TOP_TEAMS_LIMIT,
};
use fanpulse_core::model::{
    CommentStats, LabelCounts, SentimentStats, Source, TeamComparisonEntry,
};
use fanpulse_core::teams::{colors_for, guess_profile, profile_for_slug, resolve_profile};
use fanpulse_core::{FilterPatch, FilterState, QueryParams};
use pretty_assertions::assert_eq;

fn counts(pairs: &[(&str, u64)]) -> LabelCounts {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn breakdown_percentages_use_the_unrounded_total() {
    let breakdown = sentiment_breakdown(Some(&counts(&[
        ("POSITIVE", 1),
        ("NEUTRAL", 1),
        ("NEGATIVE", 1),
    ])))
    .expect("non-empty breakdown");

    assert_eq!(breakdown.total, 3);
    assert_eq!(breakdown.positive.percentage, 33.3);
    assert_eq!(breakdown.neutral.percentage, 33.3);
    assert_eq!(breakdown.negative.percentage, 33.3);
    assert_eq!(
        breakdown.positive.count + breakdown.neutral.count + breakdown.negative.count,
        breakdown.total
    );
}

#[test]
fn breakdown_is_absent_without_counts() {
    assert_eq!(sentiment_breakdown(None), None);
    assert_eq!(sentiment_breakdown(Some(&counts(&[("POSITIVE", 0)]))), None);
}

#[test]
fn overall_score_weights_labels() {
    let missing = overall_score(None);
    assert_eq!(missing.value, 50);
    assert!(missing.defaulted);

    let all_positive = sentiment_breakdown(Some(&counts(&[("POSITIVE", 7)])));
    assert_eq!(overall_score(all_positive.as_ref()).value, 100);

    let mixed = sentiment_breakdown(Some(&counts(&[
        ("POSITIVE", 2),
        ("NEUTRAL", 1),
        ("NEGATIVE", 1),
    ])));
    // (200 + 50) / 4 = 62.5
    assert_eq!(overall_score(mixed.as_ref()).value, 63);
}

#[test]
fn trend_uses_a_strict_five_point_threshold() {
    assert_eq!(trend_from_scores(&[40.0, 46.0]), TrendDirection::Improving);
    assert_eq!(trend_from_scores(&[40.0, 45.0]), TrendDirection::Stable);
    assert_eq!(trend_from_scores(&[50.0, 40.0]), TrendDirection::Declining);
    assert_eq!(trend_from_scores(&[80.0]), TrendDirection::Stable);
    assert_eq!(trend_from_scores(&[]), TrendDirection::Stable);
    assert_eq!(trend_from_scores(&[10.0, 60.0, 60.0]), TrendDirection::Stable);
}

#[test]
fn classification_thresholds() {
    assert_eq!(confidence_level(0.8), ConfidenceLevel::High);
    assert_eq!(confidence_level(0.65), ConfidenceLevel::Medium);
    assert_eq!(confidence_level(0.2), ConfidenceLevel::Low);
    assert_eq!(toxicity_level(0.7), ToxicityLevel::High);
    assert_eq!(toxicity_level(0.3), ToxicityLevel::Medium);
    assert_eq!(toxicity_level(0.1), ToxicityLevel::Low);
    assert_eq!(score_band(70.0), ScoreBand::Favourable);
    assert_eq!(score_band(39.9), ScoreBand::Unfavourable);
    assert_eq!(score_band_color(score_band(55.0)), "#6B7280");
}

#[test]
fn compact_counts() {
    assert_eq!(format_compact(999), "999");
    assert_eq!(format_compact(1_234), "1.2K");
    assert_eq!(format_compact(3_400_000), "3.4M");
}

#[test]
fn top_teams_sorts_by_average_sentiment() {
    let teams: Vec<TeamComparisonEntry> = [0.1, 0.9, 0.5, 0.3, 0.7, 0.2]
        .iter()
        .enumerate()
        .map(|(n, avg)| TeamComparisonEntry {
            team_id: format!("team-{n}"),
            avg_sentiment: *avg,
            ..TeamComparisonEntry::default()
        })
        .collect();

    let top = top_teams(&teams, TOP_TEAMS_LIMIT);
    let ids: Vec<&str> = top.iter().map(|t| t.team_id.as_str()).collect();
    assert_eq!(ids, ["team-1", "team-4", "team-2", "team-3", "team-5"]);
}

#[test]
fn collection_summary_merges_both_stats() {
    let comments = CommentStats {
        total_comments: 10,
        processed_comments: 7,
        unprocessed_comments: 3,
        source_breakdown: BTreeMap::from([("reddit".to_string(), 10)]),
        ..CommentStats::default()
    };
    let sentiments = SentimentStats {
        total_analyzed: 7,
        sentiment_breakdown: None,
        ..SentimentStats::default()
    };

    let summary = collection_summary(&comments, &sentiments);
    assert_eq!(summary.total_comments, 10);
    assert_eq!(summary.total_analyzed, 7);
    assert!(summary.sentiment_breakdown.is_empty());
    assert_eq!(summary.source_breakdown.get("reddit"), Some(&10));
}

#[test]
fn team_lookup_prefers_slug() {
    assert_eq!(
        profile_for_slug("fenerbahce").map(|p| p.display_name),
        Some("Fenerbahçe")
    );
    // A slug wins over a misleading name.
    assert_eq!(
        resolve_profile(Some("besiktas"), Some("Galatasaray fan page")).map(|p| p.slug),
        Some("besiktas")
    );
    // An unknown slug does not fall back to the name heuristic.
    assert_eq!(resolve_profile(Some("goztepe"), Some("Galatasaray")), None);
}

#[test]
fn name_heuristic_folds_turkish_letters() {
    assert_eq!(guess_profile("BEŞİKTAŞ JK").map(|p| p.slug), Some("besiktas"));
    assert_eq!(guess_profile("Fenerbahçe SK").map(|p| p.slug), Some("fenerbahce"));
    assert_eq!(guess_profile("gs taraftarı").map(|p| p.slug), Some("galatasaray"));
    assert_eq!(guess_profile("Göztepe"), None);
    assert_eq!(colors_for(None, Some("Trabzonspor")).primary, "#800020");
}

#[test]
fn filter_query_omits_unset_predicates() {
    let filter = FilterState::with_patch(
        FilterPatch::new()
            .source(Some(Source::Youtube))
            .search(Some("   ".to_string()))
            .date_range(NaiveDate::from_ymd_opt(2024, 5, 1), None),
    );
    let query = filter.to_query();

    assert_eq!(query.get("page"), Some("1"));
    assert_eq!(query.get("limit"), Some("20"));
    assert_eq!(query.get("sort_by"), Some("created_at"));
    assert_eq!(query.get("sort_order"), Some("desc"));
    assert_eq!(query.get("source"), Some("youtube"));
    assert_eq!(query.get("start_date"), Some("2024-05-01"));
    assert_eq!(query.get("search"), None);
    assert_eq!(query.get("end_date"), None);
    assert_eq!(query.get("team_id"), None);
}

#[test]
fn query_params_replace_and_drop_keys() {
    let mut query = QueryParams::new().with("team_id", "gs").with("limit", 10);
    query.insert("limit", 20);
    query.insert_opt("team_id", None::<&str>);

    let pairs: Vec<(&str, &str)> = query.iter().collect();
    assert_eq!(pairs, [("limit", "20")]);
}
