//! Plain-text rendering of the view models.

use fanpulse_core::display::{
    confidence_label, format_compact, label_display_name, model_display_name, toxicity_label,
};
use fanpulse_core::metrics::{confidence_level, toxicity_level};
use fanpulse_core::model::{
    CollectionSummary, Comment, RealtimeSnapshot, SentimentLabel, SentimentResult, Team,
    TeamComparisonEntry, TeamReport, TrendView,
};
use fanpulse_core::teams::resolve_profile;
use fanpulse_core::{CommentsViewModel, Notice, NoticeLevel, ProcessOutcome, SentimentViewModel};

pub fn render_comments(view: &CommentsViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    let status = if view.is_loading {
        " (loading)"
    } else if view.is_refreshing {
        " (refreshing)"
    } else {
        ""
    };
    lines.push(format!(
        "Comments: {} | Page {} / {}{}",
        format_with_commas(view.total_comments),
        view.filter.page(),
        view.total_pages.max(1),
        status
    ));
    if let Some(error) = &view.error {
        lines.push(format!("! {error}"));
    }
    if let Some(stats) = &view.stats {
        lines.push(format!(
            "Processed {} / {} ({} waiting)",
            format_compact(stats.processed_comments),
            format_compact(stats.total_comments),
            format_compact(stats.unprocessed_comments)
        ));
    }

    for comment in &view.comments {
        let marker = if view.selected.contains(&comment.id) {
            "[x]"
        } else {
            "[ ]"
        };
        lines.push(format!("{marker} {}", format_comment_row(comment)));
    }

    let mut nav = Vec::new();
    if view.has_previous_page {
        nav.push("--page prev");
    }
    if view.has_next_page {
        nav.push("--page next");
    }
    if !nav.is_empty() {
        lines.push(format!("More: {}", nav.join(", ")));
    }
    lines
}

fn format_comment_row(comment: &Comment) -> String {
    let sentiment = match &comment.sentiment {
        Some(result) => label_display_name(result.label),
        None if comment.is_processed => "processed",
        None => "pending",
    };
    let team = comment
        .team_id
        .as_deref()
        .map(|slug| {
            resolve_profile(Some(slug), None)
                .map(|profile| profile.display_name)
                .unwrap_or(slug)
        })
        .unwrap_or("-");
    format!(
        "{id} {source:<9} {team:<12} {sentiment:<8} {text}",
        id = comment.id,
        source = comment.source.as_str(),
        text = truncate(&comment.text, 80)
    )
}

pub fn render_sentiment(view: &SentimentViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(error) = &view.stats_error {
        lines.push(format!("! {error}"));
    }
    let score = if view.overall_score.defaulted {
        format!("{} (no data)", view.overall_score.value)
    } else {
        view.overall_score.value.to_string()
    };
    lines.push(format!("Score: {score} | Trend: {}", view.trend.as_str()));

    match &view.breakdown {
        Some(breakdown) => {
            for label in SentimentLabel::ALL {
                let share = breakdown.share(label);
                lines.push(format!(
                    "  {:<9} {:>6} {:>5.1}%",
                    label_display_name(label),
                    format_with_commas(share.count),
                    share.percentage
                ));
            }
        }
        None => lines.push("  no analysed comments yet".to_string()),
    }

    if !view.history.is_empty() {
        lines.push("Recent analyses:".to_string());
        for entry in &view.history {
            lines.push(format!(
                "  {} {} {}",
                entry.analyzed_at.format("%H:%M:%S"),
                label_display_name(entry.result.label),
                truncate(&entry.text, 60)
            ));
        }
    }
    lines
}

pub fn render_result(result: &SentimentResult) -> Vec<String> {
    let mut lines = vec![format!(
        "{} ({:.0}% confidence, {})",
        label_display_name(result.label),
        result.confidence * 100.0,
        confidence_label(confidence_level(result.confidence))
    )];
    if let Some(toxicity) = result.toxicity_score {
        lines.push(format!(
            "Toxicity: {:.2} ({})",
            toxicity,
            toxicity_label(toxicity_level(toxicity))
        ));
    }
    if let Some(category) = &result.category {
        lines.push(format!("Category: {category}"));
    }
    if let Some(model) = &result.model_used {
        lines.push(format!("Model: {}", model_display_name(model)));
    }
    if let Some(summary) = &result.summary {
        lines.push(summary.clone());
    }
    lines
}

pub fn render_processing(outcome: &ProcessOutcome) -> String {
    format!(
        "Processed {} comments: {} saved, {} failed",
        outcome.processed, outcome.saved, outcome.failed
    )
}

pub fn render_teams(teams: &[Team]) -> Vec<String> {
    teams
        .iter()
        .map(|team| {
            let name = resolve_profile(Some(team.slug.as_str()), Some(team.name.as_str()))
                .map(|profile| profile.display_name)
                .unwrap_or(&team.name);
            let active = if team.is_active { "" } else { " (inactive)" };
            format!(
                "{:<12} {}{} [{}]",
                team.slug,
                name,
                active,
                team.keywords.join(", ")
            )
        })
        .collect()
}

pub fn render_top_teams(entries: &[TeamComparisonEntry]) -> Vec<String> {
    entries
        .iter()
        .enumerate()
        .map(|(rank, entry)| {
            format!(
                "{}. {:<14} {:+.2} ({} comments)",
                rank + 1,
                entry.team_name,
                entry.avg_sentiment,
                format_compact(entry.total_comments)
            )
        })
        .collect()
}

pub fn render_report(report: &TeamReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{}: {} analysed, average {:+.2}",
        report.team_name,
        format_with_commas(report.total_analyzed),
        report.average_sentiment
    )];
    for (label, count) in &report.sentiment_counts {
        lines.push(format!("  {label:<9} {}", format_with_commas(*count)));
    }
    for keyword in report.top_keywords.iter().take(10) {
        lines.push(format!("  #{} x{}", keyword.keyword, keyword.count));
    }
    lines
}

pub fn render_summary(summary: &CollectionSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "Collected {} | processed {} | waiting {} | analysed {}",
        format_compact(summary.total_comments),
        format_compact(summary.processed_comments),
        format_compact(summary.unprocessed_comments),
        format_compact(summary.total_analyzed)
    )];
    for (source, count) in &summary.source_breakdown {
        lines.push(format!("  {source:<10} {}", format_with_commas(*count)));
    }
    lines
}

pub fn render_snapshot(snapshot: &RealtimeSnapshot) -> String {
    let counts = snapshot
        .breakdown
        .iter()
        .map(|(label, count)| format!("{label}={count}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "[{}] comments {} ({} unprocessed) | sentiments {} {}",
        snapshot.timestamp.format("%H:%M:%S"),
        format_with_commas(snapshot.comments_total),
        format_with_commas(snapshot.comments_unprocessed),
        format_with_commas(snapshot.sentiments_total),
        counts
    )
}

pub fn render_trend_view(view: &TrendView) -> Vec<String> {
    let mut lines = vec![format!(
        "Trends for {} (updated {})",
        view.period,
        view.fetched_at.format("%H:%M:%S")
    )];
    for team in &view.analysis.teams {
        let recent = team
            .data
            .iter()
            .rev()
            .take(7)
            .rev()
            .map(|day| day.total.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(format!(
            "  {:<14} {:>6} comments  [{}]",
            team.team_name,
            format_with_commas(team.overall.total_comments),
            recent
        ));
    }
    if view.insights.is_empty() {
        lines.push("No insights for this period".to_string());
    }
    for insight in &view.insights {
        let value = match &insight.value {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(text) => format!(" {text}"),
            other => format!(" {other}"),
        };
        lines.push(format!(
            "  [{}] {}{}: {}",
            insight.severity.as_deref().unwrap_or("info"),
            insight.team_name,
            value,
            insight.description
        ));
    }
    lines
}

pub fn render_notice(notice: &Notice) -> String {
    let prefix = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Success => "ok",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    format!("{prefix}: {}", notice.message)
}

fn truncate(text: &str, max_chars: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let mut out: String = single_line.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn format_with_commas(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}
