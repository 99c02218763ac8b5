//! Derived metrics computed client-side from fetched statistics.

use crate::model::{
    CollectionSummary, CommentStats, LabelCounts, SentimentLabel, SentimentStats,
    TeamComparisonEntry, TrendPoint,
};

/// Score reported when no breakdown exists.
pub const NEUTRAL_MIDPOINT: u8 = 50;
/// Minimum score change between the last two trend points to leave `Stable`.
pub const TREND_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelShare {
    pub count: u64,
    /// Percentage of the total, rounded to one decimal place.
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentBreakdown {
    pub positive: LabelShare,
    pub neutral: LabelShare,
    pub negative: LabelShare,
    pub total: u64,
}

impl SentimentBreakdown {
    pub fn share(&self, label: SentimentLabel) -> LabelShare {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Negative => self.negative,
        }
    }
}

/// Percent breakdown of `counts`, or `None` when there is nothing counted.
///
/// The total sums every label the backend reported. Each percentage is taken
/// from the unrounded total and rounded independently.
pub fn sentiment_breakdown(counts: Option<&LabelCounts>) -> Option<SentimentBreakdown> {
    let counts = counts?;
    let total: u64 = counts.values().sum();
    if total == 0 {
        return None;
    }
    let share = |label: SentimentLabel| {
        let count = label_count(counts, label);
        LabelShare {
            count,
            percentage: round_one_decimal(count as f64 / total as f64 * 100.0),
        }
    };
    Some(SentimentBreakdown {
        positive: share(SentimentLabel::Positive),
        neutral: share(SentimentLabel::Neutral),
        negative: share(SentimentLabel::Negative),
        total,
    })
}

/// Weighted 0-100 sentiment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverallScore {
    pub value: u8,
    /// True when `value` is the neutral midpoint used for missing data rather
    /// than a measurement.
    pub defaulted: bool,
}

impl OverallScore {
    pub const DEFAULT: OverallScore = OverallScore {
        value: NEUTRAL_MIDPOINT,
        defaulted: true,
    };
}

/// POSITIVE weighs 100, NEUTRAL 50, NEGATIVE 0, averaged over the total.
pub fn overall_score(breakdown: Option<&SentimentBreakdown>) -> OverallScore {
    let Some(breakdown) = breakdown else {
        return OverallScore::DEFAULT;
    };
    if breakdown.total == 0 {
        return OverallScore::DEFAULT;
    }
    let weighted = breakdown.positive.count as f64 * 100.0 + breakdown.neutral.count as f64 * 50.0;
    let value = (weighted / breakdown.total as f64).round().clamp(0.0, 100.0) as u8;
    OverallScore {
        value,
        defaulted: false,
    }
}

/// Same score straight from raw counts.
pub fn score_from_counts(counts: Option<&LabelCounts>) -> OverallScore {
    overall_score(sentiment_breakdown(counts).as_ref())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

impl TrendDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            TrendDirection::Improving => "improving",
            TrendDirection::Stable => "stable",
            TrendDirection::Declining => "declining",
        }
    }
}

/// Direction between the two most recent trend points.
///
/// Fewer than two points count as `Stable`; "no data" is not distinguished
/// from a flat series.
pub fn trend_direction(points: &[TrendPoint]) -> TrendDirection {
    let scores: Vec<f64> = points.iter().map(|point| point.score).collect();
    trend_from_scores(&scores)
}

pub fn trend_from_scores(scores: &[f64]) -> TrendDirection {
    let [.., previous, recent] = scores else {
        return TrendDirection::Stable;
    };
    if *recent > previous + TREND_THRESHOLD {
        TrendDirection::Improving
    } else if *recent < previous - TREND_THRESHOLD {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

pub fn confidence_level(confidence: f64) -> ConfidenceLevel {
    if confidence >= 0.8 {
        ConfidenceLevel::High
    } else if confidence >= 0.6 {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToxicityLevel {
    Low,
    Medium,
    High,
}

pub fn toxicity_level(score: f64) -> ToxicityLevel {
    if score >= 0.7 {
        ToxicityLevel::High
    } else if score >= 0.3 {
        ToxicityLevel::Medium
    } else {
        ToxicityLevel::Low
    }
}

/// Coarse band of a 0-100 score, used to pick display colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Favourable,
    Mixed,
    Unfavourable,
}

pub fn score_band(score: f64) -> ScoreBand {
    if score >= 70.0 {
        ScoreBand::Favourable
    } else if score >= 40.0 {
        ScoreBand::Mixed
    } else {
        ScoreBand::Unfavourable
    }
}

/// `value` as a percentage of `total` with one decimal; `None` for an empty total.
pub fn percentage(value: u64, total: u64) -> Option<f64> {
    (total > 0).then(|| round_one_decimal(value as f64 / total as f64 * 100.0))
}

/// Default length of the "top teams" list on the dashboard.
pub const TOP_TEAMS_LIMIT: usize = 5;

/// Teams ordered by average sentiment, best first, cut to `limit`.
pub fn top_teams(teams: &[TeamComparisonEntry], limit: usize) -> Vec<TeamComparisonEntry> {
    let mut ranked = teams.to_vec();
    ranked.sort_by(|a, b| b.avg_sentiment.total_cmp(&a.avg_sentiment));
    ranked.truncate(limit);
    ranked
}

pub fn collection_summary(comments: &CommentStats, sentiments: &SentimentStats) -> CollectionSummary {
    CollectionSummary {
        total_comments: comments.total_comments,
        processed_comments: comments.processed_comments,
        unprocessed_comments: comments.unprocessed_comments,
        total_analyzed: sentiments.total_analyzed,
        source_breakdown: comments.source_breakdown.clone(),
        sentiment_breakdown: sentiments.sentiment_breakdown.clone().unwrap_or_default(),
    }
}

fn label_count(counts: &LabelCounts, label: SentimentLabel) -> u64 {
    counts.get(label.as_str()).copied().unwrap_or(0)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
