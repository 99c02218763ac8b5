//! Presentation helpers shared by every front-end.

use crate::metrics::{ConfidenceLevel, ScoreBand, ToxicityLevel};
use crate::model::SentimentLabel;

pub const NEUTRAL_GRAY: &str = "#6B7280";

/// `1234` → `1.2K`, `3_400_000` → `3.4M`.
pub fn format_compact(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

pub fn label_color(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => "#10B981",
        SentimentLabel::Negative => "#EF4444",
        SentimentLabel::Neutral => NEUTRAL_GRAY,
    }
}

pub fn label_display_name(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => "Positive",
        SentimentLabel::Negative => "Negative",
        SentimentLabel::Neutral => "Neutral",
    }
}

pub fn score_band_color(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::Favourable => "#10B981",
        ScoreBand::Mixed => NEUTRAL_GRAY,
        ScoreBand::Unfavourable => "#EF4444",
    }
}

pub fn confidence_label(level: ConfidenceLevel) -> &'static str {
    match level {
        ConfidenceLevel::High => "high confidence",
        ConfidenceLevel::Medium => "medium confidence",
        ConfidenceLevel::Low => "low confidence",
    }
}

pub fn toxicity_label(level: ToxicityLevel) -> &'static str {
    match level {
        ToxicityLevel::High => "high",
        ToxicityLevel::Medium => "medium",
        ToxicityLevel::Low => "low",
    }
}

/// Human name for the backend's `model_used` identifiers; unknown ids pass through.
pub fn model_display_name(model_used: &str) -> &str {
    match model_used {
        "hybrid-consensus" => "Hybrid consensus",
        "hybrid-hf-primary" => "Hybrid (HuggingFace first)",
        "hybrid-groq-primary" => "Hybrid (Groq first)",
        "groq-only" => "Groq only",
        "hf-only" => "HuggingFace only",
        "groq-fallback" => "Groq fallback",
        other => other,
    }
}

/// Colour for the AI comment categories (category names are Turkish on the wire).
pub fn category_color(category: &str) -> &'static str {
    match category {
        "Takım Performansı" => "#3B82F6",
        "Oyuncu Eleştirisi" => "#EF4444",
        "Hakem Kararları" => "#F59E0B",
        "Transfer Haberleri" => "#10B981",
        "Teknik Direktör" => "#8B5CF6",
        _ => NEUTRAL_GRAY,
    }
}
