use thiserror::Error;

use crate::model::NewTeam;

pub const MIN_ANALYSIS_CHARS: usize = 5;
pub const MAX_BATCH_TEXTS: usize = 50;

/// Input rejected on the client before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("text to analyze is empty")]
    EmptyText,
    #[error("text must be at least {min} characters (got {actual})")]
    TextTooShort { min: usize, actual: usize },
    #[error("no texts to analyze")]
    EmptyBatch,
    #[error("at most {max} texts can be analyzed at once (got {actual})")]
    BatchTooLarge { max: usize, actual: usize },
    #[error("no comments selected")]
    EmptySelection,
    #[error("invalid team: {0}")]
    InvalidTeam(String),
}

/// Checks a manual analysis input; whitespace-only counts as empty.
pub fn validate_analysis_text(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyText);
    }
    let actual = text.chars().count();
    if actual < MIN_ANALYSIS_CHARS {
        return Err(ValidationError::TextTooShort {
            min: MIN_ANALYSIS_CHARS,
            actual,
        });
    }
    Ok(())
}

pub fn validate_batch(texts: &[String]) -> Result<(), ValidationError> {
    match texts.len() {
        0 => Err(ValidationError::EmptyBatch),
        n if n > MAX_BATCH_TEXTS => Err(ValidationError::BatchTooLarge {
            max: MAX_BATCH_TEXTS,
            actual: n,
        }),
        _ => Ok(()),
    }
}

/// Name and slug need two characters, and at least one keyword is required.
pub fn validate_team(team: &NewTeam) -> Result<(), ValidationError> {
    let mut problems = Vec::new();
    if team.name.trim().chars().count() < 2 {
        problems.push("name must be at least 2 characters");
    }
    if team.slug.trim().chars().count() < 2 {
        problems.push("slug must be at least 2 characters");
    }
    if team.keywords.iter().all(|keyword| keyword.trim().is_empty()) {
        problems.push("at least one keyword is required");
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::InvalidTeam(problems.join("; ")))
    }
}
