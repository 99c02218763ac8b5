//! Display metadata for the tracked clubs.
//!
//! Lookups go by the canonical slug the backend supplies. The free-text name
//! heuristic is only a fallback for records that carry no slug.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamColors {
    pub primary: &'static str,
    pub secondary: &'static str,
}

pub const DEFAULT_COLORS: TeamColors = TeamColors {
    primary: "#6B7280",
    secondary: "#9CA3AF",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamProfile {
    pub slug: &'static str,
    pub display_name: &'static str,
    pub colors: TeamColors,
    /// Short forms fans use, matched only as whole words.
    abbreviations: &'static [&'static str],
}

const PROFILES: [TeamProfile; 4] = [
    TeamProfile {
        slug: "galatasaray",
        display_name: "Galatasaray",
        colors: TeamColors {
            primary: "#FFD700",
            secondary: "#CC1010",
        },
        abbreviations: &["gs", "cimbom"],
    },
    TeamProfile {
        slug: "fenerbahce",
        display_name: "Fenerbahçe",
        colors: TeamColors {
            primary: "#FFFF00",
            secondary: "#000080",
        },
        abbreviations: &["fb", "fener"],
    },
    TeamProfile {
        slug: "besiktas",
        display_name: "Beşiktaş",
        colors: TeamColors {
            primary: "#000000",
            secondary: "#FFFFFF",
        },
        abbreviations: &["bjk", "jk"],
    },
    TeamProfile {
        slug: "trabzonspor",
        display_name: "Trabzonspor",
        colors: TeamColors {
            primary: "#800020",
            secondary: "#87CEEB",
        },
        abbreviations: &["ts", "trabzon"],
    },
];

pub fn profiles() -> &'static [TeamProfile] {
    &PROFILES
}

pub fn profile_for_slug(slug: &str) -> Option<&'static TeamProfile> {
    let slug = slug.trim();
    PROFILES
        .iter()
        .find(|profile| profile.slug.eq_ignore_ascii_case(slug))
}

/// Best guess from a free-text team name.
pub fn guess_profile(name: &str) -> Option<&'static TeamProfile> {
    let words: Vec<String> = name
        .split(|c: char| !c.is_alphanumeric())
        .map(fold_turkish)
        .filter(|word| !word.is_empty())
        .collect();
    let joined: String = words.concat();

    PROFILES.iter().find(|profile| {
        joined.contains(profile.slug)
            || words
                .iter()
                .any(|word| profile.abbreviations.contains(&word.as_str()))
    })
}

/// Slug first; the name heuristic only when no slug was supplied.
pub fn resolve_profile(slug: Option<&str>, name: Option<&str>) -> Option<&'static TeamProfile> {
    match slug.map(str::trim).filter(|slug| !slug.is_empty()) {
        Some(slug) => profile_for_slug(slug),
        None => name.and_then(guess_profile),
    }
}

pub fn colors_for(slug: Option<&str>, name: Option<&str>) -> TeamColors {
    resolve_profile(slug, name)
        .map(|profile| profile.colors)
        .unwrap_or(DEFAULT_COLORS)
}

/// Lower-cases and folds Turkish letters to ASCII, dropping anything else.
pub fn fold_turkish(raw: &str) -> String {
    raw.chars()
        .flat_map(char::to_lowercase)
        .filter_map(|c| match c {
            'ğ' => Some('g'),
            'ç' => Some('c'),
            'ş' => Some('s'),
            'ı' => Some('i'),
            'ö' => Some('o'),
            'ü' => Some('u'),
            c if c.is_ascii_alphanumeric() => Some(c),
            _ => None,
        })
        .collect()
}
