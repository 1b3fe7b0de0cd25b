use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical building categories, in rule priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingCategory {
    Reactor,
    AuxiliaryControl,
    Fuel,
    Diesel,
    Radwaste,
    Decontamination,
}

impl BuildingCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reactor => "Reactor Building",
            Self::AuxiliaryControl => "Auxiliary/Control Building",
            Self::Fuel => "Fuel Building",
            Self::Diesel => "Diesel Building",
            Self::Radwaste => "Radwaste Building",
            Self::Decontamination => "Decontamination Building",
        }
    }

    /// First category whose rule matches an already cleaned (upper-cased) label
    #[must_use]
    pub fn classify(cleaned: &str) -> Option<Self> {
        RULES
            .iter()
            .find(|rule| rule.matches(cleaned))
            .map(|rule| rule.category)
    }
}

impl fmt::Display for BuildingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Rule {
    category: BuildingCategory,
    /// Matched anywhere in the label
    substrings: &'static [&'static str],
    /// Matched only when not glued to other letters or digits
    tokens: &'static [&'static str],
}

impl Rule {
    fn matches(&self, cleaned: &str) -> bool {
        self.substrings.iter().any(|s| cleaned.contains(s))
            || self.tokens.iter().any(|t| contains_token(cleaned, t))
    }
}

const RULES: &[Rule] = &[
    Rule {
        category: BuildingCategory::Reactor,
        substrings: &["REACTOR"],
        tokens: &["RB", "R.B."],
    },
    Rule {
        category: BuildingCategory::AuxiliaryControl,
        substrings: &["AUX", "CONTROL", "AUXILIARY", "AUX/CON", "AUX/CONTROL"],
        tokens: &[],
    },
    Rule {
        category: BuildingCategory::Fuel,
        substrings: &["FUEL"],
        tokens: &[],
    },
    Rule {
        category: BuildingCategory::Diesel,
        substrings: &["DIESEL"],
        tokens: &[],
    },
    Rule {
        category: BuildingCategory::Radwaste,
        substrings: &["RADWASTE", "RAD WASTE"],
        tokens: &[],
    },
    Rule {
        category: BuildingCategory::Decontamination,
        substrings: &["DECONTAMINATION"],
        tokens: &[],
    },
];

/// Map a raw building candidate to its canonical category name.
///
/// Unrecognised labels come back title-cased with whitespace collapsed. Absent input stays
/// absent.
#[must_use]
pub fn normalise_building(raw: Option<&str>) -> Option<String> {
    let cleaned = clean(raw?);
    Some(match BuildingCategory::classify(&cleaned) {
        Some(category) => category.as_str().to_string(),
        None => title_case(&cleaned),
    })
}

fn clean(raw: &str) -> String {
    raw.to_uppercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn contains_token(haystack: &str, token: &str) -> bool {
    haystack.match_indices(token).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + token.len()..].chars().next();
        !before.is_some_and(char::is_alphabetic) && !after.is_some_and(char::is_alphabetic)
    })
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}
