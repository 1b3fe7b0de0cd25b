use once_cell::sync::Lazy;
use regex::Regex;

/// Oldest accepted analysis year
pub const MIN_YEAR: u16 = 1980;

/// Newest accepted analysis year
pub const MAX_YEAR: u16 = 2029;

const YEAR: &str = r"(19[8-9][0-9]|20[0-2][0-9])";

pub(crate) static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\bTITLE\s*=\s*(.+)"));

pub(crate) static YEAR_RE: Lazy<Regex> = Lazy::new(|| compile(&format!(r"\b{YEAR}\b")));

pub(crate) static DATED_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?i)\b(?:JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|SEPT|OCT|NOV|DEC|JANUARY|FEBRUARY|MARCH|APRIL|JUNE|JULY|AUGUST|SEPTEMBER|OCTOBER|NOVEMBER|DECEMBER)[A-Z]*\s+[0-9]{{1,2}},?\s+{YEAR}\b"
    ))
});

pub(crate) static BUILDING_RE: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)\b(REACTOR BUILDING|CONTROL BUILDING|RB|R\.B\.|AUXILIARY BUILDING)\b")
});

pub(crate) static STATION_RE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\b(SZB|SXB|SIZEWELL|STATION|PLANT)\b"));

/// Title parts containing one of these name a station.
pub(crate) const STATION_KEYWORDS: &[&str] = &["SZB", "SXB", "SIZEWELL", "PLANT", "STATION"];

/// Title parts containing this name a building.
pub(crate) const BUILDING_KEYWORD: &str = "BUILDING";

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid built-in pattern {pattern}: {err}"))
}

/// True when `year` lies in the accepted analysis range.
#[must_use]
pub const fn is_valid_year(year: u16) -> bool {
    year >= MIN_YEAR && year <= MAX_YEAR
}

/// First standalone in-range year in `text`.
pub(crate) fn find_year(text: &str) -> Option<u16> {
    YEAR_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Year of the first `Month day, year` style date in `text`.
pub(crate) fn find_dated_year(text: &str) -> Option<u16> {
    DATED_YEAR_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn year_range_is_inclusive() {
        assert!(is_valid_year(1980));
        assert!(is_valid_year(2029));
        assert!(!is_valid_year(1979));
        assert!(!is_valid_year(2030));
    }

    #[test]
    fn find_year_rejects_out_of_range_and_embedded_digits() {
        assert_eq!(find_year("built 1850, revised 2099"), None);
        assert_eq!(find_year("run 219950"), None);
        assert_eq!(find_year("issue 2 of 1987"), Some(1987));
        assert_eq!(find_year("1979 then 2029"), Some(2029));
    }

    #[test]
    fn years_are_ascii_digits_only() {
        assert_eq!(find_year("ref 198\u{665}, issued 1990"), Some(1990));
        assert_eq!(find_dated_year("May \u{661}2, 1999"), None);
        assert_eq!(find_dated_year("May 12, 199\u{665} or June 1, 2001"), Some(2001));
    }

    #[test]
    fn dated_year_accepts_month_names_and_abbreviations() {
        assert_eq!(find_dated_year("Issued SEPT 14, 1991"), Some(1991));
        assert_eq!(find_dated_year("issued january 3 2004"), Some(2004));
        assert_eq!(find_dated_year("Dec 1 1850"), None);
        assert_eq!(find_dated_year("year 1995"), None);
    }

    #[test]
    fn title_pattern_ignores_subtitle_lines() {
        assert!(TITLE_RE.is_match("TITLE = Case A"));
        assert!(TITLE_RE.is_match("$ title=lower case"));
        assert!(!TITLE_RE.is_match("SUBTITLE=Seismic"));
        assert!(!TITLE_RE.is_match("TITLE="));
    }
}
