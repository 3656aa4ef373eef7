//! Independent pattern matchers used by the JD and resume extractors.
//!
//! Every matcher is pure and returns an optional structured result; callers
//! try them in priority order.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::{Captures, Regex};

/// Upper bound for a believable "N years" figure.
const MAX_PLAUSIBLE_YEARS: f64 = 50.0;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\b").expect("valid email regex")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+?(?:\(\d{1,4}\)[ .-]?)?\d+(?:[ .-]\d+)*").expect("valid phone regex")
});

/// Digit runs shaped like `2019-2022`, `1990-05-12` or `12.05.1990`.
static DATE_LIKE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:19|20)\d{2}\s*[-.]\s*(?:19|20)\d{2}|(?:19|20)\d{2}[-.]\d{1,2}[-.]\d{1,2}|\d{1,2}[-.]\d{1,2}[-.](?:19|20)\d{2})$",
    )
    .expect("valid date-like regex")
});

const MAX_PHONE_DIGITS: usize = 15;

/// `5 years`, `5+ years`, `3-5 yrs`, `2.5 years`. Group 1 is the lower bound.
static YEARS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(\d{1,2}(?:\.\d+)?)\s*(?:\+|(?:-|–|to)\s*\d{1,2}(?:\.\d+)?)?\s*\+?\s*(?:years?|yrs?)\b",
    )
    .expect("valid years regex")
});

static QUALIFIED_YEARS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:minimum(?:\s+of)?|at\s+least|over|more\s+than)\s+(\d{1,2}(?:\.\d+)?)\s*\+?\s*(?:years?|yrs?)\b",
    )
    .expect("valid qualified years regex")
});

static EXPERIENCE_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:experience|exp|experienced)\b").expect("valid experience regex")
});

static DATE_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        \b
        (?: (?P<sm>\d{1,2})[/.] | (?P<smn>jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+ )?
        (?P<sy>(?:19|20)\d{2})
        \s*(?:-|–|—|to|until)\s*
        (?:
            (?: (?P<em>\d{1,2})[/.] | (?P<emn>jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+ )?
            (?P<ey>(?:19|20)\d{2})
            |
            (?P<open>present|current|now|today|date)
        )
        \b",
    )
    .expect("valid date range regex")
});

/// First email address in `text`.
pub fn email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

/// First digit run with 7 to 15 digits, tolerant of space, dot, dash and
/// parenthesised area codes. Year ranges and dates such as `2019-2022` or
/// `1990-05-12` are ignored.
pub fn phone(text: &str) -> Option<String> {
    PHONE_RE
        .find_iter(text)
        .map(|m| trim_phone(m.as_str().trim()))
        .find(|candidate| {
            (7..=MAX_PHONE_DIGITS).contains(&digit_count(candidate))
                && !DATE_LIKE_RE.is_match(candidate)
        })
        .map(str::to_string)
}

/// Cuts a raw phone match where the number plausibly ends.
///
/// The separator after the second digit group fixes the style; a later group
/// joined by a different separator belongs to the next token
/// (`555.123.4567 10 years`). The first separator may differ so a country
/// code or area code can stand apart (`+1 555-123-4567`). Groups are then
/// dropped from the end while the run is longer than a phone number can be.
fn trim_phone(candidate: &str) -> &str {
    let breaks = group_breaks(candidate);
    let mut end = candidate.len();
    if let Some(&(_, style)) = breaks.get(1) {
        if let Some(&(at, _)) = breaks.iter().skip(2).find(|(_, sep)| *sep != style) {
            end = at;
        }
    }
    let mut trimmed = &candidate[..end];
    for &(at, _) in breaks.iter().rev() {
        if digit_count(trimmed) <= MAX_PHONE_DIGITS {
            break;
        }
        if at < trimmed.len() {
            trimmed = &candidate[..at];
        }
    }
    trimmed
}

/// Byte offset and character of every separator between two digit groups.
fn group_breaks(candidate: &str) -> Vec<(usize, char)> {
    let mut breaks = Vec::new();
    let mut prev: Option<char> = None;
    for (at, c) in candidate.char_indices() {
        let after_group = prev.is_some_and(|p| p.is_ascii_digit() || p == ')');
        if matches!(c, ' ' | '.' | '-') && after_group {
            breaks.push((at, c));
        }
        prev = Some(c);
    }
    breaks
}

fn digit_count(text: &str) -> usize {
    text.chars().filter(char::is_ascii_digit).count()
}

/// Largest explicit years-of-experience statement in a resume.
///
/// Counts `N years` on lines that mention experience, and `over N years` /
/// `more than N years` anywhere.
pub fn explicit_experience_years(text: &str) -> Option<f64> {
    let on_experience_lines = text
        .lines()
        .filter(|line| EXPERIENCE_WORD_RE.is_match(line))
        .flat_map(|line| YEARS_RE.captures_iter(line).filter_map(|c| capture_years(&c)));
    let qualified = QUALIFIED_YEARS_RE
        .captures_iter(text)
        .filter_map(|c| capture_years(&c));

    on_experience_lines
        .chain(qualified)
        .filter(|y| *y > 0.0 && *y < MAX_PLAUSIBLE_YEARS)
        .max_by(f64::total_cmp)
}

/// Minimum experience demanded by a job description.
///
/// Matchers run in priority order and the first hit wins:
/// 1. a years figure on a line mentioning experience, or on the line right
///    after an experience heading;
/// 2. `minimum N years`, `at least N years`, `over N years`, `more than N years`.
pub fn required_experience_years(text: &str) -> Option<f64> {
    years_near_experience(text).or_else(|| qualified_years(text))
}

fn years_near_experience(text: &str) -> Option<f64> {
    let mut after_heading = false;
    for line in text.lines() {
        let mentions = EXPERIENCE_WORD_RE.is_match(line);
        if mentions || after_heading {
            if let Some(years) = YEARS_RE.captures(line).and_then(|c| capture_years(&c)) {
                return Some(years);
            }
        }
        if !line.trim().is_empty() {
            after_heading = mentions && line.trim_end().ends_with(':');
        }
    }
    None
}

fn qualified_years(text: &str) -> Option<f64> {
    QUALIFIED_YEARS_RE
        .captures(text)
        .and_then(|c| capture_years(&c))
}

fn capture_years(caps: &Captures<'_>) -> Option<f64> {
    caps.get(1)?.as_str().parse::<f64>().ok()
}

/// Half-open interval of months, `start..end`, counted from year 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthSpan {
    pub start: i32,
    pub end: i32,
}

impl MonthSpan {
    pub fn months(&self) -> i32 {
        (self.end - self.start).max(0)
    }
}

/// Employment date ranges in `text`.
///
/// Month-qualified bounds are month-precise and include the end month.
/// A bare end year counts up to the start of that year, so `2019 - 2022` is
/// three years. Open ranges (`present`, `current`, ...) end at `today`.
pub fn date_ranges(text: &str, today: NaiveDate) -> Vec<MonthSpan> {
    DATE_RANGE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let start_year: i32 = caps.name("sy")?.as_str().parse().ok()?;
            let start_month = month_of(&caps, "sm", "smn").unwrap_or(1);
            let start = month_index(start_year, start_month);

            let end = if caps.name("open").is_some() {
                month_index(today.year(), today.month()) + 1
            } else {
                let end_year: i32 = caps.name("ey")?.as_str().parse().ok()?;
                match month_of(&caps, "em", "emn") {
                    Some(month) => month_index(end_year, month) + 1,
                    None => month_index(end_year, 1),
                }
            };

            let span = MonthSpan { start, end };
            let plausible = span.months() > 0
                && f64::from(span.months()) / 12.0 < MAX_PLAUSIBLE_YEARS;
            plausible.then_some(span)
        })
        .collect()
}

/// Merges overlapping or touching spans so no month is counted twice.
pub fn merge_spans(mut spans: Vec<MonthSpan>) -> Vec<MonthSpan> {
    spans.sort();
    let mut merged: Vec<MonthSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

/// Total years covered by `spans` after merging.
pub fn total_years(spans: Vec<MonthSpan>) -> f64 {
    let months: i32 = merge_spans(spans).iter().map(MonthSpan::months).sum();
    f64::from(months) / 12.0
}

fn month_of(caps: &Captures<'_>, numeric: &str, named: &str) -> Option<u32> {
    if let Some(m) = caps.name(numeric) {
        return m.as_str().parse::<u32>().ok().filter(|m| (1..=12).contains(m));
    }
    let name = caps.name(named)?.as_str().to_lowercase();
    const MONTHS: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    MONTHS
        .iter()
        .position(|m| name.starts_with(m))
        .map(|i| i as u32 + 1)
}

fn month_index(year: i32, month: u32) -> i32 {
    year * 12 + month as i32 - 1
}
