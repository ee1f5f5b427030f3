//! FILENAME: core/pivot-engine/src/ordering.rs
//! Axis ordering - sorts pivot axis labels by what they look like.
//!
//! Detection runs on the labels of one axis (margin excluded):
//! 1. More than half parse as dates (month-year labels included) ->
//!    chronological order, labels that do not parse first.
//! 2. The first label's first word is a month name -> month rank order.
//! 3. Otherwise -> natural order (numbers numerically, then text).
//!
//! All sorts are stable, so labels that compare equal keep their input order.

use chrono::{NaiveDate, NaiveDateTime};

/// Rank given to labels whose first word is not a month name.
const UNKNOWN_MONTH_RANK: u32 = 50;

/// Month names and abbreviations (Indonesian and English), upper case.
const MONTHS: &[(&str, u32)] = &[
    ("JANUARI", 1), ("JANUARY", 1), ("JAN", 1),
    ("FEBRUARI", 2), ("FEBRUARY", 2), ("FEB", 2),
    ("MARET", 3), ("MARCH", 3), ("MAR", 3),
    ("APRIL", 4), ("APR", 4),
    ("MEI", 5), ("MAY", 5),
    ("JUNI", 6), ("JUNE", 6), ("JUN", 6),
    ("JULI", 7), ("JULY", 7), ("JUL", 7),
    ("AGUSTUS", 8), ("AUGUST", 8), ("AGT", 8), ("AUG", 8),
    ("SEPTEMBER", 9), ("SEP", 9),
    ("OKTOBER", 10), ("OCTOBER", 10), ("OKT", 10), ("OCT", 10),
    ("NOVEMBER", 11), ("NOV", 11),
    ("DESEMBER", 12), ("DECEMBER", 12), ("DES", 12), ("DEC", 12),
];

/// Day-first date formats, most common first.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d", "%Y/%m/%d", "%d/%m/%y",
    "%d %B %Y", "%d %b %Y", "%m/%d/%Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M",
];

/// The ordering chosen for an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrdering {
    Chronological,
    MonthName,
    Natural,
}

/// Parses a label as a date or timestamp, day first.
pub fn parse_date_label(label: &str) -> Option<NaiveDateTime> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(label, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(label, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    parse_month_year(label)?.and_hms_opt(0, 0, 0)
}

/// Month-only labels ("Dec 2024", "Januari 2025", "2025-01", "01/2025")
/// resolve to the first day of that month. The year must have four digits.
fn parse_month_year(label: &str) -> Option<NaiveDate> {
    let is_year = |s: &str| s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit());

    let words: Vec<&str> = label.split_whitespace().collect();
    if let [month, year] = words.as_slice() {
        if is_year(year) {
            return NaiveDate::from_ymd_opt(year.parse().ok()?, month_rank(month)?, 1);
        }
        return None;
    }

    let (year, month) = match label.split_once(['-', '/']) {
        Some((a, b)) if is_year(a) => (a, b),
        Some((a, b)) if is_year(b) => (b, a),
        _ => return None,
    };
    if month.is_empty() || month.len() > 2 || !month.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

/// Month number (1-12) of the label's first word, if it is a month name.
pub fn month_rank(label: &str) -> Option<u32> {
    let first = label.trim().split_whitespace().next()?.to_uppercase();
    MONTHS
        .iter()
        .find(|(name, _)| *name == first)
        .map(|(_, rank)| *rank)
}

/// Chooses the ordering for a set of axis labels.
pub fn detect_ordering<S: AsRef<str>>(labels: &[S]) -> AxisOrdering {
    if labels.is_empty() {
        return AxisOrdering::Natural;
    }

    let parsed = labels
        .iter()
        .filter(|l| parse_date_label(l.as_ref()).is_some())
        .count();
    if parsed * 2 > labels.len() {
        return AxisOrdering::Chronological;
    }

    if month_rank(labels[0].as_ref()).is_some() {
        return AxisOrdering::MonthName;
    }

    AxisOrdering::Natural
}

/// Returns the indices of `labels` in display order.
/// Natural order keeps the input order, which callers supply pre-sorted.
pub fn ordering_permutation<S: AsRef<str>>(labels: &[S]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..labels.len()).collect();

    match detect_ordering(labels) {
        AxisOrdering::Chronological => {
            let dates: Vec<Option<NaiveDateTime>> =
                labels.iter().map(|l| parse_date_label(l.as_ref())).collect();
            // Unparsed labels sort before every date
            order.sort_by_key(|&i| dates[i]);
        }
        AxisOrdering::MonthName => {
            let ranks: Vec<u32> = labels
                .iter()
                .map(|l| month_rank(l.as_ref()).unwrap_or(UNKNOWN_MONTH_RANK))
                .collect();
            order.sort_by_key(|&i| ranks[i]);
        }
        AxisOrdering::Natural => {}
    }

    order
}
