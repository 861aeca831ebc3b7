//! Display helpers for sizes and dates.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};

const SIZE_UNITS: &[&str] = &["Bytes", "KB", "MB", "GB", "TB", "PB", "EB"];

/// Human-readable size with 1024-based units, e.g. `1.5 KB`.
///
/// Trailing zeros after the decimal point are dropped.
pub fn format_file_size(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let formatted = format!("{:.*}", decimals, value);
    let trimmed = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        &formatted
    };
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

/// "Just now", "3 hours ago", "1 year ago", ...
///
/// Months count as 30 days and years as 365. Instants in the future read as
/// "Just now".
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    const STEPS: &[(i64, &str)] = &[
        (31_536_000, "year"),
        (2_592_000, "month"),
        (604_800, "week"),
        (86_400, "day"),
        (3_600, "hour"),
        (60, "minute"),
    ];

    let elapsed = (now - then).num_seconds();
    for (secs, unit) in STEPS {
        if elapsed >= *secs {
            let n = elapsed / secs;
            let plural = if n == 1 { "" } else { "s" };
            return format!("{} {}{} ago", n, unit, plural);
        }
    }
    "Just now".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateGranularity {
    Year,
    Month,
    #[default]
    Day,
}

impl DateGranularity {
    /// Grouping key: `2023`, `2023-05` or `2023-05-15`.
    pub fn key(&self, date: DateTime<Utc>) -> String {
        match self {
            Self::Year => format!("{}", date.year()),
            Self::Month => format!("{}-{:02}", date.year(), date.month()),
            Self::Day => format!("{}-{:02}-{:02}", date.year(), date.month(), date.day()),
        }
    }
}

/// Bucket `items` by date. Keys sort chronologically; items keep their
/// relative order within a bucket.
pub fn group_by_date<T>(
    items: &[T],
    date_of: impl Fn(&T) -> DateTime<Utc>,
    granularity: DateGranularity,
) -> BTreeMap<String, Vec<&T>> {
    let mut groups: BTreeMap<String, Vec<&T>> = BTreeMap::new();
    for item in items {
        groups
            .entry(granularity.key(date_of(item)))
            .or_default()
            .push(item);
    }
    groups
}
