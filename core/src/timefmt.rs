use chrono::NaiveDateTime;

use crate::error::{CoreError, Result};

/// Timestamp layouts produced by the TCX exporters we see in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    Plain,     // 2021-07-01T12:00:00
    Zulu,      // 2021-07-01T12:00:00Z
    UtcOffset, // 2021-07-01T12:00:00+00:00
}

impl TimeFormat {
    /// Detects the layout by substring match. The result is applied to
    /// every sample of the track.
    pub fn detect(first: &str) -> Self {
        if first.contains('Z') {
            TimeFormat::Zulu
        } else if first.contains("+00:00") {
            TimeFormat::UtcOffset
        } else {
            TimeFormat::Plain
        }
    }

    pub fn pattern(&self) -> &'static str {
        match self {
            TimeFormat::Plain => "%Y-%m-%dT%H:%M:%S",
            TimeFormat::Zulu => "%Y-%m-%dT%H:%M:%SZ",
            TimeFormat::UtcOffset => "%Y-%m-%dT%H:%M:%S+00:00",
        }
    }

    /// Parses to a naive UTC wall-clock time (second precision).
    pub fn parse(&self, value: &str) -> Result<NaiveDateTime> {
        NaiveDateTime::parse_from_str(value.trim(), self.pattern()).map_err(|source| {
            CoreError::TimeParse {
                value: value.to_string(),
                source,
            }
        })
    }
}

/// Minutes → `MM:SS.s` when t ≤ 10, else `HH:MM:SS`.
/// t = 10 exactly takes the `MM:SS.s` branch ("10:00.0").
pub fn format_time(minutes: f64) -> String {
    let t = minutes.max(0.0);
    if t > 10.0 {
        let secs = (t * 60.0).round() as i64;
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
    } else {
        let tenths = (t * 600.0).round() as i64;
        format!("{:02}:{:02}.{}", tenths / 600, (tenths / 10) % 60, tenths % 10)
    }
}

/// Axis tick label, minutes → `HH:MM`.
pub fn format_time_label(minutes: f64) -> String {
    let m = minutes.max(0.0).round() as i64;
    format!("{:02}:{:02}", m / 60, m % 60)
}
