// core/src/dst.rs
//! US daylight-saving calendar and start-time localization (US Eastern).
//!
//! The calendar is a fixed table; years outside it fail with
//! `CoreError::DstYearOutOfRange` instead of guessing.
use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

// (year, march day, november day)
// https://en.wikipedia.org/wiki/Daylight_saving_time_in_the_United_States
const US_RULES: [(i32, u32, u32); 15] = [
    (2015, 8, 1),
    (2016, 13, 6),
    (2017, 12, 5),
    (2018, 11, 4),
    (2019, 10, 3),
    (2020, 8, 1),
    (2021, 14, 7),
    (2022, 13, 6),
    (2023, 12, 5),
    (2024, 10, 3),
    (2025, 9, 2),
    (2026, 8, 1),
    (2027, 14, 7),
    (2028, 12, 5),
    (2029, 11, 4),
];

static US_CALENDAR: Lazy<DstCalendar> = Lazy::new(|| {
    let entries = US_RULES.iter().filter_map(|&(year, march, november)| {
        Some(DstEntry {
            year,
            start: NaiveDate::from_ymd_opt(year, 3, march)?,
            end: NaiveDate::from_ymd_opt(year, 11, november)?,
        })
    });
    DstCalendar::from_entries(entries)
});

/// DST window for one year: strictly after `start` 00:00 and strictly
/// before `end` 00:00, local standard time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DstEntry {
    pub year: i32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Edt,
    Est,
}

impl Zone {
    pub fn offset(self) -> Duration {
        match self {
            Zone::Edt => Duration::hours(-4),
            Zone::Est => Duration::hours(-5),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Edt => write!(f, "EDT"),
            Zone::Est => write!(f, "EST"),
        }
    }
}

/// Local wall-clock start time with its zone marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalTime {
    pub time: NaiveDateTime,
    pub zone: Zone,
}

impl fmt::Display for LocalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.time.format("%Y-%m-%d %H:%M:%S"), self.zone)
    }
}

/// Read-only year → DST window table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DstCalendar {
    entries: BTreeMap<i32, DstEntry>,
}

impl DstCalendar {
    /// Built-in US table, 2015–2029. Built once on first use.
    pub fn us() -> &'static DstCalendar {
        &US_CALENDAR
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = DstEntry>,
    {
        Self {
            entries: entries.into_iter().map(|e| (e.year, e)).collect(),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &DstEntry> {
        self.entries.values()
    }

    pub fn first_year(&self) -> Option<i32> {
        self.entries.keys().next().copied()
    }

    pub fn last_year(&self) -> Option<i32> {
        self.entries.keys().next_back().copied()
    }

    pub fn entry(&self, year: i32) -> Result<&DstEntry> {
        self.entries.get(&year).ok_or(CoreError::DstYearOutOfRange {
            year,
            first: self.first_year().unwrap_or(0),
            last: self.last_year().unwrap_or(0),
        })
    }

    /// Whether a UTC instant falls inside its year's DST window. The year
    /// and the window bounds are taken on the standard-time wall clock, so
    /// the switch dates start at local midnight.
    pub fn is_dst(&self, utc: NaiveDateTime) -> Result<bool> {
        let local = utc + Zone::Est.offset();
        let entry = self.entry(local.year())?;
        let from = entry.start.and_hms_opt(0, 0, 0).unwrap_or_default();
        let to = entry.end.and_hms_opt(0, 0, 0).unwrap_or_default();
        Ok(local > from && local < to)
    }

    pub fn zone(&self, utc: NaiveDateTime) -> Result<Zone> {
        Ok(if self.is_dst(utc)? { Zone::Edt } else { Zone::Est })
    }

    /// UTC instant → local time: −4h inside DST, −5h otherwise.
    pub fn localize(&self, utc: NaiveDateTime) -> Result<LocalTime> {
        let zone = self.zone(utc)?;
        Ok(LocalTime {
            time: utc + zone.offset(),
            zone,
        })
    }
}
