use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::Thresholds;

/// Column set of the derived table. Order and unit labels are a contract
/// with the renderers; `Column::ALL[i].index() == i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Time,
    Longitude,
    Latitude,
    Altitude,
    HeartRate,
    Cadence,
    XPosition,
    YPosition,
    DeltaXPos,
    DeltaYPos,
    DeltaDist,
    DeltaTime,
    Velocity,
    Grade,
    MeanMVel,
    Distance,
    MovingDistance,
    MovingTime,
}

impl Column {
    pub const ALL: [Column; 18] = [
        Column::Time,
        Column::Longitude,
        Column::Latitude,
        Column::Altitude,
        Column::HeartRate,
        Column::Cadence,
        Column::XPosition,
        Column::YPosition,
        Column::DeltaXPos,
        Column::DeltaYPos,
        Column::DeltaDist,
        Column::DeltaTime,
        Column::Velocity,
        Column::Grade,
        Column::MeanMVel,
        Column::Distance,
        Column::MovingDistance,
        Column::MovingTime,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Column::Time => "Time",
            Column::Longitude => "Longitude",
            Column::Latitude => "Latitude",
            Column::Altitude => "Altitude",
            Column::HeartRate => "HeartRate",
            Column::Cadence => "Cadence",
            Column::XPosition => "XPosition",
            Column::YPosition => "YPosition",
            Column::DeltaXPos => "DeltaXPos",
            Column::DeltaYPos => "DeltaYPos",
            Column::DeltaDist => "DeltaDist",
            Column::DeltaTime => "DeltaTime",
            Column::Velocity => "Velocity",
            Column::Grade => "Grade",
            Column::MeanMVel => "MeanMVel",
            Column::Distance => "Distance",
            Column::MovingDistance => "MovingDistance",
            Column::MovingTime => "MovingTime",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Column::Time | Column::DeltaTime | Column::MovingTime => "min",
            Column::Longitude | Column::Latitude => "o",
            Column::Altitude => "ft",
            Column::HeartRate => "bpm",
            Column::Cadence => "rpm",
            Column::XPosition | Column::DeltaXPos => "x",
            Column::YPosition | Column::DeltaYPos => "y",
            Column::DeltaDist => "d",
            Column::Velocity | Column::MeanMVel => "mph",
            Column::Grade => "%",
            Column::Distance | Column::MovingDistance => "mi",
        }
    }

    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL.iter().copied().find(|c| c.name() == name)
    }
}

/// One `(name, unit)` schema entry as exported to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub unit: String,
}

/// One output row, index-aligned with the raw sample it came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedSample {
    pub time: f64,      // min fra start
    pub longitude: f64, // grader
    pub latitude: f64,  // grader
    pub altitude: f64,  // ft
    pub heart_rate: f64,
    pub cadence: f64,
    pub x_position: f64, // mi
    pub y_position: f64, // mi
    pub delta_x: f64,    // mi
    pub delta_y: f64,    // mi
    pub delta_dist: f64, // mi
    pub delta_time: f64, // min
    pub velocity: f64,   // mph
    pub grade: f64,      // %
    pub mean_moving_velocity: f64, // mph
    pub distance: f64,        // mi
    pub moving_distance: f64, // mi
    pub moving_time: f64,     // min
}

impl DerivedSample {
    pub fn get(&self, column: Column) -> f64 {
        match column {
            Column::Time => self.time,
            Column::Longitude => self.longitude,
            Column::Latitude => self.latitude,
            Column::Altitude => self.altitude,
            Column::HeartRate => self.heart_rate,
            Column::Cadence => self.cadence,
            Column::XPosition => self.x_position,
            Column::YPosition => self.y_position,
            Column::DeltaXPos => self.delta_x,
            Column::DeltaYPos => self.delta_y,
            Column::DeltaDist => self.delta_dist,
            Column::DeltaTime => self.delta_time,
            Column::Velocity => self.velocity,
            Column::Grade => self.grade,
            Column::MeanMVel => self.mean_moving_velocity,
            Column::Distance => self.distance,
            Column::MovingDistance => self.moving_distance,
            Column::MovingTime => self.moving_time,
        }
    }

    /// Row in schema order.
    pub fn to_row(&self) -> Vec<f64> {
        Column::ALL.iter().map(|c| self.get(*c)).collect()
    }
}

/// How many samples arrived without a given sensor value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingCounts {
    pub altitude: usize,
    pub heart_rate: usize,
    pub cadence: usize,
}

/// The derived table plus the ride's start instant (naive UTC).
#[derive(Debug, Clone)]
pub struct Track {
    pub start: NaiveDateTime,
    pub samples: Vec<DerivedSample>,
    pub missing: MissingCounts,
}

impl Track {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn column(&self, column: Column) -> Vec<f64> {
        self.samples.iter().map(|s| s.get(column)).collect()
    }

    pub fn schema() -> Vec<ColumnInfo> {
        Column::ALL
            .iter()
            .map(|c| ColumnInfo {
                name: c.name().to_string(),
                unit: c.unit().to_string(),
            })
            .collect()
    }

    /// Space separated `Name:unit` list.
    pub fn infos() -> String {
        Column::ALL
            .iter()
            .map(|c| format!("{}:{}", c.name(), c.unit()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Name → index translation for renderers that still address by name.
    pub fn index_map() -> BTreeMap<&'static str, usize> {
        Column::ALL.iter().map(|c| (c.name(), c.index())).collect()
    }

    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.samples.iter().map(|s| s.to_row()).collect()
    }

    /// Total elapsed time, min.
    pub fn total_time(&self) -> f64 {
        self.samples.last().map(|s| s.time).unwrap_or(0.0)
    }

    /// Samples worth plotting: finite x/y and velocity strictly inside
    /// (vel_min, vel_max).
    pub fn plot_mask(&self, cfg: &Thresholds) -> Vec<bool> {
        self.samples
            .iter()
            .map(|s| {
                s.x_position.is_finite()
                    && s.y_position.is_finite()
                    && s.velocity > cfg.vel_min
                    && s.velocity < cfg.vel_max
            })
            .collect()
    }

    pub fn max_mean_moving_velocity(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| s.mean_moving_velocity)
            .fold(0.0, f64::max)
    }
}
