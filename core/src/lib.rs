//! Ride track core: turns time-stamped GPS/sensor samples into a per-sample
//! kinematic table plus ride statistics, and fits trend lines with a
//! generic Gauss–Newton solver.

pub mod analyze_ride;
pub mod dst;
pub mod error;
pub mod geodesy;
pub mod kinematics;
pub mod lsq;
pub mod metrics;
pub mod models;
pub mod moving;
pub mod report;
pub mod stats;
pub mod storage;
pub mod timefmt;
pub mod trend;
pub mod types;

use serde::Serialize;

pub use analyze_ride::{analyze_ride, process_track, AnalyzeInputs, AnalyzeOutputs};
pub use dst::{DstCalendar, DstEntry, LocalTime, Zone};
pub use error::{CoreError, Result};
pub use geodesy::{GeodeticProjector, Offset};
pub use lsq::{FitModel, FitResult, LeastSquaresSolver};
pub use metrics::Metrics;
pub use models::{Column, ColumnInfo, DerivedSample, MissingCounts, Track};
pub use moving::{MovingAccumulator, MovingClassifier};
pub use stats::StatsAggregator;
pub use storage::{load_thresholds, save_thresholds};
pub use timefmt::{format_time, format_time_label, TimeFormat};
pub use trend::{dlsq_fit, velocity_vs_grade, Trend};
pub use types::{RawSample, Stats, Thresholds};

#[derive(Debug, Serialize)]
struct TrackReport {
    schema: Vec<ColumnInfo>,
    rows: Vec<Vec<f64>>,
    missing: MissingCounts,
    stats: Stats,
}

/// JSON in, JSON out: `samples_json` is an array of raw samples,
/// `thresholds_json` an optional thresholds object. Returns
/// `{ "schema", "rows", "missing", "stats" }`.
pub fn process_track_json(samples_json: &str, thresholds_json: Option<&str>) -> Result<String> {
    let de = &mut serde_json::Deserializer::from_str(samples_json);
    let samples: Vec<RawSample> = serde_path_to_error::deserialize(de)?;

    let thresholds: Thresholds = match thresholds_json {
        Some(s) => {
            let de = &mut serde_json::Deserializer::from_str(s);
            serde_path_to_error::deserialize(de)?
        }
        None => Thresholds::default(),
    };

    let out = analyze_ride(AnalyzeInputs {
        samples: &samples,
        thresholds: &thresholds,
        calendar: DstCalendar::us(),
        metrics: None,
        fit_trend: false,
    })?;

    let report = TrackReport {
        schema: Track::schema(),
        rows: out.track.rows(),
        missing: out.track.missing,
        stats: out.stats,
    };
    Ok(serde_json::to_string(&report)?)
}
