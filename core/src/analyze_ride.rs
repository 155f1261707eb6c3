// core/src/analyze_ride.rs
use log::{debug, info, warn};

use crate::dst::DstCalendar;
use crate::error::{CoreError, Result};
use crate::geodesy::{KM_TO_MI, M_TO_FT};
use crate::kinematics::{KinematicStep, SampleDeriver};
use crate::metrics::Metrics;
use crate::models::{DerivedSample, MissingCounts, Track};
use crate::moving::{MovingAccumulator, MovingClassifier};
use crate::stats::StatsAggregator;
use crate::trend::{velocity_vs_grade, Trend};
use crate::types::{RawSample, Stats, Thresholds};

const MIN_PER_HOUR: f64 = 60.0;

/// Native step + accumulator state → output row (min, ft, mi, mph).
fn emit_row(step: &KinematicStep, acc: &MovingAccumulator, mean_kmh: f64) -> DerivedSample {
    DerivedSample {
        time: step.time_h * MIN_PER_HOUR,
        longitude: step.lon,
        latitude: step.lat,
        altitude: step.sensors.altitude_m * M_TO_FT,
        heart_rate: step.sensors.heart_rate,
        cadence: step.sensors.cadence,
        x_position: step.position.x * KM_TO_MI,
        y_position: step.position.y * KM_TO_MI,
        delta_x: step.delta.x * KM_TO_MI,
        delta_y: step.delta.y * KM_TO_MI,
        delta_dist: step.delta_dist_km * KM_TO_MI,
        delta_time: step.delta_time_h * MIN_PER_HOUR,
        velocity: step.velocity_kmh * KM_TO_MI,
        grade: step.grade_pct,
        mean_moving_velocity: mean_kmh * KM_TO_MI,
        distance: acc.distance_km * KM_TO_MI,
        moving_distance: acc.moving_distance_km * KM_TO_MI,
        moving_time: acc.moving_time_h * MIN_PER_HOUR,
    }
}

fn count_missing(samples: &[RawSample]) -> MissingCounts {
    let mut missing = MissingCounts::default();
    for s in samples {
        missing.altitude += s.altitude.is_none() as usize;
        missing.heart_rate += s.heart_rate.is_none() as usize;
        missing.cadence += s.cadence.is_none() as usize;
    }
    missing
}

/// Derives every sample, then folds the moving classifier over the steps
/// in sample order.
pub fn process_track_with_metrics(
    samples: &[RawSample],
    cfg: &Thresholds,
    metrics: Option<&Metrics>,
) -> Result<Track> {
    let first = samples.first().ok_or(CoreError::NoSamples)?;
    let deriver = SampleDeriver::new(first, cfg)?;
    let classifier = MovingClassifier::from_mph(cfg.vel_min);

    let steps = deriver.derive_all(samples)?;
    let states = classifier.scan(
        steps
            .iter()
            .map(|s| (s.delta_dist_km, s.delta_time_h, s.velocity_kmh)),
    );

    let rows: Vec<DerivedSample> = steps
        .iter()
        .zip(&states)
        .map(|(step, acc)| emit_row(step, acc, classifier.mean_moving_velocity(acc)))
        .collect();
    let clamped = steps.iter().filter(|s| s.grade_clamped).count() as u64;
    let moving = states.last().map(|a| a.moving_count).unwrap_or(0);

    let missing = count_missing(samples);
    if missing.altitude > 0 || missing.heart_rate > 0 || missing.cadence > 0 {
        warn!(
            "defaulted to 0: altitude={} heart_rate={} cadence={} of {} samples",
            missing.altitude,
            missing.heart_rate,
            missing.cadence,
            samples.len()
        );
    }
    debug!(
        "derived {} samples ({} grades clamped, {} moving)",
        rows.len(),
        clamped,
        moving
    );

    if let Some(m) = metrics {
        m.tracks_processed.inc();
        m.samples_derived.inc_by(rows.len() as u64);
        m.grade_clamped.inc_by(clamped);
    }

    Ok(Track {
        start: deriver.start(),
        samples: rows,
        missing,
    })
}

pub fn process_track(samples: &[RawSample], cfg: &Thresholds) -> Result<Track> {
    process_track_with_metrics(samples, cfg, None)
}

#[derive(Clone)]
pub struct AnalyzeInputs<'a> {
    pub samples: &'a [RawSample],
    pub thresholds: &'a Thresholds,
    /// DST table used for the local start time (normally `DstCalendar::us()`).
    pub calendar: &'a DstCalendar,
    pub metrics: Option<&'a Metrics>,
    /// Also fit the velocity-vs-grade trend line.
    pub fit_trend: bool,
}

#[derive(Debug, Clone)]
pub struct AnalyzeOutputs {
    pub track: Track,
    pub stats: Stats,
    /// `None` when not requested or when the fit could not be solved.
    pub trend: Option<Trend>,
}

pub fn analyze_ride(inputs: AnalyzeInputs) -> Result<AnalyzeOutputs> {
    let track = process_track_with_metrics(inputs.samples, inputs.thresholds, inputs.metrics)?;
    let stats = StatsAggregator::new(inputs.thresholds, inputs.calendar).aggregate(&track)?;

    info!(
        "ride {}: {:.2} mi in {:.1} min, avg {:.2} mph",
        stats.start_time, stats.distance, stats.total_time, stats.avg_m_vel
    );

    let trend = if inputs.fit_trend {
        match velocity_vs_grade(&track, inputs.thresholds) {
            Ok(t) => {
                if let Some(m) = inputs.metrics {
                    m.fits.inc();
                    if !t.fit.converged() {
                        m.fits_not_converged.inc();
                    }
                }
                Some(t)
            }
            Err(e) => {
                warn!("velocity vs grade trend skipped: {e}");
                None
            }
        }
    } else {
        None
    };

    Ok(AnalyzeOutputs { track, stats, trend })
}
