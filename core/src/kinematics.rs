// core/src/kinematics.rs
// Per-sample derivation: time offset, position, displacement, velocity, grade.
// Works in native units (km, hours, meters); rows are converted on emission.
use chrono::NaiveDateTime;

use crate::error::Result;
use crate::geodesy::{GeodeticProjector, Offset, EARTH_RADIUS_KM};
use crate::timefmt::TimeFormat;
use crate::types::{RawSample, SensorValues, Thresholds};

pub const SECS_PER_HOUR: f64 = 3600.0;
pub const M_PER_KM: f64 = 1000.0;

/// What the next step needs from the previous one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrevPoint {
    pub time_h: f64,
    pub lon: f64,
    pub lat: f64,
    pub altitude_m: f64,
}

/// One derived step, native units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicStep {
    pub time_h: f64, // timer fra start
    pub lon: f64,
    pub lat: f64,
    pub sensors: SensorValues,
    pub position: Offset, // km
    pub delta: Offset,    // km
    pub delta_dist_km: f64,
    pub delta_time_h: f64,
    pub velocity_kmh: f64,
    pub grade_pct: f64,
    pub grade_clamped: bool,
}

impl KinematicStep {
    pub fn as_prev(&self) -> PrevPoint {
        PrevPoint {
            time_h: self.time_h,
            lon: self.lon,
            lat: self.lat,
            altitude_m: self.sensors.altitude_m,
        }
    }
}

/// Grade in percent from an altitude change (m) over a horizontal distance
/// (km). Zero when the distance is not a positive finite number; values
/// beyond `grade_max` are zeroed and flagged.
pub fn grade_pct(d_alt_m: f64, dist_km: f64, grade_max: f64) -> (f64, bool) {
    if !(dist_km > 0.0 && dist_km.is_finite()) {
        return (0.0, false);
    }
    let grade = d_alt_m / (dist_km * M_PER_KM) * 100.0;
    if grade > grade_max || grade < -grade_max {
        (0.0, true)
    } else if grade.is_finite() {
        (grade, false)
    } else {
        (0.0, false)
    }
}

/// Derives steps for one track. Holds only immutable per-track setup;
/// the previous point is passed in explicitly.
#[derive(Debug, Clone)]
pub struct SampleDeriver {
    projector: GeodeticProjector,
    format: TimeFormat,
    start: NaiveDateTime,
    grade_max: f64,
}

impl SampleDeriver {
    /// Sets up from the first sample: timestamp layout, start instant and
    /// the projector's fixed parallel radius.
    ///
    /// Precondition: timestamps are non-decreasing. Out-of-order input is
    /// not detected.
    pub fn new(first: &RawSample, cfg: &Thresholds) -> Result<Self> {
        let format = TimeFormat::detect(&first.time);
        let start = format.parse(&first.time)?;
        let alt_km = first.resolved().altitude_m / M_PER_KM;
        let projector = GeodeticProjector::with_elevation(
            EARTH_RADIUS_KM,
            cfg.lon_ref,
            cfg.lat_ref,
            first.latitude,
            alt_km,
        );
        Ok(Self {
            projector,
            format,
            start,
            grade_max: cfg.grd_max,
        })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// `prev = None` for the first sample: it is its own predecessor, so all
    /// increments are zero.
    pub fn derive(&self, prev: Option<&PrevPoint>, raw: &RawSample) -> Result<KinematicStep> {
        let t = self.format.parse(&raw.time)?;
        let time_h = (t - self.start).num_seconds() as f64 / SECS_PER_HOUR;
        let sensors = raw.resolved();

        let prev = prev.copied().unwrap_or(PrevPoint {
            time_h,
            lon: raw.longitude,
            lat: raw.latitude,
            altitude_m: sensors.altitude_m,
        });

        // minor radius correction for the current altitude
        let alt_km = sensors.altitude_m / M_PER_KM;
        let position = self.projector.project_at(raw.longitude, raw.latitude, alt_km);
        let delta = self.projector.project_delta_at(
            raw.longitude - prev.lon,
            raw.latitude - prev.lat,
            alt_km,
        );

        let delta_dist_km = delta.norm();
        let delta_time_h = time_h - prev.time_h;
        let velocity_kmh = if delta_time_h > 0.0 {
            let v = delta_dist_km / delta_time_h;
            if v.is_finite() { v } else { 0.0 }
        } else {
            0.0
        };

        let (grade_pct, grade_clamped) =
            grade_pct(sensors.altitude_m - prev.altitude_m, delta_dist_km, self.grade_max);

        Ok(KinematicStep {
            time_h,
            lon: raw.longitude,
            lat: raw.latitude,
            sensors,
            position,
            delta,
            delta_dist_km,
            delta_time_h,
            velocity_kmh,
            grade_pct,
            grade_clamped,
        })
    }

    /// Single forward pass over the raw samples, each derived from the
    /// previous step.
    pub fn derive_all(&self, samples: &[RawSample]) -> Result<Vec<KinematicStep>> {
        let mut out = Vec::with_capacity(samples.len());
        let mut prev: Option<PrevPoint> = None;
        for raw in samples {
            let step = self.derive(prev.as_ref(), raw)?;
            prev = Some(step.as_prev());
            out.push(step);
        }
        Ok(out)
    }
}
