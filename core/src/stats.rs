// core/src/stats.rs
use log::debug;
use ordered_float::OrderedFloat;

use crate::dst::DstCalendar;
use crate::error::{CoreError, Result};
use crate::models::{Column, Track};
use crate::types::{Stats, Thresholds};

/// Average and max of `values` where `mask` is set. `None` if the mask
/// selects nothing.
pub fn masked_avg_max(values: &[f64], mask: &[bool]) -> Option<(f64, f64)> {
    let mut sum = 0.0;
    let mut cnt = 0usize;
    let mut max: Option<OrderedFloat<f64>> = None;
    for (v, m) in values.iter().zip(mask.iter()) {
        if !*m {
            continue;
        }
        sum += *v;
        cnt += 1;
        max = max.max(Some(OrderedFloat(*v)));
    }
    if cnt == 0 {
        None
    } else {
        Some((sum / cnt as f64, max.map(|m| m.0).unwrap_or(0.0)))
    }
}

/// Post-pass reductions over a finished track.
pub struct StatsAggregator<'a> {
    cfg: &'a Thresholds,
    calendar: &'a DstCalendar,
}

impl<'a> StatsAggregator<'a> {
    pub fn new(cfg: &'a Thresholds, calendar: &'a DstCalendar) -> Self {
        Self { cfg, calendar }
    }

    /// Velocity strictly inside (vel_min, vel_max).
    pub fn velocity_mask(&self, track: &Track) -> Vec<bool> {
        track
            .samples
            .iter()
            .map(|s| s.velocity > self.cfg.vel_min && s.velocity < self.cfg.vel_max)
            .collect()
    }

    /// Velocity mask AND `column > floor`.
    pub fn metric_mask(&self, track: &Track, column: Column, floor: f64) -> Vec<bool> {
        let vel = self.velocity_mask(track);
        track
            .samples
            .iter()
            .zip(vel)
            .map(|(s, v)| v && s.get(column) > floor)
            .collect()
    }

    /// Errors with `NoMovingSamples` when no velocity is in range, while
    /// empty heart-rate/cadence masks report zeros.
    pub fn aggregate(&self, track: &Track) -> Result<Stats> {
        if track.is_empty() {
            return Err(CoreError::NoSamples);
        }

        let vel_mask = self.velocity_mask(track);
        let (avg_m_vel, max_m_vel) = masked_avg_max(&track.column(Column::Velocity), &vel_mask)
            .ok_or(CoreError::NoMovingSamples {
                vel_min: self.cfg.vel_min,
                vel_max: self.cfg.vel_max,
            })?;

        // heart rate and cadence fall back to 0.0 when nothing qualifies
        let hr_mask = self.metric_mask(track, Column::HeartRate, self.cfg.hr_min);
        let (avg_heart_rate, max_heart_rate) =
            masked_avg_max(&track.column(Column::HeartRate), &hr_mask).unwrap_or((0.0, 0.0));

        let cad_mask = self.metric_mask(track, Column::Cadence, self.cfg.cad_min);
        let (avg_cadence, max_cadence) =
            masked_avg_max(&track.column(Column::Cadence), &cad_mask).unwrap_or((0.0, 0.0));

        debug!(
            "stats masks: velocity={} hr={} cadence={} of {}",
            vel_mask.iter().filter(|m| **m).count(),
            hr_mask.iter().filter(|m| **m).count(),
            cad_mask.iter().filter(|m| **m).count(),
            track.len()
        );

        let start_time = self.calendar.localize(track.start)?.to_string();
        let last = track.samples[track.len() - 1];

        Ok(Stats {
            start_time,
            total_time: last.time,
            moving_time: last.moving_time,
            distance: last.distance,
            mvg_distance: last.moving_distance,
            avg_m_vel,
            max_m_vel,
            avg_heart_rate,
            max_heart_rate,
            avg_cadence,
            max_cadence,
        })
    }
}
