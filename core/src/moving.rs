// core/src/moving.rs
use crate::geodesy::KM_TO_MI;

/// Running totals threaded through the track, native units (km, hours,
/// km/h). Each row's state is the previous state advanced by one step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovingAccumulator {
    pub distance_km: f64,
    pub moving_distance_km: f64,
    pub moving_time_h: f64,
    pub velocity_sum: f64,
    pub moving_count: usize,
}

/// Moving/paused classification against a velocity floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingClassifier {
    floor_kmh: f64,
}

impl MovingClassifier {
    pub fn from_mph(vel_min_mph: f64) -> Self {
        Self { floor_kmh: vel_min_mph / KM_TO_MI }
    }

    #[inline]
    pub fn floor_kmh(&self) -> f64 {
        self.floor_kmh
    }

    #[inline]
    pub fn is_moving(&self, velocity_kmh: f64) -> bool {
        velocity_kmh > self.floor_kmh
    }

    /// Advances the accumulator by one sample. A non-finite increment is
    /// left out of the total distance.
    pub fn advance(
        &self,
        acc: MovingAccumulator,
        delta_dist_km: f64,
        delta_time_h: f64,
        velocity_kmh: f64,
    ) -> MovingAccumulator {
        let mut next = acc;
        if delta_dist_km.is_finite() {
            next.distance_km += delta_dist_km;
        }
        if self.is_moving(velocity_kmh) {
            next.moving_distance_km += delta_dist_km;
            next.moving_time_h += delta_time_h;
            next.velocity_sum += velocity_kmh;
            next.moving_count += 1;
        }
        next
    }

    /// Mean moving velocity so far, never below the floor. With fewer than
    /// two moving samples the floor itself is reported.
    pub fn mean_moving_velocity(&self, acc: &MovingAccumulator) -> f64 {
        if acc.moving_count > 1 {
            (acc.velocity_sum / acc.moving_count as f64).max(self.floor_kmh)
        } else {
            self.floor_kmh
        }
    }

    /// Fold over (distance, time, velocity) triples; one state per input.
    pub fn scan<I>(&self, steps: I) -> Vec<MovingAccumulator>
    where
        I: IntoIterator<Item = (f64, f64, f64)>,
    {
        let mut acc = MovingAccumulator::default();
        steps
            .into_iter()
            .map(|(dd, dt, v)| {
                acc = self.advance(acc, dd, dt, v);
                acc
            })
            .collect()
    }
}
