// core/src/metrics.rs
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

use crate::error::Result;

/// Processing counters on a private registry.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub tracks_processed: IntCounter,
    pub samples_derived: IntCounter,
    pub grade_clamped: IntCounter,
    pub fits: IntCounter,
    pub fits_not_converged: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let tracks_processed =
            IntCounter::new("ridetrack_tracks_processed_total", "Tracks derived")?;
        let samples_derived =
            IntCounter::new("ridetrack_samples_derived_total", "Samples derived")?;
        let grade_clamped = IntCounter::new(
            "ridetrack_grade_clamped_total",
            "Samples whose grade exceeded the bound and was zeroed",
        )?;
        let fits = IntCounter::new("ridetrack_fits_total", "Least-squares fits run")?;
        let fits_not_converged = IntCounter::new(
            "ridetrack_fits_not_converged_total",
            "Least-squares fits that hit the iteration cap",
        )?;

        registry.register(Box::new(tracks_processed.clone()))?;
        registry.register(Box::new(samples_derived.clone()))?;
        registry.register(Box::new(grade_clamped.clone()))?;
        registry.register(Box::new(fits.clone()))?;
        registry.register(Box::new(fits_not_converged.clone()))?;

        Ok(Self {
            registry,
            tracks_processed,
            samples_derived,
            grade_clamped,
            fits,
            fits_not_converged,
        })
    }

    /// Text exposition format.
    pub fn gather_text(&self) -> Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
