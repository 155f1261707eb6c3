use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One telemetry point as handed over by the file parser.
///
/// Sensor fields are optional; `None` means absent or unparsable and is
/// resolved to 0.0 for that sample only (see `RawSample::resolved`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSample {
    #[serde(alias = "Time")]
    pub time: String, // e.g. 2021-07-01T12:00:00Z
    #[serde(alias = "lon", alias = "LongitudeDegrees")]
    pub longitude: f64, // grader
    #[serde(alias = "lat", alias = "LatitudeDegrees")]
    pub latitude: f64, // grader
    #[serde(default, alias = "AltitudeMeters", deserialize_with = "lenient_f64")]
    pub altitude: Option<f64>, // meter
    #[serde(default, alias = "hr", alias = "HeartRateBpm", deserialize_with = "lenient_f64")]
    pub heart_rate: Option<f64>, // bpm
    #[serde(default, alias = "Cadence", deserialize_with = "lenient_f64")]
    pub cadence: Option<f64>, // rpm
}

/// Sensor values after the default-resolution step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorValues {
    pub altitude_m: f64,
    pub heart_rate: f64,
    pub cadence: f64,
}

impl RawSample {
    pub fn new(time: impl Into<String>, longitude: f64, latitude: f64) -> Self {
        Self {
            time: time.into(),
            longitude,
            latitude,
            ..Default::default()
        }
    }

    pub fn with_altitude(mut self, altitude_m: f64) -> Self {
        self.altitude = Some(altitude_m);
        self
    }

    pub fn with_heart_rate(mut self, bpm: f64) -> Self {
        self.heart_rate = Some(bpm);
        self
    }

    pub fn with_cadence(mut self, rpm: f64) -> Self {
        self.cadence = Some(rpm);
        self
    }

    /// Absent sensor values collapse to 0.0.
    pub fn resolved(&self) -> SensorValues {
        SensorValues {
            altitude_m: self.altitude.unwrap_or(0.0),
            heart_rate: self.heart_rate.unwrap_or(0.0),
            cadence: self.cadence.unwrap_or(0.0),
        }
    }
}

/// Accepts finite numbers or numeric strings; anything else (including
/// "NaN" and "inf") becomes `None`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite()))
}

/// Processing thresholds. JSON keys follow the camelCase option names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Thresholds {
    pub vel_min: f64, // mph, moving floor
    pub vel_max: f64, // mph, spurious-data ceiling
    pub grd_max: f64, // %, spurious-grade ceiling
    pub cad_min: f64, // rpm, stats inclusion floor
    pub hr_min: f64,  // bpm, stats inclusion floor
    pub lon_ref: f64, // grader
    pub lat_ref: f64, // grader
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            vel_min: 6.0,
            vel_max: 100.0,
            grd_max: 15.0,
            cad_min: 10.0,
            hr_min: 50.0,
            lon_ref: -71.3646464,
            lat_ref: 42.4358983,
        }
    }
}

/// Ride-level aggregates. Field names are part of the renderer contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub start_time: String,
    pub total_time: f64,   // min
    pub moving_time: f64,  // min
    pub distance: f64,     // mi
    pub mvg_distance: f64, // mi
    pub avg_m_vel: f64,    // mph
    pub max_m_vel: f64,    // mph
    pub avg_heart_rate: f64,
    pub max_heart_rate: f64,
    pub avg_cadence: f64,
    pub max_cadence: f64,
}

impl Stats {
    pub fn paused_time(&self) -> f64 {
        self.total_time - self.moving_time
    }
}
