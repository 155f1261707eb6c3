use std::path::Path;

use log::{info, warn};

use crate::error::Result;
use crate::types::{Stats, Thresholds};

/// Reads thresholds from disk (JSON). Missing keys take their defaults;
/// a missing file yields `Thresholds::default()`.
pub fn load_thresholds(path: impl AsRef<Path>) -> Result<Thresholds> {
    let path = path.as_ref();
    if path.exists() {
        let contents = std::fs::read_to_string(path)?;
        let de = &mut serde_json::Deserializer::from_str(&contents);
        let cfg: Thresholds = serde_path_to_error::deserialize(de)?;
        info!("thresholds loaded from {}", path.display());
        Ok(cfg)
    } else {
        warn!("no thresholds at {}, using defaults", path.display());
        Ok(Thresholds::default())
    }
}

/// Writes thresholds as pretty JSON.
pub fn save_thresholds(cfg: &Thresholds, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, serde_json::to_string_pretty(cfg)?)?;
    info!("thresholds saved to {}", path.display());
    Ok(())
}

pub fn save_stats(stats: &Stats, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, serde_json::to_string_pretty(stats)?)?;
    info!("stats saved to {}", path.display());
    Ok(())
}

pub fn load_stats(path: impl AsRef<Path>) -> Result<Stats> {
    let contents = std::fs::read_to_string(path)?;
    let de = &mut serde_json::Deserializer::from_str(&contents);
    Ok(serde_path_to_error::deserialize(de)?)
}
