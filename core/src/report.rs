// core/src/report.rs
use crate::timefmt::format_time;
use crate::types::{Stats, Thresholds};

/// Multi-line ride summary.
pub fn stats_summary(stats: &Stats, cfg: &Thresholds) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "moving velocity range: [{:.2}, {:.2}] mph\n",
        cfg.vel_min, cfg.vel_max
    ));
    out.push_str(&format!("Started  {}\n", stats.start_time));
    out.push_str(&format!(
        "Time     total={} moving={} paused={}\n",
        format_time(stats.total_time),
        format_time(stats.moving_time),
        format_time(stats.paused_time())
    ));
    out.push_str(&format!(
        "Distance total={:6.2} moving={:6.2} mi\n",
        stats.distance, stats.mvg_distance
    ));
    out.push_str(&format!(
        "Velocity average={:6.2} max={:6.2} mph\n",
        stats.avg_m_vel, stats.max_m_vel
    ));
    out.push_str(&format!(
        "Cadence  average={:6.2} max={:6.2} rpm\n",
        stats.avg_cadence, stats.max_cadence
    ));
    out.push_str(&format!(
        "HR       average={:6.2} max={:6.2} bpm",
        stats.avg_heart_rate, stats.max_heart_rate
    ));
    out
}

/// One table row: start, times, distances, velocity, cadence, HR.
pub fn stats_row(stats: &Stats) -> String {
    format!(
        "{} {:8} {:8} {:7} {:6.2} {:6.2} {:6.2} {:6.2} {:6.2} {:6.2} {:6.2} {:6.2}",
        stats.start_time,
        format_time(stats.total_time),
        format_time(stats.moving_time),
        format_time(stats.paused_time()),
        stats.distance,
        stats.mvg_distance,
        stats.avg_m_vel,
        stats.max_m_vel,
        stats.avg_cadence,
        stats.max_cadence,
        stats.avg_heart_rate,
        stats.max_heart_rate
    )
}
