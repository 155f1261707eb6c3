// core/tests/test_track.rs
use chrono::{Duration, NaiveDate};
use ridetrack_core::kinematics::SampleDeriver;
use ridetrack_core::{process_track, Column, RawSample, Thresholds, Track};

fn make_samples(n: usize, step_s: i64, dlat: f64) -> Vec<RawSample> {
    // steady ride north, ~15 mph with dlat = 0.0006 every 10 s
    let start = NaiveDate::from_ymd_opt(2021, 7, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    (0..n)
        .map(|i| {
            let t = start + Duration::seconds(i as i64 * step_s);
            RawSample::new(
                t.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
                -71.36,
                42.43 + dlat * i as f64,
            )
            .with_altitude(50.0 + i as f64 * 0.5)
            .with_heart_rate(120.0)
            .with_cadence(85.0)
        })
        .collect()
}

fn assert_non_decreasing(track: &Track, column: Column) {
    let values = track.column(column);
    for w in values.windows(2) {
        assert!(w[1] >= w[0], "{} decreased: {} -> {}", column.name(), w[0], w[1]);
    }
}

#[test]
fn one_row_per_sample_and_cumulatives_non_decreasing() {
    let mut samples = make_samples(30, 10, 0.0006);
    // a pause in the middle
    let paused = samples[15].clone();
    for s in samples.iter_mut().skip(16).take(5) {
        s.longitude = paused.longitude;
        s.latitude = paused.latitude;
    }
    let track = process_track(&samples, &Thresholds::default()).unwrap();

    assert_eq!(track.len(), samples.len());
    assert_non_decreasing(&track, Column::Distance);
    assert_non_decreasing(&track, Column::MovingDistance);
    assert_non_decreasing(&track, Column::MovingTime);
    assert_non_decreasing(&track, Column::Time);
}

#[test]
fn first_row_has_zero_increments() {
    let samples = make_samples(5, 10, 0.0006);
    let track = process_track(&samples, &Thresholds::default()).unwrap();
    let first = track.samples[0];

    assert_eq!(first.time, 0.0);
    assert_eq!(first.delta_dist, 0.0);
    assert_eq!(first.delta_time, 0.0);
    assert_eq!(first.velocity, 0.0);
    assert_eq!(first.grade, 0.0);
    assert_eq!(first.distance, 0.0);
}

#[test]
fn steady_ride_velocity_and_units() {
    let samples = make_samples(61, 10, 0.0006);
    let track = process_track(&samples, &Thresholds::default()).unwrap();
    let last = track.samples[60];

    // 600 s elapsed
    assert!((last.time - 10.0).abs() < 1e-9);
    assert!((last.delta_time - 10.0 / 60.0).abs() < 1e-9);

    // ~66.7 m every 10 s ≈ 14.9 mph
    assert!((last.velocity - 14.92).abs() < 0.05, "velocity {}", last.velocity);
    assert!((last.distance - 2.486).abs() < 0.01, "distance {}", last.distance);

    // 0.5 m rise over ~66.7 m
    assert!((last.grade - 0.75).abs() < 0.01, "grade {}", last.grade);
    // altitude in feet
    assert!((last.altitude - 80.0 * 3.28084).abs() < 1e-9);

    // north only: no x movement
    assert!(last.delta_x.abs() < 1e-12);
    assert!((last.delta_dist - last.delta_y).abs() < 1e-12);
}

#[test]
fn slow_samples_leave_moving_accumulators_unchanged() {
    let mut samples = make_samples(20, 10, 0.0006);
    // crawl for samples 10..15: 1/100 of the distance
    for i in 10..20 {
        let base = 42.43 + 0.0006 * 10.0;
        samples[i].latitude = if i < 15 {
            base + 0.000006 * (i - 10) as f64
        } else {
            base + 0.000006 * 5.0 + 0.0006 * (i - 15) as f64
        };
    }
    let cfg = Thresholds::default();
    let track = process_track(&samples, &cfg).unwrap();

    for i in 1..track.len() {
        let (prev, cur) = (track.samples[i - 1], track.samples[i]);
        if cur.velocity <= cfg.vel_min {
            assert_eq!(cur.moving_distance, prev.moving_distance, "row {i}");
            assert_eq!(cur.moving_time, prev.moving_time, "row {i}");
        } else {
            assert!(cur.moving_distance > prev.moving_distance, "row {i}");
        }
    }
    // the crawl still counts toward total distance
    assert!(track.samples[14].distance > track.samples[10].distance);
}

#[test]
fn mean_moving_velocity_never_below_floor() {
    let samples = make_samples(40, 10, 0.0006);
    for vel_min in [3.0, 6.0, 20.0] {
        let cfg = Thresholds { vel_min, ..Default::default() };
        let track = process_track(&samples, &cfg).unwrap();
        for s in &track.samples {
            assert!(s.mean_moving_velocity >= vel_min - 1e-9);
        }
    }
}

#[test]
fn duplicate_timestamps_give_zero_velocity() {
    let mut samples = make_samples(4, 10, 0.0006);
    samples[2].time = samples[1].time.clone();
    let track = process_track(&samples, &Thresholds::default()).unwrap();
    assert_eq!(track.samples[2].delta_time, 0.0);
    assert_eq!(track.samples[2].velocity, 0.0);
    assert!(track.samples[2].delta_dist > 0.0);
}

#[test]
fn missing_sensors_default_to_zero_and_are_counted() {
    let mut samples = make_samples(6, 10, 0.0006);
    samples[3].heart_rate = None;
    samples[4].cadence = None;
    samples[4].altitude = None;
    let track = process_track(&samples, &Thresholds::default()).unwrap();

    assert_eq!(track.samples[3].heart_rate, 0.0);
    assert_eq!(track.samples[4].cadence, 0.0);
    assert_eq!(track.samples[4].altitude, 0.0);
    assert_eq!(track.missing.heart_rate, 1);
    assert_eq!(track.missing.cadence, 1);
    assert_eq!(track.missing.altitude, 1);

    // a drop to 0 m over ~67 m is far beyond 15 %: zeroed, not rejected
    assert_eq!(track.samples[4].grade, 0.0);
    assert_eq!(track.samples[5].grade, 0.0);
}

#[test]
fn nan_position_skips_distance_but_keeps_row() {
    let mut samples = make_samples(6, 10, 0.0006);
    samples[3].longitude = f64::NAN;
    let track = process_track(&samples, &Thresholds::default()).unwrap();

    assert_eq!(track.len(), 6);
    assert!(track.samples[3].delta_dist.is_nan());
    assert_eq!(track.samples[3].velocity, 0.0);
    assert_eq!(track.samples[3].grade, 0.0);
    assert_eq!(track.samples[3].distance, track.samples[2].distance);
    assert!(track.samples[5].distance.is_finite());
    assert!(!track.plot_mask(&Thresholds::default())[3]);
}

#[test]
fn empty_track_is_an_error() {
    let err = process_track(&[], &Thresholds::default()).unwrap_err();
    assert!(matches!(err, ridetrack_core::CoreError::NoSamples));
}

#[test]
fn unparsable_later_timestamp_is_an_error() {
    let mut samples = make_samples(3, 10, 0.0006);
    samples[2].time = "2021-07-01 12:00:20".into();
    let err = process_track(&samples, &Thresholds::default()).unwrap_err();
    assert!(matches!(err, ridetrack_core::CoreError::TimeParse { .. }));
}

#[test]
fn derived_steps_match_emitted_rows() {
    let samples = make_samples(10, 10, 0.0006);
    let cfg = Thresholds::default();
    let steps = SampleDeriver::new(&samples[0], &cfg)
        .unwrap()
        .derive_all(&samples)
        .unwrap();
    let track = process_track(&samples, &cfg).unwrap();

    assert_eq!(steps.len(), track.len());
    for (step, row) in steps.iter().zip(&track.samples) {
        assert!((step.velocity_kmh * 0.621371 - row.velocity).abs() < 1e-12);
        assert_eq!(step.grade_pct, row.grade);
    }
}

#[test]
fn max_mean_moving_velocity_is_the_running_peak() {
    let samples = make_samples(30, 10, 0.0006);
    let track = process_track(&samples, &Thresholds::default()).unwrap();

    let peak = track.max_mean_moving_velocity();
    let column = track.column(Column::MeanMVel);
    assert!(column.iter().all(|v| *v <= peak));
    assert!(column.contains(&peak));
    // first two rows report the 6 mph floor, the steady ride settles near 14.9
    assert_eq!(column[0], column[1]);
    assert!((peak - 14.92).abs() < 0.05, "peak {peak}");
}

#[test]
fn schema_contract() {
    let expected = "Time:min Longitude:o Latitude:o Altitude:ft HeartRate:bpm Cadence:rpm \
                    XPosition:x YPosition:y DeltaXPos:x DeltaYPos:y DeltaDist:d DeltaTime:min \
                    Velocity:mph Grade:% MeanMVel:mph Distance:mi MovingDistance:mi MovingTime:min";
    assert_eq!(Track::infos(), expected);

    let schema = Track::schema();
    assert_eq!(schema.len(), 18);
    assert_eq!(schema[12].name, "Velocity");
    assert_eq!(schema[12].unit, "mph");
    assert_eq!(Track::index_map()["MovingTime"], 17);
}
