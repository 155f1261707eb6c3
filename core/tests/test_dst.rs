// core/tests/test_dst.rs
use chrono::{NaiveDate, NaiveDateTime};
use ridetrack_core::{CoreError, DstCalendar, DstEntry, Zone};

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
}

#[test]
fn summer_is_edt_winter_is_est() {
    let cal = DstCalendar::us();

    let summer = cal.localize(at(2021, 7, 1, 12)).unwrap();
    assert_eq!(summer.zone, Zone::Edt);
    assert_eq!(summer.time, at(2021, 7, 1, 8));
    assert_eq!(summer.to_string(), "2021-07-01 08:00:00 EDT");

    let winter = cal.localize(at(2021, 1, 1, 12)).unwrap();
    assert_eq!(winter.zone, Zone::Est);
    assert_eq!(winter.time, at(2021, 1, 1, 7));
}

#[test]
fn window_bounds_are_exclusive_local_midnights() {
    let cal = DstCalendar::us();
    // 2021: March 14 .. November 7, midnight EST = 05:00 UTC
    assert!(!cal.is_dst(at(2021, 3, 14, 5)).unwrap());
    assert!(cal.is_dst(at(2021, 3, 14, 6)).unwrap());
    assert!(cal.is_dst(at(2021, 11, 7, 4)).unwrap());
    assert!(!cal.is_dst(at(2021, 11, 7, 5)).unwrap());
}

#[test]
fn evening_before_the_switch_is_still_est() {
    let cal = DstCalendar::us();
    // 21:00 EST on March 13
    let t = cal.localize(at(2021, 3, 14, 2)).unwrap();
    assert_eq!(t.zone, Zone::Est);
    assert_eq!(t.time, at(2021, 3, 13, 21));
}

#[test]
fn year_follows_the_local_calendar() {
    let cal = DstCalendar::us();
    // New Year's Eve 2029 local, already 2030 in UTC
    let t = cal.localize(at(2030, 1, 1, 3)).unwrap();
    assert_eq!(t.zone, Zone::Est);
    assert_eq!(t.to_string(), "2029-12-31 22:00:00 EST");

    assert!(matches!(
        cal.localize(at(2030, 1, 1, 6)),
        Err(CoreError::DstYearOutOfRange { year: 2030, .. })
    ));
}

#[test]
fn year_outside_table_fails() {
    let cal = DstCalendar::us();
    assert_eq!(cal.first_year(), Some(2015));
    assert_eq!(cal.last_year(), Some(2029));

    match cal.localize(at(2035, 7, 1, 12)) {
        Err(CoreError::DstYearOutOfRange { year, first, last }) => {
            assert_eq!((year, first, last), (2035, 2015, 2029));
        }
        other => panic!("expected DstYearOutOfRange, got {other:?}"),
    }
    assert!(cal.is_dst(at(2014, 7, 1, 12)).is_err());
}

#[test]
fn injected_calendar_from_json_entries() {
    let entries: Vec<DstEntry> = serde_json::from_str(
        r#"[{"year": 2035, "start": "2035-03-11", "end": "2035-11-04"}]"#,
    )
    .unwrap();
    let cal = DstCalendar::from_entries(entries);

    assert_eq!(cal.zone(at(2035, 7, 1, 12)).unwrap(), Zone::Edt);
    assert_eq!(cal.zone(at(2035, 12, 1, 12)).unwrap(), Zone::Est);
    assert!(cal.zone(at(2021, 7, 1, 12)).is_err());
}
