use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use digest_common::models::DigestPeriod;

use crate::schedule::{
    DigestWindow, MAX_CATCH_UP_MINUTES, digest_window, format_local, is_digest_due,
    local_day_start, local_minute, normalize_digest_time, pending_minutes,
};

const TASHKENT: Tz = chrono_tz::Asia::Tashkent;

#[test]
fn test_local_day_start_tashkent() {
    // 2024-03-10 20:30 UTC is 2024-03-11 01:30 in Tashkent (UTC+5)
    let now = Utc.with_ymd_and_hms(2024, 3, 10, 20, 30, 0).unwrap();
    let expected = Utc.with_ymd_and_hms(2024, 3, 10, 19, 0, 0).unwrap();

    assert_eq!(local_day_start(TASHKENT, now), expected.timestamp());
}

#[test]
fn test_local_day_start_utc() {
    let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
    let expected = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();

    assert_eq!(local_day_start(chrono_tz::UTC, now), expected.timestamp());
}

#[test]
fn test_local_day_start_is_not_after_now() {
    let now = Utc.with_ymd_and_hms(2024, 10, 27, 0, 30, 0).unwrap();
    let start = local_day_start(chrono_tz::Europe::Berlin, now);

    assert!(start <= now.timestamp());
    assert!(now.timestamp() - start < 25 * 3600);
}

#[test]
fn test_local_minute() {
    let now = Utc.with_ymd_and_hms(2024, 3, 10, 16, 5, 59).unwrap();
    assert_eq!(local_minute(TASHKENT, now), "21:05");
}

#[test]
fn test_normalize_digest_time() {
    assert_eq!(normalize_digest_time("21:30").as_deref(), Some("21:30"));
    assert_eq!(normalize_digest_time(" 07:05 ").as_deref(), Some("07:05"));
    assert_eq!(normalize_digest_time("00:00").as_deref(), Some("00:00"));

    assert!(normalize_digest_time("7:05").is_none());
    assert!(normalize_digest_time("24:00").is_none());
    assert!(normalize_digest_time("21:60").is_none());
    assert!(normalize_digest_time("21-30").is_none());
    assert!(normalize_digest_time("").is_none());
    assert!(normalize_digest_time("21:30:00").is_none());
}

#[test]
fn test_is_digest_due() {
    assert!(is_digest_due(Some("09:00"), "21:00", "09:00"));
    assert!(!is_digest_due(Some("09:00"), "21:00", "21:00"));
    assert!(is_digest_due(None, "21:00", "21:00"));
    assert!(!is_digest_due(None, "21:00", "21:01"));
}

#[test]
fn test_digest_windows() {
    let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();

    assert_eq!(
        digest_window(DigestPeriod::Today, chrono_tz::UTC, now),
        DigestWindow {
            since: Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap().timestamp(),
            label: "(today)",
        }
    );

    assert_eq!(
        digest_window(DigestPeriod::Week, TASHKENT, now),
        DigestWindow {
            since: Utc.with_ymd_and_hms(2024, 3, 3, 12, 0, 0).unwrap().timestamp(),
            label: "(7 days)",
        }
    );
}

#[test]
fn test_pending_minutes_first_tick() {
    let now = Utc.with_ymd_and_hms(2024, 3, 10, 16, 0, 10).unwrap();
    let minute = Utc.with_ymd_and_hms(2024, 3, 10, 16, 0, 0).unwrap();

    assert_eq!(pending_minutes(None, now), vec![minute.timestamp()]);
}

#[test]
fn test_pending_minutes_same_minute_is_done() {
    let last = Utc.with_ymd_and_hms(2024, 3, 10, 16, 0, 0).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 3, 10, 16, 0, 50).unwrap();

    assert!(pending_minutes(Some(last.timestamp()), now).is_empty());
}

#[test]
fn test_pending_minutes_catches_up_after_stall() {
    // a digest started at 21:00 Tashkent time returns at 21:02:15
    let last = Utc.with_ymd_and_hms(2024, 3, 10, 16, 0, 0).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 3, 10, 16, 2, 15).unwrap();

    let minutes = pending_minutes(Some(last.timestamp()), now)
        .into_iter()
        .map(|minute| local_minute(TASHKENT, Utc.timestamp_opt(minute, 0).unwrap()))
        .collect::<Vec<_>>();

    assert_eq!(minutes, vec!["21:01", "21:02"]);
    assert!(minutes.iter().any(|m| is_digest_due(Some("21:01"), "21:00", m)));
}

#[test]
fn test_pending_minutes_caps_catch_up() {
    let last = Utc.with_ymd_and_hms(2024, 3, 10, 10, 0, 0).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 3, 10, 16, 0, 30).unwrap();

    let minutes = pending_minutes(Some(last.timestamp()), now);

    assert_eq!(minutes.len() as i64, MAX_CATCH_UP_MINUTES);
    assert_eq!(
        minutes.last().copied(),
        Some(Utc.with_ymd_and_hms(2024, 3, 10, 16, 0, 0).unwrap().timestamp())
    );
    assert!(minutes.windows(2).all(|pair| pair[1] - pair[0] == 60));
}

#[test]
fn test_format_local() {
    // 2024-01-15 10:30 UTC
    assert_eq!(format_local(TASHKENT, 1_705_314_600), "2024-01-15 15:30");
    assert_eq!(format_local(chrono_tz::UTC, 1_705_314_600), "2024-01-15 10:30");
}
