use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use digest_common::models::DigestPeriod;

pub(crate) const DAILY_LABEL: &str = "(daily)";

/// Most minutes the scheduler replays after a stall.
pub(crate) const MAX_CATCH_UP_MINUTES: i64 = 60;

/// Time range a digest covers, open ended towards now.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct DigestWindow {
    pub since: i64,
    pub label: &'static str,
}

pub(crate) fn digest_window(period: DigestPeriod, tz: Tz, now: DateTime<Utc>) -> DigestWindow {
    match period {
        DigestPeriod::Today => DigestWindow {
            since: local_day_start(tz, now),
            label: "(today)",
        },
        DigestPeriod::Week => DigestWindow {
            since: (now - Duration::days(7)).timestamp(),
            label: "(7 days)",
        },
    }
}

/// Unix timestamp of the local midnight that opened the day containing `now`.
pub(crate) fn local_day_start(tz: Tz, now: DateTime<Utc>) -> i64 {
    let midnight = now.with_timezone(&tz).date_naive().and_time(NaiveTime::MIN);

    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|start| start.timestamp())
        // midnight skipped by a DST jump
        .unwrap_or_else(|| (now - Duration::days(1)).timestamp())
}

pub(crate) fn local_minute(tz: Tz, now: DateTime<Utc>) -> String {
    now.with_timezone(&tz).format("%H:%M").to_string()
}

/// Starts (unix seconds) of the minutes the scheduler still owes, oldest first.
///
/// `last` is the start of the last processed minute. Without it only the
/// current minute is due. A long stall replays at most
/// [`MAX_CATCH_UP_MINUTES`] minutes.
pub(crate) fn pending_minutes(last: Option<i64>, now: DateTime<Utc>) -> Vec<i64> {
    let current = now.timestamp() - now.timestamp().rem_euclid(60);

    let first = match last {
        Some(last) => (last + 60).max(current - (MAX_CATCH_UP_MINUTES - 1) * 60),
        None => current,
    };

    (first..=current).step_by(60).collect()
}

/// `YYYY-MM-DD HH:MM` in the configured timezone.
pub(crate) fn format_local(tz: Tz, timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|date| date.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Accepts strictly `HH:MM` with a valid 24h time.
pub(crate) fn normalize_digest_time(input: &str) -> Option<String> {
    let input = input.trim();
    if input.len() != 5 {
        return None;
    }

    NaiveTime::parse_from_str(input, "%H:%M")
        .ok()
        .map(|time| time.format("%H:%M").to_string())
}

pub(crate) fn is_digest_due(configured: Option<&str>, default: &str, minute: &str) -> bool {
    configured.unwrap_or(default) == minute
}
