use chrono::{DateTime, Utc};

/// Builds a UTC date-time from whole seconds since the Unix epoch.
#[inline]
pub fn datetime_from_secs(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

/// Converts an epoch integer of unknown resolution to a UTC date-time.
///
/// Callers supply epoch timestamps both in seconds and in milliseconds.
/// A value larger than the current epoch seconds times 900 is taken to be
/// milliseconds and divided by 1000; anything else is taken as seconds.
/// The 900 multiplier is the historical threshold of this contract and is
/// kept as-is; callers may depend on the existing boundary.
#[inline]
pub fn epoch_to_datetime(value: i64) -> DateTime<Utc> {
    let now_secs = Utc::now().timestamp();
    let secs = if value > now_secs * 900 {
        value / 1000
    } else {
        value
    };
    datetime_from_secs(secs)
}

/// Returns the number of milliseconds since the Unix epoch.
#[inline]
pub fn millis_of(dt: &DateTime<Utc>) -> i64 {
    dt.timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_datetime_from_secs() {
        let dt = datetime_from_secs(1577836800);
        assert_eq!(dt, Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_epoch_seconds_pass_through() {
        let dt = epoch_to_datetime(1577836800);
        assert_eq!(dt, Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_epoch_milliseconds_detected() {
        // a recent instant resolves to the same point from both resolutions
        let secs = Utc::now().timestamp();
        let from_secs = epoch_to_datetime(secs);
        let from_millis = epoch_to_datetime(secs * 1000);
        assert_eq!(from_millis, from_secs);
        assert_eq!(from_secs, datetime_from_secs(secs));
    }

    #[test]
    fn test_detection_threshold_is_relative_to_now() {
        // the multiplier is 900, not 1000, so the millisecond window opens
        // at nine tenths of the current epoch second count
        let now_secs = Utc::now().timestamp();
        let below = now_secs * 900 - 1;
        assert_eq!(epoch_to_datetime(below), datetime_from_secs(below));
        let above = now_secs * 900 + 1000;
        assert_eq!(epoch_to_datetime(above), datetime_from_secs(above / 1000));
    }

    #[test]
    fn test_millis_of() {
        let dt = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(millis_of(&dt), 1577836800000);
    }

    #[test]
    fn test_epoch_zero() {
        let dt = epoch_to_datetime(0);
        assert_eq!(dt, DateTime::UNIX_EPOCH);
    }
}
