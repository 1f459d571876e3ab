//! Duration and timestamp codecs.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, SecondsFormat};

use crate::{Codec, CodecError, CodecResult, SettingValue};

/// Human-readable durations such as `1h 30m`, `250ms` or `2days`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DurationCodec;

impl Codec for DurationCodec {
    type Value = Duration;

    fn type_name(&self) -> &'static str {
        "duration"
    }

    fn parse(&self, input: &str) -> CodecResult<Duration> {
        humantime::parse_duration(input).map_err(|err| CodecError::decode(input, "duration", err))
    }

    fn format(&self, value: &Duration) -> String {
        humantime::format_duration(*value).to_string()
    }
}

impl SettingValue for Duration {
    type Codec = DurationCodec;
}

/// RFC 3339 timestamps, e.g. `2024-05-01T12:00:00Z` or
/// `2024-05-01T14:00:00.250+02:00`.
///
/// Formatting uses `Z` for UTC and keeps fractional seconds only when they
/// are non-zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct Timestamp;

impl Codec for Timestamp {
    type Value = DateTime<FixedOffset>;

    fn type_name(&self) -> &'static str {
        "RFC 3339 timestamp"
    }

    fn parse(&self, input: &str) -> CodecResult<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(input)
            .map_err(|err| CodecError::decode(input, "RFC 3339 timestamp", err))
    }

    fn format(&self, value: &DateTime<FixedOffset>) -> String {
        value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl SettingValue for DateTime<FixedOffset> {
    type Codec = Timestamp;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_roundtrip() {
        let parsed = DurationCodec.parse("1h 30m").unwrap();
        assert_eq!(parsed, Duration::from_secs(90 * 60));
        assert_eq!(DurationCodec.format(&parsed), "1h 30m");
        assert_eq!(DurationCodec.parse(&DurationCodec.format(&parsed)).unwrap(), parsed);

        assert_eq!(DurationCodec.parse("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(DurationCodec.format(&Duration::ZERO), "0s");
    }

    #[test]
    fn duration_rejects_missing_unit() {
        let err = DurationCodec.parse("15").unwrap_err();
        assert!(matches!(err, CodecError::Decode { type_name: "duration", .. }));
        assert!(DurationCodec.parse("soon").is_err());
    }

    #[test]
    fn timestamp_keeps_offset() {
        let parsed = Timestamp.parse("2024-05-01T14:00:00+02:00").unwrap();
        assert_eq!(Timestamp.format(&parsed), "2024-05-01T14:00:00+02:00");

        let utc = Timestamp.parse("2024-05-01T12:00:00+00:00").unwrap();
        assert_eq!(Timestamp.format(&utc), "2024-05-01T12:00:00Z");
        assert_eq!(utc, parsed);
    }

    #[test]
    fn timestamp_keeps_fractions() {
        let parsed = Timestamp.parse("2024-05-01T12:00:00.250Z").unwrap();
        assert_eq!(Timestamp.format(&parsed), "2024-05-01T12:00:00.250Z");
        assert_eq!(Timestamp.parse(&Timestamp.format(&parsed)).unwrap(), parsed);
    }

    #[test]
    fn timestamp_rejects_other_layouts() {
        assert!(Timestamp.parse("2024-05-01 12:00:00").is_err());
        assert!(Timestamp.parse("May 1 2024").is_err());
    }
}
