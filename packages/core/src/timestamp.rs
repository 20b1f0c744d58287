//! ISO-8601 timestamps recognized inside dynamic values.

use std::fmt;

use serde::{Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

/// A point in time decoded from a date-shaped JSON string.
///
/// Strings carrying a UTC designator or numeric offset become `Offset`;
/// strings without one stay `Local`. A bare calendar date is read as local
/// midnight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Timestamp {
    /// Offset-qualified instant (`2024-05-01T10:00:00Z`, `...+02:00`).
    Offset(OffsetDateTime),
    /// Wall-clock time with no offset (`2024-05-01T10:00:00`, `2024-05-01`).
    Local(PrimitiveDateTime),
}

impl Timestamp {
    /// Parse an ISO-8601 date or date-time.
    ///
    /// Returns `None` for anything that isn't date-shaped; callers use that
    /// to keep the text as a plain string.
    pub fn parse(text: &str) -> Option<Self> {
        // Every accepted form starts with a four-digit year and a dash.
        let bytes = text.as_bytes();
        if bytes.len() < 10 || !bytes[..4].iter().all(u8::is_ascii_digit) || bytes[4] != b'-' {
            return None;
        }

        if let Ok(dt) = OffsetDateTime::parse(text, &Rfc3339) {
            return Some(Timestamp::Offset(dt));
        }
        if let Ok(dt) = PrimitiveDateTime::parse(
            text,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"),
        ) {
            return Some(Timestamp::Local(dt));
        }
        if let Ok(dt) = PrimitiveDateTime::parse(
            text,
            format_description!("[year]-[month]-[day]T[hour]:[minute]"),
        ) {
            return Some(Timestamp::Local(dt));
        }
        Date::parse(text, format_description!("[year]-[month]-[day]"))
            .ok()
            .map(|date| Timestamp::Local(date.midnight()))
    }

    /// Render as ISO-8601 text.
    pub fn to_iso8601(&self) -> Result<String, time::error::Format> {
        match self {
            Timestamp::Offset(dt) => dt.format(&Rfc3339),
            Timestamp::Local(dt) if dt.nanosecond() == 0 => {
                dt.format(format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"))
            }
            Timestamp::Local(dt) => dt.format(format_description!(
                "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"
            )),
        }
    }

    /// Whether the timestamp carries an explicit offset.
    pub fn has_offset(&self) -> bool {
        matches!(self, Timestamp::Offset(_))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_iso8601().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl From<OffsetDateTime> for Timestamp {
    fn from(dt: OffsetDateTime) -> Self {
        Timestamp::Offset(dt)
    }
}

impl From<PrimitiveDateTime> for Timestamp {
    fn from(dt: PrimitiveDateTime) -> Self {
        Timestamp::Local(dt)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text = self.to_iso8601().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn parses_utc_timestamp() {
        let ts = Timestamp::parse("2024-05-01T10:30:00Z").unwrap();
        assert_eq!(ts, Timestamp::Offset(datetime!(2024-05-01 10:30:00 UTC)));
        assert!(ts.has_offset());
    }

    #[test]
    fn parses_numeric_offset() {
        let ts = Timestamp::parse("2024-05-01T12:30:00+02:00").unwrap();
        // Same instant as 10:30 UTC.
        assert_eq!(ts, Timestamp::Offset(datetime!(2024-05-01 10:30:00 UTC)));
    }

    #[test]
    fn parses_local_forms() {
        assert_eq!(
            Timestamp::parse("2024-05-01T10:30:00"),
            Some(Timestamp::Local(datetime!(2024-05-01 10:30:00)))
        );
        assert_eq!(
            Timestamp::parse("2024-05-01T10:30:00.250"),
            Some(Timestamp::Local(datetime!(2024-05-01 10:30:00.25)))
        );
        assert_eq!(
            Timestamp::parse("2024-05-01T10:30"),
            Some(Timestamp::Local(datetime!(2024-05-01 10:30:00)))
        );
        assert_eq!(
            Timestamp::parse("2024-05-01"),
            Some(Timestamp::Local(date!(2024-05-01).midnight()))
        );
    }

    #[test]
    fn rejects_non_dates() {
        for text in [
            "",
            "hello",
            "2024",
            "12345678901",
            "2024-13-01",
            "2024-02-30",
            "2024-05-01 extra",
            "users/123",
        ] {
            assert_eq!(Timestamp::parse(text), None, "{text:?} parsed as a date");
        }
    }

    #[test]
    fn renders_iso8601() {
        let ts = Timestamp::parse("2024-05-01T10:30:00Z").unwrap();
        assert_eq!(ts.to_string(), "2024-05-01T10:30:00Z");

        let ts = Timestamp::parse("2024-05-01").unwrap();
        assert_eq!(ts.to_string(), "2024-05-01T00:00:00");

        let ts = Timestamp::parse("2024-05-01T10:30:00.5").unwrap();
        assert_eq!(ts.to_string(), "2024-05-01T10:30:00.5");
    }

    #[test]
    fn serializes_as_string() {
        let ts = Timestamp::parse("2024-05-01T10:30:00Z").unwrap();
        assert_eq!(
            serde_json::to_string(&ts).unwrap(),
            "\"2024-05-01T10:30:00Z\""
        );
    }
}
