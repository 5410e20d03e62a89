//! Display formatting for task timestamps.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local, Utc};

/// Day, month, two-digit year, hour and minute, in es-ES order.
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%y, %H:%M";

/// Rendered in place of a timestamp the pattern cannot format.
pub const INVALID_DATE: &str = "Invalid Date";

/// Which clock face timestamps are shown on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Local,
    Fixed(FixedOffset),
}

/// Turns a creation timestamp into the string shown next to a task.
#[derive(Debug, Clone)]
pub struct DateFormatter {
    pattern: String,
    zone: Zone,
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMAT)
    }
}

impl DateFormatter {
    /// A formatter using the local time zone.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            zone: Zone::Local,
        }
    }

    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zone = zone;
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether every specifier in the pattern is understood by chrono.
    pub fn is_valid_pattern(pattern: &str) -> bool {
        StrftimeItems::new(pattern).all(|item| !matches!(item, Item::Error))
    }

    /// Format an instant. Never panics: a pattern chrono rejects yields
    /// [`INVALID_DATE`].
    pub fn format(&self, instant: DateTime<Utc>) -> String {
        if !Self::is_valid_pattern(&self.pattern) {
            return INVALID_DATE.to_string();
        }

        let mut out = String::new();
        let written = match self.zone {
            Zone::Local => write!(
                out,
                "{}",
                instant.with_timezone(&Local).format(&self.pattern)
            ),
            Zone::Fixed(offset) => {
                write!(out, "{}", instant.with_timezone(&offset).format(&self.pattern))
            }
        };

        match written {
            Ok(()) => out,
            Err(_) => INVALID_DATE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc() -> Zone {
        Zone::Fixed(FixedOffset::east_opt(0).unwrap())
    }

    #[test]
    fn test_default_pattern() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 0).unwrap();
        let formatter = DateFormatter::default().with_zone(utc());
        assert_eq!(formatter.format(at), "01/03/24, 09:05");
    }

    #[test]
    fn test_fixed_offset_shifts_clock() {
        let at = Utc.with_ymd_and_hms(2024, 12, 31, 23, 30, 0).unwrap();
        let madrid = Zone::Fixed(FixedOffset::east_opt(3600).unwrap());
        let formatter = DateFormatter::default().with_zone(madrid);
        assert_eq!(formatter.format(at), "01/01/25, 00:30");
    }

    #[test]
    fn test_custom_pattern() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 0).unwrap();
        let formatter = DateFormatter::new("%Y-%m-%d %H:%M").with_zone(utc());
        assert_eq!(formatter.format(at), "2024-03-01 09:05");
    }

    #[test]
    fn test_invalid_pattern_does_not_panic() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 0).unwrap();
        let formatter = DateFormatter::new("%Q %").with_zone(utc());
        assert!(!DateFormatter::is_valid_pattern("%Q %"));
        assert_eq!(formatter.format(at), INVALID_DATE);
    }
}
