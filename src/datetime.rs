//! Parsed TOML date and time values.
//!
//! The four shapes TOML recognizes (offset date-time, local date-time,
//! local date, local time) are kept as distinct, small `Copy` structs
//! rather than one struct with three `Option` fields, so that they line up
//! one-to-one with [`crate::Value`]'s `Datetime`/`LocalDatetime`/`Date`/
//! `Time` variants.

use core::fmt;

/// A calendar date: year, month, day.
///
/// Alone, corresponds to a TOML *Local Date* (`1979-05-27`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Date {
    /// Year: four digits.
    pub year: u16,
    /// Month: 1 to 12.
    pub month: u8,
    /// Day: 1 to {28, 29, 30, 31}, depending on month/year.
    pub day: u8,
}

/// A time of day with sub-second resolution: hour, minute, second, nanosecond.
///
/// Alone, corresponds to a TOML *Local Time* (`07:32:00`, `00:32:00.999999`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time {
    /// Hour: 0 to 23.
    pub hour: u8,
    /// Minute: 0 to 59.
    pub minute: u8,
    /// Second: 0 to 60 (60 allowed for leap seconds).
    pub second: u8,
    /// Nanosecond: 0 to 999_999_999.
    pub nanosecond: u32,
}

/// A UTC offset attached to a date-time.
#[derive(Debug, Clone, Copy)]
pub enum Offset {
    /// Zero offset, spelled `Z` in source.
    Z,
    /// A non-zero (or explicitly-spelled-out-as-zero) offset.
    Custom {
        /// Offset from UTC, in minutes. Range: `-1_440..=1_440`.
        minutes: i16,
    },
}

impl Offset {
    /// The offset in minutes, regardless of how it was spelled.
    pub fn as_minutes(&self) -> i16 {
        match *self {
            Offset::Z => 0,
            Offset::Custom { minutes } => minutes,
        }
    }
}

impl PartialEq for Offset {
    // `Z` and `+00:00` both mean "zero offset"; the encoder always collapses
    // a zero offset back to `Z` (spec §4.3), so for the round-trip property
    // to hold, those two spellings must compare equal here.
    fn eq(&self, other: &Self) -> bool {
        self.as_minutes() == other.as_minutes()
    }
}

impl Eq for Offset {}

#[cfg(feature = "serde")]
impl serde::Serialize for Offset {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i16(self.as_minutes())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Offset {
    fn deserialize<D>(deserializer: D) -> Result<Offset, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match i16::deserialize(deserializer)? {
            0 => Ok(Offset::Z),
            minutes => Ok(Offset::Custom { minutes }),
        }
    }
}

/// A date, a time, and a UTC offset: TOML's *Offset Date-Time*
/// (`1979-05-27T07:32:00Z`, `1979-05-27 00:32:00-07:00`).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OffsetDatetime {
    /// The date component.
    pub date: Date,
    /// The time component.
    pub time: Time,
    /// The offset from UTC.
    pub offset: Offset,
}

/// A date and a time with no relation to a UTC offset: TOML's
/// *Local Date-Time* (`1979-05-27T07:32:00`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalDatetime {
    /// The date component.
    pub date: Date,
    /// The time component.
    pub time: Time,
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
        if self.nanosecond != 0 {
            let mut digits = [0u8; 9];
            let mut n = self.nanosecond;
            for i in (0..9).rev() {
                digits[i] = b'0' + (n % 10) as u8;
                n /= 10;
            }
            let s = core::str::from_utf8(&digits).expect("ascii digits");
            write!(f, ".{}", s.trim_end_matches('0'))?;
        }
        Ok(())
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Offset::Z => write!(f, "Z"),
            Offset::Custom { minutes } if minutes == 0 => write!(f, "Z"),
            Offset::Custom { mut minutes } => {
                let sign = if minutes < 0 { '-' } else { '+' };
                if minutes < 0 {
                    minutes = -minutes;
                }
                write!(f, "{sign}{:02}:{:02}", minutes / 60, minutes % 60)
            }
        }
    }
}

impl fmt::Display for OffsetDatetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}{}", self.date, self.time, self.offset)
    }
}

impl fmt::Display for LocalDatetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.date, self.time)
    }
}

pub(crate) fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0) && ((year % 100 != 0) || (year % 400 == 0))
}

pub(crate) fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn offset_zero_spellings_compare_equal() {
        assert_eq!(Offset::Z, Offset::Custom { minutes: 0 });
    }

    #[test]
    fn offset_display_collapses_zero_to_z() {
        assert_eq!(Offset::Custom { minutes: 0 }.to_string(), "Z");
        assert_eq!(Offset::Custom { minutes: -60 }.to_string(), "-01:00");
        assert_eq!(Offset::Custom { minutes: 330 }.to_string(), "+05:30");
    }

    #[test]
    fn time_display_trims_trailing_zeros() {
        let t = Time {
            hour: 7,
            minute: 32,
            second: 0,
            nanosecond: 500_000_000,
        };
        assert_eq!(t.to_string(), "07:32:00.5");
    }

    #[test]
    fn time_display_no_fraction_when_zero() {
        let t = Time {
            hour: 7,
            minute: 32,
            second: 0,
            nanosecond: 0,
        };
        assert_eq!(t.to_string(), "07:32:00");
    }
}
