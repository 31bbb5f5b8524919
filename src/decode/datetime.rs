//! Leaf tokenizers for the four TOML date/time shapes.
//!
//! Adapted from the same winnow grammar the teacher crate used, split into
//! the distinct `Date`/`Time`/`Offset` pieces the new [`crate::Value`]
//! variants need rather than one combined struct.

use core::ops::RangeInclusive;

use winnow::{
    combinator::{alt, cut_err, opt, preceded},
    error::{ErrMode, ErrorKind, FromExternalError},
    stream::Stream as _,
    token::{one_of, take_while},
    ModalResult, Parser,
};

use crate::datetime::{days_in_month, Date, Offset, Time};

/// A marker error for a winnow tokenizer failure that needs an
/// `Error`-shaped value to attach via [`winnow::error::FromExternalError`];
/// the decoder only cares that the overall date/time parse failed, not why,
/// so no message is carried here.
#[derive(Debug)]
struct InvalidDateTime;

impl core::fmt::Display for InvalidDateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "invalid date or time")
    }
}

/// What a date/time token at the cursor turned out to be.
pub(crate) enum DateTimeToken {
    OffsetDatetime { date: Date, time: Time, offset: Offset },
    LocalDatetime { date: Date, time: Time },
    Date(Date),
    Time(Time),
}

/// Parse one of the four date/time shapes at the start of `input`.
pub(crate) fn date_time(input: &str) -> Option<(DateTimeToken, usize)> {
    let mut rest = input;
    let start_len = rest.len();
    let tok = full_date_time_or_date.parse_next(&mut rest).ok()?;
    Some((tok, start_len - rest.len()))
}

fn full_date_time_or_date(input: &mut &str) -> ModalResult<DateTimeToken> {
    alt((
        (
            full_date,
            opt(preceded(time_delim, cut_err((partial_time, opt(time_offset))))),
        )
            .map(|(date, tail)| match tail {
                Some((time, Some(offset))) => {
                    DateTimeToken::OffsetDatetime { date, time, offset }
                }
                Some((time, None)) => DateTimeToken::LocalDatetime { date, time },
                None => DateTimeToken::Date(date),
            }),
        partial_time.map(DateTimeToken::Time),
    ))
    .parse_next(input)
}

fn full_date(input: &mut &str) -> ModalResult<Date> {
    let year = date_fullyear.parse_next(input)?;
    '-'.parse_next(input)?;
    let month = cut_err(date_month).parse_next(input)?;
    cut_err('-').parse_next(input)?;
    let day_start = input.checkpoint();
    let day = cut_err(date_mday).parse_next(input)?;
    if day > days_in_month(year, month) {
        input.reset(&day_start);
        return Err(
            ErrMode::from_external_error(input, ErrorKind::Verify, InvalidDateTime).cut()
        );
    }
    Ok(Date { year, month, day })
}

fn partial_time(input: &mut &str) -> ModalResult<Time> {
    let hour = time_hour.parse_next(input)?;
    ':'.parse_next(input)?;
    let minute = cut_err(time_minute).parse_next(input)?;
    cut_err(':').parse_next(input)?;
    let second = cut_err(time_second).parse_next(input)?;
    let nanosecond = opt(time_secfrac).parse_next(input)?.unwrap_or(0);
    Ok(Time {
        hour,
        minute,
        second,
        nanosecond,
    })
}

fn time_offset(input: &mut &str) -> ModalResult<Offset> {
    alt((
        one_of(('Z', 'z')).value(Offset::Z),
        (one_of(('+', '-')), cut_err((time_hour, ':', time_minute)))
            .map(|(sign, (hours, _, minutes))| {
                let sign: i16 = if sign == '+' { 1 } else { -1 };
                sign * (hours as i16 * 60 + minutes as i16)
            })
            .verify(|minutes| (-24 * 60..=24 * 60).contains(minutes))
            .map(|minutes| Offset::Custom { minutes }),
    ))
    .parse_next(input)
}

fn date_fullyear(input: &mut &str) -> ModalResult<u16> {
    unsigned_digits::<4, 4>
        .map(|s: &str| s.parse::<u16>().expect("4 digits fits u16"))
        .parse_next(input)
}

fn date_month(input: &mut &str) -> ModalResult<u8> {
    bounded_2digit(1, 12).parse_next(input)
}

fn date_mday(input: &mut &str) -> ModalResult<u8> {
    bounded_2digit(1, 31).parse_next(input)
}

fn time_delim(input: &mut &str) -> ModalResult<char> {
    one_of(('T', 't', ' ')).parse_next(input)
}

fn time_hour(input: &mut &str) -> ModalResult<u8> {
    bounded_2digit(0, 23).parse_next(input)
}

fn time_minute(input: &mut &str) -> ModalResult<u8> {
    bounded_2digit(0, 59).parse_next(input)
}

fn time_second(input: &mut &str) -> ModalResult<u8> {
    // 60 is permitted for a leap second; the data model doesn't round-trip
    // that distinction, it's just stored as second = 60.
    bounded_2digit(0, 60).parse_next(input)
}

fn bounded_2digit(min: u8, max: u8) -> impl FnMut(&mut &str) -> ModalResult<u8> {
    move |input: &mut &str| {
        unsigned_digits::<2, 2>
            .map(|s: &str| s.parse::<u8>().expect("2 digits fits u8"))
            .verify(move |d| (min..=max).contains(d))
            .parse_next(input)
    }
}

fn time_secfrac(input: &mut &str) -> ModalResult<u32> {
    // Scale for a fractional part of the given digit count up to nanoseconds;
    // the decoder's datetime grammar calls for microsecond resolution, so
    // anything past 6 digits is truncated below rather than kept at full
    // nanosecond precision.
    const SCALE: [u32; 7] = [0, 100_000_000, 10_000_000, 1_000_000, 100_000, 10_000, 1_000];
    const MAX_DIGITS: usize = SCALE.len() - 1;
    preceded('.', unsigned_digits::<3, 18>)
        .map(|repr: &str| {
            if repr.len() > MAX_DIGITS {
                &repr[..MAX_DIGITS]
            } else {
                repr
            }
        })
        .verify_map(|truncated: &str| {
            let v: u32 = truncated.parse().ok()?;
            let scale = SCALE.get(truncated.len())?;
            v.checked_mul(*scale)
        })
        .parse_next(input)
}

fn unsigned_digits<'i, const MIN: usize, const MAX: usize>(
    input: &mut &'i str,
) -> ModalResult<&'i str> {
    take_while(MIN..=MAX, DIGIT).parse_next(input)
}
const DIGIT: RangeInclusive<u8> = b'0'..=b'9';

/// `true` if the character at the cursor could begin a date or time token
/// (used by [`crate::decode`]'s value dispatch, before committing to the
/// heavier [`date_time`] parse).
pub(crate) fn looks_like_date_or_time(input: &str) -> bool {
    let bytes = input.as_bytes();
    let four_digits_then = |sep: u8| {
        bytes.len() >= 5
            && bytes[0].is_ascii_digit()
            && bytes[1].is_ascii_digit()
            && bytes[2].is_ascii_digit()
            && bytes[3].is_ascii_digit()
            && bytes[4] == sep
    };
    let two_digits_then = |sep: u8| {
        bytes.len() >= 3
            && bytes[0].is_ascii_digit()
            && bytes[1].is_ascii_digit()
            && bytes[2] == sep
    };
    four_digits_then(b'-') || two_digits_then(b':')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_offset_datetime() {
        let (tok, n) = date_time("1979-05-27T07:32:00Z rest").unwrap();
        assert_eq!(n, "1979-05-27T07:32:00Z".len());
        match tok {
            DateTimeToken::OffsetDatetime { date, time, offset } => {
                assert_eq!(date, Date { year: 1979, month: 5, day: 27 });
                assert_eq!(time.hour, 7);
                assert_eq!(offset, Offset::Z);
            }
            _ => panic!("expected offset datetime"),
        }
    }

    #[test]
    fn parses_local_date() {
        let (tok, n) = date_time("1979-05-27").unwrap();
        assert_eq!(n, 10);
        assert!(matches!(tok, DateTimeToken::Date(_)));
    }

    #[test]
    fn parses_local_time_with_fraction() {
        let (tok, _) = date_time("00:32:00.999999").unwrap();
        match tok {
            DateTimeToken::Time(t) => assert_eq!(t.nanosecond, 999_999_000),
            _ => panic!("expected time"),
        }
    }

    #[test]
    fn rejects_invalid_day_for_month() {
        assert!(date_time("1979-02-30").is_none());
    }

    #[test]
    fn subsecond_fraction_shorter_than_three_digits_is_not_consumed() {
        // The fractional group requires >= 3 digits; with fewer available it
        // simply doesn't match, leaving the '.' and its digits unconsumed
        // for the caller (which then fails to find a valid next token).
        let (tok, n) = date_time("00:32:00.5").unwrap();
        assert_eq!(n, "00:32:00".len());
        match tok {
            DateTimeToken::Time(t) => assert_eq!(t.nanosecond, 0),
            _ => panic!("expected time"),
        }
    }

    #[test]
    fn truncates_subsecond_fraction_past_microseconds() {
        let (tok, _) = date_time("00:32:00.123456789").unwrap();
        match tok {
            DateTimeToken::Time(t) => assert_eq!(t.nanosecond, 123_456_000),
            _ => panic!("expected time"),
        }
    }

    #[test]
    fn parses_negative_offset() {
        let (tok, _) = date_time("1979-05-27T00:32:00-07:00").unwrap();
        match tok {
            DateTimeToken::OffsetDatetime { offset, .. } => {
                assert_eq!(offset.as_minutes(), -420);
            }
            _ => panic!("expected offset datetime"),
        }
    }
}
