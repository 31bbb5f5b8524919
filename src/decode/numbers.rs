//! Leaf tokenizers for integers and floats.
//!
//! These are the one place the decoder leans on `winnow` rather than the
//! hand-rolled [`crate::scanner::Scanner`]: the grammar for number literals
//! is exactly the kind of small, self-contained, alternation-heavy grammar
//! combinators are good at, and the teacher crate already had a proven
//! implementation of it. Each function parses a prefix of `input` and
//! returns how many bytes it consumed, so the caller (`decode::parse_value`)
//! can advance its `Scanner` by that amount.

use core::ops::RangeInclusive;

use winnow::{
    combinator::{alt, cut_err, opt, peek, preceded, repeat, trace},
    dispatch,
    error::{StrContext, StrContextValue},
    token::{one_of, take},
    ModalResult, Parser,
};

/// Parse a TOML integer literal (decimal, hex, octal, or binary) at the
/// start of `input`. Requires the token be followed by whitespace, `,`,
/// `]`, `}`, or end of input.
pub(crate) fn integer(input: &str) -> Option<(i64, usize)> {
    let mut rest = input;
    let start_len = rest.len();
    let v = int_token.parse_next(&mut rest).ok()?;
    if !at_token_boundary(rest) {
        return None;
    }
    Some((v, start_len - rest.len()))
}

fn int_token(input: &mut &str) -> ModalResult<i64> {
    trace(
        "integer",
        dispatch! {peek(opt::<_, &str, _, _>(take(2usize)));
            Some("0x") => cut_err(hex_int.try_map(|s| i64::from_str_radix(&strip_underscores(s), 16))),
            Some("0o") => cut_err(oct_int.try_map(|s| i64::from_str_radix(&strip_underscores(s), 8))),
            Some("0b") => cut_err(bin_int.try_map(|s| i64::from_str_radix(&strip_underscores(s), 2))),
            _ => dec_int.try_map(|s| strip_underscores(s).parse::<i64>()),
        },
    )
    .parse_next(input)
}

fn strip_underscores(s: &str) -> alloc::string::String {
    s.chars().filter(|&c| c != '_').collect()
}

// dec-int = [ minus / plus ] unsigned-dec-int
fn dec_int<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    trace(
        "dec-int",
        (
            opt(one_of((b'+', b'-'))),
            alt((
                (
                    one_of(DIGIT1_9),
                    repeat(
                        0..,
                        alt((
                            digit.void(),
                            (
                                one_of(b'_'),
                                cut_err(digit).context(StrContext::Expected(
                                    StrContextValue::Description("digit"),
                                )),
                            )
                                .void(),
                        )),
                    )
                    .map(|()| ()),
                )
                    .void(),
                digit.void(),
            )),
        )
            .take()
            .context(StrContext::Label("integer")),
    )
    .parse_next(input)
}
const DIGIT1_9: RangeInclusive<u8> = b'1'..=b'9';

fn hex_int<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    preceded(
        "0x",
        cut_err((
            hexdig,
            repeat(
                0..,
                alt((
                    hexdig.void(),
                    (one_of(b'_'), cut_err(hexdig)).void(),
                )),
            )
            .map(|()| ()),
        ))
        .take(),
    )
    .parse_next(input)
}

fn oct_int<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    preceded(
        "0o",
        cut_err((
            one_of(DIGIT0_7),
            repeat(
                0..,
                alt((
                    one_of(DIGIT0_7).void(),
                    (one_of(b'_'), cut_err(one_of(DIGIT0_7))).void(),
                )),
            )
            .map(|()| ()),
        ))
        .take(),
    )
    .parse_next(input)
}
const DIGIT0_7: RangeInclusive<u8> = b'0'..=b'7';

fn bin_int<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    preceded(
        "0b",
        cut_err((
            one_of(DIGIT0_1),
            repeat(
                0..,
                alt((
                    one_of(DIGIT0_1).void(),
                    (one_of(b'_'), cut_err(one_of(DIGIT0_1))).void(),
                )),
            )
            .map(|()| ()),
        ))
        .take(),
    )
    .parse_next(input)
}
const DIGIT0_1: RangeInclusive<u8> = b'0'..=b'1';

/// Parse a TOML float literal, including `inf`/`nan`, at the start of
/// `input`. Returns `None` if the token has neither a fractional part nor
/// an exponent and isn't `inf`/`nan` — such a token is an integer, and the
/// caller should fall back to [`integer`].
pub(crate) fn float(input: &str) -> Option<(f64, usize)> {
    let mut rest = input;
    let start_len = rest.len();
    let v = alt((
        float_with_frac_or_exp,
        special_float,
    ))
    .parse_next(&mut rest)
    .ok()?;
    if !at_token_boundary(rest) {
        return None;
    }
    Some((v, start_len - rest.len()))
}

fn float_with_frac_or_exp(input: &mut &str) -> ModalResult<f64> {
    (dec_int, alt((exp.void(), (frac.void(), opt(exp.void())).void())))
        .take()
        .try_map(|s: &str| strip_underscores(s).parse::<f64>())
        .parse_next(input)
}

fn frac<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    preceded('.', cut_err(zero_prefixable_int))
        .take()
        .parse_next(input)
}

fn zero_prefixable_int<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        digit,
        repeat(
            0..,
            alt((
                digit.void(),
                (one_of(b'_'), cut_err(digit)).void(),
            )),
        )
        .map(|()| ()),
    )
        .take()
        .parse_next(input)
}

fn exp<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        one_of((b'e', b'E')),
        opt(one_of([b'+', b'-'])),
        cut_err(zero_prefixable_int),
    )
        .take()
        .parse_next(input)
}

fn special_float(input: &mut &str) -> ModalResult<f64> {
    (opt(one_of((b'+', b'-'))), alt((inf, nan)))
        .map(|(s, f)| match s {
            Some('-') => -f,
            _ => f,
        })
        .parse_next(input)
}
fn inf(input: &mut &str) -> ModalResult<f64> {
    "inf".value(f64::INFINITY).parse_next(input)
}
fn nan(input: &mut &str) -> ModalResult<f64> {
    "nan".value(f64::NAN).parse_next(input)
}

fn digit(input: &mut &str) -> ModalResult<char> {
    one_of(DIGIT).parse_next(input)
}
const DIGIT: RangeInclusive<u8> = b'0'..=b'9';

fn hexdig(input: &mut &str) -> ModalResult<char> {
    one_of(HEXDIG).parse_next(input)
}
const HEXDIG: (RangeInclusive<u8>, RangeInclusive<u8>, RangeInclusive<u8>) =
    (DIGIT, b'A'..=b'F', b'a'..=b'f');

fn at_token_boundary(rest: &str) -> bool {
    match rest.chars().next() {
        None => true,
        Some(c) => matches!(c, ' ' | '\t' | '\r' | '\n' | ',' | ']' | '}'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal() {
        assert_eq!(integer("42 "), Some((42, 2)));
        assert_eq!(integer("-17,"), Some((-17, 3)));
        assert_eq!(integer("1_000]"), Some((1000, 5)));
    }

    #[test]
    fn parses_hex_oct_bin() {
        assert_eq!(integer("0xFF "), Some((255, 4)));
        assert_eq!(integer("0o17 "), Some((15, 4)));
        assert_eq!(integer("0b101 "), Some((5, 5)));
    }

    #[test]
    fn rejects_leading_underscore_in_prefix() {
        assert!(integer("0x_FF ").is_none());
    }

    #[test]
    fn rejects_comment_glued_to_a_number() {
        // A '#' doesn't end a number token; only whitespace/',' / ']' / '}'
        // / EOF do, so `1#c` isn't a valid int (or float) token at all.
        assert!(integer("1#c\n").is_none());
        assert!(float("1.0#c\n").is_none());
    }

    #[test]
    fn parses_float_with_frac_and_exp() {
        assert_eq!(float("3.14 "), Some((3.14, 4)));
        assert_eq!(float("1e10 "), Some((1e10, 4)));
        assert_eq!(float("5e+22,"), Some((5e22, 5)));
    }

    #[test]
    fn integer_like_token_is_not_a_float() {
        assert_eq!(float("42 "), None);
    }

    #[test]
    fn parses_special_floats() {
        assert_eq!(float("inf ").map(|(f, n)| (f.is_infinite(), n)), Some((true, 3)));
        assert_eq!(float("-inf ").map(|(f, _)| f), Some(f64::NEG_INFINITY));
        assert!(float("nan ").map(|(f, _)| f.is_nan()).unwrap_or(false));
    }
}
