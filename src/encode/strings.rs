//! String literal emission: choosing between basic and literal form, and
//! between single-line and multi-line, then producing the escaped text.
//!
//! Ported from `dump_str`/`dump_bstr`/`dump_rawstr` in the Python encoder
//! this format's emission rules were distilled from.

use alloc::format;
use alloc::string::String;

/// Encode `s` as a TOML string literal, preferring literal (`'...'`) form
/// over basic (`"..."`) form whenever the content allows it.
///
/// `multiline_allowed` is `false` when encoding a key (keys may never use
/// the triple-quoted forms, bare or not).
pub(crate) fn encode_string(s: &str, multiline_allowed: bool) -> String {
    let multiline = has_newline_past_first_char(s);
    let needs_basic = (s.contains('\'') && !multiline)
        || s.contains("'''")
        || s.chars().any(|c| is_disallowed_control(c) && c != '\n')
        || (multiline && !multiline_allowed)
        || s.starts_with('\n')
        || s.ends_with('\'');
    if needs_basic {
        dump_basic(s, multiline && multiline_allowed)
    } else {
        dump_literal(s, multiline)
    }
}

fn has_newline_past_first_char(s: &str) -> bool {
    match s.char_indices().nth(1) {
        Some((idx, _)) => s[idx..].contains('\n'),
        None => false,
    }
}

fn is_disallowed_control(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{b}'..='\u{1f}' | '\u{7f}')
}

fn dump_literal(s: &str, multiline: bool) -> String {
    let delim = if multiline { "'''" } else { "'" };
    debug_assert!(
        !s.contains(delim),
        "caller must route strings containing the chosen delimiter to dump_basic"
    );
    format!("{delim}{s}{delim}")
}

fn dump_basic(s: &str, multiline: bool) -> String {
    let delim = if multiline { "\"\"\"" } else { "\"" };
    let mut out = String::from(delim);
    for (n, c) in s.chars().enumerate() {
        if is_disallowed_control(c) || c == '\\' || c == '"' || c == '\n' {
            if c == '\n' && multiline && n != 0 {
                out.push(c);
            } else if let Some(esc) = short_escape(c) {
                out.push_str(esc);
            } else {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
        } else {
            out.push(c);
        }
    }
    out.push_str(delim);
    out
}

fn short_escape(c: char) -> Option<&'static str> {
    Some(match c {
        '\u{8}' => "\\b",
        '\t' => "\\t",
        '\n' => "\\n",
        '\u{c}' => "\\f",
        '\r' => "\\r",
        '"' => "\\\"",
        '\\' => "\\\\",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_literal_form() {
        assert_eq!(encode_string("hello", true), "'hello'");
    }

    #[test]
    fn quote_forces_basic_single_line() {
        assert_eq!(encode_string("it's", true), "\"it's\"");
    }

    #[test]
    fn backslash_stays_literal() {
        assert_eq!(encode_string(r"C:\Users\nodejs", true), r"'C:\Users\nodejs'");
    }

    #[test]
    fn multiline_uses_triple_literal_when_allowed() {
        assert_eq!(encode_string("a\nb", true), "'''a\nb'''");
    }

    #[test]
    fn multiline_forced_basic_when_not_allowed() {
        assert_eq!(encode_string("a\nb", false), "\"a\\nb\"");
    }

    #[test]
    fn control_char_forces_basic() {
        assert_eq!(encode_string("a\u{1}b", true), "\"a\\u0001b\"");
    }

    #[test]
    fn trailing_quote_forces_basic() {
        assert_eq!(encode_string("abc'", true), "\"abc'\"");
    }

    #[test]
    fn triple_quote_substring_forces_basic() {
        let s = "a'''b";
        assert_eq!(encode_string(s, true), "\"a'''b\"");
    }

    #[test]
    fn leading_newline_is_escaped_in_single_line_basic_form() {
        // A leading '\n' forces basic form (it would otherwise be read back
        // as the multiline-string leading-newline-strip, or be an outright
        // newline-in-single-line-string error); it must come out as `\n`,
        // not a raw line break, or re-decoding it loses or rejects the data.
        assert_eq!(encode_string("\nfoo", true), "\"\\nfoo\"");
    }

    #[test]
    fn leading_newline_is_escaped_even_in_multiline_basic_form() {
        // Once the string is long enough to actually use multiline form, any
        // *other* embedded newline stays a raw line break, but the leading
        // one must still be escaped so the decoder's leading-newline strip
        // doesn't silently eat it on re-decode.
        assert_eq!(encode_string("\nfoo\nbar", true), "\"\"\"\\nfoo\nbar\"\"\"");
    }
}
