//! Basic and literal string literal parsing, single- and multi-line.
//!
//! Ported from `parse_string`/`parse_dispatch_string` in the Python source
//! this format's decoder rules were distilled from, using the "scan
//! character by character, tracking escape state explicitly" strategy
//! rather than the source's scan-to-delimiter-then-backtrack approach —
//! both produce the same result, and the forward-scan reads more directly
//! in Rust.

use alloc::format;
use alloc::string::String;

use crate::error::DecodeError;
use crate::scanner::Scanner;

/// Parse a string literal with the given delimiter (`"`, `"""`, `'`, or
/// `'''`), already known to be at the cursor.
pub(crate) fn parse_string(
    scanner: &mut Scanner<'_>,
    delim: &str,
    allow_escapes: bool,
    allow_newlines: bool,
    whitespace_escape: bool,
) -> Result<String, DecodeError> {
    if !scanner.at_literal(delim) {
        return Err(scanner.error(format!("string doesn't begin with delimiter '{delim}'")));
    }
    scanner.advance(delim.len());

    let mut raw = String::new();
    loop {
        raw.push_str(scanner.advance_until(delim));
        if scanner.at_end() && !raw.ends_with(delim) {
            return Err(scanner.error("end of file inside string"));
        }
        if !allow_escapes {
            break;
        }
        // Count the backslashes immediately before the delimiter we just
        // matched; an odd count means the delimiter itself is escaped and
        // doesn't actually close the string.
        let body = &raw[..raw.len() - delim.len()];
        let trailing_backslashes = body.chars().rev().take_while(|&c| c == '\\').count();
        if trailing_backslashes % 2 == 0 {
            break;
        }
        // Only one character of the closing delimiter is actually consumed
        // by the escape; for multi-char delimiters, back up and keep
        // searching so `"""a\""""` still finds its real close.
        let n_remove = delim.len() - 1;
        if n_remove > 0 {
            scanner.backtrack(n_remove);
            raw.truncate(raw.len() - n_remove);
        }
        if scanner.at_end() {
            return Err(scanner.error("end of file after escaped delimiter"));
        }
    }
    raw.truncate(raw.len() - delim.len());

    if raw.contains('\n') && !allow_newlines {
        return Err(scanner.error("newline in single-line string"));
    }
    if raw.chars().any(is_disallowed_control_char) {
        return Err(scanner.error("unescaped control character in string"));
    }
    if allow_newlines {
        if let Some(rest) = raw.strip_prefix('\n') {
            raw = String::from(rest);
        } else if let Some(rest) = raw.strip_prefix("\r\n") {
            raw = String::from(rest);
        }
    }

    if !allow_escapes {
        return Ok(raw);
    }
    process_escapes(scanner, &raw, whitespace_escape)
}

fn is_disallowed_control_char(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{b}'..='\u{1f}' | '\u{7f}')
}

fn process_escapes(
    scanner: &Scanner<'_>,
    raw: &str,
    whitespace_escape: bool,
) -> Result<String, DecodeError> {
    let bytes = raw.as_bytes();
    let mut out = String::with_capacity(raw.len());
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            let c = raw[i..].chars().next().expect("char boundary");
            out.push(c);
            i += c.len_utf8();
            continue;
        }
        let ev = *bytes
            .get(i + 1)
            .ok_or_else(|| scanner.error("dangling backslash at end of string"))?;
        match ev {
            b'b' => {
                out.push('\u{8}');
                i += 2;
            }
            b't' => {
                out.push('\t');
                i += 2;
            }
            b'n' => {
                out.push('\n');
                i += 2;
            }
            b'f' => {
                out.push('\u{c}');
                i += 2;
            }
            b'r' => {
                out.push('\r');
                i += 2;
            }
            b'"' => {
                out.push('"');
                i += 2;
            }
            b'\\' => {
                out.push('\\');
                i += 2;
            }
            b'u' => {
                let (c, len) = unicode_escape(scanner, raw, i, 4)?;
                out.push(c);
                i += len;
            }
            b'U' => {
                let (c, len) = unicode_escape(scanner, raw, i, 8)?;
                out.push(c);
                i += len;
            }
            _ if whitespace_escape => match line_continuation_len(&raw[i + 1..]) {
                Some(n) => i += 1 + n,
                None => return Err(scanner.error(format!("\\{} not a valid escape", ev as char))),
            },
            _ => return Err(scanner.error(format!("\\{} not a valid escape", ev as char))),
        }
    }
    Ok(out)
}

fn unicode_escape(
    scanner: &Scanner<'_>,
    raw: &str,
    backslash_pos: usize,
    digits: usize,
) -> Result<(char, usize), DecodeError> {
    let tag = if digits == 4 { 'u' } else { 'U' };
    let hex = raw
        .get(backslash_pos + 2..backslash_pos + 2 + digits)
        .ok_or_else(|| scanner.error(format!("hexval cutoff in \\{tag}")))?;
    let code = u32::from_str_radix(hex, 16)
        .map_err(|_| scanner.error(format!("bad hex escape '\\{tag}{hex}'")))?;
    if (0xd800..=0xdfff).contains(&code) {
        return Err(scanner.error(format!("non-scalar unicode escape '\\{tag}{hex}'")));
    }
    let c =
        char::from_u32(code).ok_or_else(|| scanner.error(format!("bad hex escape '\\{tag}{hex}'")))?;
    Ok((c, 2 + digits))
}

/// Given the text right after a backslash, the length of the maximal
/// contiguous run of spaces/tabs/newlines, if that run contains at least
/// one newline (a line-continuation escape always crosses a line break).
fn line_continuation_len(after_backslash: &str) -> Option<usize> {
    let run_len = after_backslash
        .chars()
        .take_while(|&c| c == ' ' || c == '\t' || c == '\n')
        .count();
    let run = &after_backslash[..run_len];
    if run.contains('\n') {
        Some(run_len)
    } else {
        None
    }
}
