//! The structural decoder: turns TOML source text into a [`Table`].
//!
//! The overall shape is a hand-rolled recursive-descent parser driving a
//! [`Scanner`], with the leaf token grammars (numbers, date-times, strings)
//! factored out into their own modules. This mirrors the structure of the
//! Python decoder this format's rules were distilled from: a top-level loop
//! that alternates between skipping "throwaway" text (whitespace and
//! comments) and parsing one statement (a table header or a key/value
//! pair), a `proc_kl`-equivalent that walks a dotted key list through nested
//! tables and table-arrays, and a `parse_value` dispatch keyed on the next
//! character.

mod datetime;
mod numbers;
mod strings;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::datetime::{LocalDatetime, OffsetDatetime};
use crate::error::DecodeError;
use crate::scanner::Scanner;
use crate::{Array, Table, Value};

/// How many `[`-nested levels of array/inline-table a single value may
/// contain. The format itself places no limit on this; this bound exists so
/// that a pathological or hostile document fails with a decode error rather
/// than overflowing the call stack.
const MAX_DEPTH: usize = 128;

/// Decode a complete TOML document from a string.
pub fn decode_from_str(input: &str) -> Result<Table, DecodeError> {
    Decoder::new(input).decode()
}

/// Decode a complete TOML document read in full from `reader`.
///
/// This is a thin wrapper: the entire reader is read into a `String` up
/// front, then handed to [`decode_from_str`]. TOML documents are not
/// streamed, since later statements can redefine the structure (if not the
/// values) that earlier ones established.
#[cfg(feature = "std")]
pub fn decode_from_reader<R: std::io::Read>(mut reader: R) -> Result<Table, DecodeError> {
    let mut buf = String::new();
    reader
        .read_to_string(&mut buf)
        .map_err(|e| DecodeError::new(format!("I/O error: {e}"), 0, 0))?;
    decode_from_str(&buf)
}

struct Decoder<'i> {
    scanner: Scanner<'i>,
    depth: usize,
}

impl<'i> Decoder<'i> {
    fn new(input: &'i str) -> Self {
        Self {
            scanner: Scanner::new(input),
            depth: 0,
        }
    }

    fn decode(mut self) -> Result<Table, DecodeError> {
        let mut root = Table::new();
        let mut current_path: Vec<String> = Vec::new();
        let mut first_statement = true;
        loop {
            let newlines = self.skip_throwaway();
            if self.scanner.at_end() {
                break;
            }
            if !first_statement && newlines == 0 {
                return Err(self.scanner.error("didn't find expected newline"));
            }
            first_statement = false;
            if self.scanner.peek_byte() == Some(b'[') {
                let (path, is_tarray) = self.parse_tablespec()?;
                current_path = process_header(&mut root, path, is_tarray, &self.scanner)?;
            } else {
                let (kl, value) = self.parse_pair()?;
                insert_pair(&mut root, &current_path, kl, value, true, &self.scanner)?;
            }
        }
        Ok(root)
    }

    /// Skip whitespace and `#` comments, returning how many newlines were
    /// consumed. A statement must be preceded by at least one newline
    /// unless it's the very first statement in the document.
    fn skip_throwaway(&mut self) -> usize {
        let mut newlines = 0usize;
        loop {
            let ws = self
                .scanner
                .advance_while(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
            newlines += ws.matches('\n').count();
            if self.scanner.peek_byte() == Some(b'#') {
                let comment = self.scanner.advance_until("\n");
                newlines += comment.matches('\n').count();
            } else {
                break;
            }
        }
        newlines
    }

    fn skip_horizontal_ws(&mut self) {
        self.scanner.advance_while(|c| c == ' ' || c == '\t');
    }

    /// `[key.list]` or `[[key.list]]`, cursor at the opening `[`.
    fn parse_tablespec(&mut self) -> Result<(Vec<String>, bool), DecodeError> {
        self.scanner.advance(1);
        let is_tarray = self.scanner.peek_byte() == Some(b'[');
        if is_tarray {
            self.scanner.advance(1);
        }
        self.skip_horizontal_ws();
        let kl = self.parse_keylist()?;
        self.skip_horizontal_ws();
        if self.scanner.peek_byte() != Some(b']') {
            return Err(self.scanner.error("expected ']' closing table header"));
        }
        self.scanner.advance(1);
        if is_tarray {
            if self.scanner.peek_byte() != Some(b']') {
                return Err(self
                    .scanner
                    .error("expected ']]' closing table-array header"));
            }
            self.scanner.advance(1);
        }
        Ok((kl, is_tarray))
    }

    /// `key = value`, cursor at the first character of `key`.
    fn parse_pair(&mut self) -> Result<(Vec<String>, Value), DecodeError> {
        let kl = self.parse_keylist()?;
        if self.scanner.peek_byte() != Some(b'=') {
            return Err(self.scanner.error("expected '=' after key"));
        }
        self.scanner.advance(1);
        self.skip_horizontal_ws();
        let value = self.parse_value()?;
        Ok((kl, value))
    }

    /// A dotted sequence of one or more keys, e.g. `a.b.c`. Horizontal
    /// whitespace around dots and around the whole list is consumed.
    fn parse_keylist(&mut self) -> Result<Vec<String>, DecodeError> {
        let mut keys = Vec::new();
        loop {
            keys.push(self.parse_key()?);
            self.skip_horizontal_ws();
            if self.scanner.peek_byte() == Some(b'.') {
                self.scanner.advance(1);
                self.skip_horizontal_ws();
            } else {
                break;
            }
        }
        Ok(keys)
    }

    /// A single bare or quoted key.
    fn parse_key(&mut self) -> Result<String, DecodeError> {
        match self.scanner.peek_byte() {
            Some(b'"') | Some(b'\'') => self.parse_dispatch_string(false),
            Some(b) if is_bare_key_byte(b) => {
                Ok(String::from(self.scanner.advance_while(is_bare_key_char)))
            }
            _ => Err(self.scanner.error("invalid character to begin a key")),
        }
    }

    /// A string in any of its four forms, dispatched on the delimiter at
    /// the cursor. `multiline_allowed` is `false` for keys, which may not
    /// use the triple-quoted forms.
    fn parse_dispatch_string(&mut self, multiline_allowed: bool) -> Result<String, DecodeError> {
        if self.scanner.at_literal("\"\"\"") {
            if !multiline_allowed {
                return Err(self
                    .scanner
                    .error("multiline string is not allowed here"));
            }
            strings::parse_string(&mut self.scanner, "\"\"\"", true, true, true)
        } else if self.scanner.at_literal("\"") {
            strings::parse_string(&mut self.scanner, "\"", true, false, false)
        } else if self.scanner.at_literal("'''") {
            if !multiline_allowed {
                return Err(self
                    .scanner
                    .error("multiline string is not allowed here"));
            }
            strings::parse_string(&mut self.scanner, "'''", false, true, false)
        } else if self.scanner.at_literal("'") {
            strings::parse_string(&mut self.scanner, "'", false, false, false)
        } else {
            Err(self.scanner.error("expected a string"))
        }
    }

    /// Any value: dispatches on the first character, per the decoder's
    /// value grammar. Tries strings and the two compound forms first (all
    /// unambiguous from their leading character), then booleans, then
    /// falls through integer, float, and date/time in turn, since none of
    /// those three can be told apart from a single leading character.
    fn parse_value(&mut self) -> Result<Value, DecodeError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            self.depth -= 1;
            return Err(self.scanner.error("exceeded maximum nesting depth"));
        }
        let result = self.parse_value_inner();
        self.depth -= 1;
        result
    }

    fn parse_value_inner(&mut self) -> Result<Value, DecodeError> {
        match self.scanner.peek_byte() {
            Some(b'"') | Some(b'\'') => {
                return Ok(Value::String(self.parse_dispatch_string(true)?))
            }
            Some(b'[') => return Ok(Value::Array(self.parse_array()?)),
            Some(b'{') => return Ok(Value::Table(self.parse_inline_table()?)),
            _ => {}
        }
        if self.scanner.at_literal("true") {
            self.scanner.advance(4);
            return Ok(Value::Boolean(true));
        }
        if self.scanner.at_literal("false") {
            self.scanner.advance(5);
            return Ok(Value::Boolean(false));
        }
        let rest = self.scanner.rest();
        if let Some((i, n)) = numbers::integer(rest) {
            self.scanner.advance(n);
            return Ok(Value::Integer(i));
        }
        if let Some((f, n)) = numbers::float(rest) {
            self.scanner.advance(n);
            return Ok(Value::Float(f));
        }
        if datetime::looks_like_date_or_time(rest) {
            if let Some((tok, n)) = datetime::date_time(rest) {
                self.scanner.advance(n);
                return Ok(token_to_value(tok));
            }
        }
        Err(self.scanner.error("can't parse value"))
    }

    /// `[ v1, v2, ... ]`, cursor at the opening `[`. Elements may span
    /// lines and carry comments; unlike inline tables, newlines are always
    /// allowed here.
    fn parse_array(&mut self) -> Result<Array, DecodeError> {
        self.scanner.advance(1);
        self.skip_throwaway();
        let mut array = Array::new();
        let mut tag: Option<ValueTag> = None;
        loop {
            if self.scanner.peek_byte() == Some(b']') {
                self.scanner.advance(1);
                break;
            }
            let value = self.parse_value()?;
            let t = value_tag(&value);
            match tag {
                None => tag = Some(t),
                Some(t0) if t0 == t => {}
                Some(_) => return Err(self.scanner.error("array of mixed type")),
            }
            array.push(value);
            self.skip_throwaway();
            match self.scanner.peek_byte() {
                Some(b',') => {
                    self.scanner.advance(1);
                    self.skip_throwaway();
                }
                Some(b']') => {
                    self.scanner.advance(1);
                    break;
                }
                _ => return Err(self.scanner.error("expected ',' or ']' in array")),
            }
        }
        Ok(array)
    }

    /// `{ k = v, ... }`, cursor at the opening `{`. No newlines or comments
    /// are permitted inside, and the table is sealed against later
    /// extension once its closing `}` is reached.
    fn parse_inline_table(&mut self) -> Result<Table, DecodeError> {
        self.scanner.advance(1);
        self.skip_horizontal_ws();
        let mut table = Table::new();
        if self.scanner.peek_byte() == Some(b'}') {
            self.scanner.advance(1);
            table.sealed = true;
            return Ok(table);
        }
        loop {
            let kl = self.parse_keylist()?;
            if self.scanner.peek_byte() != Some(b'=') {
                return Err(self.scanner.error("expected '=' after key in inline table"));
            }
            self.scanner.advance(1);
            self.skip_horizontal_ws();
            let value = self.parse_value()?;
            self.skip_horizontal_ws();
            insert_pair(&mut table, &[], kl, value, false, &self.scanner)?;
            match self.scanner.peek_byte() {
                Some(b',') => {
                    self.scanner.advance(1);
                    self.skip_horizontal_ws();
                }
                Some(b'}') => {
                    self.scanner.advance(1);
                    break;
                }
                _ => return Err(self.scanner.error("expected ',' or '}' in inline table")),
            }
        }
        table.sealed = true;
        Ok(table)
    }
}

fn token_to_value(tok: datetime::DateTimeToken) -> Value {
    match tok {
        datetime::DateTimeToken::OffsetDatetime { date, time, offset } => {
            Value::Datetime(OffsetDatetime { date, time, offset })
        }
        datetime::DateTimeToken::LocalDatetime { date, time } => {
            Value::LocalDatetime(LocalDatetime { date, time })
        }
        datetime::DateTimeToken::Date(d) => Value::Date(d),
        datetime::DateTimeToken::Time(t) => Value::Time(t),
    }
}

#[derive(Clone, Copy, PartialEq)]
enum ValueTag {
    String,
    Integer,
    Float,
    Boolean,
    Datetime,
    LocalDatetime,
    Date,
    Time,
    Array,
    Table,
}

fn value_tag(v: &Value) -> ValueTag {
    match v {
        Value::String(_) => ValueTag::String,
        Value::Integer(_) => ValueTag::Integer,
        Value::Float(_) => ValueTag::Float,
        Value::Boolean(_) => ValueTag::Boolean,
        Value::Datetime(_) => ValueTag::Datetime,
        Value::LocalDatetime(_) => ValueTag::LocalDatetime,
        Value::Date(_) => ValueTag::Date,
        Value::Time(_) => ValueTag::Time,
        Value::Array(_) => ValueTag::Array,
        Value::Table(_) => ValueTag::Table,
        Value::None => unreachable!("the decoder never produces Value::None"),
    }
}

fn is_bare_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

fn is_bare_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Walk `segments` from `table`, creating empty tables for keys that don't
/// exist yet, descending into a table-array's last element when a segment
/// names one. This is the shared traversal behind both a table header's own
/// keylist and a key/value pair's dotted key.
///
/// `reject_locked_arrays` enables the "cannot extend a statically declared
/// array" check; it is only turned on for a table header's own keylist
/// (`[a.b]` or `[[a.b]]`, either way). Ordinary key/value pairs — top-level
/// or inside an inline table — never exercise it: a dotted key like
/// `a.b = 1` is always free to pass through an array sitting at `a`, and
/// can only ever be rejected for crossing a *sealed* table.
fn descend_creating<'a>(
    mut table: &'a mut Table,
    segments: &[String],
    reject_locked_arrays: bool,
    scanner: &Scanner<'_>,
) -> Result<&'a mut Table, DecodeError> {
    for seg in segments {
        match table.entry_or_insert_table(seg) {
            Value::Table(t) => {
                if t.sealed {
                    return Err(scanner.error(format!("cannot extend inline table '{seg}'")));
                }
                table = t;
            }
            Value::Array(a) => {
                if reject_locked_arrays && a.locked {
                    return Err(scanner
                        .error(format!("appended to statically defined array '{seg}'")));
                }
                match a.last_mut() {
                    Some(Value::Table(t)) => {
                        if t.sealed {
                            return Err(scanner
                                .error(format!("cannot extend inline table '{seg}'")));
                        }
                        table = t;
                    }
                    _ => return Err(scanner.error(format!("repeated key in keylist: '{seg}'"))),
                }
            }
            _ => return Err(scanner.error(format!("repeated key in keylist: '{seg}'"))),
        }
    }
    Ok(table)
}

/// Process one `[key.list]` or `[[key.list]]` line: navigate (creating
/// intermediate tables as needed) to the table named by all but the last
/// segment, then apply the terminal segment's own rule — reuse-or-create
/// for a plain header (erroring if it's already `explicit`, i.e. a second
/// `[header]` naming the same table), or create-array-then-append for a
/// table-array header. Returns the new current-target path.
fn process_header(
    root: &mut Table,
    path: Vec<String>,
    is_tarray: bool,
    scanner: &Scanner<'_>,
) -> Result<Vec<String>, DecodeError> {
    let terminal = path.len() - 1;
    {
        let parent = descend_creating(root, &path[..terminal], true, scanner)?;
        let key = path[terminal].as_str();
        if is_tarray {
            match parent.entry_or_insert_array(key) {
                Value::Array(a) => {
                    if a.locked {
                        return Err(scanner
                            .error(format!("appended to statically defined array '{key}'")));
                    }
                    a.push(Table::new());
                }
                _ => return Err(scanner.error(format!("repeated key '{key}'"))),
            }
        } else {
            match parent.entry_or_insert_table(key) {
                Value::Table(t) => {
                    if t.sealed {
                        return Err(scanner
                            .error(format!("cannot redefine inline table '{key}'")));
                    }
                    if t.explicit {
                        return Err(scanner.error(format!("table '{key}' redefined")));
                    }
                    t.explicit = true;
                }
                _ => return Err(scanner.error(format!("repeated key '{key}'"))),
            }
        }
    }
    Ok(path)
}

/// Insert `kl = value` into `table`, navigating to `current_path` first
/// (used for the top-level loop, where `table` is always the document
/// root; inline tables pass an empty path and `table` directly). Errors if
/// the terminal key is already present. `lock_array`, when the value is an
/// array, marks it so a later `[[key]]` header cannot extend it — set for
/// top-level statement pairs only, never for pairs inside an inline table.
fn insert_pair(
    table: &mut Table,
    current_path: &[String],
    kl: Vec<String>,
    value: Value,
    lock_array: bool,
    scanner: &Scanner<'_>,
) -> Result<(), DecodeError> {
    let current = descend_creating(table, current_path, false, scanner)?;
    let terminal = kl.len() - 1;
    let target = descend_creating(current, &kl[..terminal], false, scanner)?;
    let key = &kl[terminal];
    if target.contains_key(key) {
        return Err(scanner.error(format!("key '{key}' is repeated")));
    }
    let mut value = value;
    if lock_array {
        if let Value::Array(a) = &mut value {
            a.locked = true;
        }
    }
    target.insert(key.clone(), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_flat_pairs() {
        let t = decode_from_str("a = 1\nb = \"x\"\n").unwrap();
        assert_eq!(t.get("a"), Some(&Value::Integer(1)));
        assert_eq!(t.get("b").and_then(Value::as_str), Some("x"));
    }

    #[test]
    fn decodes_dotted_keys_into_nested_tables() {
        let t = decode_from_str("a.b.c = 1\n").unwrap();
        let a = t.get("a").and_then(Value::as_table).unwrap();
        let b = a.get("b").and_then(Value::as_table).unwrap();
        assert_eq!(b.get("c"), Some(&Value::Integer(1)));
    }

    #[test]
    fn decodes_table_headers() {
        let t = decode_from_str("[a]\nx = 1\n[a.b]\ny = 2\n").unwrap();
        let a = t.get("a").and_then(Value::as_table).unwrap();
        assert_eq!(a.get("x"), Some(&Value::Integer(1)));
        let b = a.get("b").and_then(Value::as_table).unwrap();
        assert_eq!(b.get("y"), Some(&Value::Integer(2)));
    }

    #[test]
    fn decodes_table_array_headers() {
        let t = decode_from_str("[[fruit]]\nname = \"apple\"\n[[fruit]]\nname = \"pear\"\n")
            .unwrap();
        let fruit = t.get("fruit").and_then(Value::as_array).unwrap();
        assert_eq!(fruit.len(), 2);
        assert_eq!(
            fruit.get(0).and_then(Value::as_table).and_then(|t| t.get("name")).and_then(Value::as_str),
            Some("apple")
        );
        assert_eq!(
            fruit.get(1).and_then(Value::as_table).and_then(|t| t.get("name")).and_then(Value::as_str),
            Some("pear")
        );
    }

    #[test]
    fn rejects_duplicate_key() {
        assert!(decode_from_str("a = 1\na = 2\n").is_err());
    }

    #[test]
    fn rejects_table_redefinition() {
        assert!(decode_from_str("[a]\nx = 1\n[a]\ny = 2\n").is_err());
    }

    #[test]
    fn rejects_mixed_type_array() {
        assert!(decode_from_str("a = [1, \"two\"]\n").is_err());
    }

    #[test]
    fn rejects_extending_statically_declared_array() {
        assert!(decode_from_str("a = [1, 2]\n[[a]]\n").is_err());
    }

    #[test]
    fn rejects_extending_sealed_inline_table() {
        assert!(decode_from_str("a = { x = 1 }\n[a.y]\n").is_err());
    }

    #[test]
    fn rejects_duplicate_key_in_inline_table() {
        assert!(decode_from_str("a = { x = 1, x = 2 }\n").is_err());
    }

    #[test]
    fn decodes_inline_table_and_array_values() {
        let t = decode_from_str("point = { x = 1, y = 2 }\nlist = [1, 2, 3]\n").unwrap();
        let point = t.get("point").and_then(Value::as_table).unwrap();
        assert_eq!(point.get("x"), Some(&Value::Integer(1)));
        let list = t.get("list").and_then(Value::as_array).unwrap();
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn dotted_table_then_array_of_tables_under_it() {
        let t = decode_from_str("[fruit.physical]\ncolor = \"red\"\n[[fruit.variety]]\nname = \"x\"\n")
            .unwrap();
        let fruit = t.get("fruit").and_then(Value::as_table).unwrap();
        assert!(fruit.get("physical").is_some());
        assert_eq!(
            fruit.get("variety").and_then(Value::as_array).map(|a| a.len()),
            Some(1)
        );
    }

    #[test]
    fn rejects_statement_without_preceding_newline() {
        assert!(decode_from_str("a = 1 b = 2\n").is_err());
    }

    #[test]
    fn decodes_datetimes() {
        let t = decode_from_str("d = 1979-05-27T07:32:00Z\n").unwrap();
        assert!(matches!(t.get("d"), Some(Value::Datetime(_))));
    }

    #[test]
    fn rejects_document_level_number_glued_to_comment() {
        assert!(decode_from_str("a = 1#c\n").is_err());
    }

    #[test]
    fn rejects_time_with_too_short_a_fraction() {
        assert!(decode_from_str("t = 00:32:00.5\n").is_err());
    }
}
