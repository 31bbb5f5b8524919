//! The encoder: walks a [`Table`] value tree and emits canonical TOML text.
//!
//! Grounded on `dumps`/`TOMLEncoder` in the Python encoder this format's
//! emission rules were distilled from: `is_scalar` becomes [`is_scalar`],
//! `dump_sections`'s scalars-then-subtables-then-tablearrays walk becomes
//! [`dump_sections`], `dump_value`/`dump_array`/`dump_itable`/`dump_key`
//! become their Rust namesakes below. Unlike the Python original, `Value` is
//! a closed enum, so the walk's three buckets (table, table-array, scalar)
//! are exhaustive by construction — there is no "got object of non-encodable
//! type" fallback to raise, only the table-array-element-must-be-a-table
//! check, kept as a defensive guard against a hand-built tree that doesn't
//! actually satisfy that invariant.

mod strings;

use alloc::format;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::error::EncodeError;
use crate::{Array, Table, Value};

/// A caller-supplied mapping from [`Value::None`] to an encodable
/// replacement, consulted lazily each time the walk reaches one.
type DefaultHook = Rc<dyn Fn(&Value) -> Result<Value, EncodeError>>;

/// Options controlling [`encode_to_string`]/[`encode_to_writer`].
///
/// TOML has no `null`; by default a [`Value::None`] anywhere in the tree is
/// an encode error. [`EncodeOptions::with_none_substitute`] installs a fixed
/// replacement value; [`EncodeOptions::with_default_hook`] installs a
/// general callback for callers that need something more dynamic (a
/// per-path substitute, a counter, logging). Only one of the two is ever in
/// effect — the latter call wins.
#[derive(Clone, Default)]
pub struct EncodeOptions {
    default_hook: Option<DefaultHook>,
}

impl fmt::Debug for EncodeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodeOptions")
            .field("default_hook", &self.default_hook.as_ref().map(|_| ".."))
            .finish()
    }
}

impl EncodeOptions {
    /// No substitute configured: encoding a [`Value::None`] is an error.
    pub fn new() -> Self {
        Self::default()
    }

    /// Substitute `value` for every [`Value::None`] the walk encounters.
    pub fn with_none_substitute(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self::with_default_hook(move |_| Ok(value.clone()))
    }

    /// Install a `default` hook: called with `&Value::None` each time the
    /// walk reaches one, expected to return the value to encode in its
    /// place.
    pub fn with_default_hook(
        hook: impl Fn(&Value) -> Result<Value, EncodeError> + 'static,
    ) -> Self {
        Self {
            default_hook: Some(Rc::new(hook)),
        }
    }
}

/// Encode `table` to a canonical TOML document.
pub fn encode_to_string(table: &Table, options: &EncodeOptions) -> Result<String, EncodeError> {
    let mut out = String::new();
    dump_sections(options, &mut out, table, &[], false)?;
    Ok(out)
}

/// Encode `table` to a canonical TOML document, writing it to `writer`.
#[cfg(feature = "std")]
pub fn encode_to_writer<W: std::io::Write>(
    table: &Table,
    mut writer: W,
    options: &EncodeOptions,
) -> Result<(), EncodeError> {
    let text = encode_to_string(table, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| EncodeError::new(format!("I/O error: {e}")))
}

/// `true` if `v` is emittable on the right-hand side of an inline
/// assignment, rather than needing a `[section]`/`[[section]]` of its own.
///
/// `can_tarray` is `false` when checking whether one element, on its own,
/// forces its containing array to render as a scalar (an inline array or
/// inline table) rather than as a sequence of `[[section]]`s; it is `true`
/// only for the top-level classification of a table's own field, where an
/// array of tables is allowed to become a table-array instead.
fn is_scalar(v: &Value, can_tarray: bool) -> bool {
    match v {
        Value::Table(_) => false,
        Value::Array(items) => {
            if items.is_empty() {
                return true;
            }
            if items.iter().any(|i| is_scalar(i, false)) {
                return true;
            }
            if can_tarray {
                false
            } else {
                // A list of tables nested under another array can't become
                // a `[[section]]` (there's nowhere to put the header), so it
                // is forced into inline-table-per-element scalar form.
                items.iter().any(|i| matches!(i, Value::Table(_)))
            }
        }
        _ => true,
    }
}

/// Emit the scalar value `v` on the right-hand side of an assignment (or as
/// an array/inline-table element). The hook, if any, is invoked here, lazily
/// — the first and only time the walk actually needs a replacement for
/// [`Value::None`].
fn dump_value(options: &EncodeOptions, v: &Value, path: &[String]) -> Result<String, EncodeError> {
    match v {
        Value::String(s) => Ok(strings::encode_string(s, true)),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(dump_float(*f)),
        Value::Boolean(b) => Ok(if *b { "true" } else { "false" }.to_string()),
        Value::Datetime(dt) => Ok(dt.to_string()),
        Value::LocalDatetime(dt) => Ok(dt.to_string()),
        Value::Date(d) => Ok(d.to_string()),
        Value::Time(t) => Ok(t.to_string()),
        Value::Array(a) => dump_array(options, a, path),
        Value::Table(t) => dump_inline_table(options, t, path),
        Value::None => {
            let substitute = options
                .default_hook
                .as_ref()
                .ok_or_else(|| {
                    EncodeError::at_path(
                        "cannot encode a `None` value without a substitute configured",
                        path.to_vec(),
                    )
                })?(&Value::None)?;
            dump_value(options, &substitute, path)
        }
    }
}

fn dump_array(options: &EncodeOptions, a: &Array, path: &[String]) -> Result<String, EncodeError> {
    let mut parts = Vec::with_capacity(a.len());
    for v in a.iter() {
        parts.push(dump_value(options, v, path)?);
    }
    Ok(format!("[{}]", parts.join(", ")))
}

fn dump_inline_table(
    options: &EncodeOptions,
    t: &Table,
    path: &[String],
) -> Result<String, EncodeError> {
    if t.is_empty() {
        return Ok("{}".to_string());
    }
    let mut parts = Vec::with_capacity(t.len());
    for (k, v) in t.iter() {
        let mut child_path = path.to_vec();
        child_path.push(k.to_string());
        parts.push(format!(
            "{} = {}",
            dump_key(k),
            dump_value(options, v, &child_path)?
        ));
    }
    Ok(format!("{{ {} }}", parts.join(", ")))
}

fn dump_key(k: &str) -> String {
    if !k.is_empty() && k.chars().all(is_bare_key_char) {
        k.to_string()
    } else {
        strings::encode_string(k, false)
    }
}

fn is_bare_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Format an `f64` as a TOML float literal. Rust's own `Display` for `f64`
/// omits the decimal point for whole numbers (`1` rather than `1.0`), which
/// TOML's grammar would then read back as an integer — so a trailing `.0`
/// is added whenever neither a fractional part nor an exponent is present.
/// Magnitudes far from 1 switch to exponential form so the literal doesn't
/// balloon into hundreds of digits; `{:e}`'s mantissa/exponent split never
/// zero-pads the exponent, satisfying the "no leading zero" rule for free.
fn dump_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if f == 0.0 {
        return if f.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }
    let abs = f.abs();
    if (1e-4..1e16).contains(&abs) {
        let mut s = format!("{f}");
        if !s.contains('.') {
            s.push_str(".0");
        }
        s
    } else {
        format!("{f:e}")
    }
}

/// Recursively emit `table` at dotted path `path`. `is_tarray` is `true`
/// when `table` is one element of a `[[path]]` table-array, which forces a
/// header even when the table has no scalar fields of its own.
///
/// The walk order is fixed by spec: a header line (if warranted), then
/// every scalar-like field in insertion order, then every subtable child
/// recursively, then every table-array child recursively. Since
/// [`is_scalar`] and `Value::Table`/`Value::Array` partition a table's
/// fields exhaustively, nothing is ever left unvisited.
fn dump_sections(
    options: &EncodeOptions,
    out: &mut String,
    table: &Table,
    path: &[String],
    is_tarray: bool,
) -> Result<(), EncodeError> {
    let has_scalar_field = table.iter().any(|(_, v)| is_scalar(v, true));
    if !path.is_empty() && (has_scalar_field || is_tarray || table.is_empty()) {
        ensure_blank_line(out);
        out.push_str(if is_tarray { "[[" } else { "[" });
        let header: Vec<String> = path.iter().map(|k| dump_key(k)).collect();
        out.push_str(&header.join("."));
        out.push_str(if is_tarray { "]]\n" } else { "]\n" });
    }

    for (k, v) in table.iter() {
        if is_scalar(v, true) {
            let mut child_path = path.to_vec();
            child_path.push(k.to_string());
            out.push_str(&dump_key(k));
            out.push_str(" = ");
            out.push_str(&dump_value(options, v, &child_path)?);
            out.push('\n');
        }
    }

    for (k, v) in table.iter() {
        if let Value::Table(child) = v {
            let mut child_path = path.to_vec();
            child_path.push(k.to_string());
            dump_sections(options, out, child, &child_path, false)?;
        }
    }

    for (k, v) in table.iter() {
        if let Value::Array(items) = v {
            if !is_scalar(v, true) {
                let mut child_path = path.to_vec();
                child_path.push(k.to_string());
                for item in items.iter() {
                    match item {
                        Value::Table(t) => dump_sections(options, out, t, &child_path, true)?,
                        _ => {
                            return Err(EncodeError::at_path(
                                "table-array element is not a table",
                                child_path,
                            ))
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

fn ensure_blank_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with("\n\n") {
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(table: &Table) -> String {
        encode_to_string(table, &EncodeOptions::new()).unwrap()
    }

    #[test]
    fn encodes_flat_scalar() {
        let mut t = Table::new();
        t.insert("x", 5i64);
        assert_eq!(encode(&t), "x = 5\n");
    }

    #[test]
    fn encodes_nested_table_as_section() {
        let t = crate::decode_from_str("[a]\nx = 1\n").unwrap();
        assert_eq!(encode(&t), "[a]\nx = 1\n");
    }

    #[test]
    fn elides_header_for_implicit_intermediate_table() {
        let t = crate::decode_from_str("[a.b]\nx = 1\n").unwrap();
        assert_eq!(encode(&t), "[a.b]\nx = 1\n");
    }

    #[test]
    fn encodes_table_array() {
        let t = crate::decode_from_str("[[t]]\nv = 1\n[[t]]\nv = 2\n").unwrap();
        assert_eq!(encode(&t), "[[t]]\nv = 1\n\n[[t]]\nv = 2\n");
    }

    #[test]
    fn encodes_inline_array_of_scalars() {
        let mut t = Table::new();
        t.insert("a", Array::from_iter([1i64, 2, 3]));
        assert_eq!(encode(&t), "a = [1, 2, 3]\n");
    }

    #[test]
    fn float_gets_trailing_zero() {
        let mut t = Table::new();
        t.insert("f", 1.0f64);
        assert_eq!(encode(&t), "f = 1.0\n");
    }

    #[test]
    fn none_without_substitute_is_an_error() {
        let mut t = Table::new();
        t.insert("a", Value::None);
        assert!(encode_to_string(&t, &EncodeOptions::new()).is_err());
    }

    #[test]
    fn none_substitute_replaces_value() {
        let mut t = Table::new();
        t.insert("a", Value::None);
        let opts = EncodeOptions::with_none_substitute(0i64);
        assert_eq!(encode_to_string(&t, &opts).unwrap(), "a = 0\n");
    }

    #[test]
    fn bare_key_kept_plain_but_odd_key_is_quoted() {
        let mut t = Table::new();
        t.insert("plain_key", 1i64);
        t.insert("odd key!", 2i64);
        let out = encode(&t);
        assert!(out.contains("plain_key = 1\n"));
        assert!(out.contains("'odd key!' = 2\n"));
    }

    #[test]
    fn offset_zero_collapses_to_z_on_encode() {
        let t = crate::decode_from_str("d = 1979-05-27T00:00:00+00:00\n").unwrap();
        assert_eq!(encode(&t), "d = 1979-05-27T00:00:00Z\n");
    }

    #[test]
    fn array_of_tables_nested_in_array_forces_inline() {
        // A table-array can only be represented as `[[section]]` at the top
        // of its own field; nested one level deeper inside another array,
        // it has nowhere to put a header and must render as inline tables.
        let mut inner_a = Table::new();
        inner_a.insert("x", 1i64);
        let mut inner_b = Table::new();
        inner_b.insert("x", 2i64);
        let nested = Array::from_iter([Value::Table(inner_a), Value::Table(inner_b)]);
        let mut outer = Array::new();
        outer.push(nested);
        let mut t = Table::new();
        t.insert("m", outer);
        assert_eq!(encode(&t), "m = [[{ x = 1 }, { x = 2 }]]\n");
    }
}
