//! Corpus-style round-trip and rejection tests against the literal
//! scenarios and testable properties this codec is specified against.

use tomlforge::{decode_from_str, encode_to_string, EncodeOptions, Value};

#[test]
fn scenario_flat_integer() {
    let table = decode_from_str("x = 5\n").unwrap();
    assert_eq!(table.get("x"), Some(&Value::Integer(5)));
    assert_eq!(
        encode_to_string(&table, &EncodeOptions::new()).unwrap(),
        "x = 5\n"
    );
}

#[test]
fn scenario_escaped_quote_in_basic_string() {
    let table = decode_from_str(r#"a = "he said \"hi\"""#).unwrap();
    assert_eq!(table.get("a").and_then(Value::as_str), Some("he said \"hi\""));
    // Re-encoding and re-decoding must agree with the original value,
    // regardless of which literal form the encoder chose.
    let text = encode_to_string(&table, &EncodeOptions::new()).unwrap();
    assert_eq!(decode_from_str(&text).unwrap(), table);
}

#[test]
fn scenario_duplicate_table_header_reports_correct_line() {
    let err = decode_from_str("[s]\nk = 1\n[s]\nk = 2\n").unwrap_err();
    assert!(err.message().contains("redefined") || err.message().contains("duplicat"));
    assert_eq!(err.line(), 3);
}

#[test]
fn scenario_mixed_type_array_is_rejected() {
    let err = decode_from_str("a = [1, \"x\"]\n").unwrap_err();
    assert!(err.message().contains("mixed type"));
}

#[test]
fn scenario_table_array_round_trips() {
    let table = decode_from_str("[[t]]\nv = 1\n[[t]]\nv = 2\n").unwrap();
    let arr = table.get("t").and_then(Value::as_array).unwrap();
    assert_eq!(arr.len(), 2);
    let text = encode_to_string(&table, &EncodeOptions::new()).unwrap();
    assert_eq!(decode_from_str(&text).unwrap(), table);
}

#[test]
fn scenario_line_continuation_in_multiline_string() {
    let table = decode_from_str("s = \"\"\"\\\n    foo\"\"\"\n").unwrap();
    assert_eq!(table.get("s").and_then(Value::as_str), Some("foo"));
}

#[test]
fn scenario_string_starting_with_newline_round_trips() {
    let table = decode_from_str("s = \"\\nfoo\"\n").unwrap();
    assert_eq!(table.get("s").and_then(Value::as_str), Some("\nfoo"));
    let text = encode_to_string(&table, &EncodeOptions::new()).unwrap();
    assert_eq!(decode_from_str(&text).unwrap(), table);
}

#[test]
fn scenario_encode_none_requires_substitute() {
    let mut table = tomlforge::Table::new();
    table.insert("a", Value::None);
    assert!(encode_to_string(&table, &EncodeOptions::new()).is_err());

    let opts = EncodeOptions::with_none_substitute(0i64);
    assert_eq!(encode_to_string(&table, &opts).unwrap(), "a = 0\n");
}

#[test]
fn key_uniqueness_is_enforced_in_every_table() {
    assert!(decode_from_str("a = 1\na = 2\n").is_err());
    assert!(decode_from_str("[t]\na = 1\na = 2\n").is_err());
    assert!(decode_from_str("t = { a = 1, a = 2 }\n").is_err());
}

#[test]
fn array_homogeneity_is_enforced_for_direct_scalar_arrays() {
    assert!(decode_from_str("a = [1, 2, 3]\n").is_ok());
    assert!(decode_from_str("a = [1, 2.0]\n").is_err());
    assert!(decode_from_str("a = [[1, 2], [\"a\", \"b\"]]\n").is_ok());
}

#[test]
fn extension_of_statically_declared_array_is_rejected() {
    let err = decode_from_str("a = [1, 2]\n[[a]]\n").unwrap_err();
    assert!(!err.message().is_empty());
}

#[test]
fn table_redefinition_allows_deeper_header_but_not_same_one() {
    assert!(decode_from_str("[a]\n[a]\n").is_err());
    assert!(decode_from_str("[a.b]\n[a]\nx = 1\n").is_ok());
}

#[test]
fn position_points_at_or_after_the_offending_construct() {
    let src = "good = 1\nbad = [1, \"two\"]\n";
    let err = decode_from_str(src).unwrap_err();
    assert_eq!(err.line(), 2);
}

#[test]
fn full_corpus_round_trips() {
    let src = r#"
title = "example"
ints = [1, 2, -3]
floats = [1.0, -2.5, 1e10]
bools = [true, false]
strs = ["hello", 'world', """multi
line""", '''raw
multi''']
local_date = 1979-05-27
offset_datetime = 1979-05-27T07:32:00Z
local_datetime = 1979-05-27T07:32:00
local_time = 07:32:00
nested_array = [[1, 2], [3, 4]]
inline = { x = 1, y = { z = 2 } }

[table]
a = 1

[table.sub]
b = 2

[[array_of_tables]]
name = "one"

[[array_of_tables]]
name = "two"
"#;
    let decoded = decode_from_str(src).unwrap();
    let text = encode_to_string(&decoded, &EncodeOptions::new()).unwrap();
    let redecoded = decode_from_str(&text).unwrap();
    assert_eq!(decoded, redecoded);
}
