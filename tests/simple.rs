//! A smoke test against a realistic `Cargo.toml`, in the spirit of the
//! teacher crate's own `tests/simple.rs`.

#[test]
fn simple_cargo_toml() {
    let cargo_toml = r#"
        [package]
        name = "example"
        version = "0.1.0"
        edition = "2021"

        [dependencies]
        serde = { version = "1.0", features = ["derive"] }
        regex = "1.5"

        [features]
        default = ["serde"]
    "#;

    let table = tomlforge::decode_from_str(cargo_toml).expect("valid TOML");

    let package = table.get("package").and_then(tomlforge::Value::as_table).unwrap();
    assert_eq!(package.get("name").and_then(tomlforge::Value::as_str), Some("example"));
    assert_eq!(package.get("edition").and_then(tomlforge::Value::as_str), Some("2021"));

    let dependencies = table
        .get("dependencies")
        .and_then(tomlforge::Value::as_table)
        .unwrap();
    assert_eq!(
        dependencies.get("regex").and_then(tomlforge::Value::as_str),
        Some("1.5")
    );
    let serde_dep = dependencies.get("serde").and_then(tomlforge::Value::as_table).unwrap();
    assert_eq!(
        serde_dep.get("version").and_then(tomlforge::Value::as_str),
        Some("1.0")
    );

    let features = table.get("features").and_then(tomlforge::Value::as_table).unwrap();
    let default_features = features.get("default").and_then(tomlforge::Value::as_array).unwrap();
    assert_eq!(default_features.len(), 1);

    // Re-encoding and re-decoding must reproduce the same tree.
    let text = tomlforge::encode_to_string(&table, &tomlforge::EncodeOptions::new()).unwrap();
    let roundtripped = tomlforge::decode_from_str(&text).unwrap();
    assert_eq!(table, roundtripped);
}
