#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]
#![forbid(unsafe_code)]
#![deny(
    missing_debug_implementations,
    nonstandard_style,
    rust_2018_idioms,
    missing_docs
)]
#![warn(unreachable_pub, clippy::std_instead_of_core)]
//! A decoder and encoder for the TOML v0.5-era configuration format.
//!
//! ```
//! let table = tomlforge::decode_from_str("name = \"example\"\n").unwrap();
//! assert_eq!(table.get("name").and_then(tomlforge::Value::as_str), Some("example"));
//!
//! let text = tomlforge::encode_to_string(&table, &tomlforge::EncodeOptions::new()).unwrap();
//! assert_eq!(text, "name = \"example\"\n");
//! ```

extern crate alloc;

mod scanner;

mod datetime;
pub use datetime::{Date, LocalDatetime, Offset, OffsetDatetime, Time};

mod value;
pub use value::Value;
pub mod table;
pub use table::Table;
pub mod array;
pub use array::Array;

mod decode;
pub use decode::decode_from_str;
#[cfg(feature = "std")]
pub use decode::decode_from_reader;

mod encode;
pub use encode::{encode_to_string, EncodeOptions};
#[cfg(feature = "std")]
pub use encode::encode_to_writer;

mod error;
pub use error::{DecodeError, EncodeError, Error};
