//! Payload normalization pipeline.
//!
//! Raw extraction output flows through [`normalize_keys`], then the lenient
//! [`PayloadSanitizer`], and optionally the strict [`build_record`] at trust
//! boundaries.

mod coerce;
mod contract;
mod keys;
mod mojibake;
pub mod patterns;
mod sanitizer;
mod validator;

pub use coerce::{as_string, to_int};
pub use contract::assert_payload_contract;
pub use keys::{normalize_key, normalize_keys};
pub use mojibake::repair_mojibake;
pub use sanitizer::{normalize_payload, PayloadSanitizer};
pub use validator::build_record;
