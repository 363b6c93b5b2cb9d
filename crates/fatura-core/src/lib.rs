//! Core library for invoice payload normalization.
//!
//! This crate provides:
//! - Recursive key normalization (ASCII, lowercase, underscore-separated)
//! - Numeric coercion of loosely formatted amounts into minor units
//! - A lenient sanitizer producing the canonical invoice shape
//! - A strict record validator for trust boundaries
//! - An exact contract check over canonical JSON

pub mod error;
pub mod models;
pub mod normalize;

pub use error::{ContractError, FaturaError, RecordError, Result};
pub use models::config::FaturaConfig;
pub use models::invoice::{Invoice, LineItem, Party, TaxEntry};
pub use normalize::{
    as_string, assert_payload_contract, build_record, normalize_key, normalize_keys,
    normalize_payload, repair_mojibake, to_int, PayloadSanitizer,
};
