//! Data models: the canonical invoice record, its schema, and configuration.

pub mod config;
pub mod invoice;
pub mod schema;
