//! Data models: configuration and extracted rows.

pub mod config;
pub mod invoice;
