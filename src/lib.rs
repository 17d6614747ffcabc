//! # JTools
//!
//! Small data tools for the Jianshu community, served over HTTP.
//!
//! ## Architecture
//!
//! - **models**: Record types, award names, the tool registry
//! - **storage**: JSONL data lake reads (ranking and lottery records)
//! - **calculate**: LP recommendation cooldown, ranking and lottery statistics
//! - **scheme**: Web URL to app URL-scheme conversion
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod scheme;
pub mod storage;

pub use models::*;
