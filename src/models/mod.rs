//! Core data models for JTools.

mod ids;
mod lottery;
mod ranking;
mod time_range;
mod tool;

pub use ids::*;
pub use lottery::*;
pub use ranking::*;
pub use time_range::*;
pub use tool::*;
