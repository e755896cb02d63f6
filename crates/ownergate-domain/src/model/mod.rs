//! Identity and resource types.
//!
//! This module contains:
//! - `UserId` and the per-request `Identity`
//! - News, comments and notes
//! - Registered users

mod types;

pub use types::*;
