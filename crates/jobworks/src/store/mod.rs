//! Persistence seam shared by every area of the crate.
//!
//! Repository traits live next to the domain types they store; this module
//! only owns the error surface they share and the in-memory reference
//! implementation backing the API binary, the demo, and the tests.

pub mod memory;

use thiserror::Error;

/// Failures a backing store may report.
///
/// `Conflict` carries uniqueness violations (duplicate username, a second
/// application for the same job). `NotFound` is reserved for updates against
/// rows that no longer exist; lookups return `Option` instead.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate row")]
    Conflict,
    #[error("no such row")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
