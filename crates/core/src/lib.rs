//! # Enrollsync Core
//!
//! Domain types and pure scheduling logic for teacher enrollment: slot overlap
//! detection, capacity admission and enrollment validation. Nothing in this
//! crate performs I/O; persistence lives in `enrollsync-db` and the HTTP
//! boundary in `enrollsync-api`.

/// Source of "now" for notice-period checks
pub mod clock;
/// Error taxonomy shared by every layer
pub mod errors;
/// Domain data model
pub mod models;
/// Overlap detection, capacity admission and calendar expansion
pub mod scheduling;
/// Enrollment validation
pub mod validation;
