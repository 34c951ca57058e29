//! adaptcomp integration test support
//!
//! This crate holds the cross-crate scenario tests for adaptcomp along with the
//! seeded content generators they share.

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

/// Unified test utilities
///
/// Seeded content generators so that every scenario sees the same bytes on
/// every run.
pub mod test_utils;
