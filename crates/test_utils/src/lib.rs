//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! rental booking test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for cars, documents and dates
//! - `builders`: Builder patterns for booking drafts and sessions
//! - `doubles`: In-memory transport and recording challenge widget
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod doubles;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use doubles::*;
pub use assertions::*;
pub use generators::*;
