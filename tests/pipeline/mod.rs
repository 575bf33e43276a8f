//! End-to-end tests
//!
//! Whole builds over on-disk projects:
//! - Graph loading, config folding and plugin planning together
//! - Output files written through the disk host
//! - Properties that hold across the whole pipeline

pub mod tests_build;
pub mod tests_properties;
