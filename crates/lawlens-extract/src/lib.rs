//! Statute structure extraction.
//!
//! Turns a source document (PDF, German gazette XML, or plain text) into a
//! [`lawlens_core::ProvisionTree`] using per-country marker pattern tables.

pub mod error;
pub mod extractor;
pub mod loader;
pub mod profile;

pub use error::ExtractError;
pub use extractor::{extract, extract_file};
pub use loader::{load_blocks, parse_german_xml, split_lines};
pub use profile::{Marker, match_marker};
