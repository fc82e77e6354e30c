//! Shared domain types for the statute pipeline: provision trees, level
//! and country enums, stage output records, and label normalisation.

pub mod label;
pub mod provision;
pub mod record;

pub use label::{labels_match, normalize_label};
pub use provision::{
    Country, Language, Level, ProvisionNode, ProvisionPath, ProvisionTree, TreeError,
};
pub use record::{
    DELETED, MatchRecord, MatchedRecord, PREAMBLE_PATH, PREAMBLE_SKIPPED, TranslationRecord,
    error_sentinel, is_sentinel,
};
