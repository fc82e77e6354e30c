//! Country-specific level-marker pattern tables.
//!
//! One module per jurisdiction. Each exposes a single `marker` function
//! that tests a text block against the country's patterns, outermost level
//! first, and reports the first hit. The extractor never needs to know
//! which country it is working on beyond dispatching here; the enum match
//! keeps the profile set closed and exhaustiveness compiler-checked.

mod epc;
mod germany;
mod korea;
mod taiwan;
mod usa;

use lawlens_core::{Country, Level};

/// A recognised level marker at the start of a text block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub level: Level,
    /// Native marker text, whitespace-normalised ("제3조", "Article 5", "§ 2").
    pub label: String,
    /// Heading captured on the marker block itself, when the format puts
    /// it there.
    pub title: Option<String>,
    /// Body text trailing the marker on the same block.
    pub rest: String,
    /// The source marks this provision as deleted or repealed.
    pub deleted: bool,
}

impl Marker {
    pub(crate) fn new(level: Level, label: impl Into<String>) -> Self {
        Self {
            level,
            label: label.into(),
            title: None,
            rest: String::new(),
            deleted: false,
        }
    }
}

/// Match a block against the country's ordered pattern table.
pub fn match_marker(country: Country, block: &str) -> Option<Marker> {
    match country {
        Country::Korea => korea::marker(block),
        Country::Epc => epc::marker(block),
        Country::Germany => germany::marker(block),
        Country::Usa => usa::marker(block),
        Country::Taiwan => taiwan::marker(block),
    }
}

/// Whether the format places article headings on the block after the
/// marker instead of on the marker block itself.
pub fn title_on_next_line(country: Country) -> bool {
    matches!(country, Country::Epc)
}

/// Collapse runs of whitespace inside a marker label ("제 3 조" → "제3조"
/// for CJK labels, "§  2" → "§ 2" for western ones).
pub(crate) fn tidy_label(label: &str, keep_single_spaces: bool) -> String {
    if keep_single_spaces {
        label.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        label.chars().filter(|c| !c.is_whitespace()).collect()
    }
}

/// Strip trailing amendment-history tags like `<개정 2024. 1. 9.>`.
pub(crate) fn strip_history_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut depth = 0usize;
    for c in s.chars() {
        match c {
            '<' => depth += 1,
            '>' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out.trim().to_string()
}

pub(crate) fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() { None } else { Some(t.to_string()) }
}
