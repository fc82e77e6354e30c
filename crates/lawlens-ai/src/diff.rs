//! Structural comparison of two translations of the same provision.
//!
//! Translations of one article should carry the same numbering markers.
//! The comparison is purely local: pull the markers out of both texts and
//! report any asymmetry. Wording differences are out of scope; two
//! translations that disagree on substance but keep the same markers
//! compare clean here.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

pub const NO_DIFFERENCE: &str = "no structural difference";

// Letter markers are single letters or short romans; longer parenthesised
// words ("(new)", "(see)") are prose, not structure.
static MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[①-⑳]|\(\d{1,2}\)|\([a-zA-Z]\)|\([ivxl]{2,4}\)|(?m)^\d{1,3}\.").unwrap()
});

/// Numbering markers in order of appearance.
pub fn structural_markers(text: &str) -> Vec<String> {
    MARKER.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// Compare the marker structure of two translations.
pub fn diff_note(a: &str, b: &str) -> String {
    let markers_a = structural_markers(a);
    let markers_b = structural_markers(b);
    if markers_a == markers_b {
        return NO_DIFFERENCE.to_string();
    }

    let only_a = multiset_difference(&markers_a, &markers_b);
    let only_b = multiset_difference(&markers_b, &markers_a);
    if only_a.is_empty() && only_b.is_empty() {
        return "same markers in different order".to_string();
    }

    let mut parts = Vec::new();
    if !only_a.is_empty() {
        parts.push(format!("only in first: {}", only_a.join(" ")));
    }
    if !only_b.is_empty() {
        parts.push(format!("only in second: {}", only_b.join(" ")));
    }
    parts.join("; ")
}

fn multiset_difference(a: &[String], b: &[String]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for m in b {
        *counts.entry(m.as_str()).or_default() += 1;
    }
    let mut out = Vec::new();
    for m in a {
        match counts.get_mut(m.as_str()) {
            Some(n) if *n > 0 => *n -= 1,
            _ => out.push(m.clone()),
        }
    }
    out
}
