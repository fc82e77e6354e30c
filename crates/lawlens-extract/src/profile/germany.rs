//! German statute markers (Patentgesetz layout): Abschnitt headings,
//! `§ N` articles, `(N)` paragraphs, `N.` items.

use lawlens_core::Level;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Marker, non_empty, tidy_label};

static PART: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^((?:[A-ZÄÖÜ][a-zäöüß]+\s+)?Abschnitt(?:\s+\d+)?)\s*(.*)$").unwrap()
});
static ARTICLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(§\s*\d{1,4}[a-z]?)\b\s*(.*)$").unwrap());
static PARAGRAPH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\(\d+\))\s*(.*)$").unwrap());
static ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,3})\.\s+(.*)$").unwrap());

/// Month names exclude date lines ("1. Januar 2022") from item matching.
const MONTHS: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

pub(super) fn marker(block: &str) -> Option<Marker> {
    if let Some(c) = PART.captures(block) {
        let mut m = Marker::new(Level::Part, tidy_label(&c[1], true));
        m.title = non_empty(&c[2]);
        return Some(m);
    }

    if let Some(c) = ARTICLE.captures(block) {
        let mut m = Marker::new(Level::Article, tidy_label(&c[1], true));
        m.rest = c[2].trim().to_string();
        return Some(m);
    }

    if let Some(c) = PARAGRAPH.captures(block) {
        let mut m = Marker::new(Level::Paragraph, &c[1]);
        m.rest = c[2].trim().to_string();
        return Some(m);
    }

    if let Some(c) = ITEM.captures(block) {
        let rest = c[2].trim();
        if MONTHS.iter().any(|month| rest.starts_with(month)) {
            return None;
        }
        let mut m = Marker::new(Level::Item, format!("{}.", &c[1]));
        m.rest = rest.to_string();
        return Some(m);
    }

    None
}
