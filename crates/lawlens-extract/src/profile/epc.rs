//! European Patent Convention layout: Part/Chapter/Article with
//! parenthesised paragraph and item markers. Article headings sit on the
//! line after the marker; the extractor picks those up separately.

use lawlens_core::Level;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Marker, non_empty, tidy_label};

static PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(PART\s+[IVX]+)\b\s*(.*)$").unwrap());
static CHAPTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(Chapter\s+[IVX0-9]+)\b\s*(.*)$").unwrap());
// Up to four digits: PDF line joins can glue article numbers together
// ("Article 169196"), which must not be taken for a marker.
static ARTICLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^((?:Article|Rule)\s+\d{1,4}[a-z]?)\b\s*(.*)$").unwrap());
static PARAGRAPH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\(\d+\))\s*(.*)$").unwrap());
// Excludes i and v so single-letter romans fall through to SubItem.
static ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\([a-hj-uw-z]\))\s*(.*)$").unwrap());
static SUB_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\([ivxlcdm]+\))\s*(.*)$").unwrap());

pub(super) fn marker(block: &str) -> Option<Marker> {
    for (level, re) in [(Level::Part, &PART), (Level::Chapter, &CHAPTER)] {
        if let Some(c) = re.captures(block) {
            let mut m = Marker::new(level, tidy_label(&c[1], true));
            m.title = non_empty(&c[2]);
            return Some(m);
        }
    }

    if let Some(c) = ARTICLE.captures(block) {
        let mut m = Marker::new(Level::Article, tidy_label(&c[1], true));
        // Trailing text on the marker line is cross-reference noise
        // ("Art. 79, 149"), not a heading; headings follow on their own line.
        m.rest = String::new();
        let trailing = c[2].trim();
        if trailing.eq_ignore_ascii_case("(deleted)") || trailing.eq_ignore_ascii_case("(repealed)")
        {
            m.deleted = true;
        }
        return Some(m);
    }

    for (level, re) in [
        (Level::Paragraph, &PARAGRAPH),
        (Level::Item, &ITEM),
        (Level::SubItem, &SUB_ITEM),
    ] {
        if let Some(c) = re.captures(block) {
            let mut m = Marker::new(level, &c[1]);
            m.rest = c[2].trim().to_string();
            return Some(m);
        }
    }

    None
}
