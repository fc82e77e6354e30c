//! US Code markers (Title 35 layout): PART/CHAPTER headings, `§ N.` section
//! lines with inline headings, lettered subsections.

use lawlens_core::Level;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Marker, non_empty, tidy_label};

static PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(PART\s+[IVX]+)\b\s*[—-]?\s*(.*)$").unwrap());
static CHAPTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(CHAPTER\s+\d+)\b\s*[—-]?\s*(.*)$").unwrap());
// Inline heading required after the section number. A bare "§ 102" mid-text
// is a cross-reference, not a section start.
static ARTICLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(§\s*\d{1,4}[a-zA-Z]?(?:-\d+[a-zA-Z]?)?)\.?\s+(.+)$").unwrap()
});
static PARAGRAPH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\([a-hj-uw-z]\))\s*(.*)$").unwrap());
static ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\(\d+\))\s*(.*)$").unwrap());
static SUB_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\([A-Z]\))\s*(.*)$").unwrap());

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
        let heading = c[2].trim();
        if heading.eq_ignore_ascii_case("[repealed]")
            || heading.eq_ignore_ascii_case("repealed")
        {
            m.deleted = true;
        } else {
            // Drop trailing editorial brackets ("Conditions… [Repealed]").
            m.title = non_empty(heading.split('[').next().unwrap_or(heading));
            if heading.to_ascii_lowercase().contains("[repealed]") {
                m.deleted = true;
            }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_with_heading() {
        let m = marker("§ 101. Inventions patentable").unwrap();
        assert_eq!(m.level, Level::Article);
        assert_eq!(m.label, "§ 101");
        assert_eq!(m.title.as_deref(), Some("Inventions patentable"));
    }

    #[test]
    fn hyphenated_section_number() {
        let m = marker("§ 292-1. False marking continuation").unwrap();
        assert_eq!(m.label, "§ 292-1");
    }

    #[test]
    fn repealed_section() {
        let m = marker("§ 104. [Repealed]").unwrap();
        assert!(m.deleted);

        let with_heading = marker("§ 293. Nonresident patentee [Repealed]").unwrap();
        assert!(with_heading.deleted);
        assert_eq!(with_heading.title.as_deref(), Some("Nonresident patentee"));
    }

    #[test]
    fn bare_reference_is_not_a_marker() {
        assert!(marker("§ 102").is_none());
    }

    #[test]
    fn subsection_levels() {
        assert_eq!(marker("(a) NOVELTY.—A person shall be entitled").unwrap().level, Level::Paragraph);
        assert_eq!(marker("(1) the claimed invention was patented").unwrap().level, Level::Item);
        assert_eq!(marker("(A) the subject matter disclosed").unwrap().level, Level::SubItem);
    }

    #[test]
    fn part_and_chapter_headings() {
        let p = marker("PART II—PATENTABILITY OF INVENTIONS").unwrap();
        assert_eq!(p.level, Level::Part);
        assert_eq!(p.title.as_deref(), Some("PATENTABILITY OF INVENTIONS"));

        let c = marker("CHAPTER 10—PATENTABILITY OF INVENTIONS").unwrap();
        assert_eq!(c.level, Level::Chapter);
        assert_eq!(c.label, "CHAPTER 10");
    }
}
