//! Taiwanese statute markers: 編/章/節 headings with CJK numerals,
//! 第N條 articles, CJK-numeral 一、 enumerations.

use lawlens_core::Level;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Marker, non_empty, tidy_label};

const CJK_NUM: &str = r"(?:\d+|[一二三四五六七八九十百千]+)";

static PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^(第\s*{CJK_NUM}\s*編)\s*(.*)$")).unwrap());
static CHAPTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^(第\s*{CJK_NUM}\s*章(?:\s*之\s*{CJK_NUM})?)\s*(.*)$")).unwrap());
static SECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^(第\s*{CJK_NUM}\s*節)\s*(.*)$")).unwrap());
static ARTICLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(第\s*{CJK_NUM}\s*條(?:\s*之\s*{CJK_NUM})?)\s*(?:（([^）]*)）|\(([^)]*)\))?\s*(.*)$"
    ))
    .unwrap()
});
static ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([一二三四五六七八九十]+)、\s*(.*)$").unwrap());

pub(super) fn marker(block: &str) -> Option<Marker> {
    for (level, re) in [
        (Level::Part, &PART),
        (Level::Chapter, &CHAPTER),
        (Level::Section, &SECTION),
    ] {
        if let Some(c) = re.captures(block) {
            let mut m = Marker::new(level, tidy_label(&c[1], false));
            m.title = non_empty(&c[2]);
            return Some(m);
        }
    }

    if let Some(c) = ARTICLE.captures(block) {
        let mut m = Marker::new(Level::Article, tidy_label(&c[1], false));
        m.title = c
            .get(2)
            .or_else(|| c.get(3))
            .and_then(|t| non_empty(t.as_str()));
        // A parenthesised 刪除 is the deletion mark, not a heading.
        if m.title.as_deref() == Some("刪除") {
            m.title = None;
            m.deleted = true;
        }
        let rest = c.get(4).map_or("", |r| r.as_str()).trim();
        if rest == "刪除" {
            m.deleted = true;
        } else {
            m.rest = rest.to_string();
        }
        return Some(m);
    }

    if let Some(c) = ITEM.captures(block) {
        let mut m = Marker::new(Level::Item, format!("{}、", &c[1]));
        m.rest = c[2].trim().to_string();
        return Some(m);
    }

    None
}
