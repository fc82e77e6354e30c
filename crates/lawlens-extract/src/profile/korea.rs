//! Korean statute markers: 편/장/절/조/항/호/목.
//!
//! An article marker only counts when the block-leading `제N조` is followed
//! by a parenthesised title or `삭제`; in-body references such as
//! "제55조제1항에 따른" never start a block and are left in the text.

use lawlens_core::Level;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{Marker, non_empty, strip_history_tags, tidy_label};

static PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(제\s*\d+\s*편(?:의\s*\d+)?)\s+(.+)$").unwrap());
static CHAPTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(제\s*\d+\s*장(?:의\s*\d+)?)\s+(.+)$").unwrap());
static SECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(제\s*\d+\s*절(?:의\s*\d+)?)\s+(.+)$").unwrap());
static ARTICLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(제\s*\d+\s*조(?:의\s*\d+)?)\s*(?:\(([^)]*)\)|(삭제))\s*(.*)$").unwrap()
});
static PARAGRAPH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([①-⑳])\s*(.*)$").unwrap());
static ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^((?:제\s*)?\d{1,3}(?:\.|호))\s*(.*)$").unwrap());
static SUB_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([가-힣])(?:\.|목)\s+(.*)$").unwrap());

pub(super) fn marker(block: &str) -> Option<Marker> {
    for (level, re) in [
        (Level::Part, &PART),
        (Level::Chapter, &CHAPTER),
        (Level::Section, &SECTION),
    ] {
        if let Some(c) = re.captures(block) {
            let mut m = Marker::new(level, tidy_label(&c[1], false));
            m.title = non_empty(&strip_history_tags(&c[2]));
            return Some(m);
        }
    }

    if let Some(c) = ARTICLE.captures(block) {
        let mut m = Marker::new(Level::Article, tidy_label(&c[1], false));
        if c.get(3).is_some() {
            m.deleted = true;
        } else {
            m.title = c.get(2).and_then(|t| non_empty(&strip_history_tags(t.as_str())));
        }
        m.rest = strip_history_tags(c.get(4).map_or("", |r| r.as_str()));
        return Some(m);
    }

    if let Some(c) = PARAGRAPH.captures(block) {
        let mut m = Marker::new(Level::Paragraph, &c[1]);
        m.rest = c[2].trim().to_string();
        return Some(m);
    }

    if let Some(c) = ITEM.captures(block) {
        let mut m = Marker::new(Level::Item, tidy_label(&c[1], false));
        m.rest = c[2].trim().to_string();
        return Some(m);
    }

    if let Some(c) = SUB_ITEM.captures(block) {
        let mut m = Marker::new(Level::SubItem, format!("{}.", &c[1]));
        m.rest = c[2].trim().to_string();
        return Some(m);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_with_title() {
        let m = marker("제1조(목적) 이 법은 발명을 보호한다.").unwrap();
        assert_eq!(m.level, Level::Article);
        assert_eq!(m.label, "제1조");
        assert_eq!(m.title.as_deref(), Some("목적"));
        assert_eq!(m.rest, "이 법은 발명을 보호한다.");
        assert!(!m.deleted);
    }

    #[test]
    fn article_with_insertion_suffix() {
        let m = marker("제2조의2(기본이념) 본문").unwrap();
        assert_eq!(m.label, "제2조의2");
    }

    #[test]
    fn deleted_article() {
        let m = marker("제5조 삭제").unwrap();
        assert_eq!(m.level, Level::Article);
        assert!(m.deleted);
        assert!(m.title.is_none());
    }

    #[test]
    fn bare_article_reference_is_not_a_marker() {
        // No parenthesised title and no 삭제: not an article start.
        assert!(marker("제55조제1항에 따른 특허출원").is_none());
    }

    #[test]
    fn history_tag_removed_from_title() {
        let m = marker("제3조(정의 <개정 2024. 1. 9.>) 본문").unwrap();
        assert_eq!(m.title.as_deref(), Some("정의"));
    }

    #[test]
    fn circled_digit_paragraph() {
        let m = marker("② 둘째 항 내용").unwrap();
        assert_eq!(m.level, Level::Paragraph);
        assert_eq!(m.label, "②");
        assert_eq!(m.rest, "둘째 항 내용");
    }

    #[test]
    fn numbered_item_forms() {
        let dot = marker("1. 첫 번째 호").unwrap();
        assert_eq!(dot.level, Level::Item);
        assert_eq!(dot.label, "1.");

        let ho = marker("제2호 두 번째 호").unwrap();
        assert_eq!(ho.level, Level::Item);
        assert_eq!(ho.label, "제2호");
    }

    #[test]
    fn hangul_sub_item() {
        let m = marker("가. 세부 목").unwrap();
        assert_eq!(m.level, Level::SubItem);
        assert_eq!(m.label, "가.");
        assert_eq!(m.rest, "세부 목");
    }

    #[test]
    fn chapter_heading() {
        let m = marker("제1장 총칙").unwrap();
        assert_eq!(m.level, Level::Chapter);
        assert_eq!(m.label, "제1장");
        assert_eq!(m.title.as_deref(), Some("총칙"));
    }

    #[test]
    fn plain_body_text_is_no_marker() {
        assert!(marker("특허권의 존속기간은 설정등록일부터 20년으로 한다").is_none());
    }
}
