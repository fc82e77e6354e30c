//! Block stream to provision tree.
//!
//! A single forward pass over the loaded blocks drives a stack of open
//! nodes. A marker at level L closes every open node at level >= L, then
//! opens a new node under whatever remains on the stack. Levels that a
//! document never uses are simply absent; a paragraph marker arriving
//! directly after an article nests under the article, and an item marker
//! with no open paragraph does the same. Unmarked blocks append to the
//! body of the innermost open node, or to the preamble when nothing is
//! open yet.

use std::path::Path;

use lawlens_core::{Country, DELETED, Level, ProvisionNode, ProvisionTree};
use tracing::{debug, info, warn};

use crate::error::ExtractError;
use crate::loader::load_blocks;
use crate::profile::{Marker, match_marker, title_on_next_line};

/// Load a source document and extract its provision tree.
pub fn extract_file(country: Country, path: &Path) -> Result<ProvisionTree, ExtractError> {
    let blocks = load_blocks(path)?;
    let tree = extract(country, &blocks)?;
    info!(
        country = %country,
        path = %path.display(),
        provisions = tree.node_count(),
        articles = tree.articles().len(),
        "extracted provision structure"
    );
    Ok(tree)
}

/// Build the provision tree for one document from its ordered blocks.
pub fn extract(country: Country, blocks: &[String]) -> Result<ProvisionTree, ExtractError> {
    let mut tree = ProvisionTree::new(country);
    let mut stack: Vec<ProvisionNode> = Vec::new();
    let mut preamble = String::new();
    let mut awaiting_title = false;

    for block in blocks {
        match match_marker(country, block) {
            Some(marker) => {
                awaiting_title = title_on_next_line(country)
                    && marker.level <= Level::Article
                    && marker.title.is_none()
                    && !marker.deleted;
                open_node(&mut tree, &mut stack, marker);
            }
            None => {
                if awaiting_title {
                    awaiting_title = false;
                    if looks_like_title(block) {
                        if let Some(top) = stack.last_mut() {
                            top.title = Some(block.clone());
                        }
                        continue;
                    }
                }
                match stack.last_mut() {
                    Some(top) => {
                        if top.body != DELETED {
                            append_body(&mut top.body, block);
                        }
                    }
                    None => append_body(&mut preamble, block),
                }
            }
        }
    }

    while let Some(done) = stack.pop() {
        attach(&mut tree, &mut stack, done);
    }
    tree.preamble = preamble;

    let articles = tree.articles().len();
    if articles == 0 {
        return Err(ExtractError::UnrecognizedStructure {
            country: country.to_string(),
        });
    }
    debug!(articles, "article markers recognised");

    if let Err(err) = tree.validate() {
        // Some gazettes genuinely repeat labels; keep the tree but flag it.
        warn!(%err, "extracted tree failed validation");
    }

    Ok(tree)
}

fn open_node(tree: &mut ProvisionTree, stack: &mut Vec<ProvisionNode>, marker: Marker) {
    while stack.last().is_some_and(|top| top.level >= marker.level) {
        if let Some(done) = stack.pop() {
            attach(tree, stack, done);
        }
    }

    let mut node = ProvisionNode::new(marker.level, marker.label);
    node.title = marker.title;
    if marker.deleted {
        node.body = DELETED.to_string();
    } else {
        node.body = marker.rest;
    }
    stack.push(node);
}

/// Move a finished node under the innermost open node, or to the tree root.
fn attach(tree: &mut ProvisionTree, stack: &mut [ProvisionNode], node: ProvisionNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => tree.children.push(node),
    }
}

fn append_body(body: &mut String, block: &str) {
    if !body.is_empty() {
        body.push('\n');
    }
    body.push_str(block);
}

/// Heuristic for article headings that sit on their own line after the
/// marker. Headings are short, mostly alphabetic, and never open with a
/// parenthesised sub-marker.
fn looks_like_title(block: &str) -> bool {
    let t = block.trim();
    if t.len() < 3 || t.len() >= 100 || t.starts_with('(') {
        return false;
    }
    let alpha = t.chars().filter(|c| c.is_alphabetic()).count();
    let total = t.chars().filter(|c| !c.is_whitespace()).count();
    total > 0 && alpha * 2 >= total
}

#[cfg(test)]
mod tests {
    use super::*;
    use lawlens_core::ProvisionPath;

    fn blocks(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn korean_article_with_two_paragraphs() {
        let tree = extract(
            Country::Korea,
            &blocks(&[
                "제1조(목적) 이 법은 발명을 보호한다.",
                "① 첫째 항의 내용이다.",
                "② 둘째 항의 내용이다.",
            ]),
        )
        .unwrap();

        assert_eq!(tree.children.len(), 1);
        let article = &tree.children[0];
        assert_eq!(article.label, "제1조");
        assert_eq!(article.title.as_deref(), Some("목적"));
        assert_eq!(article.body, "이 법은 발명을 보호한다.");
        assert_eq!(article.children.len(), 2);
        assert_eq!(article.children[0].label, "①");
        assert_eq!(article.children[0].body, "첫째 항의 내용이다.");
        assert_eq!(article.children[1].label, "②");
    }

    #[test]
    fn item_nests_under_article_when_no_paragraph_open() {
        let tree = extract(
            Country::Epc,
            &blocks(&["Article 5", "Legal status", "(a) the first point;"]),
        )
        .unwrap();

        let article = &tree.children[0];
        assert_eq!(article.label, "Article 5");
        assert_eq!(article.children.len(), 1);
        assert_eq!(article.children[0].level, Level::Item);
        assert_eq!(article.children[0].label, "(a)");
    }

    #[test]
    fn epc_heading_taken_from_next_line() {
        let tree = extract(
            Country::Epc,
            &blocks(&[
                "Article 52",
                "Patentable inventions",
                "(1) European patents shall be granted for any inventions.",
            ]),
        )
        .unwrap();

        let article = &tree.children[0];
        assert_eq!(article.title.as_deref(), Some("Patentable inventions"));
        assert_eq!(article.children[0].label, "(1)");
    }

    #[test]
    fn preamble_collects_leading_text() {
        let tree = extract(
            Country::Korea,
            &blocks(&["특허법", "시행 2024. 1. 1.", "제1조(목적) 본문"]),
        )
        .unwrap();

        assert_eq!(tree.preamble, "특허법\n시행 2024. 1. 1.");
    }

    #[test]
    fn sibling_article_closes_previous_subtree() {
        let tree = extract(
            Country::Korea,
            &blocks(&[
                "제1장 총칙",
                "제1조(목적) 본문 일",
                "① 항 내용",
                "제2조(정의) 본문 이",
            ]),
        )
        .unwrap();

        let chapter = &tree.children[0];
        assert_eq!(chapter.level, Level::Chapter);
        assert_eq!(chapter.children.len(), 2);
        assert_eq!(chapter.children[0].children.len(), 1);
        assert!(chapter.children[1].children.is_empty());

        let order: Vec<String> = tree
            .articles()
            .iter()
            .map(|(_, n)| n.label.clone())
            .collect();
        assert_eq!(order, vec!["제1조", "제2조"]);
    }

    #[test]
    fn deleted_article_gets_sentinel_body() {
        let tree = extract(
            Country::Korea,
            &blocks(&["제1조(목적) 본문", "제2조 삭제", "제3조(정의) 정의 본문"]),
        )
        .unwrap();

        assert_eq!(tree.children[1].body, DELETED);
        assert_eq!(tree.children.len(), 3);
    }

    #[test]
    fn unmarked_block_continues_innermost_body() {
        let tree = extract(
            Country::Epc,
            &blocks(&[
                "Article 52",
                "Patentable inventions",
                "(1) European patents shall be granted",
                "for any inventions in all fields of technology.",
            ]),
        )
        .unwrap();

        let para = &tree.children[0].children[0];
        assert_eq!(
            para.body,
            "European patents shall be granted\nfor any inventions in all fields of technology."
        );
    }

    #[test]
    fn no_articles_is_unrecognized() {
        let err = extract(
            Country::Korea,
            &blocks(&["서문일 뿐인 텍스트", "조문이 전혀 없다"]),
        )
        .unwrap_err();
        assert!(matches!(err, ExtractError::UnrecognizedStructure { .. }));
    }

    #[test]
    fn paths_resolve_after_extraction() {
        let tree = extract(
            Country::Korea,
            &blocks(&["제1조(목적) 본문", "① 항 내용", "1. 호 내용"]),
        )
        .unwrap();

        let path: ProvisionPath = "제1조/①/1.".parse().unwrap();
        let node = tree.find(&path).unwrap();
        assert_eq!(node.level, Level::Item);
        assert_eq!(node.body, "호 내용");
    }
}
