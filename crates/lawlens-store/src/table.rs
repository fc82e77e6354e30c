//! Tree to table and back.
//!
//! The structure sheet is a pre-order flattening: one row per provision,
//! with the full path, the node's own fields, and one column per level
//! carrying the nearest enclosing label at that level. The flattening is
//! lossless; `rebuild` reverses it using the same open-node stack the
//! extractor uses.

use lawlens_core::{Country, Level, PREAMBLE_PATH, ProvisionNode, ProvisionPath, ProvisionTree};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Level column value for the preamble row, which carries the text before
/// the first structural marker and is not a provision node.
pub const PREAMBLE_LEVEL: &str = "preamble";

/// One provision as a spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureRow {
    pub path: String,
    pub level: String,
    pub label: String,
    pub title: String,
    pub body: String,
    pub part: String,
    pub chapter: String,
    pub section: String,
    pub article: String,
    pub paragraph: String,
    pub item: String,
    pub sub_item: String,
}

/// Flatten a tree into rows, pre-order. A non-empty preamble leads with
/// its own row.
pub fn flatten(tree: &ProvisionTree) -> Vec<StructureRow> {
    let mut rows = Vec::new();
    if !tree.preamble.is_empty() {
        rows.push(StructureRow {
            path: PREAMBLE_PATH.to_string(),
            level: PREAMBLE_LEVEL.to_string(),
            label: String::new(),
            title: String::new(),
            body: clean_cell(&tree.preamble),
            part: String::new(),
            chapter: String::new(),
            section: String::new(),
            article: String::new(),
            paragraph: String::new(),
            item: String::new(),
            sub_item: String::new(),
        });
    }
    let mut context: [String; Level::ALL.len()] = Default::default();
    for node in &tree.children {
        visit(node, &ProvisionPath::root(), &mut context, &mut rows);
    }
    rows
}

fn visit(
    node: &ProvisionNode,
    parent: &ProvisionPath,
    context: &mut [String; Level::ALL.len()],
    rows: &mut Vec<StructureRow>,
) {
    let depth = node.level as usize;
    context[depth] = node.label.clone();
    for slot in context.iter_mut().skip(depth + 1) {
        slot.clear();
    }

    let path = parent.child(&node.label);
    rows.push(StructureRow {
        path: path.to_string(),
        level: node.level.as_str().to_string(),
        label: clean_cell(&node.label),
        title: clean_cell(node.title.as_deref().unwrap_or_default()),
        body: clean_cell(&node.body),
        part: context[Level::Part as usize].clone(),
        chapter: context[Level::Chapter as usize].clone(),
        section: context[Level::Section as usize].clone(),
        article: context[Level::Article as usize].clone(),
        paragraph: context[Level::Paragraph as usize].clone(),
        item: context[Level::Item as usize].clone(),
        sub_item: context[Level::SubItem as usize].clone(),
    });

    for child in &node.children {
        visit(child, &path, context, rows);
    }
}

/// Rebuild a tree from rows in sheet order.
pub fn rebuild(country: Country, rows: &[StructureRow]) -> Result<ProvisionTree, StoreError> {
    let mut tree = ProvisionTree::new(country);
    let mut stack: Vec<ProvisionNode> = Vec::new();

    for row in rows {
        if row.level == PREAMBLE_LEVEL {
            tree.preamble = row.body.clone();
            continue;
        }
        let level: Level = row
            .level
            .parse()
            .map_err(|_| StoreError::Malformed(format!("unknown level {:?}", row.level)))?;

        while stack.last().is_some_and(|top| top.level >= level) {
            if let Some(done) = stack.pop() {
                attach(&mut tree, &mut stack, done);
            }
        }

        let mut node = ProvisionNode::new(level, row.label.clone());
        if !row.title.is_empty() {
            node.title = Some(row.title.clone());
        }
        node.body = row.body.clone();
        stack.push(node);
    }

    while let Some(done) = stack.pop() {
        attach(&mut tree, &mut stack, done);
    }
    Ok(tree)
}

fn attach(tree: &mut ProvisionTree, stack: &mut [ProvisionNode], node: ProvisionNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => tree.children.push(node),
    }
}

/// Drop control characters that spreadsheet tools reject; newlines and
/// tabs survive.
pub fn clean_cell(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> ProvisionTree {
        let mut tree = ProvisionTree::new(Country::Korea);
        let mut chapter = ProvisionNode::new(Level::Chapter, "제1장");
        chapter.title = Some("총칙".into());

        let mut article = ProvisionNode::new(Level::Article, "제1조");
        article.title = Some("목적".into());
        article.body = "이 법은 발명을 보호한다.".into();

        let mut para = ProvisionNode::new(Level::Paragraph, "①");
        para.body = "첫째 항".into();
        let mut item = ProvisionNode::new(Level::Item, "1.");
        item.body = "첫째 호".into();
        para.children.push(item);
        article.children.push(para);
        chapter.children.push(article);
        tree.children.push(chapter);
        tree
    }

    #[test]
    fn flatten_is_pre_order_with_ancestor_columns() {
        let rows = flatten(&sample_tree());
        assert_eq!(rows.len(), 4);

        assert_eq!(rows[0].path, "제1장");
        assert_eq!(rows[0].level, "chapter");
        assert_eq!(rows[0].article, "");

        assert_eq!(rows[3].path, "제1장/제1조/①/1.");
        assert_eq!(rows[3].level, "item");
        assert_eq!(rows[3].chapter, "제1장");
        assert_eq!(rows[3].article, "제1조");
        assert_eq!(rows[3].paragraph, "①");
        assert_eq!(rows[3].body, "첫째 호");
    }

    #[test]
    fn sibling_reset_clears_deeper_context() {
        let mut tree = sample_tree();
        let mut second = ProvisionNode::new(Level::Article, "제2조");
        second.title = Some("정의".into());
        tree.children[0].children.push(second);

        let rows = flatten(&tree);
        let last = rows.last().unwrap();
        assert_eq!(last.article, "제2조");
        assert_eq!(last.paragraph, "");
        assert_eq!(last.item, "");
    }

    #[test]
    fn flatten_is_deterministic() {
        let tree = sample_tree();
        assert_eq!(flatten(&tree), flatten(&tree));
    }

    #[test]
    fn rebuild_round_trips() {
        let tree = sample_tree();
        let rows = flatten(&tree);
        let back = rebuild(Country::Korea, &rows).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn preamble_row_round_trips() {
        let mut tree = sample_tree();
        tree.preamble = "특허법\n시행 2024. 1. 1.".into();

        let rows = flatten(&tree);
        assert_eq!(rows[0].level, PREAMBLE_LEVEL);
        assert_eq!(rows[0].path, PREAMBLE_PATH);
        assert_eq!(rows[0].body, tree.preamble);
        assert_eq!(rows.len(), 5);

        let back = rebuild(Country::Korea, &rows).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn rebuild_rejects_unknown_level() {
        let mut rows = flatten(&sample_tree());
        rows[0].level = "tome".into();
        assert!(matches!(
            rebuild(Country::Korea, &rows),
            Err(StoreError::Malformed(_))
        ));
    }

    #[test]
    fn control_characters_are_dropped() {
        assert_eq!(clean_cell("a\u{0}b\u{8}c"), "abc");
        assert_eq!(clean_cell("line one\nline two\ttabbed"), "line one\nline two\ttabbed");
    }
}
