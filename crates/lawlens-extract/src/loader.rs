//! Document loading: raw source files to an ordered stream of text blocks.
//!
//! The extractor is format-agnostic; it consumes one line-sized block at a
//! time. PDF sources are flattened with `pdf-extract`, German XML sources
//! (gesetze-im-internet layout) are linearised so the same pattern tables
//! apply, and plain-text files pass through for pre-extracted material.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::ExtractError;

/// Read a source document into ordered text blocks.
///
/// The format is chosen by extension: `.pdf`, `.xml` (German federal
/// gazette layout), or `.txt`.
pub fn load_blocks(path: &Path) -> Result<Vec<String>, ExtractError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let blocks = match ext.as_str() {
        "pdf" => load_pdf(path)?,
        "xml" => load_german_xml(path)?,
        "txt" => split_lines(&read_file(path)?),
        other => return Err(ExtractError::UnsupportedExtension(other.to_string())),
    };

    info!(path = %path.display(), blocks = blocks.len(), "loaded source document");
    Ok(blocks)
}

fn read_file(path: &Path) -> Result<String, ExtractError> {
    fs::read_to_string(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_pdf(path: &Path) -> Result<Vec<String>, ExtractError> {
    let text = pdf_extract::extract_text(path)?;
    Ok(split_lines(&text))
}

/// Non-empty trimmed lines in document order.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Linearise a German statute XML file into marker-prefixed text blocks.
///
/// Each `norm` element becomes: an optional heading block
/// ("Erster Abschnitt Das Patent") when the norm opens a new
/// `gliederungseinheit`, the `enbez` marker block ("§ 1"), then one block
/// per `P` content paragraph (these carry their own "(1)" markers in the
/// text).
pub fn load_german_xml(path: &Path) -> Result<Vec<String>, ExtractError> {
    let raw = read_file(path)?;
    parse_german_xml(&raw)
}

/// Parse German statute XML text into blocks; see [`load_german_xml`].
pub fn parse_german_xml(raw: &str) -> Result<Vec<String>, ExtractError> {
    let doc = roxmltree::Document::parse(raw)?;

    let mut blocks = Vec::new();
    let mut last_heading = String::new();

    for norm in doc
        .descendants()
        .filter(|n| n.has_tag_name("norm"))
    {
        let bez = child_text(&norm, "gliederungsbez");
        let titel = child_text(&norm, "gliederungstitel");
        if !bez.is_empty() {
            let heading = if titel.is_empty() {
                bez.clone()
            } else {
                format!("{bez} {titel}")
            };
            if heading != last_heading {
                blocks.push(heading.clone());
                last_heading = heading;
            }
        }

        let enbez = child_text(&norm, "enbez");
        if enbez.is_empty() {
            continue;
        }
        blocks.push(enbez);

        for p in norm.descendants().filter(|n| n.has_tag_name("P")) {
            let text = collapse_whitespace(&element_text(&p));
            if !text.is_empty() {
                blocks.push(text);
            }
        }
    }

    Ok(blocks)
}

/// Concatenated text of the first descendant with the given tag.
fn child_text(norm: &roxmltree::Node, tag: &str) -> String {
    norm.descendants()
        .find(|n| n.has_tag_name(tag))
        .map(|n| collapse_whitespace(&element_text(&n)))
        .unwrap_or_default()
}

/// All text content under an element, in document order.
fn element_text(node: &roxmltree::Node) -> String {
    let mut out = String::new();
    for d in node.descendants() {
        if let Some(t) = d.text() {
            out.push_str(t);
        }
    }
    out
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
