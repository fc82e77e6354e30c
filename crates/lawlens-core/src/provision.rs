//! Canonical provision hierarchy shared by every pipeline stage.
//!
//! Different jurisdictions structure statutes differently (편/장/절/조 in
//! Korea, Part/Chapter/Article in the EPC, Abschnitt/§ in Germany); all of
//! them are normalised onto the single level ordering defined here so that
//! downstream stages can compare provisions across countries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical hierarchy level, outermost first.
///
/// The discriminant order is the depth order: a child node's level must
/// compare strictly greater than its parent's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Part,
    Chapter,
    Section,
    Article,
    Paragraph,
    Item,
    SubItem,
}

impl Level {
    pub const ALL: [Level; 7] = [
        Level::Part,
        Level::Chapter,
        Level::Section,
        Level::Article,
        Level::Paragraph,
        Level::Item,
        Level::SubItem,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Part => "part",
            Level::Chapter => "chapter",
            Level::Section => "section",
            Level::Article => "article",
            Level::Paragraph => "paragraph",
            Level::Item => "item",
            Level::SubItem => "subitem",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("unknown hierarchy level: {0}")]
    UnknownLevel(String),
    #[error("duplicate provision path: {0}")]
    DuplicatePath(String),
    #[error("child {child} at level {child_level} is not deeper than parent {parent} at {parent_level}")]
    LevelInversion {
        parent: String,
        parent_level: Level,
        child: String,
        child_level: Level,
    },
}

impl FromStr for Level {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| TreeError::UnknownLevel(s.to_string()))
    }
}

/// Supported source jurisdictions.
///
/// Closed set: adding a country means adding a variant here and a pattern
/// table in the extractor, and the compiler points at every match that
/// needs updating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Country {
    Korea,
    /// European Patent Convention layout (Part/Chapter/Article, English).
    Epc,
    Germany,
    Usa,
    Taiwan,
}

impl Country {
    pub const ALL: [Country; 5] = [
        Country::Korea,
        Country::Epc,
        Country::Germany,
        Country::Usa,
        Country::Taiwan,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Country::Korea => "korea",
            Country::Epc => "epc",
            Country::Germany => "germany",
            Country::Usa => "usa",
            Country::Taiwan => "taiwan",
        }
    }

    /// Source language of the statute text, used to pick translation prompts.
    pub fn language(self) -> Language {
        match self {
            Country::Korea => Language::Korean,
            Country::Epc | Country::Usa => Language::English,
            Country::Germany => Language::German,
            Country::Taiwan => Language::Chinese,
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Country {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Country::ALL
            .into_iter()
            .find(|c| c.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("unknown country: {s} (expected one of korea, epc, germany, usa, taiwan)"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Korean,
    English,
    German,
    Chinese,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Korean => "Korean",
            Language::English => "English",
            Language::German => "German",
            Language::Chinese => "Chinese",
        }
    }
}

/// One unit of legal text at any hierarchy level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionNode {
    pub level: Level,
    /// Native numbering marker, e.g. "제3조", "Article 5", "§ 2", "①".
    pub label: String,
    /// Heading text, when the source carries one.
    pub title: Option<String>,
    /// Text content at this level; empty for pure containers.
    pub body: String,
    /// Insertion order is document order.
    pub children: Vec<ProvisionNode>,
}

impl ProvisionNode {
    pub fn new(level: Level, label: impl Into<String>) -> Self {
        Self {
            level,
            label: label.into(),
            title: None,
            body: String::new(),
            children: Vec::new(),
        }
    }
}

/// Ordered ancestor labels plus the node's own label; unique per document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProvisionPath(pub Vec<String>);

impl ProvisionPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, label: &str) -> Self {
        let mut labels = self.0.clone();
        labels.push(label.to_string());
        Self(labels)
    }

    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    pub fn leaf(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// True when `self` is a strict prefix of `other`.
    pub fn is_ancestor_of(&self, other: &ProvisionPath) -> bool {
        self.0.len() < other.0.len() && other.0[..self.0.len()] == self.0[..]
    }
}

impl fmt::Display for ProvisionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

impl FromStr for ProvisionPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        Ok(Self(s.split('/').map(str::to_string).collect()))
    }
}

/// Root of one extracted document: a synthetic container above Part level.
///
/// Built once per extraction run and immutable thereafter; later stages
/// only read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionTree {
    pub country: Country,
    /// Text preceding the first structural marker (enacting clauses etc.).
    pub preamble: String,
    pub children: Vec<ProvisionNode>,
}

impl ProvisionTree {
    pub fn new(country: Country) -> Self {
        Self {
            country,
            preamble: String::new(),
            children: Vec::new(),
        }
    }

    /// Pre-order traversal over every node with its derived path.
    pub fn walk<F>(&self, mut f: F)
    where
        F: FnMut(&ProvisionPath, &ProvisionNode),
    {
        fn visit<F>(node: &ProvisionNode, path: &ProvisionPath, f: &mut F)
        where
            F: FnMut(&ProvisionPath, &ProvisionNode),
        {
            let here = path.child(&node.label);
            f(&here, node);
            for child in &node.children {
                visit(child, &here, f);
            }
        }
        let root = ProvisionPath::root();
        for child in &self.children {
            visit(child, &root, &mut f);
        }
    }

    pub fn node_count(&self) -> usize {
        let mut n = 0;
        self.walk(|_, _| n += 1);
        n
    }

    /// Article-level nodes in document order, with their paths.
    pub fn articles(&self) -> Vec<(ProvisionPath, &ProvisionNode)> {
        fn visit<'a>(
            node: &'a ProvisionNode,
            path: &ProvisionPath,
            out: &mut Vec<(ProvisionPath, &'a ProvisionNode)>,
        ) {
            let here = path.child(&node.label);
            if node.level == Level::Article {
                out.push((here.clone(), node));
            }
            for child in &node.children {
                visit(child, &here, out);
            }
        }
        let mut out = Vec::new();
        let root = ProvisionPath::root();
        for child in &self.children {
            visit(child, &root, &mut out);
        }
        out
    }

    /// Look up a node by path.
    pub fn find(&self, path: &ProvisionPath) -> Option<&ProvisionNode> {
        let mut labels = path.0.iter();
        let first = labels.next()?;
        let mut node = self.children.iter().find(|n| &n.label == first)?;
        for label in labels {
            node = node.children.iter().find(|n| &n.label == label)?;
        }
        Some(node)
    }

    /// Check the structural invariants: unique paths, strictly increasing
    /// level depth from parent to child.
    pub fn validate(&self) -> Result<(), TreeError> {
        let mut seen = std::collections::HashSet::new();
        let mut err = None;
        self.walk(|path, node| {
            if err.is_some() {
                return;
            }
            if !seen.insert(path.to_string()) {
                err = Some(TreeError::DuplicatePath(path.to_string()));
                return;
            }
            for child in &node.children {
                if child.level <= node.level {
                    err = Some(TreeError::LevelInversion {
                        parent: path.to_string(),
                        parent_level: node.level,
                        child: child.label.clone(),
                        child_level: child.level,
                    });
                    return;
                }
            }
        });
        match err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
