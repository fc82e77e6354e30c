//! Dual-service article translation.
//!
//! Articles are the translation unit: each article's text is recombined
//! with its descendant markers inlined, then sent to both configured
//! services concurrently. Failures degrade to per-cell sentinels so one
//! bad provision never aborts the run, and output order always follows
//! document order regardless of completion order.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use lawlens_core::{
    Country, DELETED, Language, PREAMBLE_PATH, PREAMBLE_SKIPPED, ProvisionNode, ProvisionPath,
    ProvisionTree, TranslationRecord, error_sentinel, is_sentinel,
};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::diff::diff_note;
use crate::error::AiError;
use crate::service::TranslationService;

/// Diff note used when at least one translation cell is a sentinel.
pub const NOT_COMPARED: &str = "not compared";

#[derive(Debug, Clone)]
pub struct TranslateOptions {
    /// Articles in flight at once.
    pub concurrency: usize,
    pub max_attempts: u32,
    /// Base backoff; attempt n waits n times this.
    pub retry_delay: Duration,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            concurrency: 5,
            max_attempts: 3,
            retry_delay: Duration::from_secs(3),
        }
    }
}

/// One article's recombined source text, keyed by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleUnit {
    pub path: ProvisionPath,
    pub text: String,
    pub deleted: bool,
}

/// Article-level units in document order, markers re-inlined.
pub fn article_units(tree: &ProvisionTree) -> Vec<ArticleUnit> {
    tree.articles()
        .into_iter()
        .map(|(path, node)| ArticleUnit {
            path,
            text: unit_text(node),
            deleted: node.body == DELETED,
        })
        .collect()
}

fn unit_text(article: &ProvisionNode) -> String {
    let mut lines = Vec::new();
    let head = match &article.title {
        Some(title) => format!("{} ({title})", article.label),
        None => article.label.clone(),
    };
    lines.push(head);
    if !article.body.is_empty() {
        lines.push(article.body.clone());
    }
    for child in &article.children {
        inline_descendants(child, &mut lines);
    }
    lines.join("\n")
}

fn inline_descendants(node: &ProvisionNode, lines: &mut Vec<String>) {
    if node.body.is_empty() {
        lines.push(node.label.clone());
    } else {
        lines.push(format!("{} {}", node.label, node.body));
    }
    for child in &node.children {
        inline_descendants(child, lines);
    }
}

/// Translate every article with both services.
///
/// The preamble, when present, leads the output as an untranslated row.
/// Deleted articles carry their sentinel straight through without a
/// service call.
pub async fn translate_tree(
    service_a: &dyn TranslationService,
    service_b: &dyn TranslationService,
    tree: &ProvisionTree,
    options: &TranslateOptions,
) -> Vec<TranslationRecord> {
    let system = system_prompt(tree.country);
    let units = article_units(tree);
    info!(
        country = %tree.country,
        articles = units.len(),
        service_a = service_a.name(),
        service_b = service_b.name(),
        "translating"
    );

    let mut translated: Vec<(usize, TranslationRecord)> = stream::iter(
        units.into_iter().enumerate(),
    )
    .map(|(idx, unit)| {
        let system = system.clone();
        async move {
            let record = translate_unit(service_a, service_b, &system, unit, options).await;
            (idx, record)
        }
    })
    .buffer_unordered(options.concurrency.max(1))
    .collect()
    .await;
    translated.sort_by_key(|(idx, _)| *idx);

    let mut records = Vec::with_capacity(translated.len() + 1);
    if !tree.preamble.is_empty() {
        records.push(TranslationRecord {
            path: PREAMBLE_PATH.to_string(),
            source_text: tree.preamble.clone(),
            translation_a: PREAMBLE_SKIPPED.to_string(),
            translation_b: PREAMBLE_SKIPPED.to_string(),
            diff_note: NOT_COMPARED.to_string(),
        });
    }
    records.extend(translated.into_iter().map(|(_, rec)| rec));
    records
}

async fn translate_unit(
    service_a: &dyn TranslationService,
    service_b: &dyn TranslationService,
    system: &str,
    unit: ArticleUnit,
    options: &TranslateOptions,
) -> TranslationRecord {
    if unit.deleted {
        return TranslationRecord {
            path: unit.path.to_string(),
            source_text: unit.text,
            translation_a: DELETED.to_string(),
            translation_b: DELETED.to_string(),
            diff_note: NOT_COMPARED.to_string(),
        };
    }

    let (a, b) = tokio::join!(
        generate_with_retry(service_a, system, &unit.text, options),
        generate_with_retry(service_b, system, &unit.text, options),
    );
    let translation_a = cell(service_a, a);
    let translation_b = cell(service_b, b);
    let diff_note = if is_sentinel(&translation_a) || is_sentinel(&translation_b) {
        NOT_COMPARED.to_string()
    } else {
        diff_note(&translation_a, &translation_b)
    };

    TranslationRecord {
        path: unit.path.to_string(),
        source_text: unit.text,
        translation_a,
        translation_b,
        diff_note,
    }
}

fn cell(service: &dyn TranslationService, result: Result<String, AiError>) -> String {
    match result {
        Ok(text) => text.trim().to_string(),
        Err(err) => error_sentinel(&format!("{}: {err}", service.name())),
    }
}

/// Retry a generation with linear backoff.
pub(crate) async fn generate_with_retry(
    service: &dyn TranslationService,
    system: &str,
    user: &str,
    options: &TranslateOptions,
) -> Result<String, AiError> {
    let mut last_err = None;
    for attempt in 1..=options.max_attempts.max(1) {
        match service.generate(system, user).await {
            Ok(text) => return Ok(text),
            Err(err) => {
                warn!(service = service.name(), attempt, error = %err, "generation failed");
                last_err = Some(err);
                if attempt < options.max_attempts {
                    sleep(options.retry_delay * attempt).await;
                }
            }
        }
    }
    Err(last_err.unwrap_or_else(|| AiError::MalformedReply("no attempts made".into())))
}

fn system_prompt(country: Country) -> String {
    let target = match country.language() {
        Language::Korean => "English",
        _ => "Korean",
    };
    format!(
        "You are a legal translator specialising in patent law. Translate the \
         {source} statutory provision given by the user into {target}. Keep every \
         numbering marker exactly as it appears in the source, translate titles in \
         parentheses, and reply with the translation only.",
        source = country.language().as_str(),
        target = target,
    )
}
