//! Foreign-to-Korean provision matching.
//!
//! The match stage runs over the translation sheet: each translated
//! article (the first service's rendering) is compared against the Korean
//! candidate list, and the match columns are appended to the translation
//! rows. Articles are sent in batches sized by a character budget; each
//! batch is one generation that returns a JSON array with one entry per
//! numbered provision. The reply's Korean labels come back in whatever
//! form the model chose ("제29조", "Article 29", "29"), so resolution
//! against the candidate list goes through label normalisation. Every
//! input row yields exactly one output row; rows that were never
//! translated (preamble, deleted, sentinel cells) pass through with empty
//! match columns.

use std::collections::HashMap;

use lawlens_core::{
    DELETED, MatchRecord, MatchedRecord, PREAMBLE_SKIPPED, TranslationRecord, is_sentinel,
    labels_match,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::service::TranslationService;
use crate::translate::{TranslateOptions, generate_with_retry};

/// A Korean statute provision offered as a match candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KoreanCandidate {
    pub path: String,
    /// Label plus title, as shown to the model ("제29조 특허요건").
    pub summary: String,
}

#[derive(Debug, Clone)]
pub struct MatchOptions {
    /// Upper bound on foreign-article characters per batch.
    pub batch_char_budget: usize,
    pub retry: TranslateOptions,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            batch_char_budget: 12_000,
            retry: TranslateOptions::default(),
        }
    }
}

/// One translated article queued for a batch, with the text the model
/// sees.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ForeignArticle {
    path: String,
    text: String,
}

#[derive(Deserialize)]
struct RawMatch {
    id: usize,
    #[serde(default)]
    korean: String,
    #[serde(default)]
    reason: String,
}

/// Whether a translation row carries text worth matching.
fn matchable(record: &TranslationRecord) -> bool {
    let t = &record.translation_a;
    !t.is_empty() && t != DELETED && t != PREAMBLE_SKIPPED && !is_sentinel(t)
}

/// Append a Korean match to every translation row.
pub async fn match_translations(
    service: &dyn TranslationService,
    translations: Vec<TranslationRecord>,
    korean: &[KoreanCandidate],
    options: &MatchOptions,
) -> Vec<MatchedRecord> {
    let foreign: Vec<ForeignArticle> = translations
        .iter()
        .filter(|r| matchable(r))
        .map(|r| ForeignArticle {
            path: r.path.clone(),
            text: r.translation_a.clone(),
        })
        .collect();

    let system = system_prompt();
    let candidate_list = candidate_list(korean);

    let mut matches: Vec<MatchRecord> = Vec::with_capacity(foreign.len());
    for batch in batches(&foreign, options.batch_char_budget) {
        let user = batch_prompt(batch, &candidate_list);
        match generate_with_retry(service, &system, &user, &options.retry).await {
            Ok(reply) => matches.extend(parse_batch(batch, korean, &reply)),
            Err(err) => {
                warn!(error = %err, batch = batch.len(), "match batch failed");
                let detail = format!("{}: {err}", service.name());
                matches.extend(batch.iter().map(|f| MatchRecord::failed(&f.path, &detail)));
            }
        }
    }

    let failed = matches.iter().filter(|r| r.is_failed()).count();
    info!(
        rows = translations.len(),
        matched = matches.len() - failed,
        failed,
        "matching complete"
    );

    let by_path: HashMap<&str, &MatchRecord> =
        matches.iter().map(|m| (m.foreign_path.as_str(), m)).collect();
    translations
        .into_iter()
        .map(|record| match by_path.get(record.path.as_str()) {
            Some(matched) => MatchedRecord::new(record, matched),
            None => MatchedRecord::unmatched(record),
        })
        .collect()
}

/// Split into contiguous batches under the character budget. A single
/// oversized article still forms its own batch.
fn batches(foreign: &[ForeignArticle], budget: usize) -> Vec<&[ForeignArticle]> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut used = 0;
    for (i, article) in foreign.iter().enumerate() {
        let len = article.text.chars().count();
        if i > start && used + len > budget {
            out.push(&foreign[start..i]);
            start = i;
            used = 0;
        }
        used += len;
    }
    if start < foreign.len() {
        out.push(&foreign[start..]);
    }
    out
}

fn candidate_list(korean: &[KoreanCandidate]) -> String {
    korean
        .iter()
        .map(|c| format!("- {}", c.summary))
        .collect::<Vec<_>>()
        .join("\n")
}

fn batch_prompt(batch: &[ForeignArticle], candidates: &str) -> String {
    let mut out = String::from("Foreign provisions (translated):\n");
    for (i, article) in batch.iter().enumerate() {
        out.push_str(&format!("[{}] {}\n{}\n\n", i + 1, article.path, article.text));
    }
    out.push_str("Korean Patent Act candidates:\n");
    out.push_str(candidates);
    out.push_str(
        "\n\nFor each numbered foreign provision, pick the single closest Korean \
         candidate and explain why in one sentence. Reply with a JSON array only, \
         one object per provision: \
         [{\"id\": 1, \"korean\": \"제29조\", \"reason\": \"...\"}]",
    );
    out
}

/// Exactly one record per batch entry, in batch order.
fn parse_batch(
    batch: &[ForeignArticle],
    korean: &[KoreanCandidate],
    reply: &str,
) -> Vec<MatchRecord> {
    let raw: Vec<RawMatch> = match serde_json::from_str(extract_json_array(reply)) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(error = %err, "unparseable match reply");
            let detail = format!("unparseable reply: {err}");
            return batch
                .iter()
                .map(|f| MatchRecord::failed(&f.path, &detail))
                .collect();
        }
    };

    batch
        .iter()
        .enumerate()
        .map(|(i, article)| {
            let entry = raw.iter().find(|r| r.id == i + 1);
            match entry {
                Some(r) if !r.korean.is_empty() => MatchRecord {
                    foreign_path: article.path.clone(),
                    matched_korean_path: resolve_korean(&r.korean, korean),
                    match_reason: r.reason.clone(),
                },
                _ => MatchRecord::failed(&article.path, "no reply for this provision"),
            }
        })
        .collect()
}

/// Map a model-supplied Korean label onto a candidate path. Falls back to
/// the raw label when nothing in the candidate list matches.
fn resolve_korean(label: &str, korean: &[KoreanCandidate]) -> String {
    korean
        .iter()
        .find(|c| {
            let leaf = c.path.rsplit('/').next().unwrap_or(&c.path);
            labels_match(label, leaf)
        })
        .map(|c| c.path.clone())
        .unwrap_or_else(|| label.to_string())
}

/// The model is told to reply with bare JSON but may wrap it in a code
/// fence or prose; take the outermost array.
fn extract_json_array(reply: &str) -> &str {
    let start = reply.find('[');
    let end = reply.rfind(']');
    match (start, end) {
        (Some(s), Some(e)) if s < e => &reply[s..=e],
        _ => reply.trim(),
    }
}

fn system_prompt() -> String {
    "You are a Korean patent attorney comparing foreign patent statutes with \
     the Korean Patent Act. Match provisions by legal function, not by article \
     number."
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AiError;
    use async_trait::async_trait;
    use lawlens_core::error_sentinel;
    use once_cell::sync::Lazy;
    use regex::Regex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    static PROVISION_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\[(\d+)\]").unwrap());

    /// Answers every numbered provision in the prompt with 제29조.
    struct ScriptedMatcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TranslationService for ScriptedMatcher {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, _system: &str, user: &str) -> Result<String, AiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let entries: Vec<String> = PROVISION_ID
                .captures_iter(user)
                .map(|c| {
                    format!(
                        r#"{{"id": {}, "korean": "제29조", "reason": "same patentability test"}}"#,
                        &c[1]
                    )
                })
                .collect();
            Ok(format!("```json\n[{}]\n```", entries.join(",")))
        }
    }

    fn translated(n: usize) -> Vec<TranslationRecord> {
        (1..=n)
            .map(|i| TranslationRecord {
                path: format!("Article {i}"),
                source_text: format!("source {i}"),
                translation_a: "특허 요건 번역 ".repeat(8),
                translation_b: format!("대안 번역 {i}"),
                diff_note: "no structural difference".into(),
            })
            .collect()
    }

    fn article(path: &str, text: &str) -> Vec<ForeignArticle> {
        vec![ForeignArticle {
            path: path.into(),
            text: text.into(),
        }]
    }

    fn candidates() -> Vec<KoreanCandidate> {
        vec![
            KoreanCandidate {
                path: "제2장/제29조".into(),
                summary: "제29조 특허요건".into(),
            },
            KoreanCandidate {
                path: "제2장/제30조".into(),
                summary: "제30조 공지 예외".into(),
            },
        ]
    }

    fn fast_options(budget: usize) -> MatchOptions {
        MatchOptions {
            batch_char_budget: budget,
            retry: TranslateOptions {
                retry_delay: Duration::ZERO,
                ..TranslateOptions::default()
            },
        }
    }

    #[test]
    fn batching_respects_character_budget() {
        let articles: Vec<ForeignArticle> = (1..=5)
            .map(|i| ForeignArticle {
                path: format!("Article {i}"),
                text: "x".repeat(100),
            })
            .collect();
        let split = batches(&articles, 250);
        assert_eq!(split.len(), 3);
        assert_eq!(split[0].len(), 2);
        assert_eq!(split[2].len(), 1);

        // One oversized article still goes through.
        let big = article("Article 1", &"x".repeat(10_000));
        assert_eq!(batches(&big, 250).len(), 1);
    }

    #[tokio::test]
    async fn every_row_gets_exactly_one_output_row() {
        let service = ScriptedMatcher {
            calls: AtomicUsize::new(0),
        };
        let rows = translated(5);

        let records =
            match_translations(&service, rows, &candidates(), &fast_options(250)).await;

        assert_eq!(records.len(), 5);
        assert!(service.calls.load(Ordering::SeqCst) > 1);
        for (i, rec) in records.iter().enumerate() {
            assert_eq!(rec.path, format!("Article {}", i + 1));
            assert_eq!(rec.source_text, format!("source {}", i + 1));
            assert_eq!(rec.matched_korean_path, "제2장/제29조");
            assert_eq!(rec.diff_note, "no structural difference");
        }
    }

    #[tokio::test]
    async fn unmatchable_rows_pass_through_untouched() {
        let service = ScriptedMatcher {
            calls: AtomicUsize::new(0),
        };
        let rows = vec![
            TranslationRecord {
                path: "(preamble)".into(),
                source_text: "Preamble text".into(),
                translation_a: PREAMBLE_SKIPPED.into(),
                translation_b: PREAMBLE_SKIPPED.into(),
                diff_note: "not compared".into(),
            },
            TranslationRecord {
                path: "Article 1".into(),
                source_text: "source".into(),
                translation_a: "the translated provision".into(),
                translation_b: "alt".into(),
                diff_note: "no structural difference".into(),
            },
            TranslationRecord {
                path: "Article 2".into(),
                source_text: "source".into(),
                translation_a: DELETED.into(),
                translation_b: DELETED.into(),
                diff_note: "not compared".into(),
            },
            TranslationRecord {
                path: "Article 3".into(),
                source_text: "source".into(),
                translation_a: error_sentinel("gemini: overloaded"),
                translation_b: "alt".into(),
                diff_note: "not compared".into(),
            },
        ];

        let records =
            match_translations(&service, rows, &candidates(), &fast_options(10_000)).await;

        assert_eq!(records.len(), 4);
        assert!(records[0].matched_korean_path.is_empty());
        assert_eq!(records[1].matched_korean_path, "제2장/제29조");
        assert!(records[2].matched_korean_path.is_empty());
        assert!(records[3].matched_korean_path.is_empty());
        // Only the live row was batched.
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn malformed_reply_fails_the_batch_only() {
        struct Garbage;
        #[async_trait]
        impl TranslationService for Garbage {
            fn name(&self) -> &str {
                "garbage"
            }
            async fn generate(&self, _s: &str, _u: &str) -> Result<String, AiError> {
                Ok("sorry, I cannot help with that".into())
            }
        }

        let records =
            match_translations(&Garbage, translated(3), &candidates(), &fast_options(10_000))
                .await;
        assert_eq!(records.len(), 3);
        assert!(records
            .iter()
            .all(|r| is_sentinel(&r.matched_korean_path)));
    }

    #[test]
    fn missing_id_becomes_failed_record() {
        let mut articles = article("Article 1", "text one");
        articles.extend(article("Article 2", "text two"));
        let reply = r#"[{"id": 1, "korean": "제30조", "reason": "grace period"}]"#;
        let records = parse_batch(&articles, &candidates(), reply);

        assert_eq!(records[0].matched_korean_path, "제2장/제30조");
        assert!(records[1].is_failed());
    }

    #[test]
    fn label_forms_resolve_to_candidate_paths() {
        let korean = candidates();
        assert_eq!(resolve_korean("제29조", &korean), "제2장/제29조");
        assert_eq!(resolve_korean("Article 29", &korean), "제2장/제29조");
        assert_eq!(resolve_korean("29", &korean), "제2장/제29조");
        // Unknown labels pass through unresolved.
        assert_eq!(resolve_korean("제99조", &korean), "제99조");
    }

    #[test]
    fn json_array_extracted_from_fenced_reply() {
        let fenced = "```json\n[{\"id\": 1}]\n```";
        assert_eq!(extract_json_array(fenced), "[{\"id\": 1}]");
        assert_eq!(extract_json_array("no json here"), "no json here");
    }
}
