//! Append-only output records produced by the translation and matching
//! stages. Keyed by provision path; a stage re-run replaces its whole
//! output file, individual records are never edited in place.

use serde::{Deserialize, Serialize};

/// Sentinel body for articles the source marks as deleted or repealed.
pub const DELETED: &str = "(deleted)";

/// Sentinel translation for preamble text, which is carried through
/// untranslated.
pub const PREAMBLE_SKIPPED: &str = "(preamble: not translated)";

/// Path label for the preamble row. The preamble is not a provision, so
/// it has no native marker in any jurisdiction.
pub const PREAMBLE_PATH: &str = "(preamble)";

/// Render a failure as an inline cell value.
///
/// Failures are surfaced per record inside the output row rather than
/// aborting the run, so the operator can see exactly which provisions need
/// a manual retry.
pub fn error_sentinel(detail: &str) -> String {
    format!("[error: {detail}]")
}

/// True for any sentinel produced by [`error_sentinel`].
pub fn is_sentinel(value: &str) -> bool {
    value.starts_with("[error:")
}

/// One article-level dual-translation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRecord {
    pub path: String,
    /// Article text with paragraph/item markers re-inlined.
    pub source_text: String,
    /// Output of the first configured service.
    pub translation_a: String,
    /// Output of the second configured service.
    pub translation_b: String,
    /// Human-readable structural difference note.
    pub diff_note: String,
}

/// One foreign-to-Korean provision match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub foreign_path: String,
    pub matched_korean_path: String,
    pub match_reason: String,
}

/// One translation row with its Korean match appended; the final sheet
/// shape of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedRecord {
    pub path: String,
    pub source_text: String,
    pub translation_a: String,
    pub translation_b: String,
    pub diff_note: String,
    pub matched_korean_path: String,
    pub match_reason: String,
}

impl MatchedRecord {
    /// Append a match result to a translation row.
    pub fn new(translation: TranslationRecord, matched: &MatchRecord) -> Self {
        Self {
            path: translation.path,
            source_text: translation.source_text,
            translation_a: translation.translation_a,
            translation_b: translation.translation_b,
            diff_note: translation.diff_note,
            matched_korean_path: matched.matched_korean_path.clone(),
            match_reason: matched.match_reason.clone(),
        }
    }

    /// Carry a row that was never sent for matching (preamble, deleted,
    /// or untranslated provisions) with empty match columns.
    pub fn unmatched(translation: TranslationRecord) -> Self {
        Self {
            path: translation.path,
            source_text: translation.source_text,
            translation_a: translation.translation_a,
            translation_b: translation.translation_b,
            diff_note: translation.diff_note,
            matched_korean_path: String::new(),
            match_reason: String::new(),
        }
    }
}

impl MatchRecord {
    /// Record for a provision the service failed to match.
    pub fn failed(foreign_path: impl Into<String>, detail: &str) -> Self {
        Self {
            foreign_path: foreign_path.into(),
            matched_korean_path: error_sentinel(detail),
            match_reason: String::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        is_sentinel(&self.matched_korean_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_detection() {
        assert!(is_sentinel(&error_sentinel("timeout")));
        assert!(!is_sentinel("특허법 제1조"));
        assert!(!is_sentinel(DELETED));
    }

    #[test]
    fn failed_match_record() {
        let rec = MatchRecord::failed("Article 5", "no reply for this provision");
        assert!(rec.is_failed());
        assert_eq!(rec.foreign_path, "Article 5");
        assert!(rec.match_reason.is_empty());
    }

    #[test]
    fn translation_record_json_round_trip() {
        let rec = TranslationRecord {
            path: "제1조".into(),
            source_text: "① 이 법은…".into(),
            translation_a: "(1) This Act…".into(),
            translation_b: "(1) The present Act…".into(),
            diff_note: "no structural difference".into(),
        };
        let json = serde_json::to_string(&rec).unwrap();
        let parsed: TranslationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, rec);
    }
}
