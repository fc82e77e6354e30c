//! Hosted-model stages: dual-service translation, structural diffing, and
//! foreign-to-Korean provision matching.

mod error;
pub mod claude;
pub mod diff;
pub mod gemini;
pub mod matcher;
pub mod service;
pub mod translate;

pub use claude::ClaudeClient;
pub use error::AiError;
pub use gemini::GeminiClient;
pub use matcher::{KoreanCandidate, MatchOptions, match_translations};
pub use service::TranslationService;
pub use translate::{ArticleUnit, TranslateOptions, article_units, translate_tree};
