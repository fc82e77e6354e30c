//! lawlens: structure, translate, and match patent statutes.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lawlens_ai::{
    ClaudeClient, GeminiClient, KoreanCandidate, MatchOptions, TranslateOptions,
    match_translations, translate_tree,
};
use lawlens_core::Country;
use tracing::info;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "lawlens")]
#[command(about = "Patent statute structuring, dual translation, and Korean-law matching")]
struct Args {
    /// TOML secrets file (default: lawlens.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract a statute's provision structure into a sheet
    Structure {
        /// Jurisdiction: korea, epc, germany, usa, or taiwan
        #[arg(long)]
        country: String,

        /// Source document (.pdf, .xml, or .txt)
        #[arg(short, long)]
        input: PathBuf,

        /// Structure sheet to write
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Translate every article with both services
    Translate {
        /// Jurisdiction of the structure sheet
        #[arg(long)]
        country: String,

        /// Structure sheet from the structure stage
        #[arg(short, long)]
        structure: PathBuf,

        /// Translation sheet to write
        #[arg(short, long)]
        output: PathBuf,

        /// Articles in flight at once
        #[arg(long, default_value_t = 5)]
        concurrency: usize,
    },

    /// Append Korean Patent Act matches to a translation sheet
    Match {
        /// Translation sheet from the translate stage
        #[arg(short, long)]
        translations: PathBuf,

        /// Korean structure sheet providing the candidate provisions
        #[arg(short, long)]
        korean: PathBuf,

        /// Combined translation and match sheet to write
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn parse_country(raw: &str) -> Result<Country> {
    raw.parse().map_err(anyhow::Error::msg)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    match args.command {
        Command::Structure {
            country,
            input,
            output,
        } => {
            let country = parse_country(&country)?;
            let tree = lawlens_extract::extract_file(country, &input)
                .with_context(|| format!("failed to extract {}", input.display()))?;
            lawlens_store::write_structure(&output, &tree)?;
            info!(
                provisions = tree.node_count(),
                output = %output.display(),
                "structure sheet written"
            );
        }

        Command::Translate {
            country,
            structure,
            output,
            concurrency,
        } => {
            let country = parse_country(&country)?;
            let cfg = Config::load(args.config.as_deref())?;
            let tree = lawlens_store::read_structure(&structure, country)
                .with_context(|| format!("failed to read {}", structure.display()))?;

            let gemini = GeminiClient::new(cfg.gemini_key);
            let claude = ClaudeClient::new(cfg.claude_key);
            let options = TranslateOptions {
                concurrency,
                ..TranslateOptions::default()
            };
            let records = translate_tree(&gemini, &claude, &tree, &options).await;
            lawlens_store::write_translations(&output, &records)?;
            info!(
                records = records.len(),
                output = %output.display(),
                "translation sheet written"
            );
        }

        Command::Match {
            translations,
            korean,
            output,
        } => {
            let cfg = Config::load(args.config.as_deref())?;
            let rows = lawlens_store::read_translations(&translations)
                .with_context(|| format!("failed to read {}", translations.display()))?;
            let korean_tree = lawlens_store::read_structure(&korean, Country::Korea)
                .with_context(|| format!("failed to read {}", korean.display()))?;

            let candidates: Vec<KoreanCandidate> = korean_tree
                .articles()
                .into_iter()
                .map(|(path, node)| KoreanCandidate {
                    path: path.to_string(),
                    summary: match &node.title {
                        Some(title) => format!("{} {title}", node.label),
                        None => node.label.clone(),
                    },
                })
                .collect();

            let claude = ClaudeClient::new(cfg.claude_key);
            let records =
                match_translations(&claude, rows, &candidates, &MatchOptions::default()).await;
            lawlens_store::write_matches(&output, &records)?;
            info!(
                records = records.len(),
                output = %output.display(),
                "combined translation and match sheet written"
            );
        }
    }

    Ok(())
}
