//! API key configuration.
//!
//! Keys come from the environment first (`LAWLENS_GEMINI_KEY`,
//! `LAWLENS_CLAUDE_KEY`), then from a TOML secrets file. The file is
//! only read when a key is missing from the environment, so CI can run
//! without one.

use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "lawlens.toml";

pub const GEMINI_KEY_VAR: &str = "LAWLENS_GEMINI_KEY";
pub const CLAUDE_KEY_VAR: &str = "LAWLENS_CLAUDE_KEY";

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    keys: Keys,
}

#[derive(Debug, Default, Deserialize)]
struct Keys {
    gemini: Option<String>,
    claude: Option<String>,
}

#[derive(Debug)]
pub struct Config {
    pub gemini_key: String,
    pub claude_key: String,
}

impl Config {
    /// Load keys for the stages that call hosted services.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let keys = read_keys(path)?;
        resolve(keys, env::var(GEMINI_KEY_VAR).ok(), env::var(CLAUDE_KEY_VAR).ok())
    }
}

fn read_keys(path: Option<&Path>) -> Result<Keys> {
    let default = Path::new(DEFAULT_CONFIG_FILE);
    let path = match path {
        Some(p) => p,
        // The default file is optional.
        None if default.exists() => default,
        None => return Ok(Keys::default()),
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let parsed: FileConfig = toml::from_str(&raw)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    Ok(parsed.keys)
}

fn resolve(keys: Keys, env_gemini: Option<String>, env_claude: Option<String>) -> Result<Config> {
    let gemini_key = env_gemini.or(keys.gemini).with_context(|| {
        format!("no Gemini API key: set {GEMINI_KEY_VAR} or [keys].gemini in {DEFAULT_CONFIG_FILE}")
    })?;
    let claude_key = env_claude.or(keys.claude).with_context(|| {
        format!("no Claude API key: set {CLAUDE_KEY_VAR} or [keys].claude in {DEFAULT_CONFIG_FILE}")
    })?;
    Ok(Config {
        gemini_key,
        claude_key,
    })
}
