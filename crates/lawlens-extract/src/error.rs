use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("pdf text extraction failed: {0}")]
    Pdf(#[from] pdf_extract::OutputError),

    #[error("xml parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("unsupported file extension: {0}")]
    UnsupportedExtension(String),

    /// No Article-level provision matched any pattern of the selected
    /// country profile. The source layout does not fit this profile; the
    /// operator should pick a different country or inspect the file.
    #[error("no recognizable article structure for country profile '{country}'")]
    UnrecognizedStructure { country: String },
}
