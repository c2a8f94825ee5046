//! Error types for the recovery library.
//!
//! Only conditions that stop a run are errors. Ambiguous matches, inconsistent
//! assignments and fixed-map conflicts are reported as data by the matcher
//! (see [`crate::mapping::Conflict`] and [`crate::matcher::Resolution`]).

/// Result type alias for recovery operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during text recovery.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input document is not a pdfminer page/line/glyph dump
    #[error("Failed to parse document: {0}")]
    Parse(String),

    /// No target font was given
    #[error("No target font specified; available fonts: {}", .available.join(", "))]
    NoTargetFont {
        /// Fonts present in the document, in order of first appearance
        available: Vec<String>,
    },

    /// The requested target font does not occur in the document
    #[error("Target font '{font}' is not part of the document; available fonts: {}", .available.join(", "))]
    UnknownFont {
        /// Requested font name
        font: String,
        /// Fonts present in the document, in order of first appearance
        available: Vec<String>,
    },

    /// Queries, sure words and fixed map are all empty
    #[error("No ground truth supplied: add queries, sure words or fixed mappings")]
    NoGroundTruth,

    /// The target font has no glyph lines
    #[error("Target font '{0}' has no lines to recover")]
    EmptyCorpus(String),

    /// A query line cue could not be parsed
    #[error("Invalid query '{query}': {reason}")]
    InvalidQuery {
        /// The query as supplied
        query: String,
        /// Reason for rejection
        reason: String,
    },

    /// A manual punctuation override is not of the form `DOT:SPACE`
    #[error("Invalid punctuation override '{0}': expected DOT:SPACE")]
    InvalidPunctuation(String),

    /// Reassembly received fewer recovered lines than the font has
    #[error("Font '{font}' has {expected} lines but only {recovered} were recovered")]
    LineCountMismatch {
        /// Target font name
        font: String,
        /// Number of lines of the font in the document
        expected: usize,
        /// Number of recovered lines supplied
        recovered: usize,
    },

    /// A decoding pattern failed to compile
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Ground truth JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
