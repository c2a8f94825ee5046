//! Writing a run's artifacts to disk.

use crate::document::Document;
use crate::error::Result;
use crate::recovery::RecoveryOutcome;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Numbered recovered lines of the target font.
pub const RECOVERED_TEXT_FILE: &str = "recovered_text.txt";
/// Whole document with the target font recovered.
pub const RECOVERED_DOCUMENT_FILE: &str = "recovered_document.txt";
/// Raw line structure of the input.
pub const DOCUMENT_RAW_FILE: &str = "document_raw.csv";
/// Bigram graph of frequent short words.
pub const BIGRAM_GRAPH_FILE: &str = "bigrams_graph.gexf";

/// Paths of the written artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// `recovered_text.txt`
    pub recovered_text: PathBuf,
    /// `recovered_document.txt`
    pub recovered_document: PathBuf,
    /// `document_raw.csv`
    pub document_raw: PathBuf,
    /// `bigrams_graph.gexf`
    pub bigram_graph: PathBuf,
}

/// Write all artifacts of `outcome` into `output_dir`, creating it if needed.
pub fn write_artifacts(outcome: &RecoveryOutcome, document: &Document, output_dir: &Path) -> Result<Artifacts> {
    fs::create_dir_all(output_dir)?;

    let artifacts = Artifacts {
        recovered_text: write_file(output_dir, RECOVERED_TEXT_FILE, &outcome.recovered.to_numbered_text())?,
        recovered_document: write_file(output_dir, RECOVERED_DOCUMENT_FILE, &outcome.document_text)?,
        document_raw: write_file(output_dir, DOCUMENT_RAW_FILE, &document.to_raw_tsv())?,
        bigram_graph: write_file(output_dir, BIGRAM_GRAPH_FILE, &outcome.profile.bigrams().to_gexf())?,
    };
    log::info!("Wrote artifacts to {}", output_dir.display());
    Ok(artifacts)
}

fn write_file(dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    let mut file = File::create(&path)?;
    file.write_all(contents.as_bytes())?;
    log::debug!("Wrote {} ({} bytes)", path.display(), contents.len());
    Ok(path)
}
