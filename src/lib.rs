// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::type_complexity)]

//! # Glyph Recover
//!
//! Recovers the text of a PDF font whose glyph codes carry no usable
//! character map, starting from a little ground truth supplied by the user.
//!
//! ## Workflow
//! - **Read**: a pdfminer XML layout dump is split into per-font lines
//! - **Normalize**: raw CID placeholders become short canonical tokens
//! - **Segment**: the dot and word separator tokens are inferred and the
//!   corpus is split into words
//! - **Match**: known sentences are aligned by word-length profile, known
//!   words by partially decoded patterns, and capitalized forms are
//!   suggested
//! - **Assemble**: the font is re-rendered with the inferred mapping, unknown
//!   glyphs as `[label]`, and merged back into the whole document
//!
//! Every run is a complete, deterministic pass. Improving the result means
//! reading the reports, extending the ground truth and running again.
//!
//! ## Quick Start
//!
//! ```no_run
//! use glyph_recover::{parse_pdfminer_xml, GroundTruth, RecoveryOptions, RecoveryPipeline};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let xml = std::fs::read_to_string("document.xml")?;
//! let document = parse_pdfminer_xml(&xml)?;
//! let ground_truth = GroundTruth::from_file("ground_truth.json")?;
//!
//! let outcome = RecoveryPipeline::with_options(RecoveryOptions::new()).run(&document, &ground_truth)?;
//! for line in &outcome.recovered.lines {
//!     println!("{}", line);
//! }
//! println!("{:.1}% complete", outcome.recovered.completion_ratio() * 100.0);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration and ground truth
pub mod config;

// Input document
pub mod document;

// Token model
pub mod mapping;
pub mod tokens;

// Corpus preparation
pub mod normalize;
pub mod punctuation;
pub mod segment;

// Inference
pub mod matcher;

// Output
pub mod assemble;
pub mod export;
pub mod reassemble;

// Orchestration
pub mod recovery;

// Re-exports
pub use assemble::RecoveredText;
pub use config::{GroundTruth, Query, RecoveryOptions};
pub use document::{parse_pdfminer_xml, Document};
pub use error::{Error, Result};
pub use mapping::{CodeCharMap, Conflict, FixedMap};
pub use punctuation::Punctuation;
pub use recovery::{RecoveryOutcome, RecoveryPipeline};
pub use tokens::{CodeToken, Word};
