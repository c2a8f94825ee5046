//! Recover the text of a CID-encoded font
//!
//! Reads a pdfminer XML dump (`pdf2txt.py -t xml`), applies the ground truth
//! and writes the recovered font text and document.
//!
//! Usage:
//!   cargo run --release --bin recover_text -- document.xml --ground-truth gt.json
//!   cargo run --release --bin recover_text -- document.xml --font ABCDEF+Font --output-dir out
//!   cargo run --release --bin recover_text -- document.xml --punctuation 12:3 --verbose

use glyph_recover::config::{GroundTruth, RecoveryOptions};
use glyph_recover::document::parse_pdfminer_xml;
use glyph_recover::error::Error;
use glyph_recover::export::write_artifacts;
use glyph_recover::punctuation::Punctuation;
use glyph_recover::recovery::{RecoveryOutcome, RecoveryPipeline};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

const USAGE: &str = "Usage: recover_text <document.xml> [--ground-truth FILE] [--font NAME] \
                     [--output-dir DIR] [--keep-punctuation] [--punctuation DOT:SPACE] \
                     [--no-force-cid] [--verbose]";

/// Number of unresolved tokens and lines printed in the summary.
const SHOWN_UNRESOLVED: usize = 20;

struct RecoverConfig {
    document: PathBuf,
    ground_truth: Option<PathBuf>,
    output_dir: PathBuf,
    options: RecoveryOptions,
    verbose: bool,
}

impl RecoverConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut document = None;
        let mut ground_truth = None;
        let mut output_dir = PathBuf::from(".");
        let mut options = RecoveryOptions::new();
        let mut verbose = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--ground-truth" | "-g" => {
                    i += 1;
                    if i < args.len() {
                        ground_truth = Some(PathBuf::from(&args[i]));
                    }
                },
                "--font" | "-f" => {
                    i += 1;
                    if i < args.len() {
                        options = options.with_target_font(args[i].as_str());
                    }
                },
                "--output-dir" | "-o" => {
                    i += 1;
                    if i < args.len() {
                        output_dir = PathBuf::from(&args[i]);
                    }
                },
                "--punctuation" => {
                    i += 1;
                    if i < args.len() {
                        let punctuation = Punctuation::parse(&args[i]).map_err(|e| e.to_string())?;
                        options = options.with_punctuation(punctuation);
                    }
                },
                "--keep-punctuation" => {
                    options = options.with_keep_punctuation(true);
                },
                "--no-force-cid" => {
                    options = options.with_force_cid(false);
                },
                "--verbose" | "-v" => {
                    verbose = true;
                },
                "--help" | "-h" => return Err(USAGE.to_string()),
                arg if arg.starts_with('-') => return Err(format!("Unknown option {}\n{}", arg, USAGE)),
                arg => document = Some(PathBuf::from(arg)),
            }
            i += 1;
        }

        let document = document.ok_or_else(|| USAGE.to_string())?;
        Ok(Self {
            document,
            ground_truth,
            output_dir,
            options,
            verbose,
        })
    }
}

fn print_summary(outcome: &RecoveryOutcome) {
    println!("Font: {}", outcome.font);
    println!(
        "Punctuation: dot={} space={}",
        outcome.punctuation.dot, outcome.punctuation.space
    );
    println!(
        "Queries: {}/{} matched, sure words: {}/{} matched",
        outcome.queries.resolved_count(),
        outcome.queries.outcomes.len(),
        outcome.sure_words.resolved_count(),
        outcome.sure_words.outcomes.len()
    );

    for missed in outcome.queries.unresolved().chain(outcome.sure_words.unresolved()) {
        println!("  ? {}", missed);
    }
    for conflict in outcome.conflicts() {
        println!("  ! {}", conflict);
    }
    for suggestion in &outcome.capitals.suggestions {
        println!("  capital? {}", suggestion);
    }

    let recovered = &outcome.recovered;
    if !recovered.is_complete() {
        println!("\nMost frequent unresolved tokens:");
        for (token, lines) in recovered.unresolved_tokens.iter().take(SHOWN_UNRESOLVED) {
            println!("  {} x{}", token.literal(), lines.len());
        }
        println!("\nLines with most unresolved tokens:");
        for (line, tokens) in recovered.unresolved_lines.iter().take(SHOWN_UNRESOLVED) {
            println!("  l.{:04}: {} unresolved | {}", line, tokens.len(), recovered.lines[*line]);
        }
    }

    println!(
        "\nResolved {} tokens, {} unresolved: {:.1}% complete{}",
        recovered.resolved,
        recovered.unresolved_tokens.len(),
        recovered.completion_ratio() * 100.0,
        if recovered.is_complete() { " ✅" } else { "" }
    );
}

fn run(config: &RecoverConfig) -> Result<(), Error> {
    let xml = std::fs::read_to_string(&config.document)?;
    let document = parse_pdfminer_xml(&xml)?;

    println!("Fonts:");
    for (font, lines) in document.font_summary() {
        println!("  {:<40} {} lines", font, lines);
    }
    println!();

    let ground_truth = match &config.ground_truth {
        Some(path) => GroundTruth::from_file(path)?,
        None => GroundTruth::default(),
    };

    let start = Instant::now();
    let outcome = RecoveryPipeline::with_options(config.options.clone()).run(&document, &ground_truth)?;
    print_summary(&outcome);

    let artifacts = write_artifacts(&outcome, &document, &config.output_dir)?;
    println!("Recovered text:     {}", artifacts.recovered_text.display());
    println!("Recovered document: {}", artifacts.recovered_document.display());
    if config.verbose {
        println!("Raw lines:          {}", artifacts.document_raw.display());
        println!("Bigram graph:       {}", artifacts.bigram_graph.display());
        println!("Finished in {:.2}s", start.elapsed().as_secs_f64());
    }
    Ok(())
}

/// Guidance printed after an error.
fn error_hints(error: &Error) -> Vec<&'static str> {
    match error {
        Error::NoTargetFont { .. } | Error::UnknownFont { .. } => {
            vec!["Pass --font NAME or set \"target_font\" in the ground truth file."]
        },
        Error::Parse(_) => vec![
            USAGE,
            "The document must be the XML output of `pdf2txt.py -t xml`.",
        ],
        _ => Vec::new(),
    }
}

fn main() -> ExitCode {
    let config = match RecoverConfig::from_args() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        },
    };

    let default_level = if config.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            for hint in error_hints(&e) {
                eprintln!("{}", hint);
            }
            ExitCode::FAILURE
        },
    }
}
