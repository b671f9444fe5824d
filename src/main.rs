//! PIE - Pun Identification Engine command-line interface
//!
//! A thin front end over the analysis library: pass a sentence (or a file
//! of sentences) and get either a human-readable report or the JSON shape
//! shared with the HTTP collaborators.

use clap::Parser;
use pie_core::{AnalysisEngine, EngineConfig, PieError, PunAnalysisResult, Result};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pie", version, about = "Identify and validate puns in sentences")]
struct Cli {
    /// Sentence to analyze for puns
    sentence: Option<String>,

    /// File containing sentences, one per line
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Show validation details in the report
    #[arg(short, long)]
    verbose: bool,

    /// Anthropic API key (falls back to the environment)
    #[arg(short = 'k', long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Minimum confidence for a pun to appear in results
    #[arg(long)]
    min_confidence: Option<f64>,

    /// Frame lexicon JSON file (defaults to the built-in lexicon)
    #[arg(long)]
    lexicon: Option<PathBuf>,
}

fn print_result(result: &PunAnalysisResult, verbose: bool) {
    println!("\n{}", "=".repeat(70));
    println!("Sentence: {}", result.sentence);
    println!("{}", "=".repeat(70));

    if result.has_pun {
        println!("\nFound {} pun(s):\n", result.puns.len());

        for (i, pun) in result.puns.iter().enumerate() {
            println!("  [{}] Word/Expression: \"{}\"", i + 1, pun.word_or_expression);
            println!("      Type: {}", pun.pun_type);
            println!("      Sense 1: {}", pun.sense1);
            println!("      Sense 2: {}", pun.sense2);
            println!(
                "      Frame Distance: {:.1} ({:?})",
                pun.frame_distance.distance, pun.frame_distance.distance_type
            );
            println!("      Frame Explanation: {}", pun.frame_distance.explanation);
            println!("      Explanation: {}", pun.explanation);
            println!("      Confidence: {:.0}%", pun.confidence * 100.0);
            if verbose {
                println!(
                    "      Distributional Valid: {} ({})",
                    pun.validation.distributional_valid, pun.validation.distributional_explanation
                );
                println!(
                    "      Substitution Valid: {} ({})",
                    pun.validation.substitution_valid, pun.validation.substitution_explanation
                );
            }
            println!();
        }
    } else {
        println!("\nNo puns detected.");
    }

    if !result.analysis_notes.is_empty() {
        println!("Notes: {}", result.analysis_notes);
    }

    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = EngineConfig::default();
    if let Some(key) = cli.api_key {
        config.api_key = key;
    }
    if let Some(threshold) = cli.min_confidence {
        config.min_confidence = threshold.clamp(0.0, 1.0);
    }

    let mut engine = AnalysisEngine::new(config)?;
    if let Some(lexicon) = &cli.lexicon {
        engine = engine.with_lexicon_path(&lexicon.to_string_lossy());
    }

    if let Some(file) = &cli.file {
        let content = std::fs::read_to_string(file)?;
        let sentences: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();

        if sentences.is_empty() {
            return Err(PieError::InvalidInput(format!(
                "no sentences found in {}",
                file.display()
            )));
        }

        let results = engine.analyze_batch(sentences).await;

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&results)?);
        } else {
            for result in &results {
                print_result(result, cli.verbose);
            }
        }
    } else if let Some(sentence) = &cli.sentence {
        let result = engine.analyze(sentence).await?;

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print_result(&result, cli.verbose);
        }
    } else {
        return Err(PieError::InvalidInput(
            "provide a sentence or --file; see --help".to_string(),
        ));
    }

    Ok(())
}
