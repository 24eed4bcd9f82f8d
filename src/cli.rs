//! Command-line interface
//!
//! Thin presentation glue around the pipeline: load a CSV, run detection,
//! print the summary, optionally export the labeled rows.

use clap::{Parser, Subcommand};
use colored::*;

use crate::error::Result;
use crate::pipeline::{AnomalyPipeline, DetectorConfig, DEFAULT_CONTAMINATION};
use crate::utils::DataLoader;

#[derive(Parser)]
#[command(name = "tabsentry", version, about = "Isolation-forest anomaly detection for tabular data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run anomaly detection on a CSV file
    Detect {
        /// Path to the input CSV
        data: String,

        /// Feature columns to score on (repeatable)
        #[arg(short, long, required = true)]
        feature: Vec<String>,

        /// Expected proportion of anomalous rows, in (0, 0.5]
        #[arg(short, long, default_value_t = DEFAULT_CONTAMINATION)]
        contamination: f64,

        /// Number of isolation trees
        #[arg(long, default_value_t = 100)]
        trees: usize,

        /// Random seed
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Write the labeled dataset to this CSV path
        #[arg(short, long)]
        output: Option<String>,

        /// Export only the rows labeled Anomaly
        #[arg(long)]
        anomalies_only: bool,

        /// Print the detection summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a summary of a CSV file
    Info {
        /// Path to the input CSV
        data: String,
    },
}

fn step_ok(msg: &str) {
    println!("  {} {}", "✓".green(), msg);
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", "─".repeat(56).dimmed());
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_detect(
    data: &str,
    features: &[String],
    contamination: f64,
    trees: usize,
    seed: u64,
    output: Option<&str>,
    anomalies_only: bool,
    json: bool,
) -> Result<()> {
    let loader = DataLoader::new();
    let df = loader.load_csv(data)?;
    if !json {
        step_ok(&format!("loaded {} rows × {} columns", df.height(), df.width()));
    }

    let config = DetectorConfig::new()
        .with_features(features.iter().cloned())
        .with_contamination(contamination)
        .with_n_estimators(trees)
        .with_seed(seed);
    let report = AnomalyPipeline::new(config).detect(&df)?;

    let summary = report.summary();
    if json {
        let payload = serde_json::json!({
            "summary": summary,
            "cutoff": report.cutoff(),
            "contamination": contamination,
            "seed": seed,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        section("Detection summary");
        println!("  {} {}", "total rows:".dimmed(), summary.total);
        println!("  {} {}", "normal:".dimmed(), summary.normal_count.to_string().green());
        println!("  {} {}", "anomalies:".dimmed(), summary.anomaly_count.to_string().red());
        println!("  {} {:.4}", "score cutoff:".dimmed(), report.cutoff());
    }

    if let Some(path) = output {
        let frame = if anomalies_only {
            report.anomalies()?
        } else {
            report.labeled().clone()
        };
        loader.write_csv(&frame, path)?;
        if !json {
            step_ok(&format!("wrote {} rows to {}", frame.height(), path));
        }
    }

    Ok(())
}

pub fn cmd_info(data: &str) -> Result<()> {
    let df = DataLoader::new().load_csv(data)?;

    section("Dataset");
    println!("  {} {} × {}", "shape:".dimmed(), df.height(), df.width());

    section("Columns");
    for column in df.get_columns() {
        let nulls = column.null_count();
        let null_note = if nulls > 0 {
            format!(" ({nulls} missing)").yellow().to_string()
        } else {
            String::new()
        };
        println!(
            "  {} {}{}",
            format!("{:<20}", column.name()).white(),
            column.dtype().to_string().dimmed(),
            null_note
        );
    }

    Ok(())
}
