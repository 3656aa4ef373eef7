use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "screener")]
#[command(version, about = "Rank resumes against a job description")]
#[command(subcommand_negates_reqs = true, args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Job description file (.txt, .md or .pdf)
    #[arg(long, required = true)]
    pub jd: Option<PathBuf>,

    /// Directory of resume files, or a .jsonl resume dataset
    #[arg(long, required = true)]
    pub resumes: Option<PathBuf>,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Screen a folder holding one job description and its resumes
    Folder {
        dir: PathBuf,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Start the HTTP API
    Serve {
        /// Overrides PORT
        #[arg(long)]
        port: Option<u16>,
        #[command(flatten)]
        sources: SourceArgs,
    },
}

/// Ranking and output flags shared by every screening command.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Keep only the N best candidates (0 or negative keeps everyone)
    #[arg(long, allow_negative_numbers = true)]
    pub top: Option<i64>,

    /// Drop candidates scoring below this total (0-100)
    #[arg(long, value_parser = parse_min_score)]
    pub min_score: Option<f64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Overrides SCREENER_OUTPUT_DIR
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    #[command(flatten)]
    pub sources: SourceArgs,
}

/// Taxonomy and scoring files; both override the environment.
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Scoring config JSON (weights, min_score, top_n)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Skill taxonomy JSON
    #[arg(long)]
    pub taxonomy: Option<PathBuf>,
}

fn parse_min_score(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if !(0.0..=100.0).contains(&value) {
        return Err(format!("{value} is outside 0-100"));
    }
    Ok(value)
}
