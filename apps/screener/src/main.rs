mod cli;
mod config;
mod errors;
mod extraction;
mod models;
mod output;
mod routes;
mod scoring;
mod screening;
mod sources;
mod state;
mod taxonomy;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Command, RunArgs, SourceArgs};
use crate::config::{Config, ScoringConfig};
use crate::routes::build_router;
use crate::scoring::WeightedScorer;
use crate::screening::{Screener, ScreeningOptions};
use crate::sources::{FileTextExtractor, ResumeBatch, ResumeInput};
use crate::state::AppState;
use crate::taxonomy::SkillTaxonomy;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails on malformed env values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting screener v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(Command::Serve { port, sources: files }) => serve(&config, port, &files).await,
        Some(Command::Folder { dir, run }) => {
            let layout = sources::split_folder(&dir).await?;
            let batch = ResumeBatch {
                inputs: layout.resumes.into_iter().map(ResumeInput::File).collect(),
                skipped: 0,
            };
            screen(&config, &run, &layout.job_description, batch).await
        }
        None => {
            let jd = cli.jd.context("--jd is required")?;
            let resumes = cli.resumes.context("--resumes is required")?;
            let batch = sources::load_resumes(&resumes).await?;
            screen(&config, &cli.run, &jd, batch).await
        }
    }
}

/// One CLI screening run: rank, write the report, print the summary.
async fn screen(config: &Config, run: &RunArgs, jd_path: &Path, batch: ResumeBatch) -> Result<()> {
    let (screener, scoring) = build_screener(config, &run.sources)?;

    let jd_text = sources::read_job_description(jd_path, screener.extractor()).await?;
    let options = ScreeningOptions::resolve(run.top, run.min_score, &scoring);
    let outcome = screener.run(&jd_text, batch, options).await?;

    let output_dir = run
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output_dir.clone());
    let slug = output::job_slug(outcome.job.title.as_deref(), Some(jd_path));
    let path = output::write_results(
        &outcome.ranked,
        run.format,
        &output_dir,
        &slug,
        chrono::Local::now().naive_local(),
    )?;

    print!("{}", output::render_summary(&outcome));
    println!("Results written to {}", path.display());
    Ok(())
}

async fn serve(config: &Config, port: Option<u16>, files: &SourceArgs) -> Result<()> {
    let (screener, scoring) = build_screener(config, files)?;

    let state = AppState {
        scoring: Arc::new(scoring),
        screener,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", port.unwrap_or(config.port)).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Loads the taxonomy and scoring config (CLI flag, then env, then built-in)
/// and wires the default scorer and extractor.
fn build_screener(config: &Config, files: &SourceArgs) -> Result<(Screener, ScoringConfig)> {
    let taxonomy_path = pick(&files.taxonomy, &config.taxonomy_path);
    let scoring_path = pick(&files.config, &config.scoring_path);

    let taxonomy = SkillTaxonomy::load(taxonomy_path.as_deref())?;
    let scoring = ScoringConfig::load(scoring_path.as_deref())?;

    let screener = Screener::new(
        Arc::new(taxonomy),
        Arc::new(WeightedScorer::new(scoring.weights)),
        Arc::new(FileTextExtractor),
    );
    Ok((screener, scoring))
}

fn pick(flag: &Option<PathBuf>, env: &Option<PathBuf>) -> Option<PathBuf> {
    flag.clone().or_else(|| env.clone())
}
