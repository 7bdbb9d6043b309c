//! musician-network - build an interactive collaboration network from a
//! record-collection CSV.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use musician_network::visualization::write_report_html;
use musician_network::{AnalysisConfig, NetworkModel};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "musician-network")]
#[command(about = "Generate an interactive musician collaboration network")]
#[command(version)]
struct Args {
    /// Input catalog CSV
    #[arg(short, long, default_value = "vinyl-collection.csv")]
    input: PathBuf,

    /// Output HTML file
    #[arg(short, long, default_value = "musician_network_complete_analysis.html")]
    output: PathBuf,

    /// Optional TOML config overriding analysis defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Save the relation table and triples as CSV next to the output
    #[arg(long)]
    save_csvs: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "musician_network=debug"
    } else {
        "musician_network=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match &args.config {
        Some(path) => AnalysisConfig::from_toml_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    if !args.input.exists() {
        anyhow::bail!("input file '{}' not found", args.input.display());
    }

    let (dir, file) = split_path(&args.input)?;
    let mut model = NetworkModel::new(dir, config);
    model
        .load_csv(&file, None)
        .with_context(|| format!("loading {}", args.input.display()))?;

    let relations = model.relations()?;
    for skipped in relations.skipped() {
        warn!(
            artist = %skipped.main_artist,
            entry = %skipped.entry,
            "unparseable musician entry"
        );
    }

    let report = model.report()?;
    write_report_html(&report, &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!(output = %args.output.display(), "report written");

    if args.save_csvs {
        let out_dir = args
            .output
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        for path in model.save_csvs(&out_dir)? {
            info!(path = %path.display(), "csv saved");
        }
    }

    let summary = &report.summary;
    info!(
        connections = summary.total_connections,
        musicians = summary.unique_musicians,
        artists = summary.unique_artists,
        albums = summary.unique_albums,
        roles = summary.unique_roles,
        most_collaborative_musician = summary.most_collaborative_musician.as_deref().unwrap_or("-"),
        most_collaborative_artist = summary.most_collaborative_artist.as_deref().unwrap_or("-"),
        "analysis complete"
    );

    Ok(())
}

/// Split a file path into (directory, file name) for the model's base path.
fn split_path(path: &Path) -> Result<(PathBuf, String)> {
    let file = path
        .file_name()
        .and_then(|f| f.to_str())
        .with_context(|| format!("invalid input path {}", path.display()))?
        .to_string();
    let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok((dir, file))
}
