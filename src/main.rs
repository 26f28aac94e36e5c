//! Pecha Serializer
//!
//! Renders the annotation layers of a pecha bundle and converts the result
//! into an ebook.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pecha_serializer::config::Config;
use pecha_serializer::export::EbookExporter;
use pecha_serializer::PechaBundle;

#[derive(Parser)]
#[command(name = "pecha-serializer")]
#[command(version, about = "Render pecha annotation layers and export an ebook")]
struct Cli {
    /// JSON bundle with base texts, volume spans, and layers
    bundle: PathBuf,

    /// Directory for intermediate files and the ebook (overrides PECHA_WORK_DIR)
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Write the assembled HTML and stop before conversion
    #[arg(long)]
    html_only: bool,

    /// Render volumes concurrently
    #[arg(long)]
    parallel: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pecha_serializer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    dotenvy::dotenv().ok();

    let mut config = Config::from_env().context("Invalid PECHA_* configuration")?;
    if let Some(work_dir) = cli.work_dir {
        config.work_dir = work_dir;
    }

    let bundle = PechaBundle::load(&cli.bundle)
        .await
        .with_context(|| format!("Failed to load bundle {}", cli.bundle.display()))?;
    let pecha_id = bundle.pecha_id.clone();
    let title = bundle.metadata.title.clone();
    tracing::info!("Serializing {} ({} layers)", pecha_id, bundle.layers.len());

    let serializer = bundle.into_serializer()?;
    let rendered = if cli.parallel {
        serializer.render_document_parallel().await?
    } else {
        serializer.render_document()?
    };

    let exporter = EbookExporter::new(&config)?;
    let path = if cli.html_only {
        exporter.write_html(&pecha_id, &rendered, &title).await?
    } else {
        exporter.export(&pecha_id, &rendered, &title).await?
    };

    tracing::info!("Done: {}", path.display());
    Ok(())
}
