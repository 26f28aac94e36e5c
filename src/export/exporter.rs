//! Ebook export
//!
//! Writes the assembled HTML next to a freshly fetched stylesheet, runs the
//! converter, and removes both intermediate files whatever the outcome.
//! Only `{pecha_id}.{ext}` is left in the working directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::converter::{CalibreConverter, ConversionJob, EbookConverter};
use super::shell::assemble;
use super::template::{HttpTemplateSource, TemplateSource};
use crate::config::{Config, EbookStyle};
use crate::error::{Result, SerializeError};

/// Intermediate files that must not outlive an export
struct WorkingFiles {
    paths: Vec<PathBuf>,
}

impl WorkingFiles {
    fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    async fn cleanup(self) {
        for path in &self.paths {
            match tokio::fs::remove_file(path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!("Failed to remove {}: {}", path.display(), e),
            }
        }
    }
}

/// Assembles rendered text and converts it to an ebook
pub struct EbookExporter {
    work_dir: PathBuf,
    output_ext: String,
    style: EbookStyle,
    template: Arc<dyn TemplateSource>,
    converter: Arc<dyn EbookConverter>,
}

impl EbookExporter {
    /// Exporter fetching the stylesheet over HTTP and converting with calibre
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_backends(
            config,
            Arc::new(HttpTemplateSource::new(&config.template)?),
            Arc::new(CalibreConverter::new(&config.converter)),
        ))
    }

    pub fn with_backends(
        config: &Config,
        template: Arc<dyn TemplateSource>,
        converter: Arc<dyn EbookConverter>,
    ) -> Self {
        Self {
            work_dir: config.work_dir.clone(),
            output_ext: config.converter.output_ext.clone(),
            style: config.style.clone(),
            template,
            converter,
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn html_path(&self, pecha_id: &str) -> PathBuf {
        self.work_dir.join(format!("{}.html", pecha_id))
    }

    pub fn output_path(&self, pecha_id: &str) -> PathBuf {
        self.work_dir.join(format!("{}.{}", pecha_id, self.output_ext))
    }

    fn stylesheet_path(&self, pecha_id: &str) -> PathBuf {
        self.work_dir.join(format!("{}-template.css", pecha_id))
    }

    /// Write only the assembled HTML document and keep it
    pub async fn write_html(&self, pecha_id: &str, rendered: &str, title: &str) -> Result<PathBuf> {
        validate_pecha_id(pecha_id)?;
        let path = self.html_path(pecha_id);
        tokio::fs::write(&path, assemble(rendered, title, &self.style.paragraph_class)).await?;
        tracing::info!("Wrote {}", path.display());
        Ok(path)
    }

    /// Assemble, convert, and clean up; returns the ebook path
    pub async fn export(&self, pecha_id: &str, rendered: &str, title: &str) -> Result<PathBuf> {
        validate_pecha_id(pecha_id)?;

        let job = ConversionJob {
            input: self.html_path(pecha_id),
            output: self.output_path(pecha_id),
            extra_css: self.stylesheet_path(pecha_id),
        };
        let working = WorkingFiles::new(vec![job.input.clone(), job.extra_css.clone()]);

        let outcome = self.run(&job, rendered, title).await;
        working.cleanup().await;

        match &outcome {
            Ok(()) => tracing::info!("Exported {} to {}", pecha_id, job.output.display()),
            Err(e) => tracing::warn!("Export of {} failed: {}", pecha_id, e),
        }
        outcome.map(|()| job.output)
    }

    async fn run(&self, job: &ConversionJob, rendered: &str, title: &str) -> Result<()> {
        let document = assemble(rendered, title, &self.style.paragraph_class);
        tokio::fs::write(&job.input, document).await?;

        let stylesheet = self.template.fetch().await?;
        tokio::fs::write(&job.extra_css, stylesheet).await?;

        self.converter.convert(job, &self.style).await
    }
}

/// Pecha ids become file names, so only `[A-Za-z0-9_-]` is accepted
pub fn validate_pecha_id(pecha_id: &str) -> Result<()> {
    let valid = !pecha_id.is_empty()
        && pecha_id.len() <= 64
        && pecha_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(SerializeError::InvalidPechaId(pecha_id.to_string()))
    }
}
