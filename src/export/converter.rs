//! External ebook converter
//!
//! Conversion is delegated to calibre's `ebook-convert`. Arguments are always
//! passed as an argv array, never through a shell, so titles and paths with
//! quotes or spaces cannot break the command line.
//!
//! ## Requirements
//!
//! - `ebook-convert` must be installed and available in PATH (or configured
//!   through `PECHA_CONVERTER`)

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::{ConverterConfig, EbookStyle};
use crate::error::{Result, SerializeError};

/// Files involved in one conversion
#[derive(Debug, Clone)]
pub struct ConversionJob {
    /// Assembled HTML document
    pub input: PathBuf,
    /// Ebook to produce
    pub output: PathBuf,
    /// Stylesheet passed as extra CSS
    pub extra_css: PathBuf,
}

/// Turns an assembled HTML document into an ebook
#[async_trait]
pub trait EbookConverter: Send + Sync {
    async fn convert(&self, job: &ConversionJob, style: &EbookStyle) -> Result<()>;
}

/// `ebook-convert` invoked as a child process
pub struct CalibreConverter {
    program: String,
    timeout: Duration,
}

impl CalibreConverter {
    pub fn new(config: &ConverterConfig) -> Self {
        Self {
            program: config.program.clone(),
            timeout: config.timeout(),
        }
    }

    /// Argument vector for a job, program name excluded
    pub fn args(job: &ConversionJob, style: &EbookStyle) -> Vec<OsString> {
        let mut extra_css = OsString::from("--extra-css=");
        extra_css.push(&job.extra_css);

        vec![
            job.input.clone().into_os_string(),
            job.output.clone().into_os_string(),
            extra_css,
            format!("--chapter={}", style.chapter_xpath).into(),
            format!("--chapter-mark={}", style.chapter_mark).into(),
            format!("--base-font-size={}", style.base_font_size).into(),
            format!("--embed-font-family={}", style.font_family).into(),
        ]
    }

    /// Check if the converter can be launched
    pub async fn is_available(&self) -> bool {
        let result = Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        matches!(result, Ok(status) if status.success())
    }
}

#[async_trait]
impl EbookConverter for CalibreConverter {
    async fn convert(&self, job: &ConversionJob, style: &EbookStyle) -> Result<()> {
        let start_time = std::time::Instant::now();

        let child = Command::new(&self.program)
            .args(Self::args(job, style))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            // A timed-out conversion is dropped mid-wait; take the process down with it
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                SerializeError::ConversionError(format!("Failed to run {}: {}", self.program, e))
            })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| SerializeError::ConversionTimeout(self.timeout.as_secs()))?
            .map_err(|e| {
                SerializeError::ConversionError(format!("Failed to wait for {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!("{} stderr: {}", self.program, stderr.trim());
            return Err(SerializeError::ConversionError(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }

        if !tokio::fs::try_exists(&job.output).await.unwrap_or(false) {
            return Err(SerializeError::ConversionError(format!(
                "{} reported success but produced no {}",
                self.program,
                job.output.display()
            )));
        }

        tracing::info!(
            "Converted {} in {:.1}s",
            job.output.display(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(())
    }
}
