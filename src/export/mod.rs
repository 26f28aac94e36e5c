//! Output assembly
//!
//! Wraps rendered text in an HTML shell and hands it, with the template
//! stylesheet, to an external ebook converter.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pecha_serializer::config::Config;
//! use pecha_serializer::export::EbookExporter;
//!
//! let exporter = EbookExporter::new(&Config::default())?;
//! let epub = exporter.export("P000001", &rendered, "Title").await?;
//! ```

mod converter;
mod exporter;
mod shell;
mod template;

pub use converter::{CalibreConverter, ConversionJob, EbookConverter};
pub use exporter::{validate_pecha_id, EbookExporter};
pub use shell::{assemble, EbookMetadata};
pub use template::{HttpTemplateSource, StaticTemplate, TemplateSource};
