//! Pecha Serializer Library
//!
//! Renders span-based annotation layers (pagination, corrections, error
//! candidates, structural markup) over segmented base texts and exports the
//! result as an ebook.
//!
//! # Modules
//!
//! - `annotations`: typed annotations, layers, and volume offset adaptation
//! - `render`: per-volume insertion buffers and the markup serializer
//! - `export`: HTML shell assembly and external ebook conversion
//! - `bundle`: JSON input boundary tying the pieces together

pub mod annotations;
pub mod bundle;
pub mod config;
pub mod error;
pub mod export;
pub mod render;

pub use annotations::{Annotation, AnnotationKind, Layer, TextSpan, VolumeOffsetTable, VolumeSpan};
pub use bundle::PechaBundle;
pub use error::{Result, SerializeError};
pub use render::PechaSerializer;
