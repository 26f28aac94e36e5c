//! Annotation layer model
//!
//! - `types`: typed annotations, spans, and their markup payloads
//! - `span`: volume offset table and volume-to-text span adaptation
//! - `layer`: named per-volume annotation collections

mod layer;
mod span;
mod types;

pub use layer::{Layer, RawLayer};
pub use span::{adapt, VolumeOffsetTable, VolumeSpan};
pub use types::{Annotation, AnnotationKind, Payload, RawAnnotation, TextSpan};
