//! Annotation layers
//!
//! A layer groups the annotations of one category ("pagination", "error",
//! "topic", ...) for one volume. Insertion order carries no meaning; callers
//! always see annotations re-ordered by offset.

use serde::{Deserialize, Serialize};

use super::types::{Annotation, RawAnnotation};
use crate::error::Result;

/// Named, per-volume collection of annotations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub name: String,
    pub volume_id: String,
    annotations: Vec<Annotation>,
}

/// Layer as produced by ingestion, before type dispatch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLayer {
    pub name: String,
    pub volume_id: String,
    #[serde(default)]
    pub annotations: Vec<RawAnnotation>,
}

impl Layer {
    pub fn new(name: &str, volume_id: &str) -> Self {
        Self {
            name: name.to_string(),
            volume_id: volume_id.to_string(),
            annotations: Vec::new(),
        }
    }

    pub fn insert(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    pub fn with(mut self, annotation: Annotation) -> Self {
        self.insert(annotation);
        self
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Annotations ascending by start; on equal starts the wider span comes
    /// first so enclosing markup opens before what it encloses.
    pub fn ordered(&self) -> Vec<&Annotation> {
        let mut ordered: Vec<&Annotation> = self.annotations.iter().collect();
        ordered.sort_by(|a, b| {
            a.span
                .start
                .cmp(&b.span.start)
                .then_with(|| b.span.end.cmp(&a.span.end))
        });
        ordered
    }

    /// Annotations covering `offset`, in offset order
    pub fn covering(&self, offset: usize) -> Vec<&Annotation> {
        self.ordered()
            .into_iter()
            .filter(|a| a.covers(offset))
            .collect()
    }
}

impl TryFrom<RawLayer> for Layer {
    type Error = crate::error::SerializeError;

    fn try_from(raw: RawLayer) -> Result<Self> {
        let annotations = raw
            .annotations
            .into_iter()
            .map(Annotation::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Layer {
            name: raw.name,
            volume_id: raw.volume_id,
            annotations,
        })
    }
}
