//! Layer-to-markup serializer
//!
//! Holds the base text and render buffer of every volume a text spans,
//! records annotations into the buffers, and renders the marked-up text.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::buffer::RenderBuffer;
use crate::annotations::{Annotation, Layer, VolumeOffsetTable};
use crate::error::{Result, SerializeError};

#[derive(Debug, Clone)]
struct VolumeText {
    base: Arc<str>,
    buffer: Arc<RenderBuffer>,
}

/// Renders annotation layers over per-volume base texts
#[derive(Debug, Clone)]
pub struct PechaSerializer {
    table: Arc<VolumeOffsetTable>,
    volumes: BTreeMap<String, VolumeText>,
}

impl PechaSerializer {
    pub fn new(table: impl Into<Arc<VolumeOffsetTable>>) -> Self {
        Self {
            table: table.into(),
            volumes: BTreeMap::new(),
        }
    }

    pub fn table(&self) -> &VolumeOffsetTable {
        &self.table
    }

    /// Attach the text's base text for a volume listed in the offset table
    ///
    /// Replacing a base discards anything recorded against the old one.
    pub fn add_volume(&mut self, volume_id: &str, base: impl Into<String>) -> Result<()> {
        if !self.table.contains(volume_id) {
            return Err(SerializeError::UnknownVolume(volume_id.to_string()));
        }
        let base: String = base.into();
        self.volumes.insert(
            volume_id.to_string(),
            VolumeText {
                base: Arc::from(base),
                buffer: Arc::new(RenderBuffer::new()),
            },
        );
        Ok(())
    }

    pub fn buffer(&self, volume_id: &str) -> Option<&RenderBuffer> {
        self.volumes.get(volume_id).map(|v| v.buffer.as_ref())
    }

    pub fn base_text(&self, volume_id: &str) -> Option<&str> {
        self.volumes.get(volume_id).map(|v| v.base.as_ref())
    }

    /// Record an annotation's markup against its volume's buffer
    ///
    /// The buffer is only touched once the volume is known and the span has
    /// adapted cleanly, so a failed call leaves every buffer as it was.
    /// Enclosing annotations need a non-empty span; point annotations may
    /// have `start == end`.
    pub fn apply_annotation(&mut self, volume_id: &str, annotation: &Annotation) -> Result<()> {
        let span = self.table.adapt(annotation.span, volume_id)?;
        let payload = annotation.payload();
        if !payload.is_point() && span.is_empty() {
            return Err(SerializeError::invalid_span(
                span.start as i64,
                span.end as i64,
                format!("empty {} span has nothing to enclose", annotation.kind.type_name()),
            ));
        }
        let volume = self
            .volumes
            .get_mut(volume_id)
            .ok_or_else(|| SerializeError::UnknownVolume(volume_id.to_string()))?;

        let buffer = Arc::make_mut(&mut volume.buffer);
        buffer.push(span.start, true, &payload.start);
        if let Some(end) = &payload.end {
            buffer.push(span.end, false, end);
        }
        Ok(())
    }

    /// Apply every annotation of a layer in offset order
    pub fn apply_layer(&mut self, layer: &Layer) -> Result<usize> {
        for annotation in layer.ordered() {
            self.apply_annotation(&layer.volume_id, annotation)?;
        }
        tracing::debug!(
            "Applied {} {} annotations to {}",
            layer.len(),
            layer.name,
            layer.volume_id
        );
        Ok(layer.len())
    }

    /// Drop every recorded insertion, keeping the base texts
    pub fn reset(&mut self) {
        for volume in self.volumes.values_mut() {
            Arc::make_mut(&mut volume.buffer).clear();
        }
    }

    /// Marked-up text of one volume
    pub fn render(&self, volume_id: &str) -> Result<String> {
        let volume = self
            .volumes
            .get(volume_id)
            .ok_or_else(|| SerializeError::UnknownVolume(volume_id.to_string()))?;
        let rendered = volume.buffer.splice(volume_id, &volume.base)?;
        tracing::debug!("Rendered {} ({} chars)", volume_id, rendered.chars().count());
        Ok(rendered)
    }

    /// Marked-up text of all volumes, concatenated in volume id order
    pub fn render_document(&self) -> Result<String> {
        let mut document = String::new();
        for volume_id in self.volumes.keys() {
            document.push_str(&self.render(volume_id)?);
        }
        Ok(document)
    }

    /// Same output as [`render_document`](Self::render_document), with each
    /// volume spliced on the blocking pool
    pub async fn render_document_parallel(&self) -> Result<String> {
        let handles: Vec<_> = self
            .volumes
            .iter()
            .map(|(volume_id, volume)| {
                let volume_id = volume_id.clone();
                let base = Arc::clone(&volume.base);
                let buffer = Arc::clone(&volume.buffer);
                tokio::task::spawn_blocking(move || buffer.splice(&volume_id, &base))
            })
            .collect();

        let mut document = String::new();
        for handle in handles {
            let rendered = handle
                .await
                .map_err(|e| SerializeError::Task(e.to_string()))??;
            document.push_str(&rendered);
        }
        Ok(document)
    }
}
