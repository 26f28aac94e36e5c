//! Volume offset table and span adaptation
//!
//! Annotation spans arrive relative to the start of a whole volume's base
//! text. A text usually occupies only part of a volume, so before rendering
//! each span is shifted by the offset at which the text starts in that volume.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::TextSpan;
use crate::error::{Result, SerializeError};

/// Where a text sits inside one volume's base text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeSpan {
    pub start: usize,
    /// Exclusive end within the volume base, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
}

impl VolumeSpan {
    pub fn new(start: usize) -> Self {
        Self { start, end: None }
    }

    pub fn with_end(start: usize, end: usize) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// Cut this text's base out of the full volume base text
    ///
    /// Without an `end` the text runs to the end of the volume.
    pub fn extract(&self, volume_base: &str) -> Result<String> {
        let volume_len = volume_base.chars().count();
        let end = self.end.unwrap_or(volume_len);
        if self.start > end || end > volume_len {
            return Err(SerializeError::invalid_span(
                self.start as i64,
                end as i64,
                format!("outside volume base of length {}", volume_len),
            ));
        }
        Ok(volume_base
            .chars()
            .skip(self.start)
            .take(end - self.start)
            .collect())
    }
}

/// Volume id -> position of the text within that volume
///
/// Built once when volumes are gathered and read-only afterwards, so it can
/// be shared across per-volume rendering tasks behind an `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolumeOffsetTable {
    volumes: BTreeMap<String, VolumeSpan>,
}

impl VolumeOffsetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a volume
    pub fn with_volume(mut self, volume_id: &str, span: VolumeSpan) -> Self {
        self.volumes.insert(volume_id.to_string(), span);
        self
    }

    pub fn get(&self, volume_id: &str) -> Option<&VolumeSpan> {
        self.volumes.get(volume_id)
    }

    pub fn contains(&self, volume_id: &str) -> bool {
        self.volumes.contains_key(volume_id)
    }

    /// Volume ids in identifier order
    pub fn volume_ids(&self) -> impl Iterator<Item = &str> {
        self.volumes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// Re-anchor a volume-relative span to the text's own coordinates
    pub fn adapt(&self, span: TextSpan, volume_id: &str) -> Result<TextSpan> {
        let volume = self
            .get(volume_id)
            .ok_or_else(|| SerializeError::UnknownVolume(volume_id.to_string()))?;
        adapt(span, volume)
    }
}

impl FromIterator<(String, VolumeSpan)> for VolumeOffsetTable {
    fn from_iter<I: IntoIterator<Item = (String, VolumeSpan)>>(iter: I) -> Self {
        Self {
            volumes: iter.into_iter().collect(),
        }
    }
}

/// Shift `span` left by the volume's start offset
pub fn adapt(span: TextSpan, volume: &VolumeSpan) -> Result<TextSpan> {
    let start = span.start as i64 - volume.start as i64;
    let end = span.end as i64 - volume.start as i64;
    if start < 0 {
        return Err(SerializeError::invalid_span(
            start,
            end,
            "starts before the text",
        ));
    }
    if end < start {
        return Err(SerializeError::invalid_span(start, end, "ends before it starts"));
    }
    Ok(TextSpan::new(start as usize, end as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> VolumeOffsetTable {
        VolumeOffsetTable::new()
            .with_volume("v1", VolumeSpan::new(100))
            .with_volume("v2", VolumeSpan::with_end(0, 40))
    }

    #[test]
    fn test_adapt_shifts_by_volume_start() {
        let adapted = table().adapt(TextSpan::new(120, 130), "v1").unwrap();
        assert_eq!(adapted, TextSpan::new(20, 30));
    }

    #[test]
    fn test_adapt_is_offset_difference() {
        let table = table();
        for (start, end) in [(100, 100), (100, 250), (512, 900)] {
            let adapted = table.adapt(TextSpan::new(start, end), "v1").unwrap();
            assert_eq!(adapted.start, start - 100);
            assert_eq!(adapted.end, end - 100);
        }
    }

    #[test]
    fn test_adapt_unknown_volume() {
        let result = table().adapt(TextSpan::new(0, 1), "v9");
        assert!(matches!(result, Err(SerializeError::UnknownVolume(v)) if v == "v9"));
    }

    #[test]
    fn test_adapt_before_text_start() {
        let result = table().adapt(TextSpan::new(90, 110), "v1");
        assert!(matches!(result, Err(SerializeError::InvalidSpan { start: -10, .. })));
    }

    #[test]
    fn test_adapt_inverted_span() {
        let result = table().adapt(TextSpan::new(130, 120), "v1");
        assert!(matches!(result, Err(SerializeError::InvalidSpan { .. })));
    }

    #[test]
    fn test_extract_counts_chars() {
        let span = VolumeSpan::with_end(2, 5);
        assert_eq!(span.extract("ཀཁགངཅཆ").unwrap(), "གངཅ");
        assert_eq!(VolumeSpan::new(3).extract("hello").unwrap(), "lo");
    }

    #[test]
    fn test_extract_past_volume_end() {
        let result = VolumeSpan::with_end(2, 50).extract("short");
        assert!(matches!(result, Err(SerializeError::InvalidSpan { .. })));
    }

    #[test]
    fn test_table_deserializes_from_map() {
        let table: VolumeOffsetTable =
            serde_json::from_str(r#"{"v002": {"start": 7}, "v001": {"start": 0, "end": 12}}"#)
                .unwrap();

        assert_eq!(table.volume_ids().collect::<Vec<_>>(), vec!["v001", "v002"]);
        assert_eq!(table.get("v001"), Some(&VolumeSpan::with_end(0, 12)));
    }
}
