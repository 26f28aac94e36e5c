//! Per-volume insertion buffer
//!
//! Records which markup fragments go in front of which character of a base
//! text, then splices them in with a single walk over the text.

use std::collections::BTreeMap;

use crate::error::{Result, SerializeError};

/// Fragments queued in front of one character position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Insertions {
    /// Closing fragments, in recording order
    pub ends: Vec<String>,
    /// Opening fragments, in recording order
    pub starts: Vec<String>,
}

impl Insertions {
    /// Closing fragments go out first so spans ending here close before
    /// spans starting here open.
    fn write_to(&self, out: &mut String) {
        for fragment in self.ends.iter().chain(&self.starts) {
            out.push_str(fragment);
        }
    }

    fn char_len(&self) -> usize {
        self.ends
            .iter()
            .chain(&self.starts)
            .map(|f| f.chars().count())
            .sum()
    }
}

/// Character position -> fragments to splice in before that character
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderBuffer {
    insertions: BTreeMap<usize, Insertions>,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a fragment; nothing already queued at `position` is replaced
    pub fn push(&mut self, position: usize, is_start: bool, fragment: &str) {
        let slot = self.insertions.entry(position).or_default();
        if is_start {
            slot.starts.push(fragment.to_string());
        } else {
            slot.ends.push(fragment.to_string());
        }
    }

    pub fn at(&self, position: usize) -> Option<&Insertions> {
        self.insertions.get(&position)
    }

    pub fn is_empty(&self) -> bool {
        self.insertions.is_empty()
    }

    /// Highest position with queued fragments
    pub fn max_position(&self) -> Option<usize> {
        self.insertions.keys().next_back().copied()
    }

    /// Total characters the queued fragments add
    pub fn fragment_chars(&self) -> usize {
        self.insertions.values().map(Insertions::char_len).sum()
    }

    pub fn clear(&mut self) {
        self.insertions.clear();
    }

    /// Produce `base` with every queued fragment spliced in
    ///
    /// Position `len(base)` is valid and appends after the last character.
    /// Anything beyond fails rather than being dropped.
    pub fn splice(&self, volume_id: &str, base: &str) -> Result<String> {
        let len = base.chars().count();
        if let Some(offset) = self.max_position().filter(|&p| p > len) {
            return Err(SerializeError::OffsetOutOfRange {
                volume_id: volume_id.to_string(),
                offset,
                len,
            });
        }

        let extra: usize = self
            .insertions
            .values()
            .flat_map(|i| i.ends.iter().chain(&i.starts))
            .map(String::len)
            .sum();
        let mut out = String::with_capacity(base.len() + extra);

        let mut chars = base.chars();
        let mut cursor = 0;
        for (&position, insertions) in &self.insertions {
            out.extend(chars.by_ref().take(position - cursor));
            cursor = position;
            insertions.write_to(&mut out);
        }
        out.extend(chars);

        Ok(out)
    }
}
