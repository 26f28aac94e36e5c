//! Input bundle
//!
//! The JSON document ingestion hands over: the text's position in each
//! volume, the base texts, and the annotation layers recorded against them.
//!
//! ```json
//! {
//!   "pecha_id": "P000001",
//!   "metadata": { "title": "..." },
//!   "text_spans": { "v001": { "start": 120, "end": 980 } },
//!   "bases": { "v001": "..." },
//!   "bases_are_volume_texts": true,
//!   "layers": [
//!     { "name": "pagination", "volume_id": "v001", "annotations": [
//!       { "type": "pagination", "span": { "start": 120, "end": 400 },
//!         "page_index": "1a", "page_info": "" }
//!     ] }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::annotations::{Layer, RawLayer, VolumeOffsetTable};
use crate::error::{Result, SerializeError};
use crate::export::EbookMetadata;
use crate::render::PechaSerializer;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PechaBundle {
    pub pecha_id: String,
    #[serde(default)]
    pub metadata: EbookMetadata,
    pub text_spans: VolumeOffsetTable,
    /// Volume id -> base text
    pub bases: BTreeMap<String, String>,
    /// `bases` hold whole volume texts that still need the text cut out
    #[serde(default)]
    pub bases_are_volume_texts: bool,
    #[serde(default)]
    pub layers: Vec<RawLayer>,
}

impl PechaBundle {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json(&json)
    }

    /// Serializer with every base attached and every layer applied
    pub fn into_serializer(self) -> Result<PechaSerializer> {
        let mut serializer = PechaSerializer::new(self.text_spans);

        for (volume_id, base) in self.bases {
            let base = if self.bases_are_volume_texts {
                serializer
                    .table()
                    .get(&volume_id)
                    .ok_or_else(|| SerializeError::UnknownVolume(volume_id.clone()))?
                    .extract(&base)?
            } else {
                base
            };
            serializer.add_volume(&volume_id, base)?;
        }

        let mut applied = 0;
        for raw in self.layers {
            let layer = Layer::try_from(raw)?;
            applied += serializer.apply_layer(&layer)?;
        }
        tracing::info!(
            "Applied {} annotations across {} volumes",
            applied,
            serializer.table().len()
        );

        Ok(serializer)
    }
}
