use artvault_common::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single artwork entry in the record store.
///
/// Only the image-related fields are modelled. Everything else a record
/// carries (title, artist, valuation data, ...) is kept in `extra` and
/// written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkRecord {
    pub record_id: RecordId,

    /// Raw base64, or a `data:<mime>;base64,<payload>` URI before normalization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,

    /// MIME type split off the image payload by the normalizer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_mime_type: Option<String>,

    /// Legacy reference to an image file on disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ArtworkRecord {
    pub fn new(record_id: impl Into<RecordId>) -> Self {
        Self {
            record_id: record_id.into(),
            image_base64: None,
            image_mime_type: None,
            image_path: None,
            extra: Map::new(),
        }
    }

    pub fn with_image(mut self, image_base64: impl Into<String>) -> Self {
        self.image_base64 = Some(image_base64.into());
        self
    }

    pub fn with_image_path(mut self, image_path: impl Into<String>) -> Self {
        self.image_path = Some(image_path.into());
        self
    }
}
