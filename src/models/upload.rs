//! Document upload results.

use serde::{Deserialize, Serialize};

/// Processing statistics reported by the backend after ingesting a document.
///
/// Every field is optional; the backend omits what it did not measure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadStats {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub pages_processed: Option<u32>,
    #[serde(default)]
    pub chunks_created: Option<u32>,
    #[serde(default)]
    pub processing_time_seconds: Option<f64>,
}
