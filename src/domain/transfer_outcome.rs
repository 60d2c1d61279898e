use serde::Serialize;

use super::{ObjectKey, RequestId};

/// Result of a single-object transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadOutcome {
    pub object_key: String,
    pub e_tag: Option<String>,
    pub url: String,
}

impl UploadOutcome {
    pub fn new(object_key: &ObjectKey, e_tag: Option<String>, url: String) -> Self {
        Self {
            object_key: object_key.as_str().to_string(),
            e_tag,
            url,
        }
    }
}

/// Result of a split-and-upload run, URLs ordered by part number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitOutcome {
    pub request_id: String,
    pub object_keys: Vec<String>,
    pub urls: Vec<String>,
    pub total_parts: usize,
}

impl SplitOutcome {
    pub fn new(request_id: &RequestId, object_keys: Vec<ObjectKey>, urls: Vec<String>) -> Self {
        Self {
            request_id: request_id.as_str().to_string(),
            total_parts: urls.len(),
            object_keys: object_keys
                .into_iter()
                .map(|k| k.as_str().to_string())
                .collect(),
            urls,
        }
    }
}
