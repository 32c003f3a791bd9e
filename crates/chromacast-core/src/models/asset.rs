use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// A remote asset as described by the media cloud.
///
/// Only the fields the service relies on are typed. Everything else the cloud
/// attaches (version, tags, eager results...) is kept in `extra` so that a
/// listing can be forwarded to clients without losing information.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct MediaAsset {
    /// Opaque identifier assigned by the media cloud
    pub public_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Folder the asset is grouped under, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// HTTPS delivery URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Duration in seconds (video and audio only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, JsonValue>,
}

impl MediaAsset {
    pub fn new(public_id: impl Into<String>) -> Self {
        Self {
            public_id: public_id.into(),
            resource_type: None,
            format: None,
            folder: None,
            url: None,
            secure_url: None,
            width: None,
            height: None,
            duration: None,
            bytes: None,
            created_at: None,
            extra: BTreeMap::new(),
        }
    }

    /// Whether the asset is grouped under a managed folder.
    ///
    /// The cloud reports an empty string for assets stored at the root, so
    /// that case counts as "no folder".
    pub fn is_in_folder(&self) -> bool {
        self.folder.as_deref().is_some_and(|f| !f.is_empty())
            || self.public_id.contains('/')
    }
}

/// Per-id outcome of a delete call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct DeleteConfirmation {
    /// Map of public id to the cloud's status string ("deleted", "not_found", ...)
    #[serde(default)]
    pub deleted: BTreeMap<String, String>,
}

impl DeleteConfirmation {
    pub fn was_deleted(&self, public_id: &str) -> bool {
        self.deleted.get(public_id).map(String::as_str) == Some("deleted")
    }
}
