//! In-memory media cloud for tests
//!
//! Records every call and answers from scripted results, so the composition
//! workflow and the HTTP handlers can be tested without network access.

use async_trait::async_trait;
use chromacast_core::models::{DeleteConfirmation, MediaAsset};
use chromacast_core::UpstreamError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::traits::{CloudResult, MediaCloud, UploadOptions};

/// A call received by [`MockMediaCloud`]
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Upload {
        source: String,
        options: UploadOptions,
    },
    Delete {
        public_ids: Vec<String>,
    },
    List,
}

#[derive(Default)]
struct MockState {
    calls: Vec<RecordedCall>,
    upload_results: VecDeque<CloudResult<MediaAsset>>,
    delete_error: Option<UpstreamError>,
    list_result: Option<CloudResult<Vec<MediaAsset>>>,
    upload_delay: Option<Duration>,
}

/// Recording media cloud
///
/// Uploads without a scripted result succeed with an asset named after the
/// source file stem (prefixed with the folder when folder grouping is on).
#[derive(Clone, Default)]
pub struct MockMediaCloud {
    state: Arc<Mutex<MockState>>,
}

impl MockMediaCloud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next upload
    pub fn push_upload(&self, result: CloudResult<MediaAsset>) -> &Self {
        self.state.lock().unwrap().upload_results.push_back(result);
        self
    }

    pub fn fail_delete(&self, error: UpstreamError) -> &Self {
        self.state.lock().unwrap().delete_error = Some(error);
        self
    }

    pub fn set_listing(&self, result: CloudResult<Vec<MediaAsset>>) -> &Self {
        self.state.lock().unwrap().list_result = Some(result);
        self
    }

    /// Make every upload sleep before answering
    pub fn delay_uploads(&self, delay: Duration) -> &Self {
        self.state.lock().unwrap().upload_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn uploads(&self) -> Vec<(String, UploadOptions)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RecordedCall::Upload { source, options } => Some((source, options)),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RecordedCall::Delete { public_ids } => Some(public_ids),
                _ => None,
            })
            .collect()
    }

    fn default_asset(source: &str, options: &UploadOptions) -> MediaAsset {
        let stem = std::path::Path::new(source)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("asset");
        let mut asset = if options.folder {
            let mut asset = MediaAsset::new(format!("videos/{}", stem));
            asset.folder = Some("videos".to_string());
            asset
        } else {
            MediaAsset::new(stem)
        };
        asset.resource_type = Some("video".to_string());
        asset
    }
}

#[async_trait]
impl MediaCloud for MockMediaCloud {
    async fn upload(&self, source: &str, options: &UploadOptions) -> CloudResult<MediaAsset> {
        let (scripted, delay) = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(RecordedCall::Upload {
                source: source.to_string(),
                options: options.clone(),
            });
            (state.upload_results.pop_front(), state.upload_delay)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        scripted.unwrap_or_else(|| Ok(Self::default_asset(source, options)))
    }

    async fn delete(&self, public_ids: &[String]) -> CloudResult<DeleteConfirmation> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RecordedCall::Delete {
            public_ids: public_ids.to_vec(),
        });
        if let Some(err) = state.delete_error.clone() {
            return Err(err);
        }
        Ok(DeleteConfirmation {
            deleted: public_ids
                .iter()
                .map(|id| (id.clone(), "deleted".to_string()))
                .collect(),
        })
    }

    async fn list(&self) -> CloudResult<Vec<MediaAsset>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RecordedCall::List);
        state.list_result.clone().unwrap_or_else(|| Ok(Vec::new()))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
