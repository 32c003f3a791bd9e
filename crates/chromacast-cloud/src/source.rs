//! Upload source resolution.
//!
//! A source is either a remote `http(s)://` URL, which the provider fetches
//! itself, or a local file that is streamed in the request body.

use std::path::{Component, Path, PathBuf};

use chromacast_core::UpstreamError;
use tokio_util::io::ReaderStream;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadSource {
    Remote(String),
    Local(PathBuf),
}

impl UploadSource {
    /// Classify a source string.
    ///
    /// Local paths containing `..` are rejected.
    pub fn parse(source: &str) -> Result<Self, UpstreamError> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(UpstreamError::new("Upload source is empty"));
        }

        let lower = trimmed.to_lowercase();
        if lower.starts_with("https://") || lower.starts_with("http://") {
            return Ok(UploadSource::Remote(trimmed.to_string()));
        }

        let path = Path::new(trimmed);
        if path.components().any(|c| c == Component::ParentDir) {
            return Err(UpstreamError::new(format!(
                "Invalid upload source: {}",
                path.display()
            )));
        }
        Ok(UploadSource::Local(path.to_path_buf()))
    }

    /// File name sent along with local uploads.
    pub fn file_name(&self) -> String {
        match self {
            UploadSource::Remote(url) => url
                .rsplit('/')
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or("video.mp4")
                .to_string(),
            UploadSource::Local(path) => path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("video.mp4")
                .to_string(),
        }
    }

    /// Open a local source as a streaming request body. Remote sources yield
    /// `None`.
    pub async fn open(&self) -> Result<Option<LocalFile>, UpstreamError> {
        let path = match self {
            UploadSource::Remote(_) => return Ok(None),
            UploadSource::Local(path) => path,
        };
        let read_error =
            |e: std::io::Error| UpstreamError::new(format!("Failed to read {}: {}", path.display(), e));

        let file = tokio::fs::File::open(path).await.map_err(read_error)?;
        let len = file.metadata().await.map_err(read_error)?.len();
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));

        Ok(Some(LocalFile { body, len }))
    }
}

/// Local file opened for upload, read in chunks as the request is sent.
pub struct LocalFile {
    pub body: reqwest::Body,
    pub len: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_remote() {
        let source = UploadSource::parse("https://cdn.example.com/clips/bg.mp4").unwrap();
        assert_eq!(
            source,
            UploadSource::Remote("https://cdn.example.com/clips/bg.mp4".to_string())
        );
        assert_eq!(source.file_name(), "bg.mp4");
    }

    #[test]
    fn test_parse_local() {
        let source = UploadSource::parse("static/videos/foreground.mp4").unwrap();
        assert_eq!(
            source,
            UploadSource::Local(PathBuf::from("static/videos/foreground.mp4"))
        );
        assert_eq!(source.file_name(), "foreground.mp4");
    }

    #[test]
    fn test_parse_rejects_traversal_and_empty() {
        assert!(UploadSource::parse("../secrets/key.pem").is_err());
        assert!(UploadSource::parse("static/../../etc/passwd").is_err());
        assert!(UploadSource::parse("   ").is_err());
    }

    #[tokio::test]
    async fn test_open_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"fake video").unwrap();

        let file = UploadSource::Local(path).open().await.unwrap().unwrap();
        assert_eq!(file.len, 10);
        // streamed bodies are not buffered in memory
        assert!(file.body.as_bytes().is_none());
    }

    #[tokio::test]
    async fn test_open_missing_file_is_upstream_error() {
        let source = UploadSource::Local(PathBuf::from("does/not/exist.mp4"));
        let err = source.open().await.err().unwrap();
        assert!(err.message.contains("does/not/exist.mp4"));
        assert_eq!(err.status_code, None);
    }

    #[tokio::test]
    async fn test_open_remote_is_none() {
        let source = UploadSource::Remote("https://example.com/a.mp4".to_string());
        assert!(source.open().await.unwrap().is_none());
    }
}
