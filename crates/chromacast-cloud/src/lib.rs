//! Chromacast Cloud Library
//!
//! This crate provides the media cloud abstraction used by the composition
//! workflow and its Cloudinary implementation.
//!
//! # Sources
//!
//! Uploads accept either a local path or an `http(s)://` URL. Local paths must
//! not contain `..`; they are read from disk and sent in the request body.

#[cfg(feature = "cloudinary")]
pub mod cloudinary;
pub mod factory;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod source;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "cloudinary")]
pub use cloudinary::CloudinaryClient;
pub use factory::create_media_cloud;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockMediaCloud, RecordedCall};
pub use source::UploadSource;
pub use traits::{CloudResult, MediaCloud, UploadOptions};
