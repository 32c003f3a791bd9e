//! Chromacast API Library
//!
//! This crate provides the HTTP handlers, the composition service and
//! application setup.

mod api_doc;
mod handlers;

pub mod error;
pub mod services;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
