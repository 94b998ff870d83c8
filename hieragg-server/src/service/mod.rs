//! Service Layer
//!
//! Upload handling and calls into the discovery engine.

pub mod discovery;
pub mod upload;

pub use discovery as discovery_service;
pub use upload as upload_service;
