//! Request handling for s3fm, a per-user file manager on top of a single
//! object-storage bucket.
//!
//! # Architecture
//!
//! ```text
//! RequestEnvelope
//!        |
//!        v
//! FileManager::handle (preflight, auth, routing, error boundary)
//!        |
//!        v
//!   ops::* handlers (key scoping, listing filters, zip assembly)
//!        |
//!        v
//!   ObjectStore / SecretStore (in-memory, file or AWS)
//! ```

pub mod archive;
pub mod auth;
pub mod codec;
pub mod config;
pub mod error;
pub mod keys;
pub mod ops;
pub mod provider;
pub mod router;
pub mod secrets;
pub mod storage;
pub mod users;

#[cfg(test)]
mod testing;

pub use config::FileManagerConfig;
pub use provider::FileManager;
