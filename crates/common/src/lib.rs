//! Common utilities and shared types for beanbook.
//!
//! This crate provides foundational components used across all beanbook crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Authentication**: Signed identity tokens via [`Authenticator`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Storage**: Blob storage backend for uploaded images
//!
//! # Example
//!
//! ```no_run
//! use beanbook_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod id;
pub mod storage;

pub use auth::Authenticator;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use storage::{LocalStorage, StorageBackend, StoredFile, generate_storage_key};
