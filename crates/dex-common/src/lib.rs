//! Dex Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the catalog harvester.
//!
//! # Overview
//!
//! - **Error Handling**: Custom error types and result types
//! - **Types**: Catalog entries, sub-resources and the effectiveness profile
//! - **Documents**: Reading and writing the JSON output documents
//! - **Logging**: Subscriber setup shared by every binary
//!
//! # Example
//!
//! ```no_run
//! use dex_common::document;
//! use dex_common::types::EntityRecord;
//! use dex_common::Result;
//!
//! fn save(records: &[EntityRecord]) -> Result<()> {
//!     document::write_json_pretty("pokemons_final.json", &records)?;
//!     Ok(())
//! }
//! ```

pub mod document;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{DexError, Result};
