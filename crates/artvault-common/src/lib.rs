//! Artvault-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across artvault:
//!
//! - **Record IDs**: The numeric-or-string identifier carried by every artwork record
//! - **Path Utilities**: Per-record image file naming
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use artvault_common::{Error, RecordId, Result};
//! use artvault_common::paths::image_file_name;
//!
//! let id = RecordId::from(42);
//! assert_eq!(image_file_name(&id).as_deref(), Some("00042.jpg"));
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("artwork", "42"))
//! }
//! assert!(example().is_err());
//! ```

pub mod error;
pub mod ids;
pub mod paths;

pub use error::{Error, Result};
pub use ids::RecordId;
