//! Image payload maintenance for the record store.
//!
//! Records carry their image inline as base64. Over time two encodings ended
//! up in the store: raw base64 and `data:<mime>;base64,<payload>` URIs. The
//! [`importer`] embeds per-record image files as data URIs; the
//! [`normalizer`] strips those prefixes back off into a separate MIME field.

pub mod data_uri;
pub mod importer;
pub mod normalizer;

pub use data_uri::DataUri;
pub use importer::{ImageImporter, ImportReport};
pub use normalizer::{normalize_records, normalize_store, NormalizeReport};
