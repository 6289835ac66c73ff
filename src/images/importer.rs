//! Embeds per-record image files into the record store.
//!
//! Each record's image is looked up as `<images_dir>/<00042>.jpg`. When the
//! file exists its bytes are stored inline as a `data:image/jpeg;base64,`
//! URI and the legacy `imagePath` reference is dropped. Records without a
//! file are left as they are and counted as missing.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use artvault_common::paths::{image_file_path, IMAGE_MIME_TYPE};
use artvault_common::RecordId;

use super::data_uri;
use crate::store::{ArtworkRecord, RecordStore};

/// Outcome of an import pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Records examined.
    pub total: usize,
    /// Records that received an embedded image.
    pub updated: usize,
    /// Records with no image file on disk.
    pub missing: usize,
}

/// Reads per-record image files from a directory.
pub struct ImageImporter {
    images_dir: PathBuf,
}

impl ImageImporter {
    /// Create an importer reading from `images_dir`.
    pub fn new(images_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
        }
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Path where the image for `id` is expected, or `None` when the id
    /// cannot name a file inside the image directory.
    pub fn image_path(&self, id: &RecordId) -> Option<PathBuf> {
        image_file_path(&self.images_dir, id)
    }

    /// Embed image files into `records` in place.
    ///
    /// A missing file is not an error, and neither is an id that cannot name a
    /// file in the directory; both are counted as missing. Any other read
    /// failure aborts the pass.
    pub fn import_records(&self, records: &mut [ArtworkRecord]) -> Result<ImportReport> {
        let mut report = ImportReport {
            total: records.len(),
            ..Default::default()
        };

        for record in records.iter_mut() {
            let Some(path) = self.image_path(&record.record_id) else {
                tracing::warn!(
                    record_id = %record.record_id,
                    "Record id cannot name an image file; skipping"
                );
                report.missing += 1;
                continue;
            };
            let bytes = match std::fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!(
                        record_id = %record.record_id,
                        path = %path.display(),
                        "No image file for record"
                    );
                    report.missing += 1;
                    continue;
                }
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to read image file: {}", path.display()))
                }
            };

            record.image_base64 = Some(data_uri::encode(IMAGE_MIME_TYPE, &bytes));
            record.image_path = None;
            report.updated += 1;

            tracing::debug!(
                record_id = %record.record_id,
                bytes = bytes.len(),
                "Embedded image file"
            );
        }

        Ok(report)
    }

    /// Load the store, embed image files, and write it back if any record
    /// was updated.
    pub fn import_store(&self, store: &RecordStore, dry_run: bool) -> Result<ImportReport> {
        let mut records = store
            .records()
            .with_context(|| format!("Failed to load record store: {}", store.path().display()))?;

        let report = self.import_records(&mut records)?;

        if report.missing > 0 {
            tracing::warn!(
                missing = report.missing,
                images_dir = %self.images_dir.display(),
                "Some records have no image file"
            );
        }

        if report.updated == 0 {
            tracing::info!(total = report.total, "No image files to embed");
            return Ok(report);
        }

        if dry_run {
            tracing::info!(
                updated = report.updated,
                missing = report.missing,
                "Dry run: record store not written"
            );
            return Ok(report);
        }

        store
            .save(&records)
            .with_context(|| format!("Failed to write record store: {}", store.path().display()))?;

        tracing::info!(
            total = report.total,
            updated = report.updated,
            missing = report.missing,
            "Imported artwork images"
        );
        Ok(report)
    }
}
