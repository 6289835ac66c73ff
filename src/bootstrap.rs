//! First-boot seeding of the writable record store.
//!
//! Deployments ship a read-only seed copy of the store. On first start it is
//! copied to the persistent writable location; after that the writable copy
//! is authoritative and is never overwritten, even by a newer seed.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use artvault_common::Error;
use tempfile::NamedTempFile;

use crate::config::StorageConfig;

/// What the bootstrap did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The seed was copied to the target.
    Copied { bytes: u64 },
    /// The target already existed and was left alone.
    AlreadyPresent,
}

/// Make sure a writable store exists at `target`, copying it from `seed` if
/// it does not.
///
/// Fails with [`Error::MissingSeed`] before touching anything when the seed is
/// absent.
pub fn seed_store(seed: &Path, target: &Path) -> Result<SeedOutcome> {
    if !seed.is_file() {
        return Err(Error::MissingSeed(seed.to_path_buf()).into());
    }

    if target.exists() {
        tracing::info!(
            target = %target.display(),
            "Writable record store already present; leaving it untouched"
        );
        return Ok(SeedOutcome::AlreadyPresent);
    }

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let content = std::fs::read(seed)
        .with_context(|| format!("Failed to read seed store: {}", seed.display()))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(&content)?;
    tmp.as_file().sync_all()?;
    tmp.persist_noclobber(target)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to write record store: {}", target.display()))?;

    let bytes = content.len() as u64;
    tracing::info!(
        seed = %seed.display(),
        target = %target.display(),
        bytes,
        "Seeded writable record store"
    );
    Ok(SeedOutcome::Copied { bytes })
}

/// Get the configured store ready before the server starts.
///
/// Seeds it when `storage.seed_path` is set. Returns `None` when no seed is
/// configured.
pub fn prepare_store(storage: &StorageConfig) -> Result<Option<SeedOutcome>> {
    let outcome = match storage.seed_path {
        Some(ref seed) => Some(seed_store(seed, &storage.store_path)?),
        None => None,
    };

    if !storage.store_path.exists() {
        tracing::warn!(
            "Record store {:?} does not exist; artwork routes will fail until it is created",
            storage.store_path
        );
    }

    Ok(outcome)
}
