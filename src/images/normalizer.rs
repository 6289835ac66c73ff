//! Strips `data:` URI prefixes from inline record images.
//!
//! A record whose `imageBase64` is a complete `data:<mime>;base64,<payload>`
//! URI is rewritten to hold only `<payload>`, with `<mime>` moved into
//! `imageMimeType`. Every other record is left alone, so running the
//! normalizer twice changes nothing the second time.

use anyhow::{Context, Result};

use super::data_uri::DataUri;
use crate::store::{ArtworkRecord, RecordStore};

/// Outcome of a normalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Records examined.
    pub total: usize,
    /// Records whose image field was rewritten.
    pub modified: usize,
}

/// Normalize a single record. Returns whether it changed.
pub fn normalize_record(record: &mut ArtworkRecord) -> bool {
    let Some(image) = record.image_base64.as_deref() else {
        return false;
    };
    let Some(uri) = DataUri::parse(image) else {
        return false;
    };

    let mime_type = uri.mime_type.to_string();
    let payload = uri.payload.to_string();

    tracing::debug!(
        record_id = %record.record_id,
        mime_type = %mime_type,
        "Stripping data URI prefix"
    );

    record.image_base64 = Some(payload);
    record.image_mime_type = Some(mime_type);
    true
}

/// Normalize every record in place.
pub fn normalize_records(records: &mut [ArtworkRecord]) -> NormalizeReport {
    let mut report = NormalizeReport {
        total: records.len(),
        modified: 0,
    };
    for record in records.iter_mut() {
        if normalize_record(record) {
            report.modified += 1;
        }
    }
    report
}

/// Load the store, normalize it, and write it back if anything changed.
pub fn normalize_store(store: &RecordStore, dry_run: bool) -> Result<NormalizeReport> {
    let mut records = store
        .records()
        .with_context(|| format!("Failed to load record store: {}", store.path().display()))?;

    let report = normalize_records(&mut records);

    if report.modified == 0 {
        tracing::info!(total = report.total, "No image prefixes to strip");
        return Ok(report);
    }

    if dry_run {
        tracing::info!(
            total = report.total,
            modified = report.modified,
            "Dry run: record store not written"
        );
        return Ok(report);
    }

    store
        .save(&records)
        .with_context(|| format!("Failed to write record store: {}", store.path().display()))?;

    tracing::info!(
        total = report.total,
        modified = report.modified,
        "Normalized record store images"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn store_with(dir: &tempfile::TempDir, value: Value) -> RecordStore {
        let path = dir.path().join("art_database.json");
        std::fs::write(&path, value.to_string()).unwrap();
        RecordStore::new(path)
    }

    fn read_json(store: &RecordStore) -> Value {
        serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap()
    }

    #[test]
    fn test_normalize_record_strips_prefix() {
        let mut record = ArtworkRecord::new(1).with_image("data:image/png;base64,AAAA");
        assert!(normalize_record(&mut record));
        assert_eq!(record.image_base64.as_deref(), Some("AAAA"));
        assert_eq!(record.image_mime_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn test_normalize_record_leaves_plain_base64() {
        let mut record = ArtworkRecord::new(1).with_image("AAAA");
        assert!(!normalize_record(&mut record));
        assert_eq!(record, ArtworkRecord::new(1).with_image("AAAA"));
    }

    #[test]
    fn test_normalize_record_leaves_comma_without_prefix() {
        let mut record = ArtworkRecord::new(1).with_image("header,AAAA");
        assert!(!normalize_record(&mut record));
        assert_eq!(record.image_base64.as_deref(), Some("header,AAAA"));
        assert_eq!(record.image_mime_type, None);
    }

    #[test]
    fn test_normalize_record_without_image() {
        let mut record = ArtworkRecord::new(1);
        assert!(!normalize_record(&mut record));
    }

    #[test]
    fn test_normalize_records_counts() {
        let mut records = vec![
            ArtworkRecord::new(1).with_image("data:image/png;base64,AAAA"),
            ArtworkRecord::new(2).with_image("BBBB"),
            ArtworkRecord::new(3),
            ArtworkRecord::new(4).with_image("data:image/jpeg;base64,CCCC"),
        ];
        let report = normalize_records(&mut records);
        assert_eq!(report, NormalizeReport { total: 4, modified: 2 });
        assert_eq!(records[3].image_mime_type.as_deref(), Some("image/jpeg"));
    }

    #[test]
    fn test_normalize_store_rewrites_prefixed_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(
            &dir,
            json!([{"recordId": 1, "imageBase64": "data:image/png;base64,AAAA"}]),
        );

        let report = normalize_store(&store, false).unwrap();
        assert_eq!(report.modified, 1);
        assert_eq!(
            read_json(&store),
            json!([{"recordId": 1, "imageBase64": "AAAA", "imageMimeType": "image/png"}])
        );
    }

    #[test]
    fn test_normalize_store_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(
            &dir,
            json!([
                {"recordId": 1, "imageBase64": "data:image/png;base64,AAAA", "title": "Dawn"},
                {"recordId": 2, "imageBase64": "BBBB"}
            ]),
        );

        normalize_store(&store, false).unwrap();
        let once = std::fs::read(store.path()).unwrap();

        let report = normalize_store(&store, false).unwrap();
        assert_eq!(report.modified, 0);
        assert_eq!(std::fs::read(store.path()).unwrap(), once);
    }

    #[test]
    fn test_normalize_store_clean_store_is_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        // Compact formatting would be replaced by pretty output on any write.
        let content = r#"[{"recordId":1,"imageBase64":"AAAA"}]"#;
        let path = dir.path().join("art_database.json");
        std::fs::write(&path, content).unwrap();
        let store = RecordStore::new(&path);

        let report = normalize_store(&store, false).unwrap();
        assert_eq!(report, NormalizeReport { total: 1, modified: 0 });
        assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_normalize_store_dry_run() {
        let dir = tempfile::tempdir().unwrap();
        let original = json!([{"recordId": 1, "imageBase64": "data:image/png;base64,AAAA"}]);
        let store = store_with(&dir, original.clone());

        let report = normalize_store(&store, true).unwrap();
        assert_eq!(report.modified, 1);
        assert_eq!(read_json(&store), original);
    }

    #[test]
    fn test_normalize_store_migrates_legacy_shape() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(
            &dir,
            json!({"records": [{"recordId": 5, "imageBase64": "data:image/webp;base64,DDDD"}]}),
        );

        normalize_store(&store, false).unwrap();
        assert_eq!(
            read_json(&store),
            json!([{"recordId": 5, "imageBase64": "DDDD", "imageMimeType": "image/webp"}])
        );
    }

    #[test]
    fn test_normalize_store_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("art_database.json");
        std::fs::write(&path, "[{").unwrap();
        let err = normalize_store(&RecordStore::new(&path), false).unwrap_err();
        assert!(err.to_string().contains("Failed to load record store"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[{");
    }
}
