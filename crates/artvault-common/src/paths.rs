//! Path utilities for per-record image files.
//!
//! Artwork images live in a flat directory with one file per record, named
//! after the record id zero-padded to five characters (`00042.jpg`). The same
//! directory is served over HTTP under `/images/artworks/`.

use std::path::{Path, PathBuf};

use crate::RecordId;

/// Minimum width of the numeric part of an image file name.
pub const IMAGE_ID_WIDTH: usize = 5;

/// Extension used for per-record image files.
pub const IMAGE_EXTENSION: &str = "jpg";

/// MIME type declared when embedding per-record image files.
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

/// Largest float magnitude that still converts to an exact integer.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// Text of a record id as used in file names.
///
/// Numbers written with a fractional part of zero (`1.0`, `1e3`) name the
/// same file as their integer form.
fn id_text(id: &RecordId) -> String {
    match id {
        RecordId::Number(n) => {
            if let Some(u) = n.as_u64() {
                u.to_string()
            } else if let Some(i) = n.as_i64() {
                i.to_string()
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < MAX_EXACT_FLOAT => {
                        (f as i64).to_string()
                    }
                    _ => n.to_string(),
                }
            }
        }
        RecordId::Text(s) => s.clone(),
    }
}

/// Whether `text` can be used as a single file name component.
fn is_plain_file_name(text: &str) -> bool {
    !text.is_empty()
        && !text.contains("..")
        && !text.chars().any(|c| c == '/' || c == '\\' || c == '\0')
}

/// Render a record id as the stem of its image file name.
///
/// The id text is left-padded with `0` to [`IMAGE_ID_WIDTH`] characters.
/// Longer ids are kept whole. Returns `None` for ids that would not stay
/// inside the image directory, such as `../secret` or `a/b`.
///
/// # Examples
///
/// ```
/// use artvault_common::paths::image_file_stem;
/// use artvault_common::RecordId;
///
/// assert_eq!(image_file_stem(&RecordId::from(7)).as_deref(), Some("00007"));
/// assert_eq!(image_file_stem(&RecordId::from("31")).as_deref(), Some("00031"));
/// assert_eq!(image_file_stem(&RecordId::from(123456)).as_deref(), Some("123456"));
/// assert_eq!(image_file_stem(&RecordId::from("../secret")), None);
/// ```
pub fn image_file_stem(id: &RecordId) -> Option<String> {
    let text = id_text(id);
    if !is_plain_file_name(&text) {
        return None;
    }
    Some(format!("{:0>width$}", text, width = IMAGE_ID_WIDTH))
}

/// File name of the image belonging to a record.
///
/// # Examples
///
/// ```
/// use artvault_common::paths::image_file_name;
/// use artvault_common::RecordId;
///
/// assert_eq!(image_file_name(&RecordId::from(42)).as_deref(), Some("00042.jpg"));
/// ```
pub fn image_file_name(id: &RecordId) -> Option<String> {
    image_file_stem(id).map(|stem| format!("{}.{}", stem, IMAGE_EXTENSION))
}

/// Full path of the image belonging to a record inside `images_dir`.
pub fn image_file_path(images_dir: &Path, id: &RecordId) -> Option<PathBuf> {
    image_file_name(id).map(|name| images_dir.join(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stem(id: RecordId) -> String {
        image_file_stem(&id).unwrap()
    }

    fn parsed(json: &str) -> RecordId {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_image_file_stem_pads_numbers() {
        assert_eq!(stem(RecordId::from(0)), "00000");
        assert_eq!(stem(RecordId::from(1)), "00001");
        assert_eq!(stem(RecordId::from(99999)), "99999");
    }

    #[test]
    fn test_image_file_stem_pads_strings() {
        assert_eq!(stem(RecordId::from("12")), "00012");
        assert_eq!(stem(RecordId::from("ab")), "000ab");
    }

    #[test]
    fn test_image_file_stem_keeps_long_ids() {
        assert_eq!(stem(RecordId::from(1234567)), "1234567");
    }

    #[test]
    fn test_integral_floats_name_the_integer_file() {
        assert_eq!(stem(parsed("1.0")), "00001");
        assert_eq!(stem(parsed("1e3")), "01000");
        assert_eq!(stem(parsed("-2.0")), "000-2");
        assert_eq!(stem(parsed("1.5")), "001.5");
    }

    #[test]
    fn test_ids_escaping_the_directory_are_rejected() {
        assert_eq!(image_file_stem(&RecordId::from("../secret")), None);
        assert_eq!(image_file_stem(&RecordId::from("..")), None);
        assert_eq!(image_file_stem(&RecordId::from("a/b")), None);
        assert_eq!(image_file_stem(&RecordId::from("a\\b")), None);
        assert_eq!(image_file_stem(&RecordId::from("/etc/passwd")), None);
        assert_eq!(image_file_stem(&RecordId::from("")), None);
        assert_eq!(image_file_path(Path::new("/srv/images"), &RecordId::from("../x")), None);
    }

    #[test]
    fn test_image_file_path() {
        let path = image_file_path(Path::new("/srv/images"), &RecordId::from(3));
        assert_eq!(path, Some(PathBuf::from("/srv/images/00003.jpg")));
    }
}
