//! Photo checklist rules: fixed field names, image sniffing, notes limits
//! and stored file naming.

use image::ImageFormat;

use crate::dispatch::{CheckpointKind, MAX_NOTES_LENGTH};
use crate::error::CoreError;
use crate::types::DbId;

/// Multipart field names of the four mandatory photos, in order.
pub const PHOTO_FIELDS: [&str; 4] = ["photo1", "photo2", "photo3", "photo4"];

/// Multipart field name of the optional free-text notes.
pub const NOTES_FIELD: &str = "notes";

/// Sub-directory of the upload root holding checklist photos.
pub const CHECKLIST_DIR: &str = "checklist";

/// Index of `name` in [`PHOTO_FIELDS`], or `None` for any other field.
pub fn photo_slot(name: &str) -> Option<usize> {
    PHOTO_FIELDS.iter().position(|f| *f == name)
}

/// Sniff the image format of an uploaded photo from its leading bytes.
///
/// The client-supplied file name and content type are ignored; only the
/// signature counts.
pub fn sniff_photo(field: &str, data: &[u8]) -> Result<ImageFormat, CoreError> {
    if data.is_empty() {
        return Err(CoreError::Validation(format!("Photo '{field}' is empty")));
    }
    let format = image::guess_format(data).map_err(|_| {
        CoreError::Validation(format!("Photo '{field}' is not a recognised image"))
    })?;
    match format {
        ImageFormat::Jpeg
        | ImageFormat::Png
        | ImageFormat::WebP
        | ImageFormat::Gif
        | ImageFormat::Bmp
        | ImageFormat::Tiff => Ok(format),
        other => Err(CoreError::Validation(format!(
            "Photo '{field}' has unsupported format {other:?}"
        ))),
    }
}

/// File extension used when storing a photo of the given format.
pub fn extension_for(format: ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("bin")
}

/// Ensure every photo slot was filled, naming the missing fields otherwise.
pub fn require_all_photos<T>(slots: &[Option<T>; 4]) -> Result<(), CoreError> {
    let missing: Vec<&str> = PHOTO_FIELDS
        .iter()
        .zip(slots.iter())
        .filter(|(_, slot)| slot.is_none())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Checklist requires {} photos; missing: {}",
            PHOTO_FIELDS.len(),
            missing.join(", ")
        )))
    }
}

/// Trim notes, turning blank input into `None` and rejecting oversize text.
pub fn normalize_notes(notes: Option<&str>) -> Result<Option<String>, CoreError> {
    let Some(text) = notes.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    let len = text.chars().count();
    if len > MAX_NOTES_LENGTH {
        return Err(CoreError::Validation(format!(
            "Notes exceed maximum length of {MAX_NOTES_LENGTH} characters (got {len})"
        )));
    }
    Ok(Some(text.to_string()))
}

/// Relative storage path for one checklist photo.
///
/// `unique` disambiguates retries; callers pass a fresh UUID.
///
/// ```text
/// checklist/{assignment_id}_{kind}_{field}_{unique}.{ext}
/// ```
pub fn photo_relative_path(
    assignment_id: DbId,
    kind: CheckpointKind,
    field: &str,
    unique: &str,
    ext: &str,
) -> String {
    format!(
        "{CHECKLIST_DIR}/{assignment_id}_{}_{field}_{unique}.{ext}",
        kind.label()
    )
}
