//! Vehicle plate normalization.

use crate::error::CoreError;

/// Normalize a Brazilian plate: strip separators and upper-case it.
///
/// Accepts both the old `ABC-1234` layout and the Mercosul `ABC1D23`
/// layout; either way the result is seven alphanumeric characters.
pub fn normalize_plate(raw: &str) -> Result<String, CoreError> {
    let plate: String = raw
        .chars()
        .filter(|c| !matches!(c, '-' | ' ' | '.'))
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if plate.len() != 7 || !plate.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CoreError::Validation(format!("Invalid vehicle plate '{raw}'")));
    }
    Ok(plate)
}
