use unicode_normalization::UnicodeNormalization;

use crate::error::{CmsError, CmsResult};
use crate::ident::validate_token;

/// Normalize a UTF-8 string to NFC.
pub fn normalize_nfc(input: &str) -> String {
    input.nfc().collect::<String>()
}

/// Validate a managed filename:
/// - a single non-empty token (index records are one name per line)
/// - no path separators; every managed file lives directly in the content directory
/// - '.' and '..' are not allowed
pub fn validate_filename(name: &str) -> CmsResult<()> {
    validate_token("filename", name)?;
    if name.contains('/') || name.contains('\\') {
        return Err(CmsError::invalid("filename", "path separators are not allowed"));
    }
    if name == "." || name == ".." {
        return Err(CmsError::invalid("filename", "'.' and '..' are not allowed"));
    }
    Ok(())
}

/// Validate then NFC-normalize a filename so visually identical names map to one entry.
pub fn canonical_filename(name: &str) -> CmsResult<String> {
    validate_filename(name)?;
    Ok(normalize_nfc(name))
}
