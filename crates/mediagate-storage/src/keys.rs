//! Shared key generation for storage backends.
//!
//! Key format: `uploads/{filename}`.

use crate::{StorageError, StorageResult};
use mediagate_core::constants::UPLOADS_PREFIX;

/// Generate the storage key for an uploaded file.
pub fn generate_storage_key(filename: &str) -> String {
    format!("{}/{}", UPLOADS_PREFIX, filename)
}

/// Reject keys that could escape the storage root.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if storage_key.contains("..") || storage_key.starts_with('/') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_storage_key() {
        assert_eq!(
            generate_storage_key("5f0c.mp4"),
            "uploads/5f0c.mp4".to_string()
        );
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("uploads/a.png").is_ok());
        assert!(matches!(
            validate_key("../etc/passwd"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            validate_key("/etc/passwd"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(validate_key("").is_err());
    }
}
