//! Shared checks for external tool invocation.

use anyhow::{anyhow, Result};

/// Reject executable paths carrying shell metacharacters or traversal sequences.
pub(crate) fn validate_executable_path(path: &str) -> Result<()> {
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.is_empty() {
        return Err(anyhow!("Executable path is empty"));
    }
    if path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(anyhow!("Path contains dangerous characters: {}", path));
    }
    if path.contains("..") {
        return Err(anyhow!("Path contains directory traversal: {}", path));
    }
    Ok(())
}
