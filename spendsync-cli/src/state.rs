use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub fn spendsync_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".spendsync"))
}

pub fn ensure_spendsync_home() -> Result<PathBuf> {
    let dir = spendsync_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Statement text from a file already extracted from the PDF.
///
/// A missing or unreadable file counts as an empty statement.
pub fn read_statement(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            warn!(path = %path.display(), %e, "statement unreadable, treating as empty");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_statement_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_statement(&dir.path().join("nope.txt")), "");

        let p = dir.path().join("gpay.txt");
        fs::write(&p, "01Oct,2025\n").unwrap();
        assert_eq!(read_statement(&p), "01Oct,2025\n");
    }
}
