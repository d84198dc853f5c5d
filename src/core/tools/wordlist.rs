// src/core/tools/wordlist.rs

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Written when no wordlist exists at the configured path.
pub const DEFAULT_WORDS: &[&str] = &["admin", "login", "wp-admin", "api", "test", "dev"];

/// Returns the wordlist path, creating the file (and its directory) with
/// `DEFAULT_WORDS` if it does not exist yet. An existing file is left untouched.
pub fn ensure_wordlist(path: &Path) -> io::Result<PathBuf> {
    if path.exists() {
        debug!(path = %path.display(), "Using existing wordlist.");
        return Ok(path.to_path_buf());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut contents = DEFAULT_WORDS.join("\n");
    contents.push('\n');
    fs::write(path, contents)?;
    info!(path = %path.display(), words = DEFAULT_WORDS.len(), "Created fallback wordlist.");
    Ok(path.to_path_buf())
}
