//! Caption lists read from text files.
//!
//! One caption per line. Lines are trimmed and blank lines are skipped, so a
//! file can be formatted freely.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No captions found in {0}")]
    Empty(PathBuf),
    #[error("Found {found} captions, need at least {needed}")]
    NotEnough { found: usize, needed: usize },
}

/// Split file contents into captions.
pub fn parse_captions(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read captions from `path`. Fails if the file holds none.
pub fn read_captions(path: &Path) -> Result<Vec<String>, CaptionError> {
    let content = fs::read_to_string(path)?;
    let captions = parse_captions(&content);
    if captions.is_empty() {
        return Err(CaptionError::Empty(path.to_path_buf()));
    }
    Ok(captions)
}

/// Keep the first `count` captions, failing if there are fewer.
pub fn take_captions(mut captions: Vec<String>, count: usize) -> Result<Vec<String>, CaptionError> {
    if captions.len() < count {
        return Err(CaptionError::NotEnough {
            found: captions.len(),
            needed: count,
        });
    }
    captions.truncate(count);
    Ok(captions)
}
