//! Output naming.
//!
//! Every rendered image keeps its source file name behind a fixed prefix:
//! `sunset.jpg` → `captioned_sunset.jpg`. The extension, and with it the
//! encoded format, is preserved.
//!
//! Each run writes into a fresh batch directory under the output root so
//! earlier runs are never overwritten:
//!
//! ```text
//! output/
//! ├── batch-001/
//! │   ├── captioned_a.jpg
//! │   └── captioned_b.png
//! └── batch-002/
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const OUTPUT_PREFIX: &str = "captioned_";
const BATCH_PREFIX: &str = "batch-";

/// Output file name for a source file name.
pub fn output_file_name(source_name: &str) -> String {
    format!("{OUTPUT_PREFIX}{source_name}")
}

/// Batch directory name for a 1-based run number.
pub fn batch_dir_name(number: u32) -> String {
    format!("{BATCH_PREFIX}{number:03}")
}

/// Create `base` if needed, then the first `batch-NNN` directory that doesn't exist yet.
pub fn create_unique_output_dir(base: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(base)?;
    for number in 1.. {
        let candidate = base.join(batch_dir_name(number));
        match fs::create_dir(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::other("batch directory numbers exhausted"))
}
