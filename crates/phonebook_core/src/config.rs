//! Storage location configuration.
//!
//! # Responsibility
//! - Resolve the database, mirror and log locations used by the CLI.
//!
//! # Invariants
//! - Default locations live in fixed subdirectories next to the executable.
//! - Nothing here touches the file system except `current_exe` lookup.

use std::io;
use std::path::{Path, PathBuf};

pub const DB_DIR_NAME: &str = "Db_Files";
pub const DB_FILE_NAME: &str = "Directory.db";
pub const MIRROR_DIR_NAME: &str = "Text_Files";
pub const MIRROR_FILE_NAME: &str = "Directory.txt";
pub const LOG_DIR_NAME: &str = "Logs";

/// File locations for the contact database and its text mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub db_path: PathBuf,
    pub mirror_path: PathBuf,
}

impl StorePaths {
    /// Default layout rooted at `base_dir`:
    /// `Db_Files/Directory.db` and `Text_Files/Directory.txt`.
    pub fn beside(base_dir: &Path) -> Self {
        Self {
            db_path: base_dir.join(DB_DIR_NAME).join(DB_FILE_NAME),
            mirror_path: base_dir.join(MIRROR_DIR_NAME).join(MIRROR_FILE_NAME),
        }
    }
}

/// Log directory rooted at `base_dir`.
pub fn log_dir_beside(base_dir: &Path) -> PathBuf {
    base_dir.join(LOG_DIR_NAME)
}

/// Returns the absolute directory containing the running executable.
pub fn executable_dir() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("executable path `{}` has no parent", exe.display()),
        )
    })
}
