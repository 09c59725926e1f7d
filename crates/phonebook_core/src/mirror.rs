//! Plain-text export mirror.
//!
//! # Responsibility
//! - Render contacts as `name: phone` lines.
//! - Replace the mirror file as a whole after every store mutation.
//!
//! # Invariants
//! - The mirror is always rewritten from scratch, never appended to.
//! - The target is replaced atomically via a sibling temp file, so readers see
//!   either the previous or the new content.
//! - Replacing keeps the target's permissions; a new mirror gets `0o666`
//!   minus the process umask, like a plain `File::create`.

use crate::model::contact::Contact;
use log::{error, info};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::{Builder, NamedTempFile};

#[cfg(unix)]
const NEW_MIRROR_MODE: u32 = 0o666;

/// Renders contacts in the given order, one `\n`-terminated line each.
pub fn render_mirror(contacts: &[Contact]) -> String {
    let mut rendered = String::new();
    for contact in contacts {
        rendered.push_str(&contact.mirror_line());
        rendered.push('\n');
    }
    rendered
}

/// Overwrites the mirror file at `path` with the rendered `contacts`.
///
/// # Errors
/// - Returns an I/O error when the parent directory is missing or not
///   writable, or when the final rename fails.
pub fn write_mirror(path: &Path, contacts: &[Contact]) -> io::Result<()> {
    let result = replace_file(path, render_mirror(contacts).as_bytes());
    match &result {
        Ok(()) => info!(
            "event=mirror_write module=mirror status=ok lines={}",
            contacts.len()
        ),
        Err(err) => error!(
            "event=mirror_write module=mirror status=error error_code=mirror_write_failed error={}",
            err
        ),
    }
    result
}

fn replace_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = stage_in(dir)?;
    match fs::metadata(path) {
        Ok(existing) => staged.as_file().set_permissions(existing.permissions())?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    staged.write_all(contents)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|err| err.error)?;
    Ok(())
}

// tempfile defaults to 0o600; the creation mode is still masked by umask.
fn stage_in(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(".mirror-");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(NEW_MIRROR_MODE));
    }
    builder.tempfile_in(dir)
}
