//! Plain prefix-list files and their legacy-cased copies.

use crate::config::capitalize;
use crate::models::Prefix;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write one CIDR per line.
pub fn write_prefix_list(path: &Path, prefixes: &[Prefix]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for prefix in prefixes {
        writeln!(writer, "{prefix}")?;
    }
    writer.flush()?;
    log::debug!("Wrote {} prefixes to {}", prefixes.len(), path.display());
    Ok(())
}

/// Sibling path with a capitalised file name (`IPv4/meta.lst` -> `IPv4/Meta.lst`).
pub fn legacy_copy_path(path: &Path) -> Option<PathBuf> {
    let file_name = path.file_name()?.to_str()?;
    Some(path.with_file_name(capitalize(file_name)))
}

/// True when both paths exist and name the same file, e.g. `meta.lst` and
/// `Meta.lst` on a case-insensitive filesystem.
#[cfg(unix)]
fn is_same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    match (std::fs::metadata(a), std::fs::metadata(b)) {
        (Ok(ma), Ok(mb)) => ma.dev() == mb.dev() && ma.ino() == mb.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn is_same_file(a: &Path, b: &Path) -> bool {
    let names_match = match (a.file_name(), b.file_name()) {
        (Some(na), Some(nb)) => na.eq_ignore_ascii_case(nb),
        _ => false,
    };
    names_match && b.exists()
}

/// Copy `path` to its legacy-cased name and return the new path.
///
/// Nothing is copied when the name is already in legacy case, or when the
/// filesystem resolves both names to the same file.
pub fn copy_legacy(path: &Path) -> io::Result<Option<PathBuf>> {
    let legacy = legacy_copy_path(path).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("no file name in {}", path.display()),
        )
    })?;
    if legacy == path || is_same_file(path, &legacy) {
        log::debug!("Legacy name {} is {}, not copied", legacy.display(), path.display());
        return Ok(None);
    }
    std::fs::copy(path, &legacy)?;
    log::debug!("Legacy copy {} -> {}", path.display(), legacy.display());
    Ok(Some(legacy))
}
