//! File reading, fingerprinting, atomic write-back, and backups

use log::debug;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::types::{Error, Result};

/// Suffix appended to sidecar backup files.
pub const BACKUP_SUFFIX: &str = "mdguard.bak";

/// Fingerprint of a file captured at read time.
///
/// Used by the safety pipeline to detect external writers before write-back:
/// a cheap mtime+size comparison first, then the SHA-256 hash when the cheap
/// check passes (catches sub-second overwrites that preserve size and mtime).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Absolute or caller-supplied path
    pub path: PathBuf,
    /// Unix permission bits (0o644 style); 0 on platforms without modes
    pub mode: u32,
    /// Last-modified time
    pub mtime: SystemTime,
    /// Size in bytes
    pub size: u64,
    /// Hex-encoded SHA-256 of the content
    pub sha256: String,
}

/// Hex-encoded SHA-256 over arbitrary bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = String::with_capacity(64);
    for byte in digest {
        use std::fmt::Write as _;
        let _ = write!(out, "{byte:02x}");
    }
    out
}

fn file_mode(metadata: &fs::Metadata) -> u32 {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode()
    }
    #[cfg(not(unix))]
    {
        let _ = metadata;
        0
    }
}

/// Read a file and capture its fingerprint.
///
/// The content is returned as UTF-8 text; non-UTF-8 input is a parse error
/// because the token and AST model is defined over `str`.
pub fn read_file(path: &Path) -> Result<(String, FileInfo)> {
    let metadata = fs::metadata(path).map_err(|e| Error::from_io(path, e))?;
    if metadata.is_dir() {
        return Err(Error::IsDirectory(path.to_path_buf()));
    }

    let bytes = fs::read(path).map_err(|e| Error::from_io(path, e))?;
    let sha256 = sha256_hex(&bytes);
    let content = String::from_utf8(bytes).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        message: format!("file is not valid UTF-8: {e}"),
    })?;

    let info = FileInfo {
        path: path.to_path_buf(),
        mode: file_mode(&metadata),
        mtime: metadata.modified().map_err(|e| Error::from_io(path, e))?,
        size: metadata.len(),
        sha256,
    };
    Ok((content, info))
}

/// Check whether the file on disk no longer matches a captured fingerprint.
///
/// Returns `Ok(true)` when the file was modified (or removed) since `info`
/// was captured.
pub fn modified_since(info: &FileInfo) -> Result<bool> {
    let metadata = match fs::metadata(&info.path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(Error::from_io(&info.path, e)),
    };

    let mtime = metadata.modified().map_err(|e| Error::from_io(&info.path, e))?;
    if metadata.len() != info.size || mtime != info.mtime {
        return Ok(true);
    }

    // Cheap check passed; confirm with the content hash.
    let bytes = fs::read(&info.path).map_err(|e| Error::from_io(&info.path, e))?;
    Ok(sha256_hex(&bytes) != info.sha256)
}

/// Write `content` to `path` atomically, preserving the original mode.
///
/// A sibling temp file (`<file>.tmp.*`, same directory, same filesystem) is
/// written, fsynced, chmodded, then renamed over the target. The temp file
/// is removed on every error path.
pub fn atomic_write(path: &Path, content: &str, mode: u32) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::Internal(format!("path has no file name: {}", path.display())))?;

    let mut temp = tempfile::Builder::new()
        .prefix(&format!("{file_name}.tmp."))
        .tempfile_in(dir)
        .map_err(|e| Error::from_io(path, e))?;

    temp.write_all(content.as_bytes())
        .map_err(|e| Error::from_io(path, e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| Error::from_io(path, e))?;

    #[cfg(unix)]
    if mode != 0 {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(fs::Permissions::from_mode(mode))
            .map_err(|e| Error::from_io(path, e))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    temp.persist(path)
        .map_err(|e| Error::from_io(path, e.error))?;
    debug!("wrote {} atomically", path.display());
    Ok(())
}

/// The sidecar backup path for `path`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Create a sidecar backup of `path` unless one already exists.
///
/// Idempotent: a pre-existing backup is never overwritten, so repeated fix
/// runs keep the original content. Returns `true` when a backup was created.
pub fn create_backup(path: &Path) -> Result<bool> {
    let backup = backup_path(path);
    if backup.exists() {
        debug!("backup {} already present, keeping it", backup.display());
        return Ok(false);
    }
    fs::copy(path, &backup).map_err(|e| Error::from_io(path, e))?;
    Ok(true)
}

/// Restore `path` from its sidecar backup.
pub fn restore_backup(path: &Path) -> Result<()> {
    let backup = backup_path(path);
    if !backup.exists() {
        return Err(Error::NotFound(backup));
    }
    fs::copy(&backup, path).map_err(|e| Error::from_io(path, e))?;
    Ok(())
}

/// Remove the sidecar backup for `path`, if present.
pub fn remove_backup(path: &Path) -> Result<bool> {
    let backup = backup_path(path);
    match fs::remove_file(&backup) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::from_io(&backup, e)),
    }
}
