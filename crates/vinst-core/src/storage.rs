//! File lifecycle: staged writes and atomic replacement.
//!
//! Nothing is ever written in place. New content goes to a `.part` sibling,
//! is synced, and is renamed over the final name, so readers of the final
//! path only ever see a complete old file or a complete new file.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Mode for installed binaries: rwx for owner, rx for group and other.
pub const EXECUTABLE_MODE: u32 = 0o755;

/// Path for the temp file: appends `.part` to the final path (e.g. `ctrld` → `ctrld.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// A file being written under its `.part` name. Dropping it without
/// [`StagedFile::commit`] removes the partial file.
pub struct StagedFile {
    writer: Option<BufWriter<File>>,
    temp_path: PathBuf,
    final_path: PathBuf,
}

impl StagedFile {
    /// Create (or truncate) `<final_path>.part`.
    pub fn create(final_path: &Path) -> io::Result<Self> {
        let temp_path = temp_path(final_path);
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        Ok(StagedFile {
            writer: Some(BufWriter::new(file)),
            temp_path,
            final_path: final_path.to_path_buf(),
        })
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Append `data` to the staged file.
    pub fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(w) => w.write_all(data),
            None => Err(io::Error::new(io::ErrorKind::Other, "staged file already closed")),
        }
    }

    /// Set permission bits on the staged file before it becomes visible.
    pub fn set_mode(&self, mode: u32) -> io::Result<()> {
        set_mode(&self.temp_path, mode)
    }

    /// Flush, fsync and rename onto the final path.
    pub fn commit(mut self) -> io::Result<()> {
        let writer = match self.writer.take() {
            Some(w) => w,
            None => return Err(io::Error::new(io::ErrorKind::Other, "staged file already closed")),
        };
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);
        fs::rename(&self.temp_path, &self.final_path)?;
        // Nothing left to clean up.
        self.temp_path.clear();
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.temp_path.as_os_str().is_empty() {
            return;
        }
        self.writer.take();
        if let Err(e) = fs::remove_file(&self.temp_path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::debug!(path = %self.temp_path.display(), "failed to remove partial file: {}", e);
            }
        }
    }
}

/// How [`replace_atomically`] got the file into place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceMethod {
    /// Same filesystem: a single `rename`.
    Renamed,
    /// Different filesystems: copied to a `.part` sibling of the destination, then renamed.
    CopiedThenRenamed,
}

/// Move `src` onto `dest` atomically, leaving it with `mode`.
///
/// Tries a plain `rename` first. If `src` lives on another filesystem the
/// content is copied into `<dest>.part` and that is renamed instead; `src` is
/// kept in that case. The destination's parent directory must exist.
pub fn replace_atomically(src: &Path, dest: &Path, mode: u32) -> io::Result<ReplaceMethod> {
    set_mode(src, mode)?;
    match fs::rename(src, dest) {
        Ok(()) => Ok(ReplaceMethod::Renamed),
        Err(e) if is_cross_device(&e) => {
            tracing::debug!(
                src = %src.display(),
                dest = %dest.display(),
                "rename crosses filesystems, staging copy next to destination"
            );
            let mut staged = StagedFile::create(dest)?;
            let mut input = File::open(src)?;
            let writer = staged
                .writer
                .as_mut()
                .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "staged file already closed"))?;
            io::copy(&mut input, writer)?;
            staged.set_mode(mode)?;
            staged.commit()?;
            Ok(ReplaceMethod::CopiedThenRenamed)
        }
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn is_cross_device(e: &io::Error) -> bool {
    e.raw_os_error() == Some(libc::EXDEV)
}

#[cfg(not(unix))]
fn is_cross_device(_e: &io::Error) -> bool {
    false
}

/// Set permission bits (no-op on non-Unix).
#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
pub fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
