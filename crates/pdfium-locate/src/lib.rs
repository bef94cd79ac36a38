//! # pdfium-locate
//!
//! Resolve and bind the PDFium dynamic library shipped inside a service
//! deployment, so that `pdfium-render` users never depend on
//! `LD_LIBRARY_PATH` / `DYLD_LIBRARY_PATH` or a system-wide install.
//!
//! ## How it works
//!
//! A deployment places the library under a fixed relative path:
//!
//! ```text
//! <install_root>/bin/dll/<library name>
//! ```
//!
//! The library name is selected by the pointer width of the host process:
//!
//! | OS      | 64-bit               | 32-bit               |
//! |---------|----------------------|----------------------|
//! | Linux   | `libpdfium64.so`     | `libpdfium32.so`     |
//! | macOS   | `libpdfium64.dylib`  | `libpdfium32.dylib`  |
//! | Windows | `pdfium64.dll`       | `pdfium32.dll`       |
//!
//! [`locate`] inspects that path and returns a [`BackendDescriptor`]. A
//! missing library is **not** an error: the descriptor comes back invalid,
//! with the directories and files that were actually on disk captured for
//! operator diagnostics. Only an inaccessible install root fails.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pdfium_locate::{locate_host, bind_descriptor};
//!
//! let descriptor = locate_host(std::path::Path::new("/srv/app"))?;
//! if descriptor.is_valid() {
//!     let pdfium = bind_descriptor(&descriptor)?;
//!     // ... render with pdfium-render ...
//! } else {
//!     eprintln!("backend missing: {}", descriptor.search_report());
//! }
//! # Ok::<(), pdfium_locate::LocateError>(())
//! ```

use std::path::{Path, PathBuf};

use pdfium_render::prelude::Pdfium;
use thiserror::Error;
use tracing::{debug, warn};

/// Fixed subdirectory of the install root that holds the native library.
pub const LIBRARY_SUBDIR: [&str; 2] = ["bin", "dll"];

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by pdfium-locate operations.
#[derive(Error, Debug)]
pub enum LocateError {
    /// The supplied install root does not exist or cannot be read.
    #[error("Install root '{path}' is not accessible: {source}")]
    RootInaccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `libloading` / `pdfium-render` could not load the library.
    #[error("Failed to bind PDFium from '{path}': {reason}")]
    Bind { path: PathBuf, reason: String },
}

// ── Architecture selection ───────────────────────────────────────────────────

/// Pointer width of the process the library must be loadable into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchBits {
    Bits32,
    Bits64,
}

impl ArchBits {
    /// The pointer width of the running process.
    pub fn host() -> Self {
        if cfg!(target_pointer_width = "64") {
            ArchBits::Bits64
        } else {
            ArchBits::Bits32
        }
    }
}

impl std::fmt::Display for ArchBits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArchBits::Bits32 => write!(f, "32-bit"),
            ArchBits::Bits64 => write!(f, "64-bit"),
        }
    }
}

/// The platform library filename for the given pointer width.
pub fn library_file_name(bits: ArchBits) -> &'static str {
    match (std::env::consts::OS, bits) {
        ("windows", ArchBits::Bits64) => "pdfium64.dll",
        ("windows", ArchBits::Bits32) => "pdfium32.dll",
        ("macos", ArchBits::Bits64) => "libpdfium64.dylib",
        ("macos", ArchBits::Bits32) => "libpdfium32.dylib",
        (_, ArchBits::Bits64) => "libpdfium64.so",
        (_, ArchBits::Bits32) => "libpdfium32.so",
    }
}

// ── Descriptor ───────────────────────────────────────────────────────────────

/// The outcome of locating the native library inside an install root.
///
/// Immutable after construction. An invalid descriptor (library file not on
/// disk) is still fully populated so callers can produce an actionable
/// message via [`BackendDescriptor::search_report`].
#[derive(Debug, Clone)]
pub struct BackendDescriptor {
    /// The install root the descriptor was resolved from.
    pub install_root: PathBuf,
    /// Expected absolute path of the native library.
    pub library_path: PathBuf,
    /// Subdirectories found next to the expected library, for diagnostics.
    pub searched_directories: Vec<PathBuf>,
    /// Files found next to the expected library, for diagnostics.
    pub searched_files: Vec<PathBuf>,
    /// Pointer width the library was selected for.
    pub bits: ArchBits,
    present: bool,
}

impl BackendDescriptor {
    /// Whether the resolved library path existed at locate time.
    pub fn is_valid(&self) -> bool {
        self.present
    }

    /// One-line listing of what the locator saw on disk, for error messages.
    pub fn search_report(&self) -> String {
        let join = |paths: &[PathBuf]| {
            paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(";")
        };
        format!(
            "expected '{}', folders: [{}], files: [{}]",
            self.library_path.display(),
            join(&self.searched_directories),
            join(&self.searched_files),
        )
    }
}

// ── Locate ───────────────────────────────────────────────────────────────────

/// Resolve the native library for the given pointer width under
/// `root/bin/dll/`.
///
/// Fails only when `root` itself is inaccessible. A missing library or an
/// unreadable `bin/dll` directory produces a descriptor with
/// `is_valid() == false` and whatever listing could be gathered.
pub fn locate(root: &Path, bits: ArchBits) -> Result<BackendDescriptor, LocateError> {
    std::fs::metadata(root).map_err(|source| LocateError::RootInaccessible {
        path: root.to_path_buf(),
        source,
    })?;

    let library_dir = root.join(LIBRARY_SUBDIR[0]).join(LIBRARY_SUBDIR[1]);
    let library_path = library_dir.join(library_file_name(bits));
    let (searched_directories, searched_files) = enumerate_dir(&library_dir);

    let present = library_path.is_file();
    if present {
        debug!("located backend library at {}", library_path.display());
    } else {
        warn!(
            "backend library not found at {} ({} files seen)",
            library_path.display(),
            searched_files.len()
        );
    }

    Ok(BackendDescriptor {
        install_root: root.to_path_buf(),
        library_path,
        searched_directories,
        searched_files,
        bits,
        present,
    })
}

/// [`locate`] for the running process's own pointer width.
pub fn locate_host(root: &Path) -> Result<BackendDescriptor, LocateError> {
    locate(root, ArchBits::host())
}

/// Binds `pdfium-render` to the library a descriptor resolved.
///
/// The caller is expected to have checked [`BackendDescriptor::is_valid`];
/// binding an invalid descriptor fails with [`LocateError::Bind`].
pub fn bind_descriptor(descriptor: &BackendDescriptor) -> Result<Pdfium, LocateError> {
    Pdfium::bind_to_library(&descriptor.library_path)
        .map(Pdfium::new)
        .map_err(|e| LocateError::Bind {
            path: descriptor.library_path.clone(),
            reason: e.to_string(),
        })
}

// ── Internal helpers ─────────────────────────────────────────────────────────

/// Lists the subdirectories and files of `dir`, sorted for deterministic
/// reporting. Enumeration failure is non-fatal and yields empty listings.
fn enumerate_dir(dir: &Path) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("could not enumerate {}: {}", dir.display(), e);
            return (Vec::new(), Vec::new());
        }
    };

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        match entry.file_type() {
            Ok(t) if t.is_dir() => dirs.push(path),
            Ok(_) => files.push(path),
            Err(_) => {}
        }
    }
    dirs.sort();
    files.sort();
    (dirs, files)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn plant_library(root: &Path, bits: ArchBits) -> PathBuf {
        let dir = root.join("bin").join("dll");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(library_file_name(bits));
        std::fs::write(&path, b"not a real library").unwrap();
        path
    }

    #[test]
    fn host_bits_match_pointer_width() {
        let expected = if std::mem::size_of::<usize>() == 8 {
            ArchBits::Bits64
        } else {
            ArchBits::Bits32
        };
        assert_eq!(ArchBits::host(), expected);
    }

    #[test]
    fn library_names_differ_by_width() {
        assert_ne!(
            library_file_name(ArchBits::Bits32),
            library_file_name(ArchBits::Bits64)
        );
        assert!(library_file_name(ArchBits::Bits64).contains("64"));
        assert!(library_file_name(ArchBits::Bits32).contains("32"));
    }

    #[test]
    fn locate_finds_planted_library() {
        let root = tempfile::tempdir().unwrap();
        let planted = plant_library(root.path(), ArchBits::host());

        let descriptor = locate_host(root.path()).unwrap();
        assert!(descriptor.is_valid());
        assert_eq!(descriptor.library_path, planted);
        assert!(descriptor.searched_files.contains(&planted));
        assert!(descriptor.searched_directories.is_empty());
    }

    #[test]
    fn missing_library_is_invalid_not_error() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("bin/dll")).unwrap();
        // Some unrelated file the report should still list.
        std::fs::write(root.path().join("bin/dll/readme.txt"), b"hi").unwrap();

        let descriptor = locate_host(root.path()).unwrap();
        assert!(!descriptor.is_valid());

        let report = descriptor.search_report();
        assert!(report.contains(library_file_name(ArchBits::host())));
        assert!(report.contains("readme.txt"));
    }

    #[test]
    fn missing_subdir_is_invalid_with_empty_listing() {
        let root = tempfile::tempdir().unwrap();
        let descriptor = locate_host(root.path()).unwrap();
        assert!(!descriptor.is_valid());
        assert!(descriptor.searched_files.is_empty());
        assert!(descriptor.searched_directories.is_empty());
    }

    #[test]
    fn inaccessible_root_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let gone = root.path().join("does-not-exist");
        assert!(matches!(
            locate_host(&gone),
            Err(LocateError::RootInaccessible { .. })
        ));
    }

    #[test]
    fn locate_is_deterministic() {
        let root = tempfile::tempdir().unwrap();
        plant_library(root.path(), ArchBits::host());
        let a = locate_host(root.path()).unwrap();
        let b = locate_host(root.path()).unwrap();
        assert_eq!(a.library_path, b.library_path);
        assert_eq!(a.searched_files, b.searched_files);
    }
}
