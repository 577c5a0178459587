//! Zip archiver backed by the `zip` crate.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use walkdir::WalkDir;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crudsmith_core::{
    application::{
        ApplicationError,
        ports::{ArchiveSummary, Archiver},
    },
    error::{CrudsmithError, CrudsmithResult},
};

const COMPRESSION_LEVEL: i64 = 9;

/// Compresses a directory tree into a deflated zip file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiver;

impl ZipArchiver {
    pub fn new() -> Self {
        Self
    }

    fn options(&self) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(COMPRESSION_LEVEL))
    }
}

/// Failures while building one archive.
#[derive(Debug, thiserror::Error)]
enum ZipBuildError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error("{0} escapes the archive root")]
    OutsideRoot(PathBuf),
}

impl ZipArchiver {
    fn write_archive(&self, source_dir: &Path, destination: &Path) -> Result<usize, ZipBuildError> {
        let file = File::create(destination)?;
        let mut zip = ZipWriter::new(BufWriter::new(file));
        let mut entries = 0usize;

        for entry in WalkDir::new(source_dir).min_depth(1).sort_by_file_name() {
            let entry = entry?;
            let name = entry_name(source_dir, entry.path())
                .ok_or_else(|| ZipBuildError::OutsideRoot(entry.path().to_path_buf()))?;

            if entry.file_type().is_dir() {
                zip.add_directory(name, self.options())?;
            } else {
                let options = self.options().unix_permissions(file_mode(entry.path()));
                zip.start_file(name, options)?;
                let mut source = File::open(entry.path())?;
                io::copy(&mut source, &mut zip)?;
            }
            entries += 1;
        }

        zip.finish()?.into_inner().map_err(|e| e.into_error())?;
        Ok(entries)
    }
}

impl Archiver for ZipArchiver {
    #[instrument(skip(self), fields(source = %source_dir.display()))]
    fn archive(&self, source_dir: &Path, destination: &Path) -> CrudsmithResult<ArchiveSummary> {
        let failed = |reason: String| -> CrudsmithError {
            ApplicationError::ArchiveFailed {
                path: destination.to_path_buf(),
                reason,
            }
            .into()
        };

        let entries = self
            .write_archive(source_dir, destination)
            .map_err(|e| failed(e.to_string()))?;
        let bytes = std::fs::metadata(destination)
            .map_err(|e| failed(e.to_string()))?
            .len();
        debug!(entries, bytes, "Archive written");

        Ok(ArchiveSummary { entries, bytes })
    }
}

/// Entry name relative to `root`, `/`-separated.
fn entry_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

#[cfg(unix)]
fn file_mode(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o777)
        .unwrap_or(0o644)
}

#[cfg(not(unix))]
fn file_mode(path: &Path) -> u32 {
    match path.extension().and_then(|e| e.to_str()) {
        Some("sh") => 0o755,
        _ => 0o644,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("shop");
        std::fs::create_dir_all(src.join("src/models")).unwrap();
        std::fs::write(src.join("package.json"), "{}").unwrap();
        std::fs::write(src.join("src/models/Product.model.js"), "module.exports = 1;").unwrap();
        dir
    }

    #[test]
    fn archives_files_and_directories_relative_to_root() {
        let dir = tree();
        let source = dir.path().join("shop");
        let destination = dir.path().join("shop.zip");

        let summary = ZipArchiver::new().archive(&source, &destination).unwrap();

        assert_eq!(summary.entries, 4);
        assert_eq!(summary.bytes, std::fs::metadata(&destination).unwrap().len());

        let mut archive = zip::ZipArchive::new(File::open(&destination).unwrap()).unwrap();
        let names: Vec<String> = archive.file_names().map(str::to_string).collect();
        assert!(names.contains(&"package.json".to_string()));
        assert!(names.contains(&"src/models/Product.model.js".to_string()));
        assert!(names.iter().all(|n| !n.starts_with("shop")));

        let mut content = String::new();
        archive
            .by_name("src/models/Product.model.js")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "module.exports = 1;");
    }

    #[test]
    fn missing_source_is_archive_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = ZipArchiver::new()
            .archive(&dir.path().join("absent"), &dir.path().join("absent.zip"))
            .unwrap_err();
        assert!(matches!(
            err,
            CrudsmithError::Application(ApplicationError::ArchiveFailed { .. })
        ));
    }

    #[test]
    fn unwritable_destination_is_archive_failure() {
        let dir = tree();
        let err = ZipArchiver::new()
            .archive(&dir.path().join("shop"), &dir.path().join("missing/out.zip"))
            .unwrap_err();
        assert!(matches!(
            err,
            CrudsmithError::Application(ApplicationError::ArchiveFailed { .. })
        ));
    }

    #[test]
    fn entry_names_use_forward_slashes() {
        let root = Path::new("/tmp/shop");
        assert_eq!(
            entry_name(root, &root.join("src").join("index.ts")).as_deref(),
            Some("src/index.ts")
        );
        assert_eq!(entry_name(root, Path::new("/elsewhere")), None);
    }

    #[cfg(unix)]
    #[test]
    fn executable_bit_survives_archiving() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tree();
        let script = dir.path().join("shop/start.sh");
        std::fs::write(&script, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        let destination = dir.path().join("shop.zip");

        ZipArchiver::new()
            .archive(&dir.path().join("shop"), &destination)
            .unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&destination).unwrap()).unwrap();
        let mode = archive.by_name("start.sh").unwrap().unix_mode().unwrap();
        assert_eq!(mode & 0o111, 0o111);
    }
}
