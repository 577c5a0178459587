//! Packager - compresses a staging tree, streams it out, cleans up.
//!
//! Cleanup is owned by a drop guard so the staging tree and the transient
//! archive are removed on success, on every error path and during unwinding.

use std::io::{self, Write};

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        events::{PipelineEvent, PipelineStep, observe_step},
        ports::{ArchiveSummary, Archiver, Filesystem, PipelineObserver},
    },
    domain::StagingDirectory,
    error::CrudsmithResult,
};

/// What the caller received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReceipt {
    /// Always `<projectName>.zip`, whatever the staging token.
    pub file_name: String,
    pub bytes: u64,
    pub entries: usize,
}

impl PackageReceipt {
    /// `Content-Disposition` value a request/response transport sends.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name)
    }
}

pub struct Packager<'a> {
    archiver: &'a dyn Archiver,
    filesystem: &'a dyn Filesystem,
    observer: &'a dyn PipelineObserver,
}

impl<'a> Packager<'a> {
    pub fn new(
        archiver: &'a dyn Archiver,
        filesystem: &'a dyn Filesystem,
        observer: &'a dyn PipelineObserver,
    ) -> Self {
        Self {
            archiver,
            filesystem,
            observer,
        }
    }

    /// Archive `staging`, stream the archive into `sink`, then remove both.
    ///
    /// Takes ownership of the staging directory: after this call it no
    /// longer exists, whatever the outcome.
    #[instrument(skip_all, fields(project = %staging.project_name()))]
    pub fn package(
        &self,
        staging: StagingDirectory,
        sink: &mut dyn Write,
    ) -> CrudsmithResult<PackageReceipt> {
        let _cleanup = CleanupGuard {
            staging: &staging,
            filesystem: self.filesystem,
            observer: self.observer,
        };

        let summary: ArchiveSummary = observe_step(self.observer, PipelineStep::Archive, || {
            self.archiver
                .archive(staging.root(), staging.archive_path())
        })?;

        let bytes = observe_step(self.observer, PipelineStep::Deliver, || {
            self.deliver(&staging, sink)
        })?;

        let receipt = PackageReceipt {
            file_name: staging.download_name(),
            bytes,
            entries: summary.entries,
        };
        info!(file = %receipt.file_name, bytes, entries = summary.entries, "Archive delivered");
        Ok(receipt)
    }

    fn deliver(&self, staging: &StagingDirectory, sink: &mut dyn Write) -> CrudsmithResult<u64> {
        let mut reader = self.filesystem.open_read(staging.archive_path())?;
        let delivery_failed = |e: io::Error| ApplicationError::DeliveryFailed {
            reason: e.to_string(),
        };
        let bytes = io::copy(&mut reader, sink).map_err(delivery_failed)?;
        sink.flush().map_err(delivery_failed)?;
        Ok(bytes)
    }
}

/// Removes the transient archive and the staging tree when dropped.
struct CleanupGuard<'a> {
    staging: &'a StagingDirectory,
    filesystem: &'a dyn Filesystem,
    observer: &'a dyn PipelineObserver,
}

impl CleanupGuard<'_> {
    fn remove_all(&self) -> Result<(), ApplicationError> {
        let archive = self.staging.archive_path();
        let root = self.staging.root();
        let mut failures = Vec::new();

        if self.filesystem.exists(archive)
            && let Err(e) = self.filesystem.remove_file(archive)
        {
            failures.push((archive, e));
        }
        if self.filesystem.exists(root)
            && let Err(e) = self.filesystem.remove_dir_all(root)
        {
            failures.push((root, e));
        }

        match failures.into_iter().next() {
            None => Ok(()),
            Some((path, e)) => Err(ApplicationError::CleanupFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }
}

impl Drop for CleanupGuard<'_> {
    fn drop(&mut self) {
        self.observer
            .on_event(&PipelineEvent::StepStarted(PipelineStep::Cleanup));
        match self.remove_all() {
            Ok(()) => self
                .observer
                .on_event(&PipelineEvent::StepSucceeded(PipelineStep::Cleanup)),
            Err(e) => {
                warn!(error = %e, "Cleanup failed");
                self.observer
                    .on_event(&PipelineEvent::failed(PipelineStep::Cleanup, e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::application::ports::{MockArchiver, MockFilesystem, MockPipelineObserver};
    use crate::application::NoopObserver;
    use crate::domain::StagingStrategy;
    use crate::error::CrudsmithError;

    fn staging() -> StagingDirectory {
        StagingDirectory::allocate("/staging", "shop", StagingStrategy::Shared)
    }

    fn archiver_ok() -> MockArchiver {
        let mut archiver = MockArchiver::new();
        archiver.expect_archive().returning(|_, _| {
            Ok(ArchiveSummary {
                entries: 4,
                bytes: 5,
            })
        });
        archiver
    }

    /// Filesystem whose archive reads as `b"PK..."` and records removals.
    fn filesystem(removed: Arc<Mutex<Vec<PathBuf>>>) -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_open_read()
            .returning(|_| Ok(Box::new(Cursor::new(b"PK\x03\x04x".to_vec()))));
        fs.expect_exists().return_const(true);
        let files = Arc::clone(&removed);
        fs.expect_remove_file().returning(move |p| {
            files.lock().unwrap().push(p.to_path_buf());
            Ok(())
        });
        fs.expect_remove_dir_all().returning(move |p| {
            removed.lock().unwrap().push(p.to_path_buf());
            Ok(())
        });
        fs
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "client went away"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn delivers_bytes_and_names_download_after_project() {
        let removed = Arc::new(Mutex::new(Vec::new()));
        let fs = filesystem(Arc::clone(&removed));
        let archiver = archiver_ok();
        let mut out = Vec::new();

        let receipt = Packager::new(&archiver, &fs, &NoopObserver)
            .package(staging(), &mut out)
            .unwrap();

        assert_eq!(out, b"PK\x03\x04x");
        assert_eq!(receipt.file_name, "shop.zip");
        assert_eq!(receipt.bytes, 5);
        assert_eq!(receipt.content_disposition(), "attachment; filename=\"shop.zip\"");
        assert_eq!(
            *removed.lock().unwrap(),
            vec![PathBuf::from("/staging/shop.zip"), PathBuf::from("/staging/shop")]
        );
    }

    #[test]
    fn archive_failure_still_cleans_up() {
        let removed = Arc::new(Mutex::new(Vec::new()));
        let mut fs = MockFilesystem::new();
        fs.expect_open_read().never();
        fs.expect_exists().returning(|p| p == Path::new("/staging/shop"));
        let dirs = Arc::clone(&removed);
        fs.expect_remove_dir_all().returning(move |p| {
            dirs.lock().unwrap().push(p.to_path_buf());
            Ok(())
        });
        fs.expect_remove_file().never();

        let mut archiver = MockArchiver::new();
        archiver.expect_archive().returning(|_, dest| {
            Err(ApplicationError::ArchiveFailed {
                path: dest.to_path_buf(),
                reason: "disk full".into(),
            }
            .into())
        });

        let result = Packager::new(&archiver, &fs, &NoopObserver).package(staging(), &mut Vec::new());

        assert!(matches!(
            result,
            Err(CrudsmithError::Application(ApplicationError::ArchiveFailed { .. }))
        ));
        assert_eq!(*removed.lock().unwrap(), vec![PathBuf::from("/staging/shop")]);
    }

    #[test]
    fn sink_failure_is_delivery_failure_and_cleans_up() {
        let removed = Arc::new(Mutex::new(Vec::new()));
        let fs = filesystem(Arc::clone(&removed));
        let archiver = archiver_ok();

        let result = Packager::new(&archiver, &fs, &NoopObserver).package(staging(), &mut BrokenSink);

        assert!(matches!(
            result,
            Err(CrudsmithError::Application(ApplicationError::DeliveryFailed { .. }))
        ));
        assert_eq!(removed.lock().unwrap().len(), 2);
    }

    #[test]
    fn cleanup_failure_never_changes_outcome() {
        let mut fs = MockFilesystem::new();
        fs.expect_open_read()
            .returning(|_| Ok(Box::new(Cursor::new(b"zip".to_vec()))));
        fs.expect_exists().return_const(true);
        fs.expect_remove_file()
            .returning(|p| Err(ApplicationError::filesystem(p, "locked").into()));
        fs.expect_remove_dir_all().returning(|_| Ok(()));

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let mut observer = MockPipelineObserver::new();
        observer
            .expect_on_event()
            .returning(move |e| sink.lock().unwrap().push(e.clone()));

        let archiver = archiver_ok();
        let receipt = Packager::new(&archiver, &fs, &observer).package(staging(), &mut Vec::new());

        assert!(receipt.is_ok());
        let events = events.lock().unwrap();
        assert!(matches!(
            events.last(),
            Some(PipelineEvent::StepFailed {
                step: PipelineStep::Cleanup,
                ..
            })
        ));
    }
}
