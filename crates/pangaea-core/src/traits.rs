use std::path::{Path, PathBuf};

use crate::artifact::ExportArtifact;
use crate::log::ExportLog;

/// Converts one dataset into one downloadable artifact.
///
/// Implementations never return errors from `create`/`save`; every failure
/// is recorded in [`DatasetExporter::log`] and reported through the return
/// value (`None` / `false`).
pub trait DatasetExporter {
    /// Builds the artifact in memory and keeps it for a later [`save`](Self::save).
    fn create(&mut self) -> Option<ExportArtifact>;

    /// Persists the artifact produced by [`create`](Self::create) under
    /// [`file_location`](Self::file_location).
    fn save(&mut self) -> bool;

    /// Diagnostics recorded so far, in append order.
    fn log(&self) -> &ExportLog;

    /// Directory the artifact is saved into.
    fn file_location(&self) -> &Path;

    /// File name the artifact is saved as.
    fn file_name(&self) -> String;

    /// Full path the artifact is saved to.
    fn target_path(&self) -> PathBuf {
        self.file_location().join(self.file_name())
    }
}
