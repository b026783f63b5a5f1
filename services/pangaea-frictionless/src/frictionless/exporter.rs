use pangaea_core::{Dataset, DatasetExporter, ExportArtifact, ExportConfig, ExportLog};
use std::fs::OpenOptions;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use super::package::{build_package_descriptor, data_file_name, metadata_file_name};
use super::tabular::serialize_tabular_data;
use crate::error::ExportResult;

pub const PARENT_DATASET: &str = "Cannot export a parent type dataset to frictionless";
pub const PROTECTED_DATASET: &str = "Dataset is protected";
pub const ZIP_CREATED: &str = "Frictionless in memory ZIP created";
pub const NOT_A_BUFFER: &str = "Could not save, Frictionless Zip file is not a BytesIO";

/// Exports one dataset as a zipped Frictionless tabular data package.
///
/// Built per request: it borrows the dataset, records diagnostics in its own
/// [`ExportLog`] and keeps the archive from [`create`](DatasetExporter::create)
/// until [`save`](DatasetExporter::save) writes it out.
#[derive(Debug)]
pub struct FrictionlessExporter<'a> {
    dataset: &'a Dataset,
    file_location: PathBuf,
    overwrite: bool,
    log: ExportLog,
    file: Option<ExportArtifact>,
}

impl<'a> FrictionlessExporter<'a> {
    pub fn new(dataset: &'a Dataset, file_location: impl Into<PathBuf>) -> Self {
        Self {
            dataset,
            file_location: file_location.into(),
            overwrite: true,
            log: ExportLog::new(),
            file: None,
        }
    }

    pub fn from_config(dataset: &'a Dataset, config: &ExportConfig) -> Self {
        Self::new(dataset, config.output.directory.clone()).with_overwrite(config.output.overwrite)
    }

    /// When false, `save` fails instead of replacing an existing archive.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        self.dataset
    }

    /// Archive held for `save`, if `create` succeeded.
    #[must_use]
    pub fn artifact(&self) -> Option<&ExportArtifact> {
        self.file.as_ref()
    }

    fn write_archive(&self, package_json: &str, csv: &str) -> ExportResult<ExportArtifact> {
        // Fixed timestamp keeps repeated exports byte-identical.
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file(data_file_name(self.dataset), options)?;
        zip.write_all(csv.as_bytes())?;
        zip.start_file(metadata_file_name(self.dataset), options)?;
        zip.write_all(package_json.as_bytes())?;

        let buffer = zip.finish()?.into_inner();
        debug!(
            dataset = %self.dataset.id,
            bytes = buffer.len(),
            "Frictionless archive assembled"
        );
        Ok(ExportArtifact::from(buffer))
    }

    fn write_file(&self, path: &Path, artifact: &ExportArtifact) -> ExportResult<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(self.overwrite)
            .create_new(!self.overwrite)
            .truncate(self.overwrite)
            .open(path)?;
        file.write_all(artifact.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

impl DatasetExporter for FrictionlessExporter<'_> {
    fn create(&mut self) -> Option<ExportArtifact> {
        self.file = None;

        if self.dataset.is_parent {
            self.log.error(PARENT_DATASET);
            return None;
        }
        if !self.dataset.login_status.is_unrestricted() {
            debug!(
                dataset = %self.dataset.id,
                login_status = %self.dataset.login_status,
                "Refusing export of protected dataset"
            );
            self.log.error(PROTECTED_DATASET);
            return None;
        }

        let package_json = build_package_descriptor(self.dataset, &mut self.log);
        let csv = serialize_tabular_data(self.dataset, &mut self.log);

        match self.write_archive(&package_json, &csv) {
            Ok(artifact) => {
                self.log.success(ZIP_CREATED);
                self.file = Some(artifact.clone());
                Some(artifact)
            }
            Err(e) => {
                self.log
                    .error(format!("Frictionless in memory Zip creation failed: {e}"));
                None
            }
        }
    }

    fn save(&mut self) -> bool {
        let path = self.target_path();
        let Some(artifact) = self.file.as_ref() else {
            self.log.error(NOT_A_BUFFER);
            return false;
        };

        match self.write_file(&path, artifact) {
            Ok(()) => {
                info!(
                    dataset = %self.dataset.id,
                    path = %path.display(),
                    bytes = artifact.len(),
                    "Frictionless ZIP saved"
                );
                true
            }
            Err(e) => {
                self.log.error(format!("Could not save Frictionless Zip: {e}"));
                false
            }
        }
    }

    fn log(&self) -> &ExportLog {
        &self.log
    }

    fn file_location(&self) -> &Path {
        &self.file_location
    }

    fn file_name(&self) -> String {
        format!("frictionless_pangaea_{}.zip", self.dataset.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pangaea_core::{Author, Licence, LoginStatus, Parameter};
    use serde_json::json;
    use std::io::Read;
    use zip::ZipArchive;

    fn sample_dataset() -> Dataset {
        let mut dataset = Dataset::new("PANGAEA.900000");
        dataset.login_status = LoginStatus::Unrestricted;
        dataset.doi = "10.1594/PANGAEA.900000".to_string();
        dataset.title = "Example".to_string();
        dataset.date = "2020-01-01".to_string();
        dataset.licence = Some(Licence::new("https://x", "CC-BY", "CC-BY 4.0"));
        dataset.authors = vec![Author::new("A", "B")];
        dataset
            .params
            .insert("depth", Parameter::new("Depth", "numeric").with_unit("m"));
        dataset.data.columns = vec!["depth".to_string()];
        dataset.data.push_row(vec![json!(1.0)]);
        dataset
    }

    fn read_entry(artifact: &ExportArtifact, name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(artifact.as_bytes())).unwrap();
        let mut text = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        text
    }

    #[test]
    fn test_create_builds_two_entry_archive() {
        let dataset = sample_dataset();
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = FrictionlessExporter::new(&dataset, dir.path());

        let artifact = exporter.create().unwrap();
        let archive = ZipArchive::new(Cursor::new(artifact.as_bytes())).unwrap();
        assert_eq!(archive.len(), 2);

        assert_eq!(read_entry(&artifact, "PANGAEA.900000_data.csv"), "depth\n1.0\n");
        let metadata = read_entry(&artifact, "PANGAEA.900000_metadata.json");
        assert!(metadata.contains(
            r#""fields":[{"name":"depth","title":"Depth","type":"number","unit":"m"}]"#
        ));
        assert!(!metadata.contains("description"));

        assert_eq!(exporter.log().len(), 1);
        assert_eq!(exporter.log().entries()[0].message, ZIP_CREATED);
        assert_eq!(exporter.artifact(), Some(&artifact));
    }

    #[test]
    fn test_parent_dataset_is_refused_regardless_of_status() {
        for status in [LoginStatus::Unrestricted, LoginStatus::LoginRequired] {
            let mut dataset = sample_dataset();
            dataset.is_parent = true;
            dataset.login_status = status;

            let mut exporter = FrictionlessExporter::new(&dataset, ".");
            assert!(exporter.create().is_none());
            assert_eq!(exporter.log().len(), 1);
            assert_eq!(exporter.log().entries()[0].message, PARENT_DATASET);
        }
    }

    #[test]
    fn test_protected_dataset_is_refused() {
        let mut dataset = sample_dataset();
        dataset.login_status = LoginStatus::AccessConstraints;

        let mut exporter = FrictionlessExporter::new(&dataset, ".");
        assert!(exporter.create().is_none());
        assert!(exporter.artifact().is_none());
        assert_eq!(exporter.log().len(), 1);
        assert_eq!(exporter.log().entries()[0].message, PROTECTED_DATASET);
    }

    #[test]
    fn test_missing_login_status_is_refused() {
        let dataset = Dataset::from_json_str(
            r#"{
                "id": "PANGAEA.1",
                "licence": {"uri": "https://x", "label": "CC-BY", "name": "CC-BY 4.0"},
                "data": [{"depth": 1.0}]
            }"#,
        )
        .unwrap();

        let mut exporter = FrictionlessExporter::new(&dataset, ".");
        assert!(exporter.create().is_none());
        assert_eq!(exporter.log().len(), 1);
        assert_eq!(exporter.log().entries()[0].message, PROTECTED_DATASET);
    }

    #[test]
    fn test_save_without_artifact() {
        let dataset = sample_dataset();
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = FrictionlessExporter::new(&dataset, dir.path());

        assert!(!exporter.save());
        assert!(!exporter.target_path().exists());
        assert_eq!(exporter.log().entries()[0].message, NOT_A_BUFFER);
    }

    #[test]
    fn test_save_refuses_overwrite_when_disabled() {
        let dataset = sample_dataset();
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = FrictionlessExporter::new(&dataset, dir.path()).with_overwrite(false);
        std::fs::write(exporter.target_path(), b"existing").unwrap();

        exporter.create().unwrap();
        assert!(!exporter.save());
        assert_eq!(std::fs::read(exporter.target_path()).unwrap(), b"existing");
        assert!(exporter
            .log()
            .last()
            .unwrap()
            .message
            .starts_with("Could not save Frictionless Zip: "));
    }

    #[test]
    fn test_file_name() {
        let dataset = sample_dataset();
        let exporter = FrictionlessExporter::new(&dataset, "/srv/exports");
        assert_eq!(exporter.file_name(), "frictionless_pangaea_PANGAEA.900000.zip");
        assert_eq!(
            exporter.target_path(),
            PathBuf::from("/srv/exports/frictionless_pangaea_PANGAEA.900000.zip")
        );
    }
}
