//! Reading saved Frictionless archives back for verification.

use csv::ReaderBuilder;
use sha2::{Digest, Sha256};
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::{info, warn};
use zip::ZipArchive;

use crate::error::ExportResult;
use crate::frictionless::package::{PackageDescriptor, PACKAGE_PROFILE};

const DATA_SUFFIX: &str = "_data.csv";
const METADATA_SUFFIX: &str = "_metadata.json";

/// Result of reading a saved Frictionless archive back.
#[derive(Debug, Clone)]
pub struct InspectionReport {
    /// Entry names in archive order.
    pub entries: Vec<String>,
    pub package: Option<PackageDescriptor>,
    pub csv_header: Vec<String>,
    pub row_count: usize,
    /// Hex SHA-256 of the whole archive.
    pub sha256: String,
    pub size_bytes: u64,
    pub problems: Vec<String>,
}

impl InspectionReport {
    pub fn is_valid(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Inspect a saved archive on disk
pub fn inspect_package(path: &Path) -> ExportResult<InspectionReport> {
    info!("Inspecting package: {}", path.display());
    let bytes = std::fs::read(path)?;
    inspect_bytes(&bytes)
}

/// Inspect an archive held in memory
pub fn inspect_bytes(bytes: &[u8]) -> ExportResult<InspectionReport> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let mut entries = Vec::with_capacity(archive.len());
    let mut csv_entry: Option<(String, String)> = None;
    let mut metadata_entry: Option<String> = None;

    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        let name = file.name().to_string();

        if name.ends_with(DATA_SUFFIX) {
            let mut text = String::new();
            file.read_to_string(&mut text)?;
            csv_entry = Some((name.clone(), text));
        } else if name.ends_with(METADATA_SUFFIX) {
            let mut text = String::new();
            file.read_to_string(&mut text)?;
            metadata_entry = Some(text);
        } else {
            warn!("Unknown file in archive: {}", name);
        }

        entries.push(name);
    }

    let mut report = InspectionReport {
        entries,
        package: None,
        csv_header: Vec::new(),
        row_count: 0,
        sha256: format!("{:x}", Sha256::digest(bytes)),
        size_bytes: bytes.len() as u64,
        problems: Vec::new(),
    };

    if report.entries.len() != 2 {
        report.problems.push(format!(
            "expected 2 archive entries, found {}",
            report.entries.len()
        ));
    }

    match &csv_entry {
        Some((_, text)) => match read_csv_shape(text) {
            Ok((header, rows)) => {
                report.csv_header = header;
                report.row_count = rows;
            }
            Err(e) => report.problems.push(format!("data file is not valid CSV: {e}")),
        },
        None => report
            .problems
            .push(format!("no `*{DATA_SUFFIX}` entry in archive")),
    }

    match metadata_entry.as_deref().map(PackageDescriptor::from_json) {
        Some(Ok(package)) => {
            check_package(&package, csv_entry.as_ref(), &mut report);
            report.package = Some(package);
        }
        Some(Err(e)) => report
            .problems
            .push(format!("metadata is not a package descriptor: {e}")),
        None => report
            .problems
            .push(format!("no `*{METADATA_SUFFIX}` entry in archive")),
    }

    if report.is_valid() {
        info!("✅ Package is valid ({} rows)", report.row_count);
    } else {
        warn!("Package has {} problem(s)", report.problems.len());
    }

    Ok(report)
}

fn read_csv_shape(text: &str) -> ExportResult<(Vec<String>, usize)> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());
    let header = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = 0;
    for record in reader.records() {
        record?;
        rows += 1;
    }
    Ok((header, rows))
}

fn check_package(
    package: &PackageDescriptor,
    csv_entry: Option<&(String, String)>,
    report: &mut InspectionReport,
) {
    if package.profile != PACKAGE_PROFILE {
        report
            .problems
            .push(format!("unexpected package profile `{}`", package.profile));
    }

    let Some(resource) = package.data_resource() else {
        report
            .problems
            .push("package descriptor has no resources".to_string());
        return;
    };

    if let Some((csv_name, _)) = csv_entry {
        if &resource.path != csv_name {
            report.problems.push(format!(
                "resource path `{}` does not name the data entry `{}`",
                resource.path, csv_name
            ));
        }

        let field_names: Vec<&str> = resource.schema.field_names().collect();
        if !field_names.is_empty() && field_names != report.csv_header {
            report.problems.push(format!(
                "CSV header {:?} does not match schema fields {:?}",
                report.csv_header, field_names
            ));
        }
    }
}
