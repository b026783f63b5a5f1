//! Tabular Data Package descriptor (`<id>_metadata.json`).

use pangaea_core::{Author, CoreError, Dataset, ExportLog, Licence};
use serde::{Deserialize, Serialize};

use super::schema::{build_table_schema, TableSchema};
use crate::error::ExportResult;

pub const PACKAGE_PROFILE: &str = "tabular-data-package";
pub const RESOURCE_PROFILE: &str = "tabular-data-resource";
pub const CONTRIBUTOR_ROLE: &str = "author";

/// Frictionless package descriptor.
///
/// Every key except `profile` is optional so that a descriptor interrupted
/// by a metadata fault can still be written out with what was assembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    pub profile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Dataset DOI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributors: Option<Vec<Contributor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub licenses: Option<Vec<License>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<Resource>>,
}

impl Default for PackageDescriptor {
    fn default() -> Self {
        Self {
            profile: PACKAGE_PROFILE.to_string(),
            name: None,
            id: None,
            title: None,
            description: None,
            created: None,
            contributors: None,
            licenses: None,
            resources: None,
        }
    }
}

impl PackageDescriptor {
    /// Serialize to compact JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The tabular resource, if the descriptor got that far.
    #[must_use]
    pub fn data_resource(&self) -> Option<&Resource> {
        self.resources.as_ref().and_then(|resources| resources.first())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub title: String,
    pub role: String,
}

impl From<&Author> for Contributor {
    fn from(author: &Author) -> Self {
        Self {
            title: author.full_name(),
            role: CONTRIBUTOR_ROLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// Licence URI.
    pub path: String,
    /// Short licence label.
    pub name: String,
    /// Full licence name.
    pub title: String,
}

impl From<&Licence> for License {
    fn from(licence: &Licence) -> Self {
        Self {
            path: licence.uri.clone(),
            name: licence.label.clone(),
            title: licence.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub profile: String,
    /// Archive entry name of the CSV file.
    pub path: String,
    pub schema: TableSchema,
}

/// Archive entry name of the CSV payload.
#[must_use]
pub fn data_file_name(dataset: &Dataset) -> String {
    format!("{}_data.csv", dataset.id)
}

/// Archive entry name of the package descriptor.
#[must_use]
pub fn metadata_file_name(dataset: &Dataset) -> String {
    format!("{}_metadata.json", dataset.id)
}

/// Assembles the descriptor, logging a metadata fault and keeping the
/// partial result.
pub fn package_descriptor(dataset: &Dataset, log: &mut ExportLog) -> PackageDescriptor {
    let mut package = PackageDescriptor::default();
    if let Err(e) = fill_descriptor(dataset, &mut package) {
        log.error(format!("Frictionless JSON creation failed: {e}"));
    }
    package
}

/// Builds the package descriptor and renders it as JSON text.
pub fn build_package_descriptor(dataset: &Dataset, log: &mut ExportLog) -> String {
    let package = package_descriptor(dataset, log);
    match package.to_json() {
        Ok(json) => json,
        Err(e) => {
            log.error(format!("Frictionless JSON creation failed: {e}"));
            String::new()
        }
    }
}

fn fill_descriptor(dataset: &Dataset, package: &mut PackageDescriptor) -> ExportResult<()> {
    let contributors = dataset.authors.iter().map(Contributor::from).collect();
    let resources = vec![Resource {
        profile: RESOURCE_PROFILE.to_string(),
        path: data_file_name(dataset),
        schema: build_table_schema(&dataset.params),
    }];

    package.name = Some(format!("{}_metadata", dataset.id));
    package.id = Some(dataset.doi.clone());
    package.title = Some(dataset.title.clone());
    package.description = dataset.description().map(str::to_string);
    package.created = Some(dataset.date.clone());
    package.contributors = Some(contributors);

    let licence = dataset
        .licence
        .as_ref()
        .ok_or_else(|| CoreError::missing(dataset.id.as_str(), "licence"))?;
    package.licenses = Some(vec![License::from(licence)]);
    package.resources = Some(resources);

    Ok(())
}
