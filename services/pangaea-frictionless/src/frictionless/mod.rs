//! Frictionless tabular data package export.
//!
//! A package is a ZIP archive with two entries: `<id>_data.csv` holding the
//! data matrix and `<id>_metadata.json` holding the package descriptor with
//! its embedded Table Schema.

pub mod exporter;
pub mod package;
pub mod schema;
pub mod tabular;

pub use exporter::FrictionlessExporter;
pub use package::{
    build_package_descriptor, data_file_name, metadata_file_name, package_descriptor, Contributor,
    License, PackageDescriptor, Resource,
};
pub use schema::{build_table_schema, normalize_type, Field, TableSchema};
pub use tabular::serialize_tabular_data;
