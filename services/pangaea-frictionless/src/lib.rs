//! Frictionless Data export for PANGAEA datasets.

pub mod error;
pub mod frictionless;
pub mod inspect;

pub use error::{ExportError, ExportResult};
pub use frictionless::{
    build_package_descriptor, build_table_schema, serialize_tabular_data, FrictionlessExporter,
    PackageDescriptor, TableSchema,
};
pub use inspect::{inspect_bytes, inspect_package, InspectionReport};
