//! Core domain types for exporting PANGAEA datasets.

pub mod artifact;
pub mod config;
pub mod dataset;
pub mod error;
pub mod log;
pub mod status;
pub mod traits;

pub use artifact::ExportArtifact;
pub use config::{ExportConfig, LoggingConfig, OutputConfig};
pub use dataset::{Author, DataTable, Dataset, Licence, Parameter, ParameterMap};
pub use error::{CoreError, CoreResult};
pub use log::{ExportLog, LogEntry, LogLevel};
pub use status::LoginStatus;
pub use traits::DatasetExporter;
