//! Dataset descriptor as handed to exporters.
//!
//! The descriptor is read-only to every exporter: it carries the bibliographic
//! metadata (DOI, title, authors, licence), the parameter catalogue describing
//! each column and the tabular payload itself.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::fmt;
use std::path::Path;

use crate::error::CoreResult;
use crate::status::LoginStatus;

/// A published dataset with its metadata and data matrix.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// Dataset identifier, e.g. `PANGAEA.900000`.
    pub id: String,
    /// Digital object identifier.
    #[serde(default)]
    pub doi: String,
    #[serde(default)]
    pub title: String,
    /// Abstract; empty or absent means "no description".
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    /// Publication date exactly as recorded in the metadata.
    #[serde(default)]
    pub date: String,
    /// Parent datasets only aggregate child datasets and hold no data.
    #[serde(default)]
    pub is_parent: bool,
    #[serde(default)]
    pub login_status: LoginStatus,
    #[serde(default)]
    pub licence: Option<Licence>,
    /// Parameter catalogue keyed by column name, in column order.
    #[serde(default)]
    pub params: ParameterMap,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub data: DataTable,
}

impl Dataset {
    /// Creates an empty dataset with the given identifier and no login status.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Parses a dataset descriptor from JSON text.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a dataset descriptor file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Abstract text, or `None` when absent or empty.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.abstract_text.as_deref().filter(|text| !text.is_empty())
    }
}

/// Describes one measured or derived quantity of the dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    /// Semantic type token (`numeric`, `string`, `datetime`, ...).
    #[serde(default, rename = "type")]
    pub param_type: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Parameter {
    #[must_use]
    pub fn new(name: impl Into<String>, param_type: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            param_type: Some(param_type.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Insertion-ordered mapping of column key to [`Parameter`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterMap {
    entries: Vec<(String, Parameter)>,
}

impl ParameterMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a parameter, replacing an existing one with the same key in place.
    pub fn insert(&mut self, key: impl Into<String>, parameter: Parameter) {
        let key = key.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = parameter,
            None => self.entries.push((key, parameter)),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Parameter> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, parameter)| parameter)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Parameter)> {
        self.entries
            .iter()
            .map(|(key, parameter)| (key.as_str(), parameter))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Parameter)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (K, Parameter)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, parameter) in iter {
            map.insert(key, parameter);
        }
        map
    }
}

impl Serialize for ParameterMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, parameter) in &self.entries {
            map.serialize_entry(key, parameter)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ParameterMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ParameterMapVisitor;

        impl<'de> Visitor<'de> for ParameterMapVisitor {
            type Value = ParameterMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of parameter key to parameter")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = ParameterMap::new();
                while let Some((key, parameter)) = access.next_entry::<String, Parameter>()? {
                    map.insert(key, parameter);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(ParameterMapVisitor)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
}

impl Author {
    #[must_use]
    pub fn new(firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        Self {
            firstname: firstname.into(),
            lastname: lastname.into(),
        }
    }

    /// "First Last", exactly as the contributor title is written.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

/// Licence the dataset is distributed under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Licence {
    /// Licence URI, e.g. `https://creativecommons.org/licenses/by/4.0/`.
    pub uri: String,
    /// Short label, e.g. `CC-BY-4.0`.
    pub label: String,
    /// Full licence name.
    pub name: String,
}

impl Licence {
    #[must_use]
    pub fn new(uri: impl Into<String>, label: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            label: label.into(),
            name: name.into(),
        }
    }
}

/// Rows × named columns; each cell is a JSON scalar.
///
/// Deserializes from either `{"columns": [...], "rows": [[...]]}` or a list
/// of record objects such as `[{"depth": 1.0}]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "TablePayload")]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<JsonValue>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TablePayload {
    Records(Vec<JsonMap<String, JsonValue>>),
    Matrix {
        #[serde(default)]
        columns: Vec<String>,
        #[serde(default)]
        rows: Vec<Vec<JsonValue>>,
    },
}

impl From<TablePayload> for DataTable {
    fn from(payload: TablePayload) -> Self {
        match payload {
            TablePayload::Records(records) => Self::from_records(&records),
            TablePayload::Matrix { columns, rows } => Self { columns, rows },
        }
    }
}

impl DataTable {
    #[must_use]
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Builds a table from record objects.
    ///
    /// Columns are the union of keys in first-seen order; a record missing a
    /// column gets `null` in that cell.
    #[must_use]
    pub fn from_records(records: &[JsonMap<String, JsonValue>]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !columns.iter().any(|column| column == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| record.get(column).cloned().unwrap_or(JsonValue::Null))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn push_row(&mut self, row: Vec<JsonValue>) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parameter_map_keeps_document_order() {
        let json = r#"{
            "id": "PANGAEA.1",
            "params": {
                "zeta": {"name": "Zeta", "type": "numeric"},
                "alpha": {"name": "Alpha", "type": "text"},
                "mid": {"name": "Mid", "type": "numeric"}
            }
        }"#;

        let dataset = Dataset::from_json_str(json).unwrap();
        let keys: Vec<&str> = dataset.params.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_parameter_map_insert_replaces_in_place() {
        let mut params = ParameterMap::new();
        params.insert("a", Parameter::new("A", "numeric"));
        params.insert("b", Parameter::new("B", "numeric"));
        params.insert("a", Parameter::new("A2", "text"));

        assert_eq!(params.len(), 2);
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(params.get("a").unwrap().name.as_deref(), Some("A2"));
    }

    #[test]
    fn test_dataset_defaults() {
        let dataset = Dataset::from_json_str(r#"{"id": "PANGAEA.2"}"#).unwrap();
        assert!(!dataset.is_parent);
        assert!(dataset.licence.is_none());
        assert!(dataset.data.is_empty());
    }

    #[test]
    fn test_missing_login_status_is_restricted() {
        let dataset = Dataset::from_json_str(r#"{"id": "PANGAEA.2"}"#).unwrap();
        assert!(!dataset.login_status.is_unrestricted());
        assert!(!Dataset::new("PANGAEA.2").login_status.is_unrestricted());

        let dataset =
            Dataset::from_json_str(r#"{"id": "PANGAEA.2", "login_status": "unrestricted"}"#)
                .unwrap();
        assert!(dataset.login_status.is_unrestricted());
    }

    #[test]
    fn test_data_accepts_record_list() {
        let json = r#"{"id": "PANGAEA.4", "data": [{"depth": 1.0}, {"depth": 2.0}]}"#;
        let dataset = Dataset::from_json_str(json).unwrap();

        assert_eq!(dataset.data.columns, vec!["depth"]);
        assert_eq!(dataset.data.rows, vec![vec![json!(1.0)], vec![json!(2.0)]]);
    }

    #[test]
    fn test_data_accepts_column_matrix() {
        let json = r#"{"id": "PANGAEA.5", "data": {"columns": ["a", "b"], "rows": [[1, "x"]]}}"#;
        let dataset = Dataset::from_json_str(json).unwrap();

        assert_eq!(dataset.data.columns, vec!["a", "b"]);
        assert_eq!(dataset.data.rows, vec![vec![json!(1), json!("x")]]);
    }

    #[test]
    fn test_description_omitted_only_when_empty() {
        let mut dataset = Dataset::new("PANGAEA.3");
        assert_eq!(dataset.description(), None);

        dataset.abstract_text = Some(String::new());
        assert_eq!(dataset.description(), None);

        dataset.abstract_text = Some("   ".to_string());
        assert_eq!(dataset.description(), Some("   "));

        dataset.abstract_text = Some("Sediment cores".to_string());
        assert_eq!(dataset.description(), Some("Sediment cores"));
    }

    #[test]
    fn test_author_full_name() {
        assert_eq!(Author::new("Jane", "Doe").full_name(), "Jane Doe");
        assert_eq!(Author::new("", "Doe").full_name(), " Doe");
    }

    #[test]
    fn test_table_from_records_fills_missing_cells() {
        let records = vec![
            json!({"depth": 1.0, "temp": 4.2}),
            json!({"depth": 2.0, "salinity": 35}),
        ];
        let records: Vec<_> = records
            .into_iter()
            .map(|value| value.as_object().cloned().unwrap())
            .collect();

        let table = DataTable::from_records(&records);
        assert_eq!(table.columns, vec!["depth", "temp", "salinity"]);
        assert_eq!(table.rows[1], vec![json!(2.0), JsonValue::Null, json!(35)]);
    }

    #[test]
    fn test_from_json_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = Dataset::from_json_file(dir.path().join("absent.json"));
        assert!(matches!(result, Err(crate::CoreError::IoError(_))));
    }
}
