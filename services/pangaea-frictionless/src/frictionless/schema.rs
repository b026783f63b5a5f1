//! Table Schema built from the dataset parameter catalogue.

use pangaea_core::{Parameter, ParameterMap};
use serde::{Deserialize, Serialize};

/// Parameter type tokens that differ from their Table Schema spelling.
const TYPE_CONVERSIONS: &[(&str, &str)] = &[("numeric", "number")];

/// Frictionless Table Schema: one field per column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub fields: Vec<Field>,
}

impl TableSchema {
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Column key in the CSV header.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Field {
    fn from_parameter(key: &str, parameter: &Parameter) -> Self {
        Self {
            name: key.to_string(),
            title: parameter.name.clone(),
            field_type: parameter.param_type.as_deref().map(normalize_type),
            unit: non_empty(parameter.unit.as_deref()),
            description: non_empty(parameter.comment.as_deref()),
        }
    }
}

/// Maps a parameter type onto the Table Schema vocabulary.
#[must_use]
pub fn normalize_type(param_type: &str) -> String {
    TYPE_CONVERSIONS
        .iter()
        .find(|(from, _)| *from == param_type)
        .map_or(param_type, |(_, to)| *to)
        .to_string()
}

/// Builds the schema, one field per parameter in catalogue order.
#[must_use]
pub fn build_table_schema(params: &ParameterMap) -> TableSchema {
    TableSchema {
        fields: params
            .iter()
            .map(|(key, parameter)| Field::from_parameter(key, parameter))
            .collect(),
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_becomes_number() {
        assert_eq!(normalize_type("numeric"), "number");
        assert_eq!(normalize_type("text"), "text");
        assert_eq!(normalize_type("datetime"), "datetime");
        assert_eq!(normalize_type("Numeric"), "Numeric");
    }

    #[test]
    fn test_fields_follow_parameter_order() {
        let params: ParameterMap = vec![
            ("event", Parameter::new("Event label", "string")),
            ("depth", Parameter::new("Depth, water", "numeric").with_unit("m")),
            (
                "temp",
                Parameter::new("Temperature, water", "numeric")
                    .with_unit("°C")
                    .with_comment("CTD"),
            ),
        ]
        .into_iter()
        .collect();

        let schema = build_table_schema(&params);
        assert_eq!(schema.fields.len(), 3);
        assert_eq!(
            schema.field_names().collect::<Vec<_>>(),
            vec!["event", "depth", "temp"]
        );

        let temp = &schema.fields[2];
        assert_eq!(temp.title.as_deref(), Some("Temperature, water"));
        assert_eq!(temp.field_type.as_deref(), Some("number"));
        assert_eq!(temp.unit.as_deref(), Some("°C"));
        assert_eq!(temp.description.as_deref(), Some("CTD"));
    }

    #[test]
    fn test_empty_unit_and_comment_are_omitted() {
        let params: ParameterMap = vec![(
            "label",
            Parameter::new("Label", "string").with_unit("").with_comment(""),
        )]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&build_table_schema(&params)).unwrap();
        assert_eq!(
            json,
            r#"{"fields":[{"name":"label","title":"Label","type":"string"}]}"#
        );
    }

    #[test]
    fn test_parameter_without_name_still_yields_field() {
        let parameter = Parameter {
            param_type: Some("numeric".to_string()),
            unit: Some("kg".to_string()),
            ..Parameter::default()
        };
        let params: ParameterMap = vec![("mass", parameter)].into_iter().collect();

        let schema = build_table_schema(&params);
        assert_eq!(
            schema.fields,
            vec![Field {
                name: "mass".to_string(),
                title: None,
                field_type: Some("number".to_string()),
                unit: Some("kg".to_string()),
                description: None,
            }]
        );
    }

    #[test]
    fn test_empty_catalogue() {
        let schema = build_table_schema(&ParameterMap::new());
        assert!(schema.fields.is_empty());
    }
}
