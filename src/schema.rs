//! Schema descriptors and runtime validation for step outputs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::part::OutputMap;

/// Schema for the output object an output-bearing part submits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSchema {
    /// Field definitions for this output
    pub fields: Vec<FieldSpec>,
}

/// Schema definition for a single field in a step output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field identifier (key in the submitted output object)
    pub name: String,
    /// Help text for the field
    #[serde(default)]
    pub description: String,
    /// Type of the field
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether this field must be present in the output
    #[serde(default)]
    pub required: bool,
}

impl FieldSpec {
    /// A required field of the given type.
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            field_type,
            required: true,
        }
    }

    /// An optional field of the given type.
    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            required: false,
            ..Self::required(name, field_type)
        }
    }
}

/// Types of fields supported in output schemas
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Text value
    String,
    /// Integer or float value
    Number,
    /// True/false value
    Bool,
    /// Nested object
    Object,
    /// List of values
    Array,
}

impl FieldType {
    fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Number => value.is_number(),
            FieldType::Bool => value.is_boolean(),
            FieldType::Object => value.is_object(),
            FieldType::Array => value.is_array(),
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Bool => "bool",
            FieldType::Object => "object",
            FieldType::Array => "array",
        };
        write!(f, "{name}")
    }
}

/// Validation failures for a submitted output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    /// Required field missing from the output
    MissingField(String),
    /// Field present but with the wrong type
    WrongType { field: String, expected: FieldType },
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaViolation::MissingField(field) => {
                write!(f, "required field '{field}' is missing")
            }
            SchemaViolation::WrongType { field, expected } => {
                write!(f, "field '{field}' must be a {expected}")
            }
        }
    }
}

impl std::error::Error for SchemaViolation {}

impl OutputSchema {
    /// Create a schema from field definitions.
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Validate a candidate output against this schema.
    ///
    /// Null values are treated as absent: a required field must be present
    /// and non-null, and a present non-null field must match its type.
    pub fn validate(&self, output: &OutputMap) -> Result<(), Vec<SchemaViolation>> {
        let mut violations = Vec::new();

        for field in &self.fields {
            match output.get(&field.name) {
                None | Some(Value::Null) => {
                    if field.required {
                        violations.push(SchemaViolation::MissingField(field.name.clone()));
                    }
                }
                Some(value) => {
                    if !field.field_type.matches(value) {
                        violations.push(SchemaViolation::WrongType {
                            field: field.name.clone(),
                            expected: field.field_type,
                        });
                    }
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn output(value: Value) -> OutputMap {
        value.as_object().expect("test output must be an object").clone()
    }

    #[test]
    fn test_validate_accepts_matching_output() {
        let schema = OutputSchema::new(vec![
            FieldSpec::required("name", FieldType::String),
            FieldSpec::optional("age", FieldType::Number),
        ]);

        let result = schema.validate(&output(json!({"name": "ada", "age": 36})));
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_allows_missing_optional_field() {
        let schema = OutputSchema::new(vec![FieldSpec::optional("age", FieldType::Number)]);
        assert!(schema.validate(&output(json!({}))).is_ok());
    }

    #[test]
    fn test_validate_reports_missing_required_field() {
        let schema = OutputSchema::new(vec![FieldSpec::required("name", FieldType::String)]);

        let violations = schema.validate(&output(json!({}))).unwrap_err();
        assert_eq!(
            violations,
            vec![SchemaViolation::MissingField("name".to_string())]
        );
    }

    #[test]
    fn test_validate_treats_null_as_absent() {
        let schema = OutputSchema::new(vec![FieldSpec::required("name", FieldType::String)]);

        let violations = schema.validate(&output(json!({"name": null}))).unwrap_err();
        assert_eq!(
            violations,
            vec![SchemaViolation::MissingField("name".to_string())]
        );
    }

    #[test]
    fn test_validate_reports_wrong_type() {
        let schema = OutputSchema::new(vec![FieldSpec::required("count", FieldType::Number)]);

        let violations = schema.validate(&output(json!({"count": "three"}))).unwrap_err();
        assert_eq!(
            violations,
            vec![SchemaViolation::WrongType {
                field: "count".to_string(),
                expected: FieldType::Number,
            }]
        );
    }

    #[test]
    fn test_validate_collects_all_violations() {
        let schema = OutputSchema::new(vec![
            FieldSpec::required("name", FieldType::String),
            FieldSpec::required("done", FieldType::Bool),
        ]);

        let violations = schema.validate(&output(json!({"done": 1}))).unwrap_err();
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_field_spec_serde_round_trip() {
        let spec = FieldSpec::required("tags", FieldType::Array);
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"type\":\"array\""));

        let parsed: FieldSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.field_type, FieldType::Array);
        assert!(parsed.required);
    }
}
