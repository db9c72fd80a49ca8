//! Artifact schemas
//!
//! Plain-data descriptions of the JSON shape each stage must produce. A schema
//! is rendered into the generation prompt and used to validate what comes back,
//! so "keyed mapping, not list" is enforced in code rather than by hoping the
//! model listens.

use serde_json::{Map, Value};
use thiserror::Error;

/// Output that doesn't satisfy its artifact schema
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaValidationError {
    #[error("{artifact}: output is not a JSON object ({reason})")]
    NotJson { artifact: String, reason: String },

    #[error("{artifact}: missing required field '{path}'")]
    MissingField { artifact: String, path: String },

    #[error("{artifact}: field '{path}' must be {expected}, found {found}")]
    WrongShape {
        artifact: String,
        path: String,
        expected: String,
        found: &'static str,
    },

    #[error("{artifact}: required field '{path}' is empty")]
    EmptyField { artifact: String, path: String },

    #[error("{artifact}: {reason}")]
    Deserialize { artifact: String, reason: String },
}

/// Shape of a single field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Number,
    Integer,
    Boolean,
    /// JSON array of the inner kind
    List(Box<FieldKind>),
    /// JSON object with free-form keys and values of the inner kind
    Map(Box<FieldKind>),
    /// JSON object with fixed fields
    Object(Vec<FieldSpec>),
}

impl FieldKind {
    pub fn list_of(kind: FieldKind) -> Self {
        Self::List(Box::new(kind))
    }

    pub fn map_of(kind: FieldKind) -> Self {
        Self::Map(Box::new(kind))
    }

    /// Phrase used in prompts and error messages
    pub fn describe(&self) -> String {
        match self {
            FieldKind::Text => "a string".to_string(),
            FieldKind::Number => "a number".to_string(),
            FieldKind::Integer => "an integer".to_string(),
            FieldKind::Boolean => "a boolean".to_string(),
            FieldKind::List(inner) => format!("a list of {}", plural(inner)),
            FieldKind::Map(inner) => format!("an object mapping names to {}", plural(inner)),
            FieldKind::Object(_) => "an object".to_string(),
        }
    }

    fn skeleton(&self, description: &str) -> Value {
        match self {
            FieldKind::Text => Value::String(description.to_string()),
            FieldKind::Number => serde_json::json!(0.0),
            FieldKind::Integer => serde_json::json!(0),
            FieldKind::Boolean => Value::Bool(false),
            FieldKind::List(inner) => Value::Array(vec![inner.skeleton("...")]),
            FieldKind::Map(inner) => {
                let mut map = Map::new();
                map.insert("<name>".to_string(), inner.skeleton("..."));
                Value::Object(map)
            }
            FieldKind::Object(fields) => object_skeleton(fields),
        }
    }
}

fn plural(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Text => "strings".to_string(),
        FieldKind::Number => "numbers".to_string(),
        FieldKind::Integer => "integers".to_string(),
        FieldKind::Boolean => "booleans".to_string(),
        FieldKind::List(inner) => format!("lists of {}", plural(inner)),
        FieldKind::Map(_) | FieldKind::Object(_) => "objects".to_string(),
    }
}

/// One named field of an object
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub description: &'static str,
}

impl FieldSpec {
    pub fn required(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            description,
        }
    }

    pub fn optional(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            description,
        }
    }
}

/// Top-level schema for one artifact type
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactSchema {
    pub name: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl ArtifactSchema {
    pub fn new(name: &'static str, fields: Vec<FieldSpec>) -> Self {
        Self { name, fields }
    }

    /// Check `value` against the schema. Unknown fields are ignored; missing
    /// or mis-shaped ones are not.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaValidationError> {
        let Some(object) = value.as_object() else {
            return Err(SchemaValidationError::NotJson {
                artifact: self.name.to_string(),
                reason: format!("top level is {}", json_type(value)),
            });
        };
        self.check_fields(&self.fields, object, "")
    }

    fn check_fields(&self, fields: &[FieldSpec], object: &Map<String, Value>, prefix: &str) -> Result<(), SchemaValidationError> {
        for field in fields {
            let path = join_path(prefix, field.name);
            match object.get(field.name) {
                None | Some(Value::Null) if field.required => {
                    return Err(SchemaValidationError::MissingField {
                        artifact: self.name.to_string(),
                        path,
                    });
                }
                None | Some(Value::Null) => {}
                Some(Value::String(s)) if field.required && field.kind == FieldKind::Text && s.trim().is_empty() => {
                    return Err(SchemaValidationError::EmptyField {
                        artifact: self.name.to_string(),
                        path,
                    });
                }
                Some(value) => self.check_kind(&field.kind, value, &path)?,
            }
        }
        Ok(())
    }

    fn check_kind(&self, kind: &FieldKind, value: &Value, path: &str) -> Result<(), SchemaValidationError> {
        let ok = match (kind, value) {
            (FieldKind::Text, Value::String(_)) => true,
            (FieldKind::Number, Value::Number(_)) => true,
            (FieldKind::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (FieldKind::Boolean, Value::Bool(_)) => true,
            (FieldKind::List(inner), Value::Array(items)) => {
                for (idx, item) in items.iter().enumerate() {
                    self.check_kind(inner, item, &format!("{}[{}]", path, idx))?;
                }
                true
            }
            (FieldKind::Map(inner), Value::Object(entries)) => {
                for (key, item) in entries {
                    self.check_kind(inner, item, &join_path(path, key))?;
                }
                true
            }
            (FieldKind::Object(fields), Value::Object(entries)) => {
                self.check_fields(fields, entries, path)?;
                true
            }
            _ => false,
        };

        if ok {
            Ok(())
        } else {
            Err(SchemaValidationError::WrongShape {
                artifact: self.name.to_string(),
                path: path.to_string(),
                expected: kind.describe(),
                found: json_type(value),
            })
        }
    }

    /// Example JSON with every field in declaration order
    pub fn skeleton(&self) -> Value {
        object_skeleton(&self.fields)
    }

    /// Bullet list of fields for prompts
    pub fn describe_fields(&self) -> String {
        self.fields
            .iter()
            .map(|f| {
                format!(
                    "- {} ({}{}): {}",
                    f.name,
                    f.kind.describe(),
                    if f.required { "" } else { ", optional" },
                    f.description
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn object_skeleton(fields: &[FieldSpec]) -> Value {
    let mut map = Map::new();
    for field in fields {
        map.insert(field.name.to_string(), field.kind.skeleton(field.description));
    }
    Value::Object(map)
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

/// JSON type name of a value
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> ArtifactSchema {
        ArtifactSchema::new(
            "Sample",
            vec![
                FieldSpec::required("summary", FieldKind::Text, "One paragraph"),
                FieldSpec::required("tags", FieldKind::list_of(FieldKind::Text), "Tags"),
                FieldSpec::required(
                    "channels",
                    FieldKind::map_of(FieldKind::Object(vec![
                        FieldSpec::required("score", FieldKind::Number, "Score"),
                        FieldSpec::optional("count", FieldKind::Integer, "Count"),
                    ])),
                    "Per channel",
                ),
                FieldSpec::optional("note", FieldKind::Text, "Anything else"),
            ],
        )
    }

    #[test]
    fn test_validate_accepts_conforming_value() {
        let value = json!({
            "summary": "ok",
            "tags": ["a", "b"],
            "channels": {"TV": {"score": 7.5, "count": 3}, "Radio": {"score": 6}},
            "extra": true
        });
        assert!(schema().validate(&value).is_ok());
    }

    #[test]
    fn test_validate_rejects_list_where_map_expected() {
        let value = json!({
            "summary": "ok",
            "tags": [],
            "channels": [{"score": 7.5}]
        });
        let err = schema().validate(&value).unwrap_err();
        match err {
            SchemaValidationError::WrongShape { path, found, .. } => {
                assert_eq!(path, "channels");
                assert_eq!(found, "list");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_reports_nested_paths() {
        let value = json!({
            "summary": "ok",
            "tags": ["a", 3],
            "channels": {}
        });
        let err = schema().validate(&value).unwrap_err();
        assert!(matches!(err, SchemaValidationError::WrongShape { ref path, .. } if path == "tags[1]"));

        let value = json!({
            "summary": "ok",
            "tags": [],
            "channels": {"TV": {"count": 1}}
        });
        let err = schema().validate(&value).unwrap_err();
        assert!(matches!(err, SchemaValidationError::MissingField { ref path, .. } if path == "channels.TV.score"));
    }

    #[test]
    fn test_validate_missing_and_empty() {
        let err = schema().validate(&json!({"tags": [], "channels": {}})).unwrap_err();
        assert!(matches!(err, SchemaValidationError::MissingField { ref path, .. } if path == "summary"));

        let err = schema()
            .validate(&json!({"summary": "  ", "tags": [], "channels": {}}))
            .unwrap_err();
        assert!(matches!(err, SchemaValidationError::EmptyField { .. }));

        let err = schema().validate(&json!(["not", "an", "object"])).unwrap_err();
        assert!(matches!(err, SchemaValidationError::NotJson { .. }));
    }

    #[test]
    fn test_integer_rejects_fraction() {
        let value = json!({
            "summary": "ok",
            "tags": [],
            "channels": {"TV": {"score": 1, "count": 2.5}}
        });
        assert!(schema().validate(&value).is_err());
    }

    #[test]
    fn test_skeleton_keeps_declaration_order_and_shapes() {
        let skeleton = schema().skeleton();
        let keys: Vec<&String> = skeleton.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["summary", "tags", "channels", "note"]);
        assert!(skeleton["channels"].is_object());
        assert!(skeleton["channels"]["<name>"]["score"].is_number());
        assert!(skeleton["tags"].is_array());
        assert!(schema().validate(&skeleton).is_ok());
    }

    #[test]
    fn test_describe_fields() {
        let text = schema().describe_fields();
        assert!(text.contains("- channels (an object mapping names to objects): Per channel"));
        assert!(text.contains("- note (a string, optional): Anything else"));
    }
}
