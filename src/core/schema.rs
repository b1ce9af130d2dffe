//! Argument validation against a capability's declared input schema.
//!
//! Schemas are plain `serde_json::Value` literals in the JSON Schema shape
//! the tools already publish through `tools/list`:
//!
//! ```json
//! { "type": "object",
//!   "properties": { "operator": { "type": "string", "enum": ["+","-"] } },
//!   "required": ["operator"] }
//! ```
//!
//! Only the subset the capabilities use is interpreted: `properties`,
//! `required`, per-field `type` (string / number / integer / boolean) and
//! `enum` over strings. Validation is pure; the handler is never invoked
//! here.

use serde_json::Value as JsonValue;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("arguments must be a JSON object")]
    NotAnObject,
    #[error("invalid arguments: {}", format_violations(.0))]
    Fields(Vec<FieldViolation>),
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Check `arguments` against `schema`. Collects every violated field rather
/// than stopping at the first.
pub fn validate(schema: &JsonValue, arguments: &JsonValue) -> Result<(), SchemaError> {
    let empty = serde_json::Map::new();
    let args = match arguments {
        JsonValue::Object(map) => map,
        // Absent params are fine as long as nothing is required.
        JsonValue::Null => &empty,
        _ => return Err(SchemaError::NotAnObject),
    };

    let mut violations = Vec::new();

    if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
        for field in required.iter().filter_map(|f| f.as_str()) {
            if !args.contains_key(field) {
                violations.push(FieldViolation {
                    field: field.to_string(),
                    message: "missing required field".to_string(),
                });
            }
        }
    }

    if let Some(props) = schema.get("properties").and_then(|p| p.as_object()) {
        for (field, decl) in props {
            let Some(value) = args.get(field) else { continue };

            if let Some(expected) = decl.get("type").and_then(|t| t.as_str()) {
                if let Some(message) = check_type(expected, value) {
                    violations.push(FieldViolation { field: field.clone(), message });
                    continue;
                }
            }

            if let Some(allowed) = decl.get("enum").and_then(|e| e.as_array()) {
                if !allowed.contains(value) {
                    violations.push(FieldViolation {
                        field: field.clone(),
                        message: format!(
                            "{} is not one of {}",
                            value,
                            serde_json::Value::Array(allowed.clone())
                        ),
                    });
                }
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::Fields(violations))
    }
}

/// Returns a violation message when `value` does not match the declared
/// primitive type. Numbers accept any real value, including negative and
/// fractional ones.
fn check_type(expected: &str, value: &JsonValue) -> Option<String> {
    let ok = match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        _ => true,
    };
    if ok {
        None
    } else {
        Some(format!("expected {expected}, got {}", type_name(value)))
    }
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
