//! Structural validation of raw layer JSON.
//!
//! The editor persists layers as loose JSON; this check runs before
//! deserialization so a malformed layer yields field-level messages
//! instead of a single serde error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

const LAYER_KINDS: &[&str] = &["image", "text", "shape", "whiteboard"];

/// The outcome of validating one layer document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> ValidationReport {
        ValidationReport {
            valid: errors.is_empty(),
            errors,
        }
    }
}

fn has_any_key(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter().any(|k| obj.get(*k).is_some_and(|v| !v.is_null()))
}

/// Validate a raw layer document. Checks the identity fields and that
/// the kind-specific payload is present; it does not type-check the
/// payload's interior, which deserialization covers.
pub fn validate_layer_json(value: &Value) -> ValidationReport {
    let mut errors = Vec::new();

    let Some(obj) = value.as_object() else {
        return ValidationReport::from_errors(vec!["layer must be a JSON object".to_string()]);
    };

    match obj.get("id") {
        Some(Value::String(id)) if !id.is_empty() => {}
        Some(Value::String(_)) => errors.push("layer field 'id' must not be empty".to_string()),
        Some(_) => errors.push("layer field 'id' must be a string".to_string()),
        None => errors.push("layer is missing required field 'id'".to_string()),
    }

    let kind = match obj.get("type") {
        Some(Value::String(kind)) if LAYER_KINDS.contains(&kind.as_str()) => Some(kind.as_str()),
        Some(Value::String(kind)) => {
            errors.push(format!(
                "layer field 'type' has unknown value '{}' (expected one of: {})",
                kind,
                LAYER_KINDS.join(", ")
            ));
            None
        }
        Some(_) => {
            errors.push("layer field 'type' must be a string".to_string());
            None
        }
        None => {
            errors.push("layer is missing required field 'type'".to_string());
            None
        }
    };

    match kind {
        Some("image") => {
            if !has_any_key(obj, &["image_path", "imagePath", "src"]) {
                errors.push("image layer is missing required field 'image_path'".to_string());
            }
        }
        Some("text") => {
            if !has_any_key(obj, &["text_config", "textConfig"]) {
                errors.push("text layer is missing required field 'text_config'".to_string());
            }
        }
        Some("shape") => {
            if !has_any_key(obj, &["shape_config", "shapeConfig"]) {
                errors.push("shape layer is missing required field 'shape_config'".to_string());
            }
        }
        Some("whiteboard") => {
            if !has_any_key(obj, &["strokes"]) {
                errors.push("whiteboard layer is missing required field 'strokes'".to_string());
            }
        }
        _ => {}
    }

    ValidationReport::from_errors(errors)
}
