// Parameter validation for internal tools
//
// Checks the normalized arguments against the tool's parameter schema before
// a handler runs. Mismatches produce a formatted message for the model, not
// a crash.

use serde_json::Value;

use crate::tools::types::{JsonMap, ParameterSchema};

/// Validate arguments against a schema. Returns the failure description.
pub fn validate_parameters(schema: &ParameterSchema, args: &JsonMap) -> Result<(), String> {
    let missing: Vec<&String> = schema
        .required
        .iter()
        .filter(|param| !args.contains_key(param.as_str()))
        .collect();
    if !missing.is_empty() {
        return Err(format!(
            "Missing required parameters: {:?}\nRequired parameters: {:?}\nProvided parameters: {:?}",
            missing,
            schema.required,
            args.keys().collect::<Vec<_>>()
        ));
    }

    if schema.additional_properties == Some(false) {
        let invalid: Vec<&String> = args
            .keys()
            .filter(|key| !schema.properties.contains_key(key.as_str()))
            .collect();
        if !invalid.is_empty() {
            return Err(format!(
                "Invalid parameters: {:?}\nValid parameters: {:?}\nRequired parameters: {:?}",
                invalid,
                schema.properties.keys().collect::<Vec<_>>(),
                schema.required
            ));
        }
    }

    for (name, value) in args {
        let Some(spec) = schema.properties.get(name) else {
            continue;
        };
        let Some(expected) = spec.get("type").and_then(Value::as_str) else {
            continue;
        };
        if !type_matches(value, expected) {
            return Err(format!(
                "Invalid type for parameter '{}': expected {}, got {}",
                name,
                expected,
                type_name(value)
            ));
        }
    }

    Ok(())
}

fn type_matches(value: &Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "integer" => value.as_i64().is_some() || value.as_u64().is_some(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        // Unknown type declarations are permissive.
        _ => true,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Format a validation failure into a message the model can act on:
/// a usage example plus the parameter definitions.
pub fn format_validation_error(tool_name: &str, error: &str, schema: &ParameterSchema) -> String {
    let usage_parts: Vec<String> = schema
        .required
        .iter()
        .map(|param| format!("{}=<value>", param))
        .collect();
    let usage = if usage_parts.is_empty() {
        format!("{}()", tool_name)
    } else {
        format!("{}({})", tool_name, usage_parts.join(", "))
    };

    let mut param_lines: Vec<String> = schema
        .properties
        .iter()
        .map(|(name, spec)| {
            let param_type = spec.get("type").and_then(Value::as_str).unwrap_or("string");
            let description = spec
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("No description available");
            let required = if schema.required.contains(name) {
                " - REQUIRED"
            } else {
                ""
            };
            format!("  {} ({}){}: {}", name, param_type, required, description)
        })
        .collect();
    if param_lines.is_empty() {
        param_lines.push("No parameters defined".to_string());
    }

    format!(
        "ERROR: Invalid parameters for tool '{}'\n{}\nPlease use the correct syntax:\n\nCorrect usage: {}\n\nParameter definitions:\n{}",
        tool_name,
        error,
        usage,
        param_lines.join("\n")
    )
}
