/*!
Argument vector rendering.

Turns tokenized shell words plus caller supplied values into the concrete
argv handed to the subprocess layer. Values arrive as a JSON object
(`name -> string | bool | [string]`); names are looked up by exact key,
then the underscore spelling, then the dash spelling.

Per shell word:
  - only optional fields, none with a meaningful value -> dropped
  - lone array field   -> one argv entry per element
  - lone boolean flag  -> the original flag text when `true`
  - lone optional field -> the value when meaningful
  - anything else      -> one argv entry built by concatenation
*/

use serde_json::{Map, Value};
use thiserror::Error;

use super::schema::{PropertyType, Schema};
use super::token::{FieldToken, Token, denormalize, normalize};

/// Caller supplied tool arguments.
pub type Values = Map<String, Value>;

/// Validation failures surfaced to the caller instead of running the command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("missing required parameter: {name}")]
    MissingRequired { name: String },

    #[error("parameter '{name}' must be an {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/* ---- Value helpers ---- */

/// Find the value supplied for `name`, accepting either dash or underscore spelling.
/// JSON `null` counts as not supplied.
pub fn lookup<'a>(values: &'a Values, name: &str) -> Option<&'a Value> {
    values
        .get(name)
        .or_else(|| values.get(&normalize(name)))
        .or_else(|| values.get(&denormalize(name)))
        .filter(|value| !value.is_null())
}

/// Non-empty string, `true`, non-empty array or object, or any number.
fn is_meaningful(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Number(_) => true,
    }
}

/// String form used when a value is spliced into a shell word.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(" "),
        other => other.to_string(),
    }
}

/// JSON type label for error messages.
fn value_type_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn array_items(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(value_to_string).collect(),
        other if is_meaningful(other) => vec![value_to_string(other)],
        _ => Vec::new(),
    }
}

/* ---- Validation ---- */

/// Check required names are present and array properties received arrays.
pub fn validate(schema: &Schema, values: &Values) -> Result<(), RenderError> {
    if let Some(name) = schema
        .required()
        .iter()
        .find(|name| lookup(values, name).is_none())
    {
        return Err(RenderError::MissingRequired { name: name.clone() });
    }

    for (name, property) in schema.properties() {
        if property.kind != PropertyType::Array {
            continue;
        }
        if let Some(value) = lookup(values, name)
            && !value.is_array()
        {
            return Err(RenderError::TypeMismatch {
                name: name.to_string(),
                expected: "array",
                actual: value_type_label(value),
            });
        }
    }

    Ok(())
}

/* ---- Rendering ---- */

/// Render all shell words after `base_command`.
pub fn render(
    base_command: &str,
    shell_words: &[Vec<Token>],
    values: &Values,
) -> Result<Vec<String>, RenderError> {
    let mut argv = vec![base_command.to_string()];
    for tokens in shell_words {
        render_word(tokens, values, &mut argv)?;
    }
    Ok(argv)
}

fn render_word(tokens: &[Token], values: &Values, argv: &mut Vec<String>) -> Result<(), RenderError> {
    if is_droppable(tokens, values) {
        return Ok(());
    }

    if let [Token::Field(field)] = tokens {
        let value = lookup(values, &field.name);

        if field.is_array {
            if let Some(value) = value {
                argv.extend(array_items(value));
            } else if field.required {
                return Err(missing(field));
            }
            return Ok(());
        }
        if let Some(flag) = &field.original_flag {
            if value.and_then(Value::as_bool) == Some(true) {
                argv.push(flag.clone());
            }
            return Ok(());
        }
        if !field.required {
            if let Some(value) = value.filter(|v| is_meaningful(v)) {
                argv.push(value_to_string(value));
            }
            return Ok(());
        }
    }

    let mut word = String::new();
    for token in tokens {
        match token {
            Token::Text(text) => word.push_str(text),
            Token::Field(field) => word.push_str(&field_text(field, values)?),
        }
    }
    argv.push(word);
    Ok(())
}

/// A word made only of optional fields, none of them set.
fn is_droppable(tokens: &[Token], values: &Values) -> bool {
    tokens.iter().all(|token| match token {
        Token::Field(field) => {
            !field.required && !lookup(values, &field.name).is_some_and(is_meaningful)
        }
        Token::Text(_) => false,
    })
}

/// Text a field contributes when concatenated with its neighbours.
fn field_text(field: &FieldToken, values: &Values) -> Result<String, RenderError> {
    let Some(value) = lookup(values, &field.name) else {
        return if field.required {
            Err(missing(field))
        } else {
            Ok(String::new())
        };
    };

    Ok(match &field.original_flag {
        Some(flag) if value.as_bool() == Some(true) => flag.clone(),
        Some(_) => String::new(),
        None => value_to_string(value),
    })
}

fn missing(field: &FieldToken) -> RenderError {
    RenderError::MissingRequired {
        name: field.normalized_name(),
    }
}

/* --------------------------------- Tests ---------------------------------- */
