/*!
Input schema inference.

Walks tokenized shell words once (word order, then token order) and
collects one property per normalized field name:

  flag              -> boolean, never required
  array (any form)  -> array of strings, always required
  {{name}}          -> string, required
  [name]            -> string, optional

Duplicate names merge: the first property wins, a later description fills
an empty one, and required-ness is OR-ed across occurrences.
*/

use serde::Serialize;
use serde_json::{Map, Value};

use super::token::{FieldToken, Token};

/// Description used for array properties declared without one.
pub const DEFAULT_ARRAY_DESCRIPTION: &str = "Additional command line arguments";

/// JSON schema primitive type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Array,
    Boolean,
}

/// `items` entry of an array property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Items {
    #[serde(rename = "type")]
    pub kind: PropertyType,
}

/// One entry of the `properties` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    #[serde(rename = "type")]
    pub kind: PropertyType,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,
}

impl Property {
    fn from_field(field: &FieldToken) -> Self {
        let kind = if field.is_flag() {
            PropertyType::Boolean
        } else if field.is_array {
            PropertyType::Array
        } else {
            PropertyType::String
        };
        Self {
            kind,
            description: field.description.clone(),
            items: (kind == PropertyType::Array).then_some(Items {
                kind: PropertyType::String,
            }),
        }
    }
}

/// Whether a field puts its name on the `required` list.
fn marks_required(field: &FieldToken) -> bool {
    if field.is_flag() {
        false
    } else {
        field.is_array || field.required
    }
}

/// Inferred `{type: object, properties, required}` schema.
///
/// Properties keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    properties: Vec<(String, Property)>,
    required: Vec<String>,
}

impl Schema {
    /// Build the schema from tokenized shell words.
    pub fn build(shell_words: &[Vec<Token>]) -> Self {
        let mut schema = Schema::default();

        let fields = shell_words.iter().flatten().filter_map(|token| match token {
            Token::Field(field) => Some(field),
            Token::Text(_) => None,
        });

        for field in fields {
            let name = field.normalized_name();

            match schema.property_mut(&name) {
                Some(existing) => {
                    if existing.description.is_empty() && !field.description.is_empty() {
                        existing.description = field.description.clone();
                    }
                }
                None => schema
                    .properties
                    .push((name.clone(), Property::from_field(field))),
            }

            if marks_required(field) && !schema.is_required(&name) {
                schema.required.push(name);
            }
        }

        // Defaults are applied last so an explicit description on a later
        // occurrence still wins the merge.
        for (_, property) in &mut schema.properties {
            if property.kind == PropertyType::Array && property.description.is_empty() {
                property.description = DEFAULT_ARRAY_DESCRIPTION.to_string();
            }
        }

        schema
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.properties.iter().map(|(name, prop)| (name.as_str(), prop))
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, prop)| prop)
    }

    fn property_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties
            .iter_mut()
            .find(|(key, _)| key == name)
            .map(|(_, prop)| prop)
    }

    /// Normalized names that must be supplied, in first-seen order.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// JSON object form; `required` is omitted when nothing qualifies.
    pub fn to_json(&self) -> Map<String, Value> {
        let mut properties = Map::new();
        for (name, prop) in &self.properties {
            // Property only holds strings and unit enums; serialization cannot fail.
            let value = serde_json::to_value(prop).unwrap_or(Value::Null);
            properties.insert(name.clone(), value);
        }

        let mut schema = Map::new();
        schema.insert("type".into(), Value::String("object".into()));
        schema.insert("properties".into(), Value::Object(properties));
        if !self.required.is_empty() {
            let required = self.required.iter().cloned().map(Value::String).collect();
            schema.insert("required".into(), Value::Array(required));
        }
        schema
    }
}

/* --------------------------------- Tests ---------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::token::tokenize;
    use serde_json::json;

    fn schema_for(words: &[&str]) -> Schema {
        let shell_words: Vec<Vec<Token>> = words.iter().map(|w| tokenize(w)).collect();
        Schema::build(&shell_words)
    }

    fn json_for(words: &[&str]) -> Value {
        Value::Object(schema_for(words).to_json())
    }

    #[test]
    fn literal_words_give_empty_schema_without_required() {
        assert_eq!(
            json_for(&["status"]),
            json!({"type": "object", "properties": {}})
        );
    }

    #[test]
    fn optional_array_is_required_with_default_description() {
        assert_eq!(
            json_for(&["status", "[args...]"]),
            json!({
                "type": "object",
                "properties": {
                    "args": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Additional command line arguments"
                    }
                },
                "required": ["args"]
            })
        );
    }

    #[test]
    fn array_with_custom_description() {
        let schema = schema_for(&["[files...#Files to list]"]);
        assert_eq!(schema.property("files").unwrap().description, "Files to list");
        assert_eq!(schema.required(), ["files"]);
    }

    #[test]
    fn required_and_optional_strings() {
        assert_eq!(
            json_for(&["{{arg1#Custom description}}", "[arg2]"]),
            json!({
                "type": "object",
                "properties": {
                    "arg1": {"type": "string", "description": "Custom description"},
                    "arg2": {"type": "string"}
                },
                "required": ["arg1"]
            })
        );
    }

    #[test]
    fn optional_string_is_not_required() {
        let schema = schema_for(&["[optional]"]);
        assert_eq!(schema.property("optional").unwrap().kind, PropertyType::String);
        assert!(schema.required().is_empty());
        assert!(!schema.to_json().contains_key("required"));
    }

    #[test]
    fn dashes_normalize_to_underscores() {
        let schema = schema_for(&["[has-dashes]", "{{my-var}}"]);
        assert!(schema.property("has_dashes").is_some());
        assert_eq!(schema.required(), ["my_var"]);
    }

    #[test]
    fn boolean_flags_are_never_required() {
        assert_eq!(
            json_for(&["[-r]", "{{source}}", "{{dest}}", "[--force#Overwrite]"]),
            json!({
                "type": "object",
                "properties": {
                    "r": {"type": "boolean", "description": "Enable -r flag"},
                    "source": {"type": "string"},
                    "dest": {"type": "string"},
                    "force": {"type": "boolean", "description": "Overwrite"}
                },
                "required": ["source", "dest"]
            })
        );
    }

    #[test]
    fn first_non_empty_description_wins() {
        let schema = schema_for(&["{{text#Explicit}}", "{{text}}"]);
        assert_eq!(schema.properties().count(), 1);
        assert_eq!(schema.property("text").unwrap().description, "Explicit");
        assert_eq!(schema.required(), ["text"]);

        let schema = schema_for(&["{{text}}", "{{text#Later}}", "{{text#Ignored}}"]);
        assert_eq!(schema.property("text").unwrap().description, "Later");
    }

    #[test]
    fn later_description_beats_array_default() {
        let schema = schema_for(&["[files...]", "[files...#Input files]"]);
        assert_eq!(schema.property("files").unwrap().description, "Input files");
    }

    #[test]
    fn required_is_or_of_occurrences() {
        let schema = schema_for(&["[name]", "--name={{name}}"]);
        assert_eq!(schema.required(), ["name"]);
        assert_eq!(schema.properties().count(), 1);
    }

    #[test]
    fn required_keeps_first_seen_order() {
        let schema = schema_for(&["{{b}}", "{{a}}", "[c...]", "{{b}}"]);
        assert_eq!(schema.required(), ["b", "a", "c"]);
    }
}
