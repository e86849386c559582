/*!
Blueprint: a templated command line parsed once at startup.

  Blueprint::from_args(argv)
    argv[0]   -> base command (literal)
    argv[1..] -> template shell words, tokenized independently

Derived from it:
  tool_name()        base command as a tool identifier
  command_format()   display form, e.g. `echo {{text}} [files...]`
  input_schema()     JSON schema object for the tool input
  render(values)     concrete argv for one tool call

The blueprint is immutable after construction; rendering never mutates it.
*/

pub mod render;
pub mod schema;
pub mod token;

use std::borrow::Cow;
use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;

pub use render::{RenderError, Values};
pub use schema::Schema;
pub use token::{Token, tokenize};

/// Errors raised while building a blueprint from the process argv.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlueprintError {
    #[error("no command provided")]
    NoCommand,

    #[error("empty command provided")]
    EmptyCommand,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    base_command: String,
    tool_name: String,
    shell_words: Vec<Vec<Token>>,
    schema: Schema,
}

impl Blueprint {
    /// Parse a full argument vector (command first, template words after).
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, BlueprintError> {
        let (base, rest) = args.split_first().ok_or(BlueprintError::NoCommand)?;
        let base_command = base.as_ref();
        if base_command.trim().is_empty() {
            return Err(BlueprintError::EmptyCommand);
        }

        let shell_words: Vec<Vec<Token>> = rest.iter().map(|w| tokenize(w.as_ref())).collect();
        let schema = Schema::build(&shell_words);

        Ok(Self {
            base_command: base_command.to_string(),
            tool_name: tool_name_for(base_command),
            shell_words,
            schema,
        })
    }

    pub fn base_command(&self) -> &str {
        &self.base_command
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn shell_words(&self) -> &[Vec<Token>] {
        &self.shell_words
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Schema as the JSON object advertised to MCP clients.
    pub fn input_schema(&self) -> Map<String, Value> {
        self.schema.to_json()
    }

    /// Display form of the command line with descriptions stripped.
    pub fn command_format(&self) -> String {
        let words = self
            .shell_words
            .iter()
            .map(|tokens| tokens.iter().map(Token::display).collect::<String>());

        std::iter::once(self.base_command.clone())
            .chain(words)
            .map(|word| quote_if_spaced(&word).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn tool_description(&self) -> String {
        format!("Run the shell command `{}`", self.command_format())
    }

    /// Validate `values` against the schema and build the argv to execute.
    pub fn render(&self, values: &Values) -> Result<Vec<String>, RenderError> {
        render::validate(&self.schema, values)?;
        render::render(&self.base_command, &self.shell_words, values)
    }
}

/// Tool identifier for a base command: file name only, `[A-Za-z0-9_]` kept,
/// everything else (dashes included) mapped to `_`.
pub fn tool_name_for(base_command: &str) -> String {
    let trimmed = base_command.trim();
    let name = Path::new(trimmed)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or(trimmed);

    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

fn quote_if_spaced(word: &str) -> Cow<'_, str> {
    if word.chars().any(char::is_whitespace) {
        shell_words::quote(word)
    } else {
        Cow::Borrowed(word)
    }
}

/* --------------------------------- Tests ---------------------------------- */
