/*!
Shell word tokenizer.

A template shell word is split into literal text and field placeholders:

  {{name}}  {{name#desc}}  {{name...}}      required string / array
  [name]    [name#desc]    [name...]        optional string / array
  [-f]      [--flag]       [-f#desc]        boolean flag

Tokenization is total: malformed placeholders (no closer, empty name,
characters outside `[A-Za-z0-9_-]`) are kept as literal text.
*/

/// Default description given to boolean flags declared without one.
fn default_flag_description(flag: &str) -> String {
    format!("Enable {flag} flag")
}

/* ---- Tokens ---- */

/// One piece of a tokenized shell word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal characters, emitted verbatim.
    Text(String),
    /// A substitutable placeholder.
    Field(FieldToken),
}

impl Token {
    /// Display form used in the human readable command format.
    pub fn display(&self) -> String {
        match self {
            Token::Text(value) => value.clone(),
            Token::Field(field) => field.display(),
        }
    }
}

/// A parsed `{{...}}` or `[...]` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldToken {
    /// Name as written in the template (leading dashes stripped for flags).
    pub name: String,
    /// Trimmed description, empty when none was given.
    pub description: String,
    /// `true` for `{{...}}`, `false` for `[...]`.
    pub required: bool,
    /// Declared with a trailing `...`.
    pub is_array: bool,
    /// Original `-f` / `--flag` spelling for boolean flags.
    pub original_flag: Option<String>,
}

impl FieldToken {
    pub fn is_flag(&self) -> bool {
        self.original_flag.is_some()
    }

    /// Schema property key for this field.
    pub fn normalized_name(&self) -> String {
        normalize(&self.name)
    }

    pub fn display(&self) -> String {
        if let Some(flag) = &self.original_flag {
            return format!("[{flag}]");
        }
        match (self.required, self.is_array) {
            (true, false) => format!("{{{{{}}}}}", self.name),
            (true, true) => format!("{{{{{}...}}}}", self.name),
            (false, true) => format!("[{}...]", self.name),
            (false, false) => format!("[{}]", self.normalized_name()),
        }
    }
}

/// Dash to underscore, the canonical property spelling.
pub fn normalize(name: &str) -> String {
    name.replace('-', "_")
}

/// Underscore to dash, the alternate spelling accepted from callers.
pub fn denormalize(name: &str) -> String {
    name.replace('_', "-")
}

/* ---- Delimiters ---- */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Required,
    Optional,
}

impl Delimiter {
    const ALL: [Delimiter; 2] = [Delimiter::Required, Delimiter::Optional];

    fn open(self) -> &'static str {
        match self {
            Delimiter::Required => "{{",
            Delimiter::Optional => "[",
        }
    }

    fn close(self) -> &'static str {
        match self {
            Delimiter::Required => "}}",
            Delimiter::Optional => "]",
        }
    }
}

/* ---- Tokenizer ---- */

/// Split one shell word into tokens. Never fails and never returns an empty vec.
pub fn tokenize(word: &str) -> Vec<Token> {
    if let Some(field) = whole_word_field(word) {
        return vec![Token::Field(field)];
    }

    let mut out = TokenBuffer::default();
    let mut rest = word;

    while !rest.is_empty() {
        let Some((start, delim)) = next_opener(rest) else {
            out.push_text(rest);
            break;
        };
        out.push_text(&rest[..start]);

        let body_start = start + delim.open().len();
        let Some(body_len) = rest[body_start..].find(delim.close()) else {
            // Unbalanced: the opener and everything after it stays literal.
            out.push_text(&rest[start..]);
            break;
        };
        let end = body_start + body_len + delim.close().len();

        match parse_field(&rest[body_start..body_start + body_len], delim) {
            Some(field) => out.push_field(field),
            None => out.push_text(&rest[start..end]),
        }
        rest = &rest[end..];
    }

    out.finish()
}

/// Fast path for a word that is exactly one placeholder, e.g. `[files...]`.
fn whole_word_field(word: &str) -> Option<FieldToken> {
    let trimmed = word.trim();
    Delimiter::ALL.into_iter().find_map(|delim| {
        let body = trimmed
            .strip_prefix(delim.open())?
            .strip_suffix(delim.close())?;
        if body.contains(delim.open()) || body.contains(delim.close()) {
            return None;
        }
        parse_field(body, delim)
    })
}

/// Closest `{{` or `[` in `s`.
fn next_opener(s: &str) -> Option<(usize, Delimiter)> {
    Delimiter::ALL
        .into_iter()
        .filter_map(|delim| s.find(delim.open()).map(|pos| (pos, delim)))
        .min_by_key(|(pos, _)| *pos)
}

/// Parse the text between delimiters. `None` means "not a valid placeholder".
fn parse_field(body: &str, delim: Delimiter) -> Option<FieldToken> {
    let (name, description) = match body.split_once('#') {
        Some((name, description)) => (name.trim(), description.trim()),
        None => (body.trim(), ""),
    };
    let (name, is_array) = match name.strip_suffix("...") {
        Some(stripped) => (stripped.trim_end(), true),
        None => (name, false),
    };
    if !is_valid_name(name) {
        return None;
    }

    let required = delim == Delimiter::Required;

    if !required && !is_array && name.starts_with('-') {
        let bare = name.trim_start_matches('-');
        if !is_valid_name(bare) {
            return None;
        }
        let description = if description.is_empty() {
            default_flag_description(name)
        } else {
            description.to_string()
        };
        return Some(FieldToken {
            name: bare.to_string(),
            description,
            required: false,
            is_array: false,
            original_flag: Some(name.to_string()),
        });
    }

    Some(FieldToken {
        name: name.to_string(),
        description: description.to_string(),
        required,
        is_array,
        original_flag: None,
    })
}

/// Letters, digits, `_` and `-`, with at least one non-dash character.
fn is_valid_name(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && name.chars().any(|c| c != '-')
}

/// Accumulates tokens, merging adjacent literal text.
#[derive(Default)]
struct TokenBuffer {
    tokens: Vec<Token>,
}

impl TokenBuffer {
    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Token::Text(last)) = self.tokens.last_mut() {
            last.push_str(text);
        } else {
            self.tokens.push(Token::Text(text.to_string()));
        }
    }

    fn push_field(&mut self, field: FieldToken) {
        self.tokens.push(Token::Field(field));
    }

    fn finish(mut self) -> Vec<Token> {
        if self.tokens.is_empty() {
            self.tokens.push(Token::Text(String::new()));
        }
        self.tokens
    }
}

/* --------------------------------- Tests ---------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Token {
        Token::Text(value.to_string())
    }

    fn required(name: &str, description: &str) -> Token {
        Token::Field(FieldToken {
            name: name.to_string(),
            description: description.to_string(),
            required: true,
            ..Default::default()
        })
    }

    fn single_field(word: &str) -> FieldToken {
        match tokenize(word).as_slice() {
            [Token::Field(field)] => field.clone(),
            other => panic!("expected a single field for {word:?}, got {other:?}"),
        }
    }

    #[test]
    fn plain_word_is_text() {
        assert_eq!(tokenize("status"), vec![text("status")]);
    }

    #[test]
    fn empty_word_is_single_empty_text() {
        assert_eq!(tokenize(""), vec![text("")]);
    }

    #[test]
    fn required_field_with_description() {
        assert_eq!(
            tokenize("{{text#message to echo}}"),
            vec![required("text", "message to echo")]
        );
    }

    #[test]
    fn description_is_trimmed_once() {
        let field = single_field("{{text # desc with  spaces }}");
        assert_eq!(field.name, "text");
        assert_eq!(field.description, "desc with  spaces");
    }

    #[test]
    fn multiple_fields_in_one_word() {
        assert_eq!(
            tokenize("{{greeting}} {{name}}!"),
            vec![required("greeting", ""), text(" "), required("name", ""), text("!")]
        );
    }

    #[test]
    fn prefix_and_suffix_around_field() {
        assert_eq!(
            tokenize("prefix-{{text}}-suffix"),
            vec![text("prefix-"), required("text", ""), text("-suffix")]
        );
    }

    #[test]
    fn optional_scalar() {
        let field = single_field("[name#Person's name]");
        assert!(!field.required);
        assert!(!field.is_array);
        assert_eq!(field.description, "Person's name");
        assert_eq!(field.original_flag, None);
    }

    #[test]
    fn optional_array_with_and_without_description() {
        let field = single_field("[files...]");
        assert!(field.is_array);
        assert!(!field.required);
        assert_eq!(field.name, "files");

        let field = single_field("[files...#Files to list]");
        assert!(field.is_array);
        assert_eq!(field.description, "Files to list");
    }

    #[test]
    fn required_array() {
        let field = single_field("{{paths...}}");
        assert!(field.is_array);
        assert!(field.required);
    }

    #[test]
    fn boolean_flags() {
        let short = single_field("[-f]");
        assert_eq!(short.name, "f");
        assert_eq!(short.original_flag.as_deref(), Some("-f"));
        assert_eq!(short.description, "Enable -f flag");

        let long = single_field("[--human-readable]");
        assert_eq!(long.name, "human-readable");
        assert_eq!(long.normalized_name(), "human_readable");
        assert_eq!(long.original_flag.as_deref(), Some("--human-readable"));

        let described = single_field("[-f#force removal]");
        assert_eq!(described.description, "force removal");
    }

    #[test]
    fn dash_name_inside_braces_is_plain_required_field() {
        let field = single_field("{{-r#recursive}}");
        assert!(field.required);
        assert_eq!(field.original_flag, None);
        assert_eq!(field.normalized_name(), "_r");
    }

    #[test]
    fn unbalanced_opener_stays_literal() {
        assert_eq!(tokenize("{{incomplete"), vec![text("{{incomplete")]);
        assert_eq!(tokenize("a [b"), vec![text("a [b")]);
        assert_eq!(
            tokenize("{{valid}} and {{broken"),
            vec![required("valid", ""), text(" and {{broken")]
        );
    }

    #[test]
    fn stray_closer_stays_literal() {
        assert_eq!(tokenize("no_opening_braces}}"), vec![text("no_opening_braces}}")]);
        assert_eq!(tokenize("}}"), vec![text("}}")]);
    }

    #[test]
    fn empty_or_invalid_names_stay_literal() {
        assert_eq!(tokenize("{{}}"), vec![text("{{}}")]);
        assert_eq!(tokenize("[#only description]"), vec![text("[#only description]")]);
        assert_eq!(tokenize("[a b]"), vec![text("[a b]")]);
        assert_eq!(tokenize("[--]"), vec![text("[--]")]);
        assert_eq!(tokenize("x{{ }}y"), vec![text("x{{ }}y")]);
    }

    #[test]
    fn invalid_placeholder_merges_with_surrounding_text() {
        assert_eq!(
            tokenize("a{{}}b{{c}}"),
            vec![text("a{{}}b"), required("c", "")]
        );
    }

    #[test]
    fn whole_word_fast_path_ignores_surrounding_whitespace() {
        let field = single_field("  [files...]  ");
        assert!(field.is_array);
    }

    #[test]
    fn flag_embedded_in_text() {
        let tokens = tokenize("x[-v]");
        assert_eq!(tokens.len(), 2);
        assert!(matches!(&tokens[1], Token::Field(f) if f.is_flag()));
    }

    #[test]
    fn retokenizing_is_stable() {
        for word in ["{{a}}-[b]-[-c]", "[files...#x]", "{{oops", "plain"] {
            assert_eq!(tokenize(word), tokenize(word));
        }
    }

    #[test]
    fn display_forms() {
        let shown: Vec<String> = ["{{text#say}}", "[has-dashes]", "[files...#x]", "[--force#y]", "{{p...}}"]
            .iter()
            .map(|w| tokenize(w).iter().map(Token::display).collect())
            .collect();
        assert_eq!(
            shown,
            vec!["{{text}}", "[has_dashes]", "[files...]", "[--force]", "{{p...}}"]
        );
    }

    #[test]
    fn display_of_text_round_trips() {
        let word = "https://example.com/{{page # a page}}?q=1";
        let shown: String = tokenize(word).iter().map(Token::display).collect();
        assert_eq!(shown, "https://example.com/{{page}}?q=1");
    }
}
