
use crate::transpiler::errors::TranspileError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Identifier grammar for declared function names: a letter, underscore or any
/// character at or above U+007F, followed by the same set plus digits.
const IDENTIFIER: &str = r"[a-zA-Z_\x{7F}-\x{10FFFF}][a-zA-Z0-9_\x{7F}-\x{10FFFF}]*";

static NAME_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^[\t\n\x0B\x0C\r ]*({IDENTIFIER})")).expect("identifier prefix pattern")
});

static LEADING_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^{IDENTIFIER}")).expect("leading identifier pattern"));

static FULL_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^{IDENTIFIER}$")).expect("identifier pattern"));

// Greedy: pairs the first `(` with the last `)` on the same line.
static PARAMS_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((.*)\)").expect("params pattern"));

/// Name and raw parameter text pulled out of a `@function(...)` expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub name: String,
    pub params: String,
}

/// Splits declaration text such as `greet($name, $greeting = 'Hi')` into the
/// function name and the untouched parameter list.
///
/// The parameter list is best effort: text without parentheses yields an
/// empty list rather than an error.
pub fn extract(text: &str) -> Result<Extraction, TranspileError> {
    let name = NAME_PREFIX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| TranspileError::InvalidFunctionName {
            expression: text.to_string(),
        })?;

    let params = PARAMS_GROUP
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    Ok(Extraction { name, params })
}

/// Returns true when the whole of `name` matches the identifier grammar.
pub fn is_identifier(name: &str) -> bool {
    FULL_IDENTIFIER.is_match(name)
}

/// Identifier at the very start of `text`, with no whitespace skipped.
pub(crate) fn leading_identifier(text: &str) -> Option<&str> {
    LEADING_IDENTIFIER.find(text).map(|m| m.as_str())
}

/// Trims the whitespace set the template host itself trims: space, tab,
/// newline, carriage return, NUL and vertical tab.
pub(crate) fn trim_expression(text: &str) -> &str {
    text.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r' | '\0' | '\x0B'))
}
