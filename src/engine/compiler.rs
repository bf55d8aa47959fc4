use crate::config::DirectivesConfig;
use crate::engine::errors::TemplateError;
use crate::engine::normalize::strip_outer_parens;
use crate::engine::registry::DirectiveRegistry;
use crate::transpiler::codegen::FragmentEmitter;
use crate::transpiler::extract::leading_identifier;
use crate::transpiler::install;
use tracing::debug;

/// Rewrites the directives of a template into output-language fragments.
///
/// Only `@directive` and `@directive(...)` sites whose name is registered at
/// the time they are reached are rewritten; everything else is copied
/// through. Because declarations register new directives as they are
/// compiled, a template function can only be invoked below its declaration.
#[derive(Debug)]
pub struct TemplateCompiler {
    registry: DirectiveRegistry,
}

impl TemplateCompiler {
    /// Creates a compiler with the function directive set installed.
    pub fn new(emitter: FragmentEmitter, directives: &DirectivesConfig) -> Self {
        let mut registry = DirectiveRegistry::new(emitter);
        install(&mut registry, directives);
        Self { registry }
    }

    pub fn with_registry(registry: DirectiveRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &DirectiveRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DirectiveRegistry {
        &mut self.registry
    }

    pub fn into_registry(self) -> DirectiveRegistry {
        self.registry
    }

    pub fn compile(&mut self, source: &str) -> Result<String, TemplateError> {
        let mut output = String::with_capacity(source.len());
        let mut copied = 0;
        let mut cursor = 0;

        while let Some(offset) = source[cursor..].find('@') {
            let at = cursor + offset;
            cursor = at + 1;

            if preceded_by_word_char(source, at) {
                continue;
            }

            // `@@name` renders a literal `@name`.
            if source[at + 1..].starts_with('@') {
                if let Some(name) = leading_identifier(&source[at + 2..]) {
                    output.push_str(&source[copied..at]);
                    output.push('@');
                    output.push_str(name);
                    copied = at + 2 + name.len();
                    cursor = copied;
                } else {
                    cursor = at + 2;
                }
                continue;
            }

            let Some(name) = leading_identifier(&source[at + 1..]) else {
                continue;
            };
            let name_end = at + 1 + name.len();
            cursor = name_end;
            if !self.registry.contains(name) {
                continue;
            }

            let group_start = name_end
                + source[name_end..]
                    .bytes()
                    .take_while(|b| *b == b' ' || *b == b'\t')
                    .count();
            let (expression, end) = match group_end(source, group_start) {
                Some(close) => (strip_outer_parens(&source[group_start..=close]), close + 1),
                None => ("", name_end),
            };

            let fragment = self
                .registry
                .dispatch(name, expression)
                .map_err(|source_err| TemplateError::Directive {
                    directive: name.to_string(),
                    line: line_of(source, at),
                    source: source_err,
                })?;

            if let Some(fragment) = fragment {
                debug!(directive = name, line = line_of(source, at), "compiled directive");
                output.push_str(&source[copied..at]);
                output.push_str(&fragment);
                copied = end;
                cursor = end;
            }
        }

        output.push_str(&source[copied..]);
        Ok(output)
    }
}

fn preceded_by_word_char(source: &str, at: usize) -> bool {
    source[..at]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn line_of(source: &str, at: usize) -> usize {
    source[..at].bytes().filter(|b| *b == b'\n').count() + 1
}

/// Byte index of the `)` closing the group that opens at `start`, if `start`
/// holds a `(` and the group is balanced. Parentheses inside single or double
/// quoted strings are ignored.
fn group_end(source: &str, start: usize) -> Option<usize> {
    if !source[start..].starts_with('(') {
        return None;
    }

    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (offset, c) in source[start..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }

    None
}
