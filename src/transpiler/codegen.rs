use crate::transpiler::directive::{DirectiveHost, Handler};
use crate::transpiler::errors::TranspileError;
use crate::transpiler::extract::{extract, trim_expression};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Joins a non-empty parameter or argument list to the implicit context.
const SEPARATOR: &str = " , ";

/// Output language of the emitted fragments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// PHP blocks spliced into a compiled Blade view.
    #[default]
    Php,
    /// Language-neutral `BEGIN_FUNC` / `CALL` / `END_FUNC` markers.
    Pseudo,
}

impl Target {
    pub fn default_context_var(&self) -> &'static str {
        match self {
            Target::Php => "$__env",
            Target::Pseudo => "ctx",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Php => write!(f, "php"),
            Target::Pseudo => write!(f, "pseudo"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentEmitter {
    target: Target,
    context_var: String,
}

impl Default for FragmentEmitter {
    fn default() -> Self {
        Self::new(Target::default())
    }
}

impl FragmentEmitter {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            context_var: target.default_context_var().to_string(),
        }
    }

    pub fn with_context_var(mut self, context_var: impl Into<String>) -> Self {
        self.context_var = context_var.into();
        self
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn context_var(&self) -> &str {
        &self.context_var
    }

    /// Handles `@function(...)`.
    ///
    /// Emits the function prologue and registers an invocation directive
    /// under the declared name on `host`. A name that is already registered
    /// is overwritten, so the last declaration wins.
    pub fn declare(
        &self,
        host: &mut dyn DirectiveHost,
        expression: &str,
    ) -> Result<String, TranspileError> {
        let extraction = extract(expression)?;
        let params = join_with_context(&extraction.params);

        debug!(function = %extraction.name, "registering invocation directive");
        host.register_directive(
            &extraction.name,
            Handler::Invoke {
                name: extraction.name.clone(),
            },
        );

        Ok(match self.target {
            Target::Php => format!(
                "<?php function {} ( {}  {} ) {{ ?>",
                extraction.name, params, self.context_var
            ),
            Target::Pseudo => format!(
                "BEGIN_FUNC {} ( {}{} )",
                extraction.name, params, self.context_var
            ),
        })
    }

    /// Handles `@name(args)` for a declared template function.
    pub fn invoke(&self, name: &str, args: &str) -> String {
        let args = join_with_context(args);
        match self.target {
            Target::Php => format!("<?php {} ({} {}); ?>", name, args, self.context_var),
            Target::Pseudo => format!("CALL {} ( {}{} )", name, args, self.context_var),
        }
    }

    /// Handles `@endfunction`.
    pub fn close(&self) -> String {
        match self.target {
            Target::Php => "<?php } ?>".to_string(),
            Target::Pseudo => "END_FUNC".to_string(),
        }
    }

    /// Handles `@return(expr)`; the expression is passed through untouched.
    pub fn return_value(&self, expression: &str) -> String {
        match self.target {
            Target::Php => format!("<?php return ({}); ?>", expression),
            Target::Pseudo => format!("RETURN ({})", expression),
        }
    }
}

// "a, b" -> "a, b , ", "" -> ""
fn join_with_context(list: &str) -> String {
    let list = trim_expression(list);
    if list.is_empty() {
        String::new()
    } else {
        format!("{list}{SEPARATOR}")
    }
}
