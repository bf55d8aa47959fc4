use crate::transpiler::codegen::FragmentEmitter;
use crate::transpiler::directive::{DirectiveHost, Handler};
use crate::transpiler::errors::TranspileError;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Directive table for one compilation context.
///
/// Declaring a template function adds an entry while the template is being
/// compiled, so the registry must be owned by exactly one compiler at a
/// time. Callers sharing it across threads have to serialize access
/// themselves (for example behind a `Mutex`).
#[derive(Debug, Default)]
pub struct DirectiveRegistry {
    handlers: HashMap<String, Handler>,
    emitter: FragmentEmitter,
}

impl DirectiveRegistry {
    pub fn new(emitter: FragmentEmitter) -> Self {
        Self {
            handlers: HashMap::new(),
            emitter,
        }
    }

    pub fn emitter(&self) -> &FragmentEmitter {
        &self.emitter
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn handler(&self, name: &str) -> Option<&Handler> {
        self.handlers.get(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Names of all template functions declared so far, sorted.
    pub fn declared_functions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .handlers
            .values()
            .filter_map(|handler| match handler {
                Handler::Invoke { name } => Some(name.as_str()),
                _ => None,
            })
            .collect();
        names.sort_unstable();
        names
    }

    /// Runs the handler registered under `name` against `expression`.
    ///
    /// Returns `Ok(None)` when nothing is registered under `name`.
    pub fn dispatch(
        &mut self,
        name: &str,
        expression: &str,
    ) -> Result<Option<String>, TranspileError> {
        let Some(handler) = self.handlers.get(name).cloned() else {
            return Ok(None);
        };
        trace!(directive = name, ?handler, "dispatching directive");

        let fragment = match handler {
            Handler::Declare => {
                let emitter = self.emitter.clone();
                emitter.declare(self, expression)?
            }
            Handler::Close => self.emitter.close(),
            Handler::Return => self.emitter.return_value(expression),
            Handler::Invoke { name } => self.emitter.invoke(&name, expression),
            Handler::Custom(callback) => (*callback)(expression),
        };
        Ok(Some(fragment))
    }
}

impl DirectiveHost for DirectiveRegistry {
    fn register_directive(&mut self, name: &str, handler: Handler) {
        if let Some(previous) = self.handlers.insert(name.to_string(), handler) {
            debug!(directive = name, ?previous, "replaced existing directive");
        }
    }
}
