use std::fmt;
use std::sync::Arc;

/// Text-rewriting callback for directives that are not part of the function
/// directive set.
pub type CustomHandler = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// What a registered directive does when the template compiler reaches it.
#[derive(Clone)]
pub enum Handler {
    /// `@function(name(params))`: emit a prologue and register `Invoke`.
    Declare,
    /// `@endfunction`
    Close,
    /// `@return(expr)`
    Return,
    /// `@name(args)` for a previously declared template function.
    Invoke { name: String },
    Custom(CustomHandler),
}

impl Handler {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Handler::Custom(Arc::new(f))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Declare => write!(f, "Declare"),
            Handler::Close => write!(f, "Close"),
            Handler::Return => write!(f, "Return"),
            Handler::Invoke { name } => f.debug_struct("Invoke").field("name", name).finish(),
            Handler::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Handler::Declare, Handler::Declare)
            | (Handler::Close, Handler::Close)
            | (Handler::Return, Handler::Return) => true,
            (Handler::Invoke { name: a }, Handler::Invoke { name: b }) => a == b,
            (Handler::Custom(a), Handler::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Registration side of a template engine's directive table.
///
/// Registering a name that already exists replaces its handler.
#[cfg_attr(test, mockall::automock)]
pub trait DirectiveHost {
    fn register_directive(&mut self, name: &str, handler: Handler);
}
