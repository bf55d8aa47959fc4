//! Minimal directive engine hosting the template function directives.
//!
//! The engine owns the directive table, finds `@directive(...)` sites in
//! template source and splices the handler output in their place.

pub mod compiler;
pub mod errors;
pub mod normalize;
pub mod registry;

pub use compiler::TemplateCompiler;
pub use errors::TemplateError;
pub use registry::DirectiveRegistry;
