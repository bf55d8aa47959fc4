pub mod cli;
pub mod config;
pub mod engine;
pub mod transpiler;

// Re-export commonly used types
pub use engine::{DirectiveRegistry, TemplateCompiler, TemplateError};
pub use transpiler::{
    DirectiveHost, Extraction, FragmentEmitter, Handler, Target, TranspileError, extract,
    install, transpile,
};
