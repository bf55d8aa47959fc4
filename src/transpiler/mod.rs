pub mod codegen;
pub mod directive;
pub mod errors;
pub mod extract;

pub use codegen::{FragmentEmitter, Target};
pub use directive::{DirectiveHost, Handler};
pub use errors::TranspileError;
pub use extract::{Extraction, extract};

use crate::config::DirectivesConfig;
use crate::engine::TemplateCompiler;
use crate::engine::errors::TemplateError;
use tracing::debug;

/// Registers the function directive set on `host`.
///
/// `@return` is only installed when a name is configured for it.
pub fn install(host: &mut dyn DirectiveHost, directives: &DirectivesConfig) {
    host.register_directive(&directives.function, Handler::Declare);
    host.register_directive(&directives.endfunction, Handler::Close);
    if let Some(name) = directives.return_directive() {
        host.register_directive(name, Handler::Return);
    }
    debug!(
        function = %directives.function,
        endfunction = %directives.endfunction,
        "installed function directives"
    );
}

/// Convenience function to compile a template with the default directive set
/// and PHP output.
pub fn transpile(source: &str) -> Result<String, TemplateError> {
    let mut compiler =
        TemplateCompiler::new(FragmentEmitter::default(), &DirectivesConfig::default());
    compiler.compile(source)
}
