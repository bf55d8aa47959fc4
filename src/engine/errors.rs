use crate::transpiler::errors::TranspileError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("@{directive} on line {line}: {source}")]
    Directive {
        directive: String,
        line: usize,
        source: TranspileError,
    },
}

impl TemplateError {
    pub fn line(&self) -> usize {
        match self {
            TemplateError::Directive { line, .. } => *line,
        }
    }
}
