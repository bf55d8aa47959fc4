// src/transpiler/errors.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranspileError {
    #[error("Invalid function name given in blade template: '{expression}' is invalid")]
    InvalidFunctionName { expression: String },
}
