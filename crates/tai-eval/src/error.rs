//! Runtime error types for the TaiScript interpreter.

use thiserror::Error;

use crate::bribe::BribeError;

/// Evaluation error. Any variant other than the internal control-flow ones
/// aborts the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("Variable '{0}' is not defined.")]
    UndefinedVariable(String),

    #[error("Struct '{0}' is not defined.")]
    UndefinedStruct(String),

    /// Operand types an operator cannot combine.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Division by zero.")]
    DivisionByZero,

    #[error("Modulo by zero.")]
    ModuloByZero,

    /// `agar` condition held but the true branch has no statements.
    #[error("Missing 'if' branch in conditional.")]
    MissingBranch,

    #[error("File alias '{0}' is already in use.")]
    FileAliasInUse(String),

    #[error("File alias '{0}' is not open.")]
    FileNotOpen(String),

    #[error("file error on '{target}': {message}")]
    Io { target: String, message: String },

    /// Loop start, end or step that is not a whole number.
    #[error("loop bounds must be whole numbers: {0}")]
    LoopBound(String),

    #[error("'bijli chali gayi' used outside a loop.")]
    BreakOutsideLoop,

    #[error("loop exceeded the iteration limit of {limit}")]
    LoopLimit { limit: u64 },

    #[error("failed to read input: {0}")]
    Input(String),

    #[error(transparent)]
    Bribe(#[from] BribeError),

    /// `bijli chali gayi` (used internally for control flow)
    #[error("break")]
    Break,

    /// `sarkar gir gayi` (used internally for control flow)
    #[error("return")]
    Return,
}

impl EvalError {
    pub(crate) fn io(target: impl Into<String>, err: &std::io::Error) -> Self {
        Self::Io {
            target: target.into(),
            message: err.to_string(),
        }
    }
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            EvalError::UndefinedVariable("kar".into()).to_string(),
            "Variable 'kar' is not defined."
        );
        assert_eq!(EvalError::DivisionByZero.to_string(), "Division by zero.");
        assert_eq!(
            EvalError::LoopLimit { limit: 10 }.to_string(),
            "loop exceeded the iteration limit of 10"
        );
    }

    #[test]
    fn test_bribe_errors_are_transparent() {
        let err: EvalError = BribeError::ProfileNotDeclared.into();
        assert_eq!(err.to_string(), BribeError::ProfileNotDeclared.to_string());
    }
}
