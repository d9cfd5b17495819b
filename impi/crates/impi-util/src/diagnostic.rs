//! Diagnostic types for the interpreter pipeline.
//!
//! Three compile-time families (lexical, syntax, semantic) plus runtime
//! faults. Every diagnostic renders as a single line naming its family,
//! the offending subject, and the source line. The interpreter never
//! recovers: the first error unwinds the whole pipeline.

use crate::pool::ValueKind;
use thiserror::Error;

/// Error produced while turning bytes into tokens.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LexicalError {
    /// A byte that cannot start or extend any token.
    #[error("lexical error: unexpected '{unexpected}' on line {line}")]
    UnexpectedChar { line: u32, unexpected: char },

    /// A byte in a position where only one continuation is legal,
    /// e.g. `!` not followed by `=`.
    #[error("lexical error: unexpected '{unexpected}' on line {line} ('{expected}' expected)")]
    ExpectedChar {
        line: u32,
        unexpected: char,
        expected: char,
    },

    /// End of input in the middle of a token or block comment.
    #[error("lexical error: unexpected end of file on line {line}")]
    UnexpectedEof { line: u32 },
}

/// Error produced when the token stream does not match the grammar.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("syntax error: unexpected {found} on line {line} ({expected} expected)")]
pub struct SyntaxError {
    pub line: u32,
    /// Printable description of the token that was found.
    pub found: String,
    /// Printable description of what the grammar required.
    pub expected: String,
}

/// Error produced by the interleaved semantic checks: declarations,
/// label definitions, and the operator type matrix.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("semantic error: {subject} {message} on line {line}")]
pub struct SemanticError {
    pub line: u32,
    /// What triggered the error: a variable, a label, or an operator.
    pub subject: String,
    pub message: String,
}

/// Fault raised while the emitted program is executing.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RuntimeFault {
    #[error("runtime error: division by zero on line {line}")]
    DivisionByZero { line: u32 },

    #[error("runtime error: variable '{name}' used before assignment on line {line}")]
    UnassignedVariable { name: String, line: u32 },

    #[error("runtime error: cannot parse input '{input}' as {kind} for '{name}'")]
    InputParse {
        name: String,
        kind: ValueKind,
        input: String,
    },

    #[error("runtime error: end of input while reading '{name}'")]
    InputExhausted { name: String },

    #[error("runtime error: i/o failure: {0}")]
    Io(String),
}

impl From<std::io::Error> for RuntimeFault {
    fn from(err: std::io::Error) -> Self {
        RuntimeFault::Io(err.to_string())
    }
}

/// Any diagnostic the pipeline can stop with.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Diagnostic {
    #[error(transparent)]
    Lexical(#[from] LexicalError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),

    #[error(transparent)]
    Runtime(#[from] RuntimeFault),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexical_error_display() {
        let err = LexicalError::UnexpectedChar {
            line: 3,
            unexpected: '@',
        };
        assert_eq!(err.to_string(), "lexical error: unexpected '@' on line 3");

        let err = LexicalError::ExpectedChar {
            line: 7,
            unexpected: '<',
            expected: '=',
        };
        assert_eq!(
            err.to_string(),
            "lexical error: unexpected '<' on line 7 ('=' expected)"
        );

        let err = LexicalError::UnexpectedEof { line: 12 };
        assert_eq!(
            err.to_string(),
            "lexical error: unexpected end of file on line 12"
        );
    }

    #[test]
    fn test_syntax_error_display() {
        let err = SyntaxError {
            line: 4,
            found: "'}'".to_string(),
            expected: "';'".to_string(),
        };
        assert_eq!(err.to_string(), "syntax error: unexpected '}' on line 4 (';' expected)");
    }

    #[test]
    fn test_semantic_error_display() {
        let err = SemanticError {
            line: 9,
            subject: "variable 'x'".to_string(),
            message: "is not declared".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "semantic error: variable 'x' is not declared on line 9"
        );
    }

    #[test]
    fn test_runtime_fault_display() {
        let err = RuntimeFault::DivisionByZero { line: 2 };
        assert_eq!(err.to_string(), "runtime error: division by zero on line 2");

        let err = RuntimeFault::InputParse {
            name: "n".to_string(),
            kind: ValueKind::Int,
            input: "abc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "runtime error: cannot parse input 'abc' as int for 'n'"
        );
    }

    #[test]
    fn test_diagnostic_is_transparent() {
        let inner = SemanticError {
            line: 1,
            subject: "label 'loop'".to_string(),
            message: "defined twice".to_string(),
        };
        let diag: Diagnostic = inner.clone().into();
        assert_eq!(diag.to_string(), inner.to_string());
    }
}
