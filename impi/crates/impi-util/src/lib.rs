//! impi-util - Foundation Types for the Imp Interpreter
//!
//! This crate provides the shared state every phase of the interpreter
//! operates on, plus the diagnostic types they fail with.
//!
//! DESIGN:
//! -------
//! The interpreter is a straight-line pipeline: lexer -> parser (with the
//! semantic analyser interleaved) -> virtual machine. All of these phases
//! share one [`pool::Pool`]: the interned identifier and label descriptors
//! and the append-only real/string constant pools. The pool is an owned
//! value threaded through the pipeline, never a global. Descriptors and
//! constants are addressed by small `u32` indices that stay stable for the
//! lifetime of the program, which is what lets tokens carry a bare `u32`
//! payload all the way from the lexer into the executing machine.
//!
//! Diagnostics are plain `Result` errors. The interpreter stops at the
//! first error, so there is no accumulating handler; each family is an
//! enum or struct with a one-line `Display` form naming the kind, the
//! subject, and the source line.

pub mod diagnostic;
pub mod pool;

pub use diagnostic::{Diagnostic, LexicalError, RuntimeFault, SemanticError, SyntaxError};
pub use pool::{Label, LabelTable, Pool, RealPool, StrPool, ValueKind, VarTable, Variable};
