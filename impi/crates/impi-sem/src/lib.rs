//! impi-sem - Semantic Analysis for the Imp Interpreter
//!
//! The analyser runs interleaved with parsing rather than as a separate
//! pass. The parser calls into it as it consumes tokens: declarations
//! annotate the variable table, label statements resolve the label table,
//! and every emitted operand and operator flows through a compile-time
//! type stack that mirrors what the machine's operand stack will hold at
//! run time. When the parser finishes a statement the stack is back at
//! zero height; any operator that would fault at run time has already
//! been rejected here with a `SemanticError`.

mod analyzer;
mod edge_cases;

pub use analyzer::Analyzer;
