//! impi-lex - Lexical Analyzer for the Imp Source Language
//!
//! The lexer is a deterministic state machine over a byte stream. Each call
//! to [`Lexer::next_token`] starts in the initial state, consumes bytes
//! until a token is complete, and returns it; the stream ends with a single
//! `Eof` token. Tokens are small copyable records `{kind, line, value}`
//! where the `u32` payload is interpreted per kind: an identifier or label
//! index, a pool index for real/string constants, or the integer value
//! itself for int constants.
//!
//! TOKEN CATEGORIES:
//! -----------------
//! 1. Reserved words: `program int string real goto while do if else read
//!    write not and or`.
//! 2. Identifiers `[A-Za-z][A-Za-z0-9]*`, interned on first occurrence.
//!    An identifier immediately followed by `:` is a `goto` label and is
//!    interned in the separate label table.
//! 3. Constants: `[0-9]+` (int), `[0-9]+.[0-9]*` (real, pooled), and
//!    double-quoted strings with no escape sequences (pooled).
//! 4. Delimiters and operators, including the two-byte `== != <= >=`.
//! 5. `/* ... */` comments, skipped entirely; a comment crossing end of
//!    file is a lexical error.
//!
//! The same [`TokenKind`] enumeration also covers the instruction-only
//! kinds the parser emits into the postfix buffer (`Label`, `Go`,
//! `FalseGo`, `TrueGo`, `Drop`, `UnaryPlus`, `UnaryMinus`). The lexer
//! itself never produces those; sharing the enum is what lets the
//! instruction buffer reuse the token record unchanged.
//!
//! The lexer owns the run's [`Pool`](impi_util::Pool) and performs all
//! interning; the parser takes the pool back once parsing finishes.

pub mod cursor;
mod edge_cases;
mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{keyword_from_ident, Token, TokenKind};
