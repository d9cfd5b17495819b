//! Edge case and property tests for impi-lex
