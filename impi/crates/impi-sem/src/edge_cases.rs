//! Edge case tests for impi-sem
