//! Core lexer implementation.
//!
//! This module contains the main `Lexer` struct and the initial-state
//! dispatch. The byte classes of the initial state map one-to-one onto
//! the match arms of [`Lexer::next_token`]; multi-byte tokens hand off
//! to the specialised methods in the sibling modules.

use impi_util::{LexicalError, Pool};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// Lexer for Imp source text.
///
/// Produces a lazy token stream terminated by a single `Eof` token. The
/// lexer owns the run's [`Pool`] and interns identifier names, label
/// names, and real/string constants as it encounters them.
pub struct Lexer<'a> {
    /// Byte cursor over the source.
    pub cursor: Cursor<'a>,

    /// Shared pool receiving interned names and constants.
    pool: Pool,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `source` with a fresh pool.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            pool: Pool::new(),
        }
    }

    /// Read access to the pool.
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Write access to the pool, used by the parser for its interleaved
    /// semantic bookkeeping.
    pub fn pool_mut(&mut self) -> &mut Pool {
        &mut self.pool
    }

    /// Consumes the lexer, releasing the populated pool.
    pub fn into_pool(self) -> Pool {
        self.pool
    }

    /// Returns the next token from the source.
    ///
    /// Skips whitespace and comments, then dispatches on the first byte
    /// of the token. At end of input every further call returns `Eof`.
    pub fn next_token(&mut self) -> Result<Token, LexicalError> {
        loop {
            self.cursor.skip_whitespace();

            let line = self.cursor.line();
            let Some(byte) = self.cursor.peek() else {
                return Ok(Token::bare(TokenKind::Eof, line));
            };

            let token = match byte {
                b'{' => self.single(TokenKind::LBrace, line),
                b'}' => self.single(TokenKind::RBrace, line),
                b';' => self.single(TokenKind::Semicolon, line),
                b':' => self.single(TokenKind::Colon, line),
                b',' => self.single(TokenKind::Comma, line),
                b'(' => self.single(TokenKind::LParen, line),
                b')' => self.single(TokenKind::RParen, line),
                b'+' => self.single(TokenKind::Plus, line),
                b'-' => self.single(TokenKind::Minus, line),
                b'*' => self.single(TokenKind::Multiply, line),
                b'/' => match self.lex_slash(line)? {
                    Some(token) => token,
                    // A comment was skipped; go back to the initial state.
                    None => continue,
                },
                b'<' | b'>' => self.lex_comparison(line),
                b'!' => self.lex_bang(line)?,
                b'=' => self.lex_equals(line),
                b'"' => self.lex_string(line)?,
                b if b.is_ascii_alphabetic() => self.lex_identifier(line),
                b if b.is_ascii_digit() => self.lex_number(line)?,
                other => {
                    return Err(LexicalError::UnexpectedChar {
                        line,
                        unexpected: other as char,
                    })
                }
            };

            return Ok(token);
        }
    }

    /// Consumes one byte and returns a payload-free token.
    fn single(&mut self, kind: TokenKind, line: u32) -> Token {
        self.cursor.bump();
        Token::bare(kind, line)
    }
}
