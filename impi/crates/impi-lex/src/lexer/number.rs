//! Number literal lexing.
//!
//! Integers are `[0-9]+` with the value inlined into the token payload.
//! Reals are `[0-9]+.[0-9]*`; the value is parsed from the source text
//! and appended to the real pool, with the pool index as payload. A
//! letter directly after the digits of an integer is a lexical error; the
//! same byte after a real fraction simply ends the number.

use impi_util::LexicalError;

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes an integer or real constant.
    pub(super) fn lex_number(&mut self, line: u32) -> Result<Token, LexicalError> {
        let start = self.cursor.position();
        while matches!(self.cursor.peek(), Some(b) if b.is_ascii_digit()) {
            self.cursor.bump();
        }

        if self.cursor.peek() == Some(b'.') {
            self.cursor.bump();
            while matches!(self.cursor.peek(), Some(b) if b.is_ascii_digit()) {
                self.cursor.bump();
            }
            let text = self.cursor.slice_from(start);
            let value: f64 = text.parse().expect("digits '.' digits parses as f64");
            let index = self.pool_mut().reals.push(value);
            return Ok(Token::new(TokenKind::RealConst, line, index));
        }

        if let Some(b) = self.cursor.peek() {
            if b.is_ascii_alphabetic() {
                return Err(LexicalError::UnexpectedChar {
                    line,
                    unexpected: b as char,
                });
            }
        }

        let text = self.cursor.slice_from(start);
        // Accumulate with wraparound, matching 32-bit unsigned overflow.
        let mut value: u32 = 0;
        for b in text.bytes() {
            value = value.wrapping_mul(10).wrapping_add(u32::from(b - b'0'));
        }
        Ok(Token::new(TokenKind::IntConst, line, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_one(source: &str) -> (Token, Lexer<'_>) {
        let mut lexer = Lexer::new(source);
        let token = lexer.next_token().expect("valid number");
        (token, lexer)
    }

    #[test]
    fn test_integer_constant() {
        let (token, _) = lex_one("42");
        assert_eq!(token.kind, TokenKind::IntConst);
        assert_eq!(token.value, 42);
    }

    #[test]
    fn test_zero() {
        let (token, _) = lex_one("0");
        assert_eq!(token.kind, TokenKind::IntConst);
        assert_eq!(token.value, 0);
    }

    #[test]
    fn test_real_constant_is_pooled() {
        let (token, lexer) = lex_one("3.25");
        assert_eq!(token.kind, TokenKind::RealConst);
        assert_eq!(lexer.pool().reals.get(token.value), 3.25);
    }

    #[test]
    fn test_real_with_empty_fraction() {
        let (token, lexer) = lex_one("7.");
        assert_eq!(token.kind, TokenKind::RealConst);
        assert_eq!(lexer.pool().reals.get(token.value), 7.0);
    }

    #[test]
    fn test_each_real_gets_its_own_slot() {
        let mut lexer = Lexer::new("1.5 1.5");
        let a = lexer.next_token().unwrap();
        let b = lexer.next_token().unwrap();
        assert_ne!(a.value, b.value);
        assert_eq!(lexer.pool().reals.len(), 2);
    }

    #[test]
    fn test_letter_after_integer_is_error() {
        let mut lexer = Lexer::new("12a");
        let err = lexer.next_token().unwrap_err();
        assert_eq!(
            err,
            LexicalError::UnexpectedChar {
                line: 1,
                unexpected: 'a'
            }
        );
    }

    #[test]
    fn test_letter_after_fraction_ends_real() {
        // "1.5x" lexes as a real followed by an identifier.
        let mut lexer = Lexer::new("1.5x");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::RealConst);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Id);
    }

    #[test]
    fn test_number_ends_at_operator() {
        let mut lexer = Lexer::new("12+3");
        assert_eq!(lexer.next_token().unwrap().value, 12);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Plus);
        assert_eq!(lexer.next_token().unwrap().value, 3);
    }
}
