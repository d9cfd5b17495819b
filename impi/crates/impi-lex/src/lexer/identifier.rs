//! Identifier, keyword, and label lexing.
//!
//! Identifiers start with a letter and continue with letters or digits.
//! After scanning the name the lexer decides among three cases: a
//! reserved word, a `goto` label, or an ordinary identifier. A name is a
//! label when it is immediately followed by `:` (one-byte look-ahead) or
//! when it is already present in the label table; everything else interns
//! into the identifier table.

use crate::token::{keyword_from_ident, Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes an identifier, keyword, or label reference.
    pub(super) fn lex_identifier(&mut self, line: u32) -> Token {
        let start = self.cursor.position();
        while matches!(self.cursor.peek(), Some(b) if b.is_ascii_alphanumeric()) {
            self.cursor.bump();
        }
        let text = self.cursor.slice_from(start);

        if let Some(kind) = keyword_from_ident(text) {
            return Token::bare(kind, line);
        }

        if self.cursor.peek() == Some(b':') {
            let id = self.pool_mut().labels.intern(text);
            return Token::new(TokenKind::GotoLabel, line, id);
        }

        if let Some(id) = self.pool().labels.lookup(text) {
            return Token::new(TokenKind::GotoLabel, line, id);
        }

        let id = self.pool_mut().vars.intern(text);
        Token::new(TokenKind::Id, line, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_identifier_is_interned() {
        let mut lexer = Lexer::new("count");
        let token = lexer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::Id);
        assert_eq!(lexer.pool().vars.name(token.value), "count");
    }

    #[test]
    fn test_same_name_reuses_index() {
        let mut lexer = Lexer::new("x y x");
        let a = lexer.next_token().unwrap();
        let b = lexer.next_token().unwrap();
        let c = lexer.next_token().unwrap();
        assert_eq!(a.value, c.value);
        assert_ne!(a.value, b.value);
        assert_eq!(lexer.pool().vars.len(), 2);
    }

    #[test]
    fn test_keyword_is_not_interned() {
        let mut lexer = Lexer::new("while");
        let token = lexer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::While);
        assert!(lexer.pool().vars.is_empty());
    }

    #[test]
    fn test_alphanumeric_tail() {
        let mut lexer = Lexer::new("a1b2");
        let token = lexer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::Id);
        assert_eq!(lexer.pool().vars.name(token.value), "a1b2");
    }

    #[test]
    fn test_colon_lookahead_makes_label() {
        let mut lexer = Lexer::new("start: x");
        let label = lexer.next_token().unwrap();
        assert_eq!(label.kind, TokenKind::GotoLabel);
        assert_eq!(lexer.pool().labels.name(label.value), "start");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Colon);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Id);
    }

    #[test]
    fn test_known_label_reference_without_colon() {
        // After "start:" the bare name "start" resolves through the
        // label table, not the identifier table.
        let mut lexer = Lexer::new("start: goto start;");
        let defined = lexer.next_token().unwrap();
        lexer.next_token().unwrap();
        lexer.next_token().unwrap();
        let reference = lexer.next_token().unwrap();
        assert_eq!(reference.kind, TokenKind::GotoLabel);
        assert_eq!(reference.value, defined.value);
        assert!(lexer.pool().vars.is_empty());
    }

    #[test]
    fn test_label_with_space_before_colon_is_identifier() {
        // The look-ahead is strict: "name :" does not form a label.
        let mut lexer = Lexer::new("name :");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Id);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Colon);
    }

    #[test]
    fn test_variable_and_label_namespaces_are_separate() {
        let mut lexer = Lexer::new("x = 1; x2: goto x2;");
        let var = lexer.next_token().unwrap();
        assert_eq!(var.kind, TokenKind::Id);
        for _ in 0..3 {
            lexer.next_token().unwrap();
        }
        let label = lexer.next_token().unwrap();
        assert_eq!(label.kind, TokenKind::GotoLabel);
        assert_eq!(lexer.pool().vars.len(), 1);
        assert_eq!(lexer.pool().labels.len(), 1);
    }
}
