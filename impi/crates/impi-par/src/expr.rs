//! Expression parsing and emission.
//!
//! One method per precedence level, low to high. Every level parses its
//! sub-expressions first and appends the operator afterwards, which is
//! exactly postfix order; the analyser's type stack is updated in step
//! with every emitted operand and operator.

use impi_lex::{Token, TokenKind};
use impi_util::Diagnostic;

use crate::Parser;

impl<'a> Parser<'a> {
    /// `expr ::= or_op {'=' or_op}`, with assignment right-associative:
    /// `a = b = c` assigns `c` to `b` and the result to `a`.
    pub(crate) fn expression(&mut self) -> Result<(), Diagnostic> {
        self.or_op()?;
        if self.check(TokenKind::Assign) {
            let line = self.current.line;
            self.analyzer.require_lvalue(line)?;
            self.advance()?;
            self.expression()?;
            self.analyzer.apply(TokenKind::Assign, line)?;
            self.emit(Token::bare(TokenKind::Assign, line));
        }
        Ok(())
    }

    /// `or_op ::= and_op {'or' and_op}`
    fn or_op(&mut self) -> Result<(), Diagnostic> {
        self.and_op()?;
        while self.check(TokenKind::Or) {
            let line = self.current.line;
            self.advance()?;
            self.and_op()?;
            self.analyzer.apply(TokenKind::Or, line)?;
            self.emit(Token::bare(TokenKind::Or, line));
        }
        Ok(())
    }

    /// `and_op ::= cmp_op {'and' cmp_op}`
    fn and_op(&mut self) -> Result<(), Diagnostic> {
        self.cmp_op()?;
        while self.check(TokenKind::And) {
            let line = self.current.line;
            self.advance()?;
            self.cmp_op()?;
            self.analyzer.apply(TokenKind::And, line)?;
            self.emit(Token::bare(TokenKind::And, line));
        }
        Ok(())
    }

    /// `cmp_op ::= add_op [cmp add_op]`; comparisons do not chain.
    fn cmp_op(&mut self) -> Result<(), Diagnostic> {
        self.add_op()?;
        if self.current.kind.is_comparison() {
            let op = self.current.kind;
            let line = self.current.line;
            self.advance()?;
            self.add_op()?;
            self.analyzer.apply(op, line)?;
            self.emit(Token::bare(op, line));
        }
        Ok(())
    }

    /// `add_op ::= mul_op {('+'|'-') mul_op}`
    fn add_op(&mut self) -> Result<(), Diagnostic> {
        self.mul_op()?;
        while matches!(self.current.kind, TokenKind::Plus | TokenKind::Minus) {
            let op = self.current.kind;
            let line = self.current.line;
            self.advance()?;
            self.mul_op()?;
            self.analyzer.apply(op, line)?;
            self.emit(Token::bare(op, line));
        }
        Ok(())
    }

    /// `mul_op ::= unary {('*'|'/') unary}`
    fn mul_op(&mut self) -> Result<(), Diagnostic> {
        self.unary()?;
        while matches!(self.current.kind, TokenKind::Multiply | TokenKind::Divide) {
            let op = self.current.kind;
            let line = self.current.line;
            self.advance()?;
            self.unary()?;
            self.analyzer.apply(op, line)?;
            self.emit(Token::bare(op, line));
        }
        Ok(())
    }

    /// `unary ::= {'not'|'+'|'-'} atom`
    ///
    /// Prefix operators are deferred and appended after the operand in
    /// reverse collection order, so the innermost operator applies first.
    fn unary(&mut self) -> Result<(), Diagnostic> {
        let mut deferred: Vec<Token> = Vec::new();
        loop {
            let kind = match self.current.kind {
                TokenKind::Not => TokenKind::Not,
                TokenKind::Plus => TokenKind::UnaryPlus,
                TokenKind::Minus => TokenKind::UnaryMinus,
                _ => break,
            };
            deferred.push(Token::bare(kind, self.current.line));
            self.advance()?;
        }

        self.atom()?;

        for token in deferred.into_iter().rev() {
            self.analyzer.apply(token.kind, token.line)?;
            self.emit(token);
        }
        Ok(())
    }

    /// `atom ::= ID | const | '(' expr ')'`
    fn atom(&mut self) -> Result<(), Diagnostic> {
        match self.current.kind {
            TokenKind::Id => {
                let token = self.current;
                let kind =
                    self.analyzer
                        .check_declared(self.lexer.pool(), token.value, token.line)?;
                self.analyzer.push_operand(kind, true);
                self.emit(token);
                self.advance()?;
            }
            TokenKind::IntConst | TokenKind::RealConst | TokenKind::StrConst => {
                let token = self.current;
                let kind = token.kind.const_value_kind().expect("constant token");
                self.analyzer.push_operand(kind, false);
                self.emit(token);
                self.advance()?;
            }
            TokenKind::LParen => {
                self.advance()?;
                self.expression()?;
                self.expect(TokenKind::RParen)?;
            }
            _ => return Err(self.unexpected("expression")),
        }
        Ok(())
    }
}
