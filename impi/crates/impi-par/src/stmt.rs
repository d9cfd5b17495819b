//! Statement parsing and control-flow emission.
//!
//! Statements are dispatched on their first token. Control flow is the
//! only place jump targets are back-filled: `while`, `do`, and `if`
//! patch forward targets by instruction index, and `goto` routes through
//! the fix-up list when its label is not yet defined.

use impi_lex::{Token, TokenKind};
use impi_util::Diagnostic;

use crate::Parser;

impl<'a> Parser<'a> {
    /// Parses one statement. The compile-time type stack drains back to
    /// zero height by the time this returns.
    pub(crate) fn statement(&mut self) -> Result<(), Diagnostic> {
        match self.current.kind {
            TokenKind::Read => self.read_stmt()?,
            TokenKind::Write => self.write_stmt()?,
            TokenKind::While => self.while_stmt()?,
            TokenKind::Do => self.do_stmt()?,
            TokenKind::If => self.if_stmt()?,
            TokenKind::Goto => self.goto_stmt()?,
            TokenKind::GotoLabel => self.label_stmt()?,
            TokenKind::LBrace => self.block()?,
            _ => self.expr_stmt()?,
        }
        self.analyzer.finish_statement();
        Ok(())
    }

    /// `read '(' ID ')' ';'`
    fn read_stmt(&mut self) -> Result<(), Diagnostic> {
        let line = self.current.line;
        self.advance()?;
        self.expect(TokenKind::LParen)?;
        let id_token = self.expect(TokenKind::Id)?;
        self.analyzer
            .check_declared(self.lexer.pool(), id_token.value, id_token.line)?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Semicolon)?;

        self.emit(id_token);
        self.emit(Token::bare(TokenKind::Read, line));
        Ok(())
    }

    /// `write '(' expr {',' expr} ')' ';'`; each argument prints on its
    /// own line, so each gets its own `Write` instruction.
    fn write_stmt(&mut self) -> Result<(), Diagnostic> {
        let line = self.current.line;
        self.advance()?;
        self.expect(TokenKind::LParen)?;
        loop {
            self.expression()?;
            self.analyzer.apply(TokenKind::Write, line)?;
            self.emit(Token::bare(TokenKind::Write, line));
            if !self.eat_if(TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Semicolon)?;
        Ok(())
    }

    /// `while '(' expr ')' statement`
    fn while_stmt(&mut self) -> Result<(), Diagnostic> {
        let line = self.current.line;
        self.advance()?;
        self.expect(TokenKind::LParen)?;

        let loop_start = self.code.len() as u32;
        self.expression()?;
        self.expect(TokenKind::RParen)?;

        self.analyzer.apply(TokenKind::FalseGo, line)?;
        let exit = self.emit_jump(TokenKind::FalseGo, line);

        self.statement()?;

        self.emit(Token::new(TokenKind::Label, line, loop_start));
        self.emit(Token::bare(TokenKind::Go, line));
        self.patch_jump(exit);
        Ok(())
    }

    /// `do statement while '(' expr ')' ';'`
    fn do_stmt(&mut self) -> Result<(), Diagnostic> {
        let line = self.current.line;
        self.advance()?;

        let loop_start = self.code.len() as u32;
        self.statement()?;

        self.expect(TokenKind::While)?;
        self.expect(TokenKind::LParen)?;
        self.expression()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Semicolon)?;

        self.analyzer.apply(TokenKind::TrueGo, line)?;
        self.emit(Token::new(TokenKind::Label, line, loop_start));
        self.emit(Token::bare(TokenKind::TrueGo, line));
        Ok(())
    }

    /// `if '(' expr ')' statement 'else' statement`
    fn if_stmt(&mut self) -> Result<(), Diagnostic> {
        let line = self.current.line;
        self.advance()?;
        self.expect(TokenKind::LParen)?;
        self.expression()?;
        self.expect(TokenKind::RParen)?;

        self.analyzer.apply(TokenKind::FalseGo, line)?;
        let to_else = self.emit_jump(TokenKind::FalseGo, line);

        self.statement()?;
        let to_end = self.emit_jump(TokenKind::Go, line);
        self.patch_jump(to_else);

        self.expect(TokenKind::Else)?;
        self.statement()?;
        self.patch_jump(to_end);
        Ok(())
    }

    /// `goto LABEL ';'`
    ///
    /// A plain identifier is accepted here too: a forward reference to a
    /// label the lexer has not yet seen defined arrives as `Id`, and the
    /// name is promoted into the label table.
    fn goto_stmt(&mut self) -> Result<(), Diagnostic> {
        let line = self.current.line;
        self.advance()?;

        let label_id = match self.current.kind {
            TokenKind::GotoLabel => self.current.value,
            TokenKind::Id => {
                let pool = self.lexer.pool_mut();
                let name = pool.vars.name(self.current.value).to_string();
                pool.labels.intern(&name)
            }
            _ => return Err(self.unexpected(TokenKind::GotoLabel.describe())),
        };
        self.advance()?;
        self.expect(TokenKind::Semicolon)?;

        let label = self.lexer.pool().labels.get(label_id);
        if label.defined {
            let target = label.target;
            self.emit(Token::new(TokenKind::Label, line, target));
        } else {
            let at = self.code.len();
            self.emit(Token::new(TokenKind::Label, line, 0));
            self.fixups.push(crate::GotoFixup {
                label: label_id,
                at,
                line,
            });
        }
        self.emit(Token::bare(TokenKind::Go, line));
        Ok(())
    }

    /// `LABEL ':'` records the current buffer position as the label's
    /// target and patches any jumps already waiting on it.
    fn label_stmt(&mut self) -> Result<(), Diagnostic> {
        let token = self.current;
        self.advance()?;
        self.expect(TokenKind::Colon)?;

        let target = self.code.len() as u32;
        self.analyzer
            .define_label(self.lexer.pool_mut(), token.value, target, token.line)?;
        self.patch_gotos(token.value, target);
        Ok(())
    }

    /// `'{' {statement} '}'`
    fn block(&mut self) -> Result<(), Diagnostic> {
        self.advance()?;
        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            self.statement()?;
        }
        self.expect(TokenKind::RBrace)?;
        Ok(())
    }

    /// `expr ';'` evaluates for its side effects; the leftover value is
    /// dropped to keep the operand stack balanced.
    fn expr_stmt(&mut self) -> Result<(), Diagnostic> {
        self.expression()?;
        let semi = self.expect(TokenKind::Semicolon)?;
        self.emit(Token::bare(TokenKind::Drop, semi.line));
        self.analyzer.apply(TokenKind::Drop, semi.line)?;
        Ok(())
    }
}
