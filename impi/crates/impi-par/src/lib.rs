//! impi-par - Parser and Postfix Code Emitter
//!
//! A recursive-descent parser over the lazy token stream. Parsing,
//! semantic checking, and code emission happen in a single pass: each
//! grammar method validates its tokens, routes declarations and operators
//! through the [`Analyzer`], and appends postfix instructions to one
//! growing buffer.
//!
//! EMISSION MODEL:
//! ---------------
//! The output program is a vector of the same `Token` records the lexer
//! produces, reread as a postfix instruction stream: operands push
//! themselves, operators act on the operand stack. Operands are appended
//! when visited; binary operators are appended after both of their
//! sub-expressions; unary operators are collected on a small deferral
//! stack and appended outermost-last.
//!
//! Control flow lowers to three jump instructions (`Go`, `FalseGo`,
//! `TrueGo`), each consuming a `Label` operand that carries an absolute
//! instruction index. Forward targets are emitted as placeholders and
//! patched by index once the target position is known; `goto` to a label
//! that has not been defined yet goes onto a fix-up list keyed by label
//! id and is patched when the label statement arrives. A label still
//! undefined at the end of the program is a semantic error.

mod edge_cases;
mod expr;
mod stmt;

use impi_lex::{Lexer, Token, TokenKind};
use impi_sem::Analyzer;
use impi_util::{Diagnostic, Pool, SemanticError, SyntaxError, ValueKind};

/// A compiled program: the postfix instruction buffer plus the pool it
/// indexes into.
#[derive(Debug)]
pub struct Program {
    pub code: Vec<Token>,
    pub pool: Pool,
}

/// A `goto` whose label was not yet defined at emission time.
#[derive(Debug)]
struct GotoFixup {
    /// Label table index the jump refers to.
    label: u32,
    /// Position of the placeholder `Label` instruction.
    at: usize,
    /// Source line of the `goto`, for the undefined-label diagnostic.
    line: u32,
}

/// Recursive-descent parser and code emitter.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    analyzer: Analyzer,
    code: Vec<Token>,
    fixups: Vec<GotoFixup>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
            current: Token::bare(TokenKind::Eof, 0),
            analyzer: Analyzer::new(),
            code: Vec::new(),
            fixups: Vec::new(),
        }
    }

    /// Parses a whole program and returns the emitted instruction buffer
    /// together with the populated pool.
    pub fn parse(mut self) -> Result<Program, Diagnostic> {
        self.advance()?;
        self.expect(TokenKind::Program)?;
        self.expect(TokenKind::LBrace)?;
        self.declarations()?;
        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            self.statement()?;
        }
        self.expect(TokenKind::RBrace)?;
        if !self.check(TokenKind::Eof) {
            return Err(self.unexpected(TokenKind::Eof.describe()));
        }
        self.check_unresolved()?;

        debug_assert!(
            self.code
                .iter()
                .filter(|t| t.kind == TokenKind::Label)
                .all(|t| (t.value as usize) <= self.code.len()),
            "label target out of range"
        );

        Ok(Program {
            code: self.code,
            pool: self.lexer.into_pool(),
        })
    }

    /// Parses the declaration section: zero or more lines of
    /// `type ident [= const] {, ident [= const]} ;`.
    fn declarations(&mut self) -> Result<(), Diagnostic> {
        while let Some(kind) = self.current.kind.decl_value_kind() {
            self.advance()?;
            loop {
                let id_token = self.expect(TokenKind::Id)?;
                self.analyzer
                    .declare(self.lexer.pool_mut(), id_token.value, kind, id_token.line)?;

                if self.eat_if(TokenKind::Assign)? {
                    let (const_token, const_kind, negate) = self.constant()?;
                    self.analyzer
                        .init(self.lexer.pool_mut(), id_token.value, const_kind, id_token.line)?;
                    // Initialisers run as ordinary stores so the machine
                    // starts from the declared values.
                    self.emit(id_token);
                    self.emit(const_token);
                    if negate {
                        self.emit(Token::bare(TokenKind::UnaryMinus, const_token.line));
                    }
                    self.emit(Token::bare(TokenKind::Assign, id_token.line));
                    self.emit(Token::bare(TokenKind::Drop, id_token.line));
                }

                if !self.eat_if(TokenKind::Comma)? {
                    break;
                }
            }
            self.expect(TokenKind::Semicolon)?;
        }
        Ok(())
    }

    /// Parses a signed constant in declaration-initialiser position.
    /// Returns the constant token, its kind, and whether it was negated.
    fn constant(&mut self) -> Result<(Token, ValueKind, bool), Diagnostic> {
        let mut negate = false;
        let mut signed = false;
        if self.check(TokenKind::Minus) {
            negate = true;
            signed = true;
            self.advance()?;
        } else if self.check(TokenKind::Plus) {
            signed = true;
            self.advance()?;
        }

        let token = self.current;
        let kind = match token.kind.const_value_kind() {
            Some(ValueKind::Str) if signed => {
                return Err(self.unexpected("numeric constant"));
            }
            Some(kind) => kind,
            None => return Err(self.unexpected("constant")),
        };
        self.advance()?;
        Ok((token, kind, negate))
    }

    /// Undefined `goto` targets surface once the whole program has been
    /// parsed, pointing at the first unresolved jump.
    fn check_unresolved(&self) -> Result<(), Diagnostic> {
        if let Some(fixup) = self.fixups.first() {
            return Err(SemanticError {
                line: fixup.line,
                subject: format!("label '{}'", self.lexer.pool().labels.name(fixup.label)),
                message: "is never defined".to_string(),
            }
            .into());
        }
        Ok(())
    }

    // ---- token plumbing -------------------------------------------------

    /// Pulls the next token from the lexer.
    fn advance(&mut self) -> Result<(), Diagnostic> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Consumes the current token if it has the given kind.
    fn eat_if(&mut self, kind: TokenKind) -> Result<bool, Diagnostic> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consumes and returns the current token, which must have the given
    /// kind.
    fn expect(&mut self, kind: TokenKind) -> Result<Token, Diagnostic> {
        if self.check(kind) {
            let token = self.current;
            self.advance()?;
            Ok(token)
        } else {
            Err(self.unexpected(kind.describe()))
        }
    }

    fn unexpected(&self, expected: &str) -> Diagnostic {
        SyntaxError {
            line: self.current.line,
            found: self.current.kind.describe().to_string(),
            expected: expected.to_string(),
        }
        .into()
    }

    // ---- emission -------------------------------------------------------

    fn emit(&mut self, token: Token) {
        self.code.push(token);
    }

    /// Emits a placeholder `Label` followed by the jump instruction and
    /// returns the placeholder's position for later patching.
    fn emit_jump(&mut self, kind: TokenKind, line: u32) -> usize {
        let at = self.code.len();
        self.emit(Token::new(TokenKind::Label, line, 0));
        self.emit(Token::bare(kind, line));
        at
    }

    /// Back-fills a placeholder emitted by [`Parser::emit_jump`] with the
    /// current end of the buffer.
    fn patch_jump(&mut self, at: usize) {
        self.code[at].value = self.code.len() as u32;
    }

    /// Patches every pending `goto` aimed at `label`.
    fn patch_gotos(&mut self, label: u32, target: u32) {
        let mut i = 0;
        while i < self.fixups.len() {
            if self.fixups[i].label == label {
                let at = self.fixups[i].at;
                self.code[at].value = target;
                self.fixups.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        Parser::new(source).parse().expect("valid program")
    }

    fn parse_err(source: &str) -> Diagnostic {
        Parser::new(source).parse().expect_err("invalid program")
    }

    fn kinds(program: &Program) -> Vec<TokenKind> {
        program.code.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_program() {
        let program = parse("program { }");
        assert!(program.code.is_empty());
    }

    #[test]
    fn test_declarations_annotate_pool() {
        let program = parse("program { int a; real b; string c; }");
        let vars = &program.pool.vars;
        assert_eq!(vars.len(), 3);
        assert_eq!(vars.get(0).kind, Some(ValueKind::Int));
        assert_eq!(vars.get(1).kind, Some(ValueKind::Real));
        assert_eq!(vars.get(2).kind, Some(ValueKind::Str));
        assert!(vars.get(0).declared);
        assert!(!vars.get(0).assigned);
    }

    #[test]
    fn test_declaration_list_with_initialisers() {
        let program = parse("program { int a = 1, b, c = -2; }");
        assert!(program.pool.vars.get(0).assigned);
        assert!(!program.pool.vars.get(1).assigned);
        assert!(program.pool.vars.get(2).assigned);
        assert_eq!(
            kinds(&program),
            vec![
                TokenKind::Id,
                TokenKind::IntConst,
                TokenKind::Assign,
                TokenKind::Drop,
                TokenKind::Id,
                TokenKind::IntConst,
                TokenKind::UnaryMinus,
                TokenKind::Assign,
                TokenKind::Drop,
            ]
        );
    }

    #[test]
    fn test_real_initialiser_accepts_int_constant() {
        let program = parse("program { real r = 2; }");
        assert!(program.pool.vars.get(0).assigned);
    }

    #[test]
    fn test_string_initialiser_rejects_sign() {
        let err = parse_err("program { string s = -\"x\"; }");
        assert!(matches!(err, Diagnostic::Syntax(_)));
    }

    #[test]
    fn test_duplicate_declaration() {
        let err = parse_err("program { int a; real a; }");
        match err {
            Diagnostic::Semantic(e) => assert_eq!(e.message, "declared twice"),
            other => panic!("expected semantic error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse_err("program { int a; a = 1 }");
        match err {
            Diagnostic::Syntax(e) => {
                assert_eq!(e.expected, "';'");
                assert_eq!(e.found, "'}'");
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_program_keyword() {
        let err = parse_err("{ }");
        match err {
            Diagnostic::Syntax(e) => assert_eq!(e.expected, "'program'"),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        let err = parse_err("program { } extra");
        assert!(matches!(err, Diagnostic::Syntax(_)));
    }

    #[test]
    fn test_unclosed_program() {
        let err = parse_err("program { int a;");
        match err {
            Diagnostic::Syntax(e) => assert_eq!(e.expected, "'}'"),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_label_targets_within_range() {
        let program = parse(
            "program { int i; i = 0; \
             start: i = i + 1; \
             if (i < 3) goto start; else i = i; \
             while (i > 0) { i = i - 1; } }",
        );
        let len = program.code.len() as u32;
        for token in &program.code {
            if token.kind == TokenKind::Label {
                assert!(token.value <= len, "target {} out of range", token.value);
            }
        }
    }
}
