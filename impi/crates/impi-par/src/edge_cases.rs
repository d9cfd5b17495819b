//! Edge case tests for impi-par

#[cfg(test)]
mod tests {
    use crate::{Parser, Program};
    use impi_lex::TokenKind;
    use impi_util::Diagnostic;

    fn parse(source: &str) -> Program {
        Parser::new(source).parse().expect("valid program")
    }

    fn parse_err(source: &str) -> Diagnostic {
        Parser::new(source).parse().expect_err("invalid program")
    }

    // ==================== EDGE CASES ====================

    #[test]
    fn test_edge_deeply_nested_blocks() {
        let mut source = String::from("program { int a; ");
        for _ in 0..64 {
            source.push('{');
        }
        source.push_str("a = 1;");
        for _ in 0..64 {
            source.push('}');
        }
        source.push('}');
        let program = parse(&source);
        assert_eq!(program.code.len(), 4);
    }

    #[test]
    fn test_edge_deeply_nested_parentheses() {
        let mut expr = String::from("1");
        for _ in 0..64 {
            expr = format!("({expr} + 1)");
        }
        let program = parse(&format!("program {{ int a; a = {expr}; }}"));
        // One operand plus 64 additions plus assign and drop.
        assert_eq!(program.code.len(), 1 + 65 + 64 + 2);
    }

    #[test]
    fn test_edge_long_declaration_list() {
        let names: Vec<String> = (0..100).map(|i| format!("v{i}")).collect();
        let source = format!("program {{ int {}; }}", names.join(", "));
        let program = parse(&source);
        assert_eq!(program.pool.vars.len(), 100);
        assert!(program.code.is_empty());
    }

    #[test]
    fn test_edge_many_gotos_to_one_label() {
        let program = parse(
            "program { int a; a = 0; \
             goto end; goto end; goto end; \
             end: write(a); }",
        );
        let targets: Vec<u32> = program
            .code
            .iter()
            .filter(|t| t.kind == TokenKind::Label)
            .map(|t| t.value)
            .collect();
        assert_eq!(targets, vec![10, 10, 10]);
    }

    #[test]
    fn test_edge_label_at_program_end() {
        // A label just before the closing brace targets one past the
        // last instruction, which is a legal jump destination.
        let program = parse("program { int a; a = 1; goto fin; fin: }");
        let target = program
            .code
            .iter()
            .find(|t| t.kind == TokenKind::Label)
            .map(|t| t.value)
            .unwrap();
        assert_eq!(target as usize, program.code.len());
    }

    #[test]
    fn test_edge_statement_starting_with_parenthesis() {
        let program = parse("program { int a; (a) = 1; }");
        assert_eq!(
            program.code.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::Id,
                TokenKind::IntConst,
                TokenKind::Assign,
                TokenKind::Drop,
            ]
        );
    }

    #[test]
    fn test_edge_write_many_arguments() {
        let program = parse("program { write(1, 2, 3, 4, 5); }");
        let writes = program
            .code
            .iter()
            .filter(|t| t.kind == TokenKind::Write)
            .count();
        assert_eq!(writes, 5);
    }

    #[test]
    fn test_edge_error_line_numbers() {
        let err = parse_err("program {\nint a;\na = b;\n}");
        match err {
            Diagnostic::Semantic(e) => assert_eq!(e.line, 3),
            other => panic!("expected semantic error, got {other:?}"),
        }

        let err = parse_err("program {\nint a;\na = 1\n}");
        match err {
            Diagnostic::Syntax(e) => assert_eq!(e.line, 4),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_edge_keyword_as_variable_name() {
        let err = parse_err("program { int while; }");
        match err {
            Diagnostic::Syntax(e) => assert_eq!(e.expected, "identifier"),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_edge_empty_statement_rejected() {
        let err = parse_err("program { ; }");
        assert!(matches!(err, Diagnostic::Syntax(_)));
    }

    #[test]
    fn test_edge_goto_into_loop_body() {
        // Jumping into a while body bypasses the condition the first
        // time round but exits through it normally.
        let program = parse(
            "program { int n; n = 0; goto inside; \
             while (n < 3) { inside: n = n + 1; } write(n); }",
        );
        assert!(!program.code.is_empty());
    }

    #[test]
    fn test_edge_do_while_with_block_body() {
        let program = parse("program { int n; n = 0; do { n = n + 1; } while (n < 2); }");
        let last = program.code.last().unwrap();
        assert_eq!(last.kind, TokenKind::TrueGo);
    }

    #[test]
    fn test_edge_condition_with_assignment() {
        // Assignment is an expression, so it can sit in a condition.
        let program = parse("program { int n; n = 3; while (n = n - 1) write(n); }");
        assert!(program
            .code
            .iter()
            .any(|t| t.kind == TokenKind::FalseGo));
    }
}
