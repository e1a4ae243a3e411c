//! Edge case tests for the parser.

#[cfg(test)]
mod tests {
    use hadron_bc::OpCode;
    use hadron_util::Limits;

    use crate::{compile, compile_source, ParseError};

    fn opcodes(source: &str) -> Vec<OpCode> {
        let chunk = compile_source(source, &Limits::default()).unwrap();
        let mut out = Vec::new();
        let mut offset = 0;
        while let Some(byte) = chunk.read_u8(offset) {
            let op = OpCode::from_byte(byte).unwrap();
            out.push(op);
            offset += op.width();
        }
        out
    }

    #[test]
    fn test_edge_comments_between_operands() {
        assert_eq!(
            opcodes("1 /* one */ + // plus\n 2"),
            vec![OpCode::Move, OpCode::Move, OpCode::Add, OpCode::Return]
        );
    }

    #[test]
    fn test_edge_backslash_does_not_join_lines() {
        // A backslash is whitespace, but the next token is still on a new line.
        assert_eq!(
            opcodes("1 \\\n2"),
            vec![OpCode::Move, OpCode::Return, OpCode::Move, OpCode::Return]
        );
    }

    #[test]
    fn test_edge_deeply_nested_groups() {
        let source = format!("{}1{}", "(".repeat(64), ")".repeat(64));
        assert_eq!(opcodes(&source), vec![OpCode::Move, OpCode::Return]);
    }

    #[test]
    fn test_edge_runaway_parentheses_fail_cleanly() {
        let source = format!("{}1{}", "(".repeat(200_000), ")".repeat(200_000));
        let err = compile_source(&source, &Limits::default()).unwrap_err();
        assert!(matches!(err, ParseError::TooDeep { max: 256, .. }), "{err}");
        assert_eq!(err.span().line, 1);
    }

    #[test]
    fn test_edge_runaway_unary_minus_fails_cleanly() {
        let source = format!("{}1", "- ".repeat(200_000));
        let err = compile_source(&source, &Limits::default()).unwrap_err();
        assert!(matches!(err, ParseError::TooDeep { .. }), "{err}");
    }

    #[test]
    fn test_edge_nesting_limit_is_inclusive() {
        let limits = Limits::default();
        // The statement itself is one level, each group adds another.
        let fits = format!("{}1{}", "(".repeat(255), ")".repeat(255));
        assert!(compile_source(&fits, &limits).is_ok());

        let over = format!("{}1{}", "(".repeat(256), ")".repeat(256));
        assert!(matches!(
            compile_source(&over, &limits),
            Err(ParseError::TooDeep { .. })
        ));

        let shallow = Limits {
            max_depth: 2,
            ..Limits::default()
        };
        assert!(compile_source("-1", &shallow).is_ok());
        assert!(compile_source("- -1", &shallow).is_err());
    }

    #[test]
    fn test_edge_unusable_limits_rejected_before_parsing() {
        let limits = Limits {
            chunk_capacity: usize::MAX,
            ..Limits::default()
        };
        let err = compile_source("1", &limits).unwrap_err();
        assert!(matches!(err, ParseError::Limits(_)), "{err}");
        assert_eq!(
            hadron_util::ToDiagnostic::to_diagnostic(&err).code,
            Some(hadron_util::diagnostic::E_PARSER_INVALID_LIMITS)
        );
    }

    #[test]
    fn test_edge_unbalanced_close_paren() {
        let err = compile_source("(1))", &Limits::default()).unwrap_err();
        assert!(matches!(err, ParseError::Expected { .. }));
    }

    #[test]
    fn test_edge_every_number_base() {
        let ops = opcodes("0x10 + 0b1 + 0o7 + 017 + 1.5e1");
        assert_eq!(ops.iter().filter(|&&op| op == OpCode::Move).count(), 5);
        assert_eq!(ops.iter().filter(|&&op| op == OpCode::Add).count(), 4);
    }

    #[test]
    fn test_edge_long_variable_names_share_truncated_slot() {
        let long = "v".repeat(40);
        let source = format!("int {} = 1\n{}", long, &long[..31]);
        assert_eq!(
            opcodes(&source),
            vec![
                OpCode::Move,
                OpCode::Store,
                OpCode::Return,
                OpCode::Load,
                OpCode::Return
            ]
        );
    }

    #[test]
    fn test_edge_function_with_newline_separated_body() {
        let compiled = compile(
            hadron_lex::StringInput::new("fx f() {\n  1\n  2 * 3\n}\n4"),
            &Limits::default(),
        )
        .unwrap();
        assert_eq!(compiled.statements, 2);
        assert_eq!(compiled.chunk.code()[0], OpCode::FxEntry.byte());
    }

    #[test]
    fn test_edge_empty_function_body() {
        let ops = opcodes("fx f() {}");
        assert_eq!(ops, vec![OpCode::FxEntry, OpCode::FxExit, OpCode::Return]);
    }

    #[test]
    fn test_edge_keyword_cannot_start_statement() {
        for source in ["while", "return 1", "true"] {
            let err = compile_source(source, &Limits::default()).unwrap_err();
            assert!(matches!(err, ParseError::UnexpectedToken { .. }), "{source}");
        }
    }

    #[test]
    fn test_edge_statement_count() {
        let compiled = compile(
            hadron_lex::StringInput::new("1;\n2\n\n3;;"),
            &Limits::default(),
        )
        .unwrap();
        assert_eq!(compiled.statements, 3);
    }
}
