//! Edge case tests for the lexer.

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bumpalo::Bump;

    use crate::{tokenize, FileInput, LexError, Lexer, StringInput, TokenKind};

    #[test]
    fn test_edge_empty_input() {
        let arena = Bump::new();
        let tokens = tokenize("", &arena).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::End);
        assert_eq!(tokens[0].span.line, 1);
    }

    #[test]
    fn test_edge_only_whitespace_and_comments() {
        let arena = Bump::new();
        let tokens = tokenize("  \t\r\n// c\n/* d */\\\n", &arena).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].span.line, 4);
    }

    #[test]
    fn test_edge_operators_without_spaces() {
        let arena = Bump::new();
        let kinds: Vec<_> = tokenize("a+=-b**-c", &arena)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Name,
                TokenKind::PlusEq,
                TokenKind::Minus,
                TokenKind::Name,
                TokenKind::StarStar,
                TokenKind::Minus,
                TokenKind::Name,
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn test_edge_inclusive_range_between_numbers() {
        let arena = Bump::new();
        let kinds: Vec<_> = tokenize("0=..=0x10", &arena)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Decimal, TokenKind::EqDotDotEq, TokenKind::Hex, TokenKind::End]
        );
    }

    #[test]
    fn test_edge_keyword_prefix_of_name() {
        let arena = Bump::new();
        let tokens = tokenize("format fx_1 iffy", &arena).unwrap();
        assert!(tokens[..3].iter().all(|t| t.kind == TokenKind::Name));
    }

    #[test]
    fn test_edge_constant_index_wraps() {
        let arena = Bump::new();
        let source = "1 ".repeat(257);
        let tokens = tokenize(&source, &arena).unwrap();
        assert_eq!(tokens[255].constant_index, 255);
        assert_eq!(tokens[256].constant_index, 0);
    }

    #[test]
    fn test_edge_non_ascii_is_rejected() {
        let arena = Bump::new();
        let err = tokenize("é", &arena).unwrap_err();
        assert!(matches!(err, LexError::UnexpectedCharacter { .. }));
    }

    #[test]
    fn test_edge_non_ascii_inside_string_is_kept() {
        let arena = Bump::new();
        let tokens = tokenize("\"héllo\"", &arena).unwrap();
        assert_eq!(tokens[0].text(), Some("héllo"));
    }

    #[test]
    fn test_edge_file_input_produces_same_tokens() {
        let source = "fx f() { 'x' 0b11 ..= 017 }";
        let arena = Bump::new();
        let from_string: Vec<_> = Lexer::new(StringInput::new(source), &arena)
            .map(|t| t.unwrap())
            .collect();
        let from_file: Vec<_> = Lexer::new(FileInput::new(Cursor::new(source.as_bytes().to_vec())), &arena)
            .map(|t| t.unwrap())
            .collect();
        assert_eq!(from_string, from_file);
    }

    #[test]
    fn test_edge_crlf_line_endings() {
        let arena = Bump::new();
        let tokens = tokenize("1\r\n2", &arena).unwrap();
        assert_eq!(tokens[1].span.line, 2);
        assert_eq!(tokens[1].span.col_start, 1);
    }
}
