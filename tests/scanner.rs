#[cfg(test)]
mod scanner_tests {
    use treelox as lox;

    use lox::error::{Diagnostics, LoxError};
    use lox::scanner::*;
    use lox::token::*;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source);
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*.,+*})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_two_char_operators() {
        assert_token_sequence(
            "! != = == < <= > >= / // trailing comment",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::SLASH, "/"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_keywords_and_identifiers() {
        assert_token_sequence(
            "class classy _under fun funny print nil var x1",
            &[
                (TokenType::CLASS, "class"),
                (TokenType::IDENTIFIER, "classy"),
                (TokenType::IDENTIFIER, "_under"),
                (TokenType::FUN, "fun"),
                (TokenType::IDENTIFIER, "funny"),
                (TokenType::IDENTIFIER, "print"),
                (TokenType::NIL, "nil"),
                (TokenType::VAR, "var"),
                (TokenType::IDENTIFIER, "x1"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_04_number_literals() {
        let tokens: Vec<Token> = Scanner::new("12 3.5 7. .5")
            .filter_map(Result::ok)
            .collect();

        let kinds: Vec<TokenType> = tokens.iter().map(|t| t.token_type).collect();
        assert_eq!(
            kinds,
            vec![
                TokenType::NUMBER,
                TokenType::NUMBER,
                TokenType::NUMBER,
                TokenType::DOT,
                TokenType::DOT,
                TokenType::NUMBER,
                TokenType::EOF,
            ]
        );

        assert_eq!(tokens[0].literal, Some(Literal::Number(12.0)));
        assert_eq!(tokens[1].literal, Some(Literal::Number(3.5)));
        assert_eq!(tokens[2].lexeme, "7");
        assert_eq!(tokens[5].literal, Some(Literal::Number(5.0)));
    }

    #[test]
    fn test_scanner_05_multiline_string_tracks_lines() {
        let tokens: Vec<Token> = Scanner::new("\"one\ntwo\"\nx")
            .filter_map(Result::ok)
            .collect();

        assert_eq!(tokens[0].token_type, TokenType::STRING);
        assert_eq!(tokens[0].literal, Some(Literal::String("one\ntwo".into())));
        assert_eq!(tokens[0].line, 2);
        assert_eq!(tokens[1].lexeme, "x");
        assert_eq!(tokens[1].line, 3);
    }

    #[test]
    fn test_scanner_06_comments_and_newlines() {
        let tokens: Vec<Token> = Scanner::new("// nothing here\n\n  a // more\nb")
            .filter_map(Result::ok)
            .collect();

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].line, 3);
        assert_eq!(tokens[1].line, 4);
        assert_eq!(tokens[2].token_type, TokenType::EOF);
        assert_eq!(tokens[2].line, 4);
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let source = ",.$(#";
        let scanner = Scanner::new(source);

        // Collect all results (both tokens and errors)
        let results: Vec<_> = scanner.collect();

        // 0: COMMA ','
        // 1: DOT '.'
        // 2: Error for '$'
        // 3: LEFT_PAREN '('
        // 4: Error for '#'
        // 5: EOF
        assert_eq!(results.len(), 6, "Expected 6 items in result");

        assert_token_matches(&results[0], TokenType::COMMA, ",");
        assert_token_matches(&results[1], TokenType::DOT, ".");
        assert_token_matches(&results[3], TokenType::LEFT_PAREN, "(");
        assert_token_matches(&results[5], TokenType::EOF, "");

        let errors: Vec<String> = results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .map(|e| e.to_string())
            .collect();

        assert_eq!(
            errors,
            vec![
                "[line 1] Error: Unexpected character: $",
                "[line 1] Error: Unexpected character: #",
            ]
        );

        fn assert_token_matches(
            result: &Result<Token, LoxError>,
            expected_type: TokenType,
            expected_lexeme: &str,
        ) {
            match result {
                Ok(token) => {
                    assert_eq!(
                        token.token_type, expected_type,
                        "Expected token type {:?}, got {:?}",
                        expected_type, token.token_type
                    );
                    assert_eq!(
                        token.lexeme, expected_lexeme,
                        "Expected lexeme '{}', got '{}'",
                        expected_lexeme, token.lexeme
                    );
                }
                Err(e) => panic!("Expected token but got error: {}", e),
            }
        }
    }

    #[test]
    fn test_non_ascii_unexpected_character_is_reported_whole() {
        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new("a é b").scan_tokens(&mut diagnostics);

        assert_eq!(tokens.len(), 3);
        assert_eq!(diagnostics.errors().len(), 1);
        assert_eq!(
            diagnostics.errors()[0].to_string(),
            "[line 1] Error: Unexpected character: é"
        );
    }

    #[test]
    fn test_unterminated_string_still_ends_with_eof() {
        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new("var s = \"never closed\n").scan_tokens(&mut diagnostics);

        assert_eq!(
            tokens.iter().map(|t| t.token_type).collect::<Vec<_>>(),
            vec![
                TokenType::VAR,
                TokenType::IDENTIFIER,
                TokenType::EQUAL,
                TokenType::EOF
            ]
        );
        assert_eq!(diagnostics.errors().len(), 1);
        assert_eq!(
            diagnostics.errors()[0].to_string(),
            "[line 2] Error: Unterminated string."
        );
    }

    #[test]
    fn test_token_display() {
        let tokens: Vec<Token> = Scanner::new("42 2.5 \"hi\" and")
            .filter_map(Result::ok)
            .collect();

        let rendered: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "NUMBER 42 42.0",
                "NUMBER 2.5 2.5",
                "STRING \"hi\" hi",
                "AND and null",
                "EOF  null",
            ]
        );
    }

    #[test]
    fn test_token_display_keeps_fraction_for_large_integers() {
        let tokens: Vec<Token> = Scanner::new("100000000000000000000")
            .filter_map(Result::ok)
            .collect();

        assert_eq!(
            tokens[0].to_string(),
            "NUMBER 100000000000000000000 100000000000000000000.0"
        );
    }
}
