//! Tokenizer for MiniLang source text.
//!
//! `Lexer::tokenize` is a pure function `&str -> Result<Vec<Token>, CompileError>`;
//! it does not touch the filesystem, and never emits the synthetic `EOF`
//! token — that is the parser's job once the stream is in hand.

pub mod cursor;
pub mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenType};

#[cfg(test)]
mod tests {
    use super::*;

    fn types(src: &str) -> Vec<TokenType> {
        Lexer::tokenize(src).unwrap().into_iter().map(|t| t.ty).collect()
    }

    #[test]
    fn empty_source() {
        assert!(Lexer::tokenize("").unwrap().is_empty());
    }

    #[test]
    fn simple_assignment() {
        let tokens = Lexer::tokenize("x = 1 + 2;").unwrap();
        assert_eq!(
            types("x = 1 + 2;"),
            vec![
                TokenType::Id,
                TokenType::Assign,
                TokenType::Num,
                TokenType::Plus,
                TokenType::Num,
                TokenType::Semi,
            ]
        );
        assert_eq!(tokens[0].lexeme, "x");
        assert_eq!(tokens[2].lexeme, "1");
    }

    #[test]
    fn keywords_are_not_identifiers() {
        assert_eq!(
            types("if else while and or not"),
            vec![
                TokenType::If,
                TokenType::Else,
                TokenType::While,
                TokenType::And,
                TokenType::Or,
                TokenType::Not,
            ]
        );
    }

    #[test]
    fn two_char_operators() {
        assert_eq!(types("a == b != c"), vec![
            TokenType::Id, TokenType::Eq, TokenType::Id, TokenType::Ne, TokenType::Id
        ]);
    }

    #[test]
    fn line_comment_is_skipped() {
        let tokens = Lexer::tokenize("x = 1; // trailing comment\ny = 2;").unwrap();
        assert_eq!(tokens.last().unwrap().line, 2);
    }

    #[test]
    fn line_and_col_tracking() {
        let tokens = Lexer::tokenize("x\n  y").unwrap();
        assert_eq!((tokens[0].line, tokens[0].col), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].col), (2, 3));
    }

    #[test]
    fn triple_equals_is_a_lex_error_at_third_char() {
        let err = Lexer::tokenize("x === 1;").unwrap_err();
        match err {
            minilc_util::CompileError::Lex { line, col, .. } => {
                assert_eq!((line, col), (1, 5));
            }
            other => panic!("expected Lex error, got {other:?}"),
        }
    }

    #[test]
    fn bang_alone_is_an_error() {
        assert!(Lexer::tokenize("! x").is_err());
    }

    #[test]
    fn unknown_character_is_an_error() {
        assert!(Lexer::tokenize("x = 1 $ 2;").is_err());
    }
}
