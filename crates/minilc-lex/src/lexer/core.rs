//! Core lexer implementation: the main dispatch loop.

use minilc_util::CompileError;

use crate::cursor::Cursor;
use crate::token::{keyword, Token, TokenType};

/// Tokenizes MiniLang source text one token at a time.
///
/// The lexer never emits an `EOF` token itself — callers that need a
/// sentinel (the parser) append one after draining the iterator.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    next_index: usize,
    token_start: usize,
    token_start_line: u32,
    token_start_col: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            next_index: 0,
            token_start: 0,
            token_start_line: 1,
            token_start_col: 1,
        }
    }

    /// Tokenizes the whole source, returning the flat token stream (no EOF).
    pub fn tokenize(source: &'a str) -> Result<Vec<Token>, CompileError> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        while let Some(tok) = lexer.next_token()? {
            tokens.push(tok);
        }
        Ok(tokens)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.current_char() {
                ' ' | '\t' | '\r' | '\n' => self.cursor.advance(),
                '/' if self.cursor.peek_char(1) == '/' => {
                    while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                        self.cursor.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn error(&self, message: impl Into<String>) -> CompileError {
        CompileError::Lex {
            line: self.token_start_line,
            col: self.token_start_col,
            message: message.into(),
        }
    }

    fn make(&mut self, ty: TokenType, lexeme: impl Into<String>) -> Token {
        let index = self.next_index;
        self.next_index += 1;
        Token::new(index, ty, lexeme, self.token_start_line, self.token_start_col)
    }

    /// Returns the next token, or `None` once the source is exhausted.
    pub fn next_token(&mut self) -> Result<Option<Token>, CompileError> {
        self.skip_whitespace_and_comments();

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_col = self.cursor.column();

        if self.cursor.is_at_end() {
            return Ok(None);
        }

        let c = self.cursor.current_char();
        let tok = match c {
            '(' => {
                self.cursor.advance();
                self.make(TokenType::LParen, "(")
            }
            ')' => {
                self.cursor.advance();
                self.make(TokenType::RParen, ")")
            }
            '{' => {
                self.cursor.advance();
                self.make(TokenType::LBrace, "{")
            }
            '}' => {
                self.cursor.advance();
                self.make(TokenType::RBrace, "}")
            }
            ';' => {
                self.cursor.advance();
                self.make(TokenType::Semi, ";")
            }
            '+' => {
                self.cursor.advance();
                self.make(TokenType::Plus, "+")
            }
            '-' => {
                self.cursor.advance();
                self.make(TokenType::Minus, "-")
            }
            '*' => {
                self.cursor.advance();
                self.make(TokenType::Mul, "*")
            }
            '/' => {
                self.cursor.advance();
                self.make(TokenType::Div, "/")
            }
            '=' => self.lex_equals()?,
            '!' => self.lex_bang()?,
            '<' => {
                self.cursor.advance();
                self.make(TokenType::Lt, "<")
            }
            '>' => {
                self.cursor.advance();
                self.make(TokenType::Gt, ">")
            }
            c if c.is_ascii_alphabetic() || c == '_' => self.lex_identifier(),
            c if c.is_ascii_digit() => self.lex_number(),
            c => {
                return Err(self.error(format!("Expected valid token, but got CHAR('{}')", c)));
            }
        };
        Ok(Some(tok))
    }

    /// `=` is `ASSIGN` by itself, `==` is `EQ`; a third `=` (`===`) is a
    /// lex error pointed at that third character.
    fn lex_equals(&mut self) -> Result<Token, CompileError> {
        self.cursor.advance();
        if !self.cursor.match_char('=') {
            return Ok(self.make(TokenType::Assign, "="));
        }
        self.reject_trailing_eq_or_bang()?;
        Ok(self.make(TokenType::Eq, "=="))
    }

    /// `!` has no meaning alone; `!=` is `NE`. A third `=` (`!==`) is a
    /// lex error pointed at that third character.
    fn lex_bang(&mut self) -> Result<Token, CompileError> {
        let start_line = self.token_start_line;
        let start_col = self.token_start_col;
        self.cursor.advance();
        if !self.cursor.match_char('=') {
            return Err(CompileError::Lex {
                line: start_line,
                col: start_col,
                message: "Expected valid token, but got CHAR('!')".to_string(),
            });
        }
        self.reject_trailing_eq_or_bang()?;
        Ok(self.make(TokenType::Ne, "!="))
    }

    fn reject_trailing_eq_or_bang(&self) -> Result<(), CompileError> {
        let c = self.cursor.current_char();
        if c == '=' || c == '!' {
            return Err(CompileError::Lex {
                line: self.cursor.line(),
                col: self.cursor.column(),
                message: format!("Expected valid token, but got CHAR('{}')", c),
            });
        }
        Ok(())
    }

    fn lex_identifier(&mut self) -> Token {
        let start = self.cursor.position();
        while !self.cursor.is_at_end()
            && (self.cursor.current_char().is_ascii_alphanumeric() || self.cursor.current_char() == '_')
        {
            self.cursor.advance();
        }
        let word = self.cursor.slice_from(start).to_string();
        match keyword(&word) {
            Some(ty) => self.make(ty, word),
            None => self.make(TokenType::Id, word),
        }
    }

    fn lex_number(&mut self) -> Token {
        let start = self.cursor.position();
        while !self.cursor.is_at_end() && self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }
        let digits = self.cursor.slice_from(start).to_string();
        self.make(TokenType::Num, digits)
    }
}
