use crate::Real;
use crate::types::TokenKind;

/// Identifiers longer than this are rejected.
const MAX_TOKEN_LENGTH: usize = 64;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: Option<Real>,
    pub text: Option<String>,
    pub position: usize,
}

impl Token {
    fn new(kind: TokenKind, text: &str, position: usize) -> Self {
        Self {
            kind,
            value: None,
            text: Some(String::from(text)),
            position,
        }
    }

    fn number(value: Real, text: &str, position: usize) -> Self {
        Self {
            kind: TokenKind::Number,
            value: Some(value),
            text: Some(String::from(text)),
            position,
        }
    }
}

/// The lexer struct, which produces tokens from an input string.
#[derive(Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    pub pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Peek at the current character.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Peek at the character after the current one.
    fn peek_second(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advance the position by one character.
    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    /// Peek at the next token without consuming it
    pub fn peek_token(&self) -> Option<Token> {
        let mut lexer_copy = self.clone();
        lexer_copy.next_token()
    }

    /// Get the original input string
    pub fn get_original_input(&self) -> &'a str {
        self.input
    }

    /// Skip whitespace.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Consume a run of ASCII digits, returning how many were consumed.
    fn consume_digits(&mut self) -> usize {
        let mut count = 0;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
                count += 1;
            } else {
                break;
            }
        }
        count
    }

    /// Scan a numeric literal: `12`, `1.5`, `.5`, `3.`, `2e3`, `1.5e-7`.
    ///
    /// The caller has checked that the input starts with a digit, or with a
    /// dot followed by a digit.
    fn scan_number(&mut self, start_pos: usize) -> Token {
        let int_digits = self.consume_digits();
        let mut frac_digits = 0;
        if self.peek() == Some('.') {
            self.advance();
            frac_digits = self.consume_digits();
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            // Must have at least one digit after e/E
            if self.consume_digits() == 0 {
                return Token::new(
                    TokenKind::Error,
                    &self.input[start_pos..self.pos],
                    start_pos,
                );
            }
        }

        let num_str = &self.input[start_pos..self.pos];
        if int_digits + frac_digits == 0 {
            return Token::new(TokenKind::Error, num_str, start_pos);
        }
        match num_str.parse::<Real>() {
            Ok(val) => Token::number(val, num_str, start_pos),
            Err(_) => Token::new(TokenKind::Error, num_str, start_pos),
        }
    }

    /// Get the next token from the input.
    pub fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace();
        let start_pos = self.pos;
        let c = self.peek()?;

        // Number (integer or float, possibly scientific notation), including
        // decimals starting with a dot (e.g. .5)
        if c.is_ascii_digit()
            || (c == '.' && self.peek_second().is_some_and(|d| d.is_ascii_digit()))
        {
            return Some(self.scan_number(start_pos));
        }

        // Operators: + - * / ** and postfix !
        if "+-*/!".contains(c) {
            self.advance();
            if c == '*' && self.peek() == Some('*') {
                self.advance();
            }
            return Some(Token::new(
                TokenKind::Operator,
                &self.input[start_pos..self.pos],
                start_pos,
            ));
        }

        // Identifier (constant or function name)
        if c.is_ascii_alphabetic() || c == '_' {
            while let Some(nc) = self.peek() {
                if nc.is_ascii_alphanumeric() || nc == '_' {
                    self.advance();
                } else {
                    break;
                }
            }
            let ident = &self.input[start_pos..self.pos];
            if ident.len() > MAX_TOKEN_LENGTH {
                return Some(Token::new(TokenKind::Error, ident, start_pos));
            }
            return Some(Token::new(TokenKind::Variable, ident, start_pos));
        }

        // Punctuation; anything else is an error token
        let kind = match c {
            '(' => TokenKind::Open,
            ')' => TokenKind::Close,
            ',' => TokenKind::Separator,
            _ => TokenKind::Error,
        };
        self.advance();
        Some(Token::new(kind, &self.input[start_pos..self.pos], start_pos))
    }
}
