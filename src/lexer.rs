//! Lexer — source text to a stream of tokens.
//!
//! The language is small: integers, identifiers, four operators, `=`,
//! parentheses, and newlines as statement terminators. Tokenization never
//! fails; characters outside the language become `Unknown` tokens and the
//! parser decides how to report them.

use crate::error::SourceLoc;

/// Token types produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Decimal digit run, kept as text.
    Int(String),
    /// Identifier: letter or `_`, then letters, digits, `_`.
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Equals,
    LeftParen,
    RightParen,

    /// End of a source line (statement terminator).
    Eol,
    Eof,

    /// A character the language has no use for.
    Unknown(char),
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub loc: SourceLoc,
}

impl Token {
    pub fn new(kind: TokenKind, loc: SourceLoc) -> Self {
        Self { kind, loc }
    }
}

pub struct Lexer {
    source: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
    lines: Vec<String>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        let lines: Vec<String> = source.lines().map(String::from).collect();
        Self {
            source: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
            lines,
        }
    }

    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            self.skip_blanks();

            if self.at_end() {
                tokens.push(Token::new(TokenKind::Eof, self.loc()));
                break;
            }

            tokens.push(self.next_token());
        }

        tokens
    }

    fn loc(&self) -> SourceLoc {
        let mut loc = SourceLoc::new(self.line, self.col);
        if self.line > 0 && self.line <= self.lines.len() {
            loc = loc.with_source(self.lines[self.line - 1].clone());
        }
        loc
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    /// Skip spaces, tabs, and carriage returns. Newlines are tokens, not
    /// blanks — they terminate statements.
    fn skip_blanks(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r')) {
            self.advance();
        }
    }

    fn next_token(&mut self) -> Token {
        let loc = self.loc();
        let ch = match self.advance() {
            Some(ch) => ch,
            None => return Token::new(TokenKind::Eof, loc),
        };

        let kind = match ch {
            '\n' => TokenKind::Eol,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '=' => TokenKind::Equals,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            c if c.is_ascii_digit() => {
                let mut text = String::from(c);
                while let Some(d) = self.peek().filter(char::is_ascii_digit) {
                    text.push(d);
                    self.advance();
                }
                TokenKind::Int(text)
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::from(c);
                while let Some(d) = self
                    .peek()
                    .filter(|d| d.is_ascii_alphanumeric() || *d == '_')
                {
                    name.push(d);
                    self.advance();
                }
                TokenKind::Ident(name)
            }
            other => TokenKind::Unknown(other),
        };

        Token::new(kind, loc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).tokenize().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn integers_and_operators() {
        assert_eq!(
            kinds("2 + 34 * 5"),
            vec![
                TokenKind::Int("2".into()),
                TokenKind::Plus,
                TokenKind::Int("34".into()),
                TokenKind::Star,
                TokenKind::Int("5".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn assignment_tokens() {
        assert_eq!(
            kinds("x = 5\n"),
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::Equals,
                TokenKind::Int("5".into()),
                TokenKind::Eol,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn parens_and_division() {
        assert_eq!(
            kinds("(8)/2"),
            vec![
                TokenKind::LeftParen,
                TokenKind::Int("8".into()),
                TokenKind::RightParen,
                TokenKind::Slash,
                TokenKind::Int("2".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unknown_characters_become_tokens() {
        assert_eq!(
            kinds("2 % 3"),
            vec![
                TokenKind::Int("2".into()),
                TokenKind::Unknown('%'),
                TokenKind::Int("3".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn blank_lines_are_eol_tokens() {
        assert_eq!(
            kinds("\n   \n"),
            vec![TokenKind::Eol, TokenKind::Eol, TokenKind::Eof]
        );
    }

    #[test]
    fn positions_track_lines_and_columns() {
        let tokens = Lexer::new("x = 1\ny = 2\n").tokenize();
        assert_eq!(tokens[0].loc.line, 1);
        assert_eq!(tokens[0].loc.col, 1);
        // second line's identifier
        assert_eq!(tokens[4].loc.line, 2);
        assert_eq!(tokens[4].loc.col, 1);
        assert_eq!(tokens[4].loc.source_line.as_deref(), Some("y = 2"));
    }

    #[test]
    fn carriage_returns_are_skipped() {
        assert_eq!(
            kinds("1\r\n2"),
            vec![
                TokenKind::Int("1".into()),
                TokenKind::Eol,
                TokenKind::Int("2".into()),
                TokenKind::Eof,
            ]
        );
    }
}
