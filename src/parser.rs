//! Recursive descent parser — tokens to AST.
//!
//! One statement per source line: an assignment (`name = expr`), a bare
//! expression, or a blank line. The parser never aborts: a line that fails
//! to parse is recorded as a `ParseError` for the driver to render and
//! becomes an error-node statement, so evaluation of the remaining lines
//! proceeds normally.

use std::fmt;

use crate::ast::{BinOp, Expr, Program, Stmt, StmtKind};
use crate::error::SourceLoc;
use crate::lexer::{Token, TokenKind};

/// A syntax problem the frontend reports without stopping the run. The
/// driver renders these as `ERROR: line <L>:<C> <message>` on stderr.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub loc: SourceLoc,
    pub message: String,
}

impl ParseError {
    pub fn new(loc: SourceLoc, message: impl Into<String>) -> Self {
        Self {
            loc,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}:{} {}", self.loc.line, self.loc.col, self.message)
    }
}

/// Outcome of parsing one line's expression: cleanly parsed, or replaced by
/// an error node after recovery.
enum LineExpr {
    Parsed(Expr),
    Malformed(Expr),
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    pub fn parse(&mut self) -> Program {
        let mut stmts = Vec::new();
        while !self.at_end() {
            stmts.push(self.parse_stmt());
        }
        Program { stmts }
    }

    /// Syntax diagnostics collected while parsing, in source order.
    pub fn diagnostics(&self) -> &[ParseError] {
        &self.errors
    }

    // ── helpers ──────────────────────────────────────────────────────

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    /// Peek ahead by `n` tokens (0 = current).
    fn peek_at(&self, n: usize) -> &TokenKind {
        let idx = self.pos + n;
        if idx < self.tokens.len() {
            &self.tokens[idx].kind
        } else {
            &TokenKind::Eof
        }
    }

    fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    fn at_line_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eol | TokenKind::Eof)
    }

    fn advance(&mut self) {
        if !self.at_end() {
            self.pos += 1;
        }
    }

    fn loc(&self) -> SourceLoc {
        self.peek().loc.clone()
    }

    // ── statement parsing ───────────────────────────────────────────

    fn parse_stmt(&mut self) -> Stmt {
        let loc = self.loc();

        if matches!(self.peek_kind(), TokenKind::Eol) {
            self.advance();
            return Stmt {
                kind: StmtKind::Blank,
                loc,
            };
        }

        let kind = match self.peek_kind().clone() {
            // Ident followed by `=` starts an assignment; a bare identifier
            // is an expression statement.
            TokenKind::Ident(name) if matches!(self.peek_at(1), TokenKind::Equals) => {
                self.advance(); // identifier
                self.advance(); // =
                match self.parse_line_expr() {
                    LineExpr::Parsed(expr) => StmtKind::Assign { name, expr },
                    LineExpr::Malformed(expr) => StmtKind::Print(expr),
                }
            }
            _ => match self.parse_line_expr() {
                LineExpr::Parsed(expr) | LineExpr::Malformed(expr) => StmtKind::Print(expr),
            },
        };

        if matches!(self.peek_kind(), TokenKind::Eol) {
            self.advance();
        }

        Stmt { kind, loc }
    }

    /// Parse an expression that must extend to the end of the line.
    fn parse_line_expr(&mut self) -> LineExpr {
        match self.parse_expr() {
            Ok(expr) if self.at_line_end() => LineExpr::Parsed(expr),
            Ok(_) => {
                let loc = self.loc();
                let message = match self.peek_kind() {
                    TokenKind::Unknown(c) => format!("unknown operator '{c}'"),
                    other => format!("unexpected {}", describe(other)),
                };
                LineExpr::Malformed(self.recover(ParseError::new(loc, message)))
            }
            Err(error) => LineExpr::Malformed(self.recover(error)),
        }
    }

    /// Record the diagnostic, skip the rest of the line, and produce an
    /// error node carrying the unclassifiable fragment.
    fn recover(&mut self, error: ParseError) -> Expr {
        let fragment = fragment_from(&error.loc);
        self.errors.push(error);
        while !self.at_line_end() {
            self.advance();
        }
        Expr::Error(fragment)
    }

    // ── expression parsing ──────────────────────────────────────────
    //
    // Lowest to highest:
    //   1. add / sub   (+ -)
    //   2. mul / div   (* /)
    //   3. primary     (integer, identifier, parens)

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_add_sub()
    }

    fn parse_add_sub(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_mul_div()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_mul_div()?;
            left = Expr::BinOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_mul_div(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_primary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_primary()?;
            left = Expr::BinOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.loc();
        match self.peek_kind().clone() {
            TokenKind::Int(text) => {
                self.advance();
                Ok(Expr::Int(text))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Expr::Ident(name))
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expr()?;
                if matches!(self.peek_kind(), TokenKind::RightParen) {
                    self.advance();
                    Ok(Expr::Paren(Box::new(inner)))
                } else {
                    Err(ParseError::new(
                        self.loc(),
                        format!("expected ')', found {}", describe(self.peek_kind())),
                    ))
                }
            }
            other => Err(ParseError::new(
                loc,
                format!("expected expression, found {}", describe(&other)),
            )),
        }
    }
}

/// Token description for diagnostics.
fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Int(text) => format!("number '{text}'"),
        TokenKind::Ident(name) => format!("identifier '{name}'"),
        TokenKind::Plus => "'+'".to_string(),
        TokenKind::Minus => "'-'".to_string(),
        TokenKind::Star => "'*'".to_string(),
        TokenKind::Slash => "'/'".to_string(),
        TokenKind::Equals => "'='".to_string(),
        TokenKind::LeftParen => "'('".to_string(),
        TokenKind::RightParen => "')'".to_string(),
        TokenKind::Eol => "end of line".to_string(),
        TokenKind::Eof => "end of input".to_string(),
        TokenKind::Unknown(c) => format!("'{c}'"),
    }
}

/// The unclassifiable rest of the line, from the failure point onward.
/// Falls back to the whole line when the failure sits at the line's end.
fn fragment_from(loc: &SourceLoc) -> String {
    let Some(ref line) = loc.source_line else {
        return String::new();
    };
    let rest: String = line.chars().skip(loc.col.saturating_sub(1)).collect();
    let rest = rest.trim();
    if rest.is_empty() {
        line.trim().to_string()
    } else {
        rest.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(source: &str) -> (Program, Vec<ParseError>) {
        let tokens = Lexer::new(source).tokenize();
        let mut p = Parser::new(tokens);
        let program = p.parse();
        (program, p.diagnostics().to_vec())
    }

    fn parse_ok(source: &str) -> Program {
        let (program, errors) = parse(source);
        assert!(errors.is_empty(), "unexpected diagnostics: {errors:?}");
        program
    }

    #[test]
    fn bare_expression_is_print() {
        let program = parse_ok("2 + 3\n");
        assert_eq!(program.stmts.len(), 1);
        assert!(matches!(program.stmts[0].kind, StmtKind::Print(_)));
    }

    #[test]
    fn assignment_statement() {
        let program = parse_ok("x = 5\n");
        match &program.stmts[0].kind {
            StmtKind::Assign { name, expr } => {
                assert_eq!(name, "x");
                assert!(matches!(expr, Expr::Int(t) if t == "5"));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn blank_line_statement() {
        let program = parse_ok("   \n");
        assert!(matches!(program.stmts[0].kind, StmtKind::Blank));
    }

    #[test]
    fn mul_binds_tighter_than_add() {
        let program = parse_ok("2 + 3 * 4\n");
        match &program.stmts[0].kind {
            StmtKind::Print(Expr::BinOp { op, right, .. }) => {
                assert_eq!(*op, BinOp::Add);
                assert!(matches!(**right, Expr::BinOp { op: BinOp::Mul, .. }));
            }
            other => panic!("expected binary op, got {other:?}"),
        }
    }

    #[test]
    fn parens_group() {
        let program = parse_ok("(2 + 3) * 4\n");
        match &program.stmts[0].kind {
            StmtKind::Print(Expr::BinOp { op, left, .. }) => {
                assert_eq!(*op, BinOp::Mul);
                assert!(matches!(**left, Expr::Paren(_)));
            }
            other => panic!("expected binary op, got {other:?}"),
        }
    }

    #[test]
    fn addition_is_left_associative() {
        let program = parse_ok("1 - 2 - 3\n");
        match &program.stmts[0].kind {
            StmtKind::Print(Expr::BinOp { op, left, .. }) => {
                assert_eq!(*op, BinOp::Sub);
                assert!(matches!(**left, Expr::BinOp { op: BinOp::Sub, .. }));
            }
            other => panic!("expected binary op, got {other:?}"),
        }
    }

    #[test]
    fn one_statement_per_line() {
        let program = parse_ok("x = 1\ny = 2\nx + y\n");
        assert_eq!(program.stmts.len(), 3);
    }

    #[test]
    fn unknown_operator_is_reported() {
        let (program, errors) = parse("2 % 3\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "unknown operator '%'");
        assert_eq!(errors[0].loc.line, 1);
        assert_eq!(errors[0].loc.col, 3);
        assert!(matches!(
            program.stmts[0].kind,
            StmtKind::Print(Expr::Error(ref text)) if text == "% 3"
        ));
    }

    #[test]
    fn dangling_operator_is_reported() {
        let (program, errors) = parse("2 +\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "expected expression, found end of line");
        assert!(matches!(
            program.stmts[0].kind,
            StmtKind::Print(Expr::Error(ref text)) if text == "2 +"
        ));
    }

    #[test]
    fn unclosed_paren_is_reported() {
        let (_, errors) = parse("(1 + 2\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "expected ')', found end of line");
    }

    #[test]
    fn malformed_assignment_becomes_error_node() {
        let (program, errors) = parse("x = \n");
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            program.stmts[0].kind,
            StmtKind::Print(Expr::Error(ref text)) if text == "x ="
        ));
    }

    #[test]
    fn bad_line_does_not_stop_later_lines() {
        let (program, errors) = parse("x = 1\n2 +\ny = 2\n");
        assert_eq!(program.stmts.len(), 3);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].loc.line, 2);
        assert!(matches!(program.stmts[0].kind, StmtKind::Assign { .. }));
        assert!(matches!(program.stmts[2].kind, StmtKind::Assign { .. }));
    }

    #[test]
    fn diagnostic_display_format() {
        let (_, errors) = parse("2 % 3\n");
        assert_eq!(errors[0].to_string(), "line 1:3 unknown operator '%'");
    }

    #[test]
    fn statement_without_trailing_newline() {
        let program = parse_ok("1 + 1");
        assert_eq!(program.stmts.len(), 1);
        assert!(matches!(program.stmts[0].kind, StmtKind::Print(_)));
    }
}
