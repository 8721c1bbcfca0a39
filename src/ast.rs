//! Abstract syntax tree for calculator programs.
//!
//! A program is a sequence of statements, one per input line. Each statement
//! is either an expression to print, an assignment, or a blank line. The tree
//! is immutable once built; the evaluator only mutates the environment.

use std::fmt;

use crate::error::SourceLoc;

/// A complete parsed program.
#[derive(Debug, Clone)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

/// A single statement with its source location. `loc.source_line` holds the
/// raw line text, used by echo mode and assignment error context.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub loc: SourceLoc,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    /// A bare expression; its value is printed.
    Print(Expr),

    /// Variable assignment: `name = expr`. Yields the assigned value.
    Assign { name: String, expr: Expr },

    /// An empty or whitespace-only line. Nothing to print, not an error.
    Blank,
}

/// Expressions.
#[derive(Debug, Clone)]
pub enum Expr {
    /// Decimal integer literal, kept as digit text until evaluation.
    Int(String),
    /// Variable reference.
    Ident(String),
    /// Parenthesized expression — grouping only.
    Paren(Box<Expr>),
    /// Binary operation.
    BinOp {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    /// A fragment the frontend could not classify. Always evaluates to a
    /// syntax error, letting the rest of the program proceed.
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Reconstructs source text for diagnostics, e.g. the left subtree of a
/// failed binary operation.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(text) => write!(f, "{text}"),
            Self::Ident(name) => write!(f, "{name}"),
            Self::Paren(inner) => write!(f, "({inner})"),
            Self::BinOp { left, op, right } => write!(f, "{left} {op} {right}"),
            Self::Error(text) => write!(f, "{text}"),
        }
    }
}

impl fmt::Display for StmtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Print(expr) => write!(f, "{expr}"),
            Self::Assign { name, expr } => write!(f, "{name} = {expr}"),
            Self::Blank => Ok(()),
        }
    }
}
