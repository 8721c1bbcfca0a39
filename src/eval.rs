//! Tree-walking evaluator — AST + Environment -> outcomes.
//!
//! Each statement evaluates to an `Outcome` (a value or the blank marker)
//! or a `CalcDiagnostic`. Results are returned, never thrown: the program
//! level records every statement's own result independently, so one bad
//! line never prevents the lines after it from running.

use crate::ast::{BinOp, Expr, Program, Stmt, StmtKind};
use crate::env::Environment;
use crate::error::{CalcDiagnostic, CalcError, CalcResult};

/// Result of evaluating one statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A value to display.
    Value(i64),
    /// A blank line: nothing to display, not an error.
    Blank,
}

pub struct Evaluator<'a> {
    env: &'a mut Environment,
    /// Expression nodes visited so far, reported in debug traces.
    visited: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(env: &'a mut Environment) -> Self {
        Self { env, visited: 0 }
    }

    /// Evaluate every statement in source order, one result per statement.
    /// A statement's error is recorded in its own slot and evaluation
    /// continues with the next statement.
    pub fn eval_program(&mut self, program: &Program) -> Vec<CalcResult<Outcome>> {
        program
            .stmts
            .iter()
            .map(|stmt| self.eval_stmt(stmt))
            .collect()
    }

    pub fn eval_stmt(&mut self, stmt: &Stmt) -> CalcResult<Outcome> {
        match &stmt.kind {
            StmtKind::Print(expr) => {
                tracing::debug!(stmt = %stmt.kind, "expression statement");
                Ok(Outcome::Value(self.eval_expr(expr)?))
            }
            StmtKind::Assign { name, expr } => {
                tracing::debug!(stmt = %stmt.kind, "assignment");
                match self.eval_expr(expr) {
                    Ok(value) => {
                        self.env.set(name, value);
                        Ok(Outcome::Value(value))
                    }
                    // The environment is left untouched on a failed
                    // right-hand side.
                    Err(cause) => Err(CalcDiagnostic::new(CalcError::Assignment)
                        .with_context(assignment_text(stmt))
                        .caused_by(cause)),
                }
            }
            StmtKind::Blank => Ok(Outcome::Blank),
        }
    }

    fn eval_expr(&mut self, expr: &Expr) -> CalcResult<i64> {
        self.visited += 1;
        tracing::debug!(visit = self.visited, node = %expr, "eval");

        match expr {
            Expr::Int(text) => text
                .parse::<i64>()
                .map_err(|_| CalcDiagnostic::new(CalcError::ParseInt).with_context(text.clone())),
            Expr::Ident(name) => self.env.get(name).ok_or_else(|| {
                CalcDiagnostic::new(CalcError::UndefinedVariable).with_context(name.clone())
            }),
            Expr::Paren(inner) => self.eval_expr(inner),
            Expr::BinOp { left, op, right } => {
                let lval = match self.eval_expr(left) {
                    Ok(value) => value,
                    // Short-circuit: the right subtree is never evaluated.
                    Err(cause) => {
                        return Err(CalcDiagnostic::new(CalcError::LeftOperand)
                            .with_context(left.to_string())
                            .caused_by(cause));
                    }
                };
                let rval = match self.eval_expr(right) {
                    Ok(value) => value,
                    Err(cause) => {
                        return Err(CalcDiagnostic::new(CalcError::RightOperand)
                            .with_context(right.to_string())
                            .caused_by(cause));
                    }
                };
                apply(*op, lval, rval)
            }
            Expr::Error(text) => {
                Err(CalcDiagnostic::new(CalcError::Syntax).with_context(text.clone()))
            }
        }
    }
}

/// Apply a binary operator. Arithmetic wraps at the `i64` boundaries
/// (two's-complement, matching fixed-width native integers); division
/// truncates toward zero and checks the divisor explicitly so a zero
/// divisor is a diagnostic, not a fault.
fn apply(op: BinOp, left: i64, right: i64) -> CalcResult<i64> {
    match op {
        BinOp::Add => Ok(left.wrapping_add(right)),
        BinOp::Sub => Ok(left.wrapping_sub(right)),
        BinOp::Mul => Ok(left.wrapping_mul(right)),
        BinOp::Div => {
            if right == 0 {
                return Err(CalcDiagnostic::new(CalcError::DivisionByZero));
            }
            Ok(left.wrapping_div(right))
        }
    }
}

/// Full assignment text for error context, preferring the raw source line.
fn assignment_text(stmt: &Stmt) -> String {
    match stmt.loc.source_line {
        Some(ref line) => line.trim().to_string(),
        None => stmt.kind.to_string(),
    }
}
