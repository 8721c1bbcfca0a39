//! Calculator error types and message formatting.
//!
//! Every evaluation step returns a `CalcResult` rather than panicking, so a
//! bad statement never takes down the session. Composite nodes wrap a child
//! failure with their own context, producing a readable cause chain like
//! `error with assignment 'x = 1 / 0': error with right operand '1 / 0':
//! division by zero`.

use std::fmt;

/// Source location for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLoc {
    pub line: usize,
    pub col: usize,
    /// Original source line text, kept for echo output and error context.
    pub source_line: Option<String>,
}

impl SourceLoc {
    pub fn new(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            source_line: None,
        }
    }

    pub fn with_source(mut self, text: String) -> Self {
        self.source_line = Some(text);
        self
    }
}

/// Semantic error kinds produced by evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcError {
    /// The frontend could not classify a fragment of the input.
    Syntax,
    /// An integer literal was non-numeric or out of range for `i64`.
    ParseInt,
    /// An identifier was referenced before any assignment to it.
    UndefinedVariable,
    /// The right operand of `/` evaluated to zero.
    DivisionByZero,
    /// Defensive: the operator enum is closed, so a well-formed tree cannot
    /// produce this. Kept so the frontend contract stays expressible.
    UnknownOperator,
    /// A binary operation's left operand failed to evaluate.
    LeftOperand,
    /// A binary operation's right operand failed to evaluate.
    RightOperand,
    /// The right-hand side of an assignment failed to evaluate.
    Assignment,
}

impl CalcError {
    /// Human-readable message stem; context is appended by `Display`.
    pub fn message(self) -> &'static str {
        match self {
            Self::Syntax => "syntax error near",
            Self::ParseInt => "couldn't parse integer",
            Self::UndefinedVariable => "undefined variable",
            Self::DivisionByZero => "division by zero",
            Self::UnknownOperator => "unknown operator",
            Self::LeftOperand => "error with left operand",
            Self::RightOperand => "error with right operand",
            Self::Assignment => "error with assignment",
        }
    }
}

/// An evaluation error with context text and an optional wrapped cause.
/// Structured (kind + context + cause) so tests and callers can match on
/// kinds while `Display` renders the human-readable chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalcDiagnostic {
    pub error: CalcError,
    /// Offending source text (the literal, identifier, or subtree).
    pub context: Option<String>,
    /// The child failure this diagnostic wraps.
    pub cause: Option<Box<CalcDiagnostic>>,
}

impl CalcDiagnostic {
    pub fn new(error: CalcError) -> Self {
        Self {
            error,
            context: None,
            cause: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn caused_by(mut self, cause: CalcDiagnostic) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// The innermost error kind in the chain — what actually went wrong
    /// before the wrapping layers added their context.
    pub fn root_cause(&self) -> CalcError {
        match self.cause {
            Some(ref inner) => inner.root_cause(),
            None => self.error,
        }
    }
}

impl fmt::Display for CalcDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error.message())?;

        if let Some(ref context) = self.context {
            write!(f, " '{context}'")?;
        }

        if let Some(ref cause) = self.cause {
            write!(f, ": {cause}")?;
        }

        Ok(())
    }
}

impl std::error::Error for CalcDiagnostic {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|c| c as &(dyn std::error::Error + 'static))
    }
}

/// Convenience alias.
pub type CalcResult<T> = Result<T, CalcDiagnostic>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_with_context() {
        let diag = CalcDiagnostic::new(CalcError::UndefinedVariable).with_context("x");
        assert_eq!(diag.to_string(), "undefined variable 'x'");
    }

    #[test]
    fn message_without_context() {
        let diag = CalcDiagnostic::new(CalcError::DivisionByZero);
        assert_eq!(diag.to_string(), "division by zero");
    }

    #[test]
    fn chain_renders_top_down() {
        let inner = CalcDiagnostic::new(CalcError::DivisionByZero);
        let mid = CalcDiagnostic::new(CalcError::RightOperand)
            .with_context("1 / 0")
            .caused_by(inner);
        let outer = CalcDiagnostic::new(CalcError::Assignment)
            .with_context("x = 1 / 0")
            .caused_by(mid);
        assert_eq!(
            outer.to_string(),
            "error with assignment 'x = 1 / 0': error with right operand '1 / 0': division by zero"
        );
    }

    #[test]
    fn root_cause_skips_wrapping() {
        let inner = CalcDiagnostic::new(CalcError::UndefinedVariable).with_context("y");
        let outer = CalcDiagnostic::new(CalcError::LeftOperand)
            .with_context("y")
            .caused_by(inner);
        assert_eq!(outer.root_cause(), CalcError::UndefinedVariable);
        assert_eq!(outer.error, CalcError::LeftOperand);
    }

    #[test]
    fn error_source_exposes_cause() {
        use std::error::Error;
        let outer = CalcDiagnostic::new(CalcError::LeftOperand)
            .caused_by(CalcDiagnostic::new(CalcError::DivisionByZero));
        assert!(outer.source().is_some());
        assert!(CalcDiagnostic::new(CalcError::Syntax).source().is_none());
    }
}
