//! Parse error types.
//!
//! A parse stops at the first hard error. The error carries the plain
//! message, the offending token's location, and the innermost production
//! that was being parsed for "while parsing X" rendering.

use std::fmt;

use wgx_diagnostic::Diagnosis;
use wgx_ir::{Span, Token};

/// Context describing what was being parsed when an error occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorContext {
    // === Top-level ===
    GlobalDeclaration,
    GlobalVariable,
    GlobalConstant,
    TypeAlias,
    StructDeclaration,
    FunctionDeclaration,

    // === Statements ===
    Statement,
    IfStatement,
    SwitchStatement,
    LoopStatement,
    ContinuingBlock,
    ForStatement,
    WhileStatement,
}

impl ErrorContext {
    /// Returns a phrase suitable for "while parsing {description}".
    pub fn description(self) -> &'static str {
        match self {
            Self::GlobalDeclaration => "a global declaration",
            Self::GlobalVariable => "a global variable declaration",
            Self::GlobalConstant => "a global constant declaration",
            Self::TypeAlias => "a type alias",
            Self::StructDeclaration => "a struct declaration",
            Self::FunctionDeclaration => "a function declaration",
            Self::Statement => "a statement",
            Self::IfStatement => "an if statement",
            Self::SwitchStatement => "a switch statement",
            Self::LoopStatement => "a loop statement",
            Self::ContinuingBlock => "a continuing block",
            Self::ForStatement => "a for statement",
            Self::WhileStatement => "a while statement",
        }
    }
}

/// A hard parse error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    pub line: u32,
    pub column: u32,
    pub context: Option<ErrorContext>,
}

impl ParseError {
    /// Create an error located at `token`.
    #[cold]
    pub fn at(message: impl Into<String>, token: &Token) -> Self {
        ParseError {
            message: message.into(),
            span: token.span,
            line: token.line,
            column: token.column,
            context: None,
        }
    }

    /// The public diagnosis: plain message plus location.
    pub fn to_diagnosis(&self) -> Diagnosis {
        Diagnosis::new(self.message.clone(), self.line, self.column)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)?;
        if let Some(context) = self.context {
            write!(f, " (while parsing {})", context.description())?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<ParseError> for Diagnosis {
    fn from(error: ParseError) -> Self {
        Diagnosis::new(error.message, error.line, error.column)
    }
}
