//! Three-way parse outcome.
//!
//! Every production either matches, declines without consuming input, or
//! fails fatally after committing:
//!
//! | Variant      | Consumed | Meaning                                   |
//! |--------------|----------|-------------------------------------------|
//! | `Matched`    | yes      | Production recognized, value produced     |
//! | `NotMatched` | no       | Not this production; try the next one     |
//! | `Fatal`      | maybe    | Committed and failed; abort the whole parse |
//!
//! Productions only decline before consuming input, so a caller that sees
//! `NotMatched` can try an alternative from the same position.
//!
//! ## Usage
//!
//! ```ignore
//! fn parse_primary(&mut self) -> ParseOutcome<ExprId> {
//!     one_of!(self,
//!         self.parse_literal(),
//!         self.parse_ident_expr(),
//!         self.parse_paren_expr(),
//!     )
//! }
//! ```

use crate::error::ErrorContext;
use crate::ParseError;

/// A three-way parse result.
#[derive(Debug)]
pub enum ParseOutcome<T> {
    /// The production was recognized.
    Matched { value: T },

    /// Not this production. No input was consumed.
    NotMatched {
        /// Token index where the mismatch occurred.
        position: usize,
    },

    /// Hard error. No alternative is tried and the parse aborts.
    Fatal { error: ParseError },
}

impl<T> ParseOutcome<T> {
    // === Constructors ===

    #[inline]
    pub fn matched(value: T) -> Self {
        Self::Matched { value }
    }

    #[inline]
    pub fn not_matched(position: usize) -> Self {
        Self::NotMatched { position }
    }

    #[cold]
    pub fn fatal(error: ParseError) -> Self {
        Self::Fatal { error }
    }

    // === Transformations ===

    /// Map the matched value, preserving the variant.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ParseOutcome<U> {
        match self {
            Self::Matched { value } => ParseOutcome::Matched { value: f(value) },
            Self::NotMatched { position } => ParseOutcome::NotMatched { position },
            Self::Fatal { error } => ParseOutcome::Fatal { error },
        }
    }

    /// Chain a production that runs only after this one matched.
    pub fn and_then<U, F: FnOnce(T) -> ParseOutcome<U>>(self, f: F) -> ParseOutcome<U> {
        match self {
            Self::Matched { value } => f(value),
            Self::NotMatched { position } => ParseOutcome::NotMatched { position },
            Self::Fatal { error } => ParseOutcome::Fatal { error },
        }
    }

    /// Attach the enclosing production to fatal errors.
    ///
    /// The innermost context wins: an error that already carries one keeps it.
    #[must_use]
    pub fn with_error_context(self, context: ErrorContext) -> Self {
        match self {
            Self::Fatal { mut error } => {
                if error.context.is_none() {
                    error.context = Some(context);
                }
                Self::Fatal { error }
            }
            other => other,
        }
    }
}

// === Backtracking Macros ===

/// Try alternatives in order, restoring the parser after each `NotMatched`.
///
/// The first `Matched` or `Fatal` outcome is returned. If every alternative
/// declines, the result is `NotMatched` at the furthest position reported.
///
/// The parser (`$self`) must provide `snapshot()` and `restore()`, and a
/// `cursor` field with `position()`.
#[macro_export]
macro_rules! one_of {
    ($self:expr, $first:expr $(, $rest:expr)* $(,)?) => {{
        let original = $self.snapshot();
        let last_position: usize = $self.cursor.position();
        match $first {
            outcome @ ($crate::ParseOutcome::Matched { .. } | $crate::ParseOutcome::Fatal { .. }) => {
                outcome
            }
            $crate::ParseOutcome::NotMatched { position } => {
                $self.restore(original);
                $crate::one_of!(@rest $self, original, last_position.max(position) $(, $rest)*)
            }
        }
    }};

    (@rest $self:expr, $original:expr, $last_pos:expr $(,)?) => {{
        $crate::ParseOutcome::NotMatched { position: $last_pos }
    }};

    (@rest $self:expr, $original:expr, $last_pos:expr, $next:expr $(, $rest:expr)* $(,)?) => {{
        match $next {
            outcome @ ($crate::ParseOutcome::Matched { .. } | $crate::ParseOutcome::Fatal { .. }) => {
                outcome
            }
            $crate::ParseOutcome::NotMatched { position } => {
                $self.restore($original);
                $crate::one_of!(@rest $self, $original, $last_pos.max(position) $(, $rest)*)
            }
        }
    }};
}

/// Parse something optional: `Some(value)` when it matched, `None` when it
/// declined. A fatal error returns early from the enclosing function.
#[macro_export]
macro_rules! try_outcome {
    ($self:expr, $parser:expr) => {{
        let snapshot = $self.snapshot();
        match $parser {
            $crate::ParseOutcome::Matched { value } => Some(value),
            $crate::ParseOutcome::Fatal { error } => {
                return $crate::ParseOutcome::Fatal { error };
            }
            $crate::ParseOutcome::NotMatched { .. } => {
                $self.restore(snapshot);
                None
            }
        }
    }};
}

/// Require a production after committing. A decline becomes a fatal error
/// with `$message` at the current token.
#[macro_export]
macro_rules! require {
    ($self:expr, $parser:expr, $message:expr) => {{
        match $parser {
            $crate::ParseOutcome::Matched { value } => value,
            $crate::ParseOutcome::Fatal { error } => {
                return $crate::ParseOutcome::Fatal { error };
            }
            $crate::ParseOutcome::NotMatched { .. } => {
                return $crate::ParseOutcome::Fatal {
                    error: $self.error_here($message),
                };
            }
        }
    }};
}

/// Bridge a `Result<T, ParseError>` into a `ParseOutcome`-returning function.
///
/// `Err` becomes `Fatal`; this is the `?` operator of the committed section
/// of a production.
#[macro_export]
macro_rules! committed {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(error) => {
                return $crate::ParseOutcome::Fatal { error };
            }
        }
    };
}
