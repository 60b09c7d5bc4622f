//! Error types and handling for the fxcalc crate.
//!
//! Every failure the parser, validator or evaluator can produce is an
//! [`ExprError`]. Callers that only need the calculator's uniform error outcome
//! use [`crate::engine::evaluate`], which collapses all of them; the detailed
//! variants exist for diagnostics, logging and tests.

use thiserror::Error;

/// Result type used throughout the crate.
///
/// This is a convenience type alias that uses the `ExprError` type for the error variant.
pub type Result<T> = core::result::Result<T, ExprError>;

/// Error type for expression parsing, validation and evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    /// A numeric literal the lexer accepted could not be converted.
    #[error("invalid number literal '{0}'")]
    Parse(String),

    /// Error during lexical analysis: an unknown character or malformed token.
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// Error during syntax analysis: unexpected tokens or incorrect expression structure.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// A parenthesis without its matching pair.
    #[error("unmatched parenthesis at position {position}: found '{found}'")]
    UnmatchedParenthesis { position: usize, found: String },

    /// The expression nests deeper than the parser allows.
    #[error("recursion limit exceeded: {0}")]
    RecursionLimit(String),

    /// The expression text is longer than the parser accepts.
    #[error("expression too long: {length} characters (maximum is {max})")]
    ExpressionTooLong { length: usize, max: usize },

    /// A bare identifier that is not one of the known constants.
    ///
    /// Function names used without a call (`sin + 1`) also end up here.
    #[error("unknown constant: '{name}'")]
    UnknownVariable { name: String },

    /// A call whose target is not one of the known functions.
    #[error("unknown function: '{name}'")]
    UnknownFunction { name: String },

    /// A known function called with the wrong number of arguments.
    #[error("invalid function call to '{name}': expected {expected} arguments, found {found}")]
    InvalidFunctionCall {
        /// Name of the function that was called
        name: String,
        /// Expected number of arguments
        expected: usize,
        /// Actual number of arguments provided
        found: usize,
    },

    /// Division with a zero divisor.
    #[error("division by zero")]
    DivideByZero,

    /// A function applied outside the set of inputs it is defined on.
    #[error("math domain error in '{function}': {reason}")]
    Domain {
        function: &'static str,
        reason: &'static str,
    },

    /// A result or literal that is not a finite number.
    #[error("numeric overflow in '{0}'")]
    Overflow(&'static str),
}

/// Coarse classification of an [`ExprError`].
///
/// The calculator shows the same indicator for all of them; the kind is kept
/// for logging and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed text: bad tokens, unbalanced parentheses, trailing operators.
    Syntax,
    /// An identifier or call target outside the whitelist.
    Name,
    /// A whitelisted function called with the wrong number of arguments.
    Arity,
    /// Mathematically undefined input, division by zero or overflow.
    Domain,
}

impl ExprError {
    /// Returns the taxonomy bucket this error falls into.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExprError::Parse(_)
            | ExprError::Tokenizer(_)
            | ExprError::Syntax(_)
            | ExprError::UnmatchedParenthesis { .. }
            | ExprError::RecursionLimit(_)
            | ExprError::ExpressionTooLong { .. } => ErrorKind::Syntax,
            ExprError::UnknownVariable { .. } | ExprError::UnknownFunction { .. } => {
                ErrorKind::Name
            }
            ExprError::InvalidFunctionCall { .. } => ErrorKind::Arity,
            ExprError::DivideByZero | ExprError::Domain { .. } | ExprError::Overflow(_) => {
                ErrorKind::Domain
            }
        }
    }
}
