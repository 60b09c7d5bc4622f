//! Type definitions for the expression parser and evaluator.
//!
//! This module contains the core data structures shared by the lexer, parser,
//! evaluator and session: the Abstract Syntax Tree (AST), token kinds, the
//! operator tables, the angle mode and the uniform evaluation outcome.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Real;
use crate::display::format_number;
use crate::error::Result;
use crate::functions;

/// Text shown in place of a number when an evaluation fails.
pub const ERROR_TEXT: &str = "Error";

/// Abstract Syntax Tree (AST) node representing an expression.
///
/// The parser builds this tree from canonical text. Identifiers and call
/// targets are stored verbatim; whether they are allowed is decided by
/// [`crate::eval::validate`] before anything is evaluated.
#[derive(Clone, Debug, PartialEq)]
pub enum AstExpr {
    /// A literal numerical value.
    ///
    /// Examples: `3.14`, `42`, `2e3`
    Constant(Real),

    /// A bare identifier, which must name a constant.
    ///
    /// Examples: `pi`, `e`
    Variable(String),

    /// A function call with a name and list of argument expressions.
    ///
    /// Postfix factorial (`5!`) is parsed into a `factorial` call as well.
    ///
    /// Examples: `sin(x)`, `sqrt(3*3 + 4*4)`
    Function {
        /// The name of the function being called
        name: String,
        /// The arguments passed to the function
        args: Vec<AstExpr>,
    },

    /// A prefix `+` or `-` applied to one operand.
    Unary {
        op: UnaryOp,
        operand: Box<AstExpr>,
    },

    /// An infix arithmetic operation.
    Binary {
        op: BinaryOp,
        left: Box<AstExpr>,
        right: Box<AstExpr>,
    },
}

/// Infix operators accepted by the grammar.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    /// Exponentiation, written `**` in canonical text.
    Pow,
}

impl BinaryOp {
    /// Maps an operator token to its operator, if it is an infix one.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(BinaryOp::Add),
            "-" => Some(BinaryOp::Sub),
            "*" => Some(BinaryOp::Mul),
            "/" => Some(BinaryOp::Div),
            "**" => Some(BinaryOp::Pow),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "**",
        }
    }

    /// The function that implements this operator.
    pub fn function(self) -> fn(Real, Real) -> Result<Real> {
        match self {
            BinaryOp::Add => functions::add,
            BinaryOp::Sub => functions::sub,
            BinaryOp::Mul => functions::mul,
            BinaryOp::Div => functions::div,
            BinaryOp::Pow => functions::pow,
        }
    }
}

/// Prefix operators accepted by the grammar.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum UnaryOp {
    Plus,
    Minus,
}

impl UnaryOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(UnaryOp::Plus),
            "-" => Some(UnaryOp::Minus),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
        }
    }

    /// The function that implements this operator.
    pub fn function(self) -> fn(Real) -> Result<Real> {
        match self {
            UnaryOp::Plus => functions::pos,
            UnaryOp::Minus => functions::neg,
        }
    }
}

/// Classifies the kind of token produced during lexical analysis.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TokenKind {
    /// A numerical literal.
    Number,

    /// An identifier: a constant or function name.
    Variable,

    /// An operator such as `+`, `**` or the postfix `!`.
    Operator,

    /// An opening parenthesis.
    Open,

    /// A closing parenthesis.
    Close,

    /// An argument separator (comma).
    Separator,

    /// An error token representing invalid input.
    Error,
}

/// How trigonometric functions interpret their argument.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleMode {
    #[default]
    Degrees,
    Radians,
}

impl AngleMode {
    /// Returns the other mode.
    pub fn toggled(self) -> Self {
        match self {
            AngleMode::Degrees => AngleMode::Radians,
            AngleMode::Radians => AngleMode::Degrees,
        }
    }

    /// Short keypad label.
    pub fn label(self) -> &'static str {
        match self {
            AngleMode::Degrees => "DEG",
            AngleMode::Radians => "RAD",
        }
    }

    /// Converts an angle in this mode to radians.
    pub fn to_radians(self, angle: Real) -> Real {
        match self {
            AngleMode::Degrees => angle * (crate::constants::PI / 180.0),
            AngleMode::Radians => angle,
        }
    }
}

impl fmt::Display for AngleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AngleMode {
    type Err = String;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deg" | "degree" | "degrees" => Ok(AngleMode::Degrees),
            "rad" | "radian" | "radians" => Ok(AngleMode::Radians),
            other => Err(format!("unknown angle mode '{other}' (expected degrees or radians)")),
        }
    }
}

/// Outcome of evaluating an expression.
///
/// All failures collapse into [`Evaluation::Error`]; there is no partially
/// valid result.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Evaluation {
    /// A finite numeric result.
    Value(Real),
    /// Any syntax, name, arity or domain failure.
    Error,
}

impl Evaluation {
    /// Returns the numeric result, if there is one.
    pub fn value(self) -> Option<Real> {
        match self {
            Evaluation::Value(v) => Some(v),
            Evaluation::Error => None,
        }
    }

    pub fn is_error(self) -> bool {
        matches!(self, Evaluation::Error)
    }
}

impl From<Result<Real>> for Evaluation {
    fn from(result: Result<Real>) -> Self {
        match result {
            Ok(v) if v.is_finite() => Evaluation::Value(v),
            _ => Evaluation::Error,
        }
    }
}

/// Renders the value the way the calculator displays it, or [`ERROR_TEXT`].
impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluation::Value(v) => f.write_str(&format_number(*v)),
            Evaluation::Error => f.write_str(ERROR_TEXT),
        }
    }
}
