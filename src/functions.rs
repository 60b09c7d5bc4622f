//! Built-in operators, functions and constants.
//!
//! This is the complete whitelist the evaluator can reach. Operators are
//! dispatched here through [`crate::types::BinaryOp::function`] and
//! [`crate::types::UnaryOp::function`]; named calls and constants resolve
//! through [`lookup_function`] and [`lookup_constant`]. Nothing else is
//! callable from an expression.
//!
//! Functions report inputs outside their domain as errors instead of
//! returning NaN or infinity, since the calculator has no way to display
//! either.
//!
//! Transcendental functions use the `libm` crate. Depending on the selected
//! floating-point precision (the "f32" feature), the single or double
//! precision versions are used.

#[cfg(feature = "f32")]
use libm::{
    cosf as libm_cos, fabsf as libm_abs, log10f as libm_log10, logf as libm_ln, powf as libm_pow,
    sinf as libm_sin, sqrtf as libm_sqrt, tanf as libm_tan,
};

#[cfg(not(feature = "f32"))]
use libm::{
    cos as libm_cos, fabs as libm_abs, log as libm_ln, log10 as libm_log10, pow as libm_pow,
    sin as libm_sin, sqrt as libm_sqrt, tan as libm_tan,
};

use crate::Real;
use crate::constants::{E, PI};
use crate::error::{ExprError, Result};
use crate::types::AngleMode;

/// Number of arguments every built-in function takes.
pub const FUNCTION_ARITY: usize = 1;

/// Largest integer whose factorial is representable.
#[cfg(not(feature = "f32"))]
const MAX_FACTORIAL: Real = 170.0;
#[cfg(feature = "f32")]
const MAX_FACTORIAL: Real = 34.0;

pub fn add(a: Real, b: Real) -> Result<Real> {
    Ok(a + b)
}

pub fn sub(a: Real, b: Real) -> Result<Real> {
    Ok(a - b)
}

pub fn mul(a: Real, b: Real) -> Result<Real> {
    Ok(a * b)
}

/// Divides the first value by the second.
///
/// A zero divisor is an error rather than an infinity or NaN.
pub fn div(a: Real, b: Real) -> Result<Real> {
    if b == 0.0 {
        return Err(ExprError::DivideByZero);
    }
    Ok(a / b)
}

/// Raises `a` to the power `b`.
///
/// Zero raised to a negative power is a division by zero. A negative base with
/// a fractional exponent has no real result and is a domain error.
pub fn pow(a: Real, b: Real) -> Result<Real> {
    if a == 0.0 && b < 0.0 {
        return Err(ExprError::DivideByZero);
    }
    let result = libm_pow(a, b);
    if result.is_nan() {
        return Err(ExprError::Domain {
            function: "**",
            reason: "result is not a real number",
        });
    }
    if result.is_infinite() {
        return Err(ExprError::Overflow("**"));
    }
    Ok(result)
}

pub fn pos(a: Real) -> Result<Real> {
    Ok(a)
}

pub fn neg(a: Real) -> Result<Real> {
    Ok(-a)
}

pub fn abs(a: Real) -> Result<Real> {
    Ok(libm_abs(a))
}

pub fn sqrt(a: Real) -> Result<Real> {
    if a < 0.0 {
        return Err(ExprError::Domain {
            function: "sqrt",
            reason: "argument must be non-negative",
        });
    }
    Ok(libm_sqrt(a))
}

/// Base 10 logarithm.
pub fn log10(a: Real) -> Result<Real> {
    if a <= 0.0 {
        return Err(ExprError::Domain {
            function: "log",
            reason: "argument must be positive",
        });
    }
    Ok(libm_log10(a))
}

/// Natural logarithm.
pub fn ln(a: Real) -> Result<Real> {
    if a <= 0.0 {
        return Err(ExprError::Domain {
            function: "ln",
            reason: "argument must be positive",
        });
    }
    Ok(libm_ln(a))
}

pub fn sin(a: Real) -> Real {
    libm_sin(a)
}

pub fn cos(a: Real) -> Real {
    libm_cos(a)
}

pub fn tan(a: Real) -> Real {
    libm_tan(a)
}

/// Factorial of a non-negative integer.
///
/// The argument must be integral; `factorial(2.5)` is a domain error, not a
/// gamma function evaluation.
pub fn factorial(a: Real) -> Result<Real> {
    if a < 0.0 {
        return Err(ExprError::Domain {
            function: "factorial",
            reason: "argument must be non-negative",
        });
    }
    if a.fract() != 0.0 {
        return Err(ExprError::Domain {
            function: "factorial",
            reason: "argument must be an integer",
        });
    }
    if a > MAX_FACTORIAL {
        return Err(ExprError::Overflow("factorial"));
    }
    let n = a as u32;
    Ok((2..=n).fold(1.0, |acc, k| acc * k as Real))
}

/// How a built-in function treats its argument.
#[derive(Clone, Copy)]
enum Kind {
    /// Applied to the argument as given.
    Plain(fn(Real) -> Result<Real>),
    /// Takes an angle; the argument is converted from the active angle mode
    /// to radians first.
    Trig(fn(Real) -> Real),
}

/// A whitelisted single-argument function.
#[derive(Clone, Copy)]
pub struct BuiltinFunction {
    /// The name used in expressions.
    pub name: &'static str,
    kind: Kind,
}

impl BuiltinFunction {
    const fn plain(name: &'static str, f: fn(Real) -> Result<Real>) -> Self {
        Self {
            name,
            kind: Kind::Plain(f),
        }
    }

    const fn trig(name: &'static str, f: fn(Real) -> Real) -> Self {
        Self {
            name,
            kind: Kind::Trig(f),
        }
    }

    /// Whether the argument is interpreted according to the angle mode.
    pub fn uses_angle_mode(&self) -> bool {
        matches!(self.kind, Kind::Trig(_))
    }

    /// Applies the function to `arg`.
    pub fn call(&self, arg: Real, mode: AngleMode) -> Result<Real> {
        match self.kind {
            Kind::Plain(f) => f(arg),
            Kind::Trig(f) => Ok(f(mode.to_radians(arg))),
        }
    }
}

impl core::fmt::Debug for BuiltinFunction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BuiltinFunction")
            .field("name", &self.name)
            .field("uses_angle_mode", &self.uses_angle_mode())
            .finish()
    }
}

/// Every function an expression may call.
pub const FUNCTIONS: &[BuiltinFunction] = &[
    BuiltinFunction::plain("sqrt", sqrt),
    BuiltinFunction::plain("log", log10),
    BuiltinFunction::plain("ln", ln),
    BuiltinFunction::trig("sin", sin),
    BuiltinFunction::trig("cos", cos),
    BuiltinFunction::trig("tan", tan),
    BuiltinFunction::plain("factorial", factorial),
    BuiltinFunction::plain("abs", abs),
];

/// Every constant an expression may name.
pub const CONSTANTS: &[(&str, Real)] = &[("pi", PI), ("e", E)];

pub fn lookup_function(name: &str) -> Option<&'static BuiltinFunction> {
    FUNCTIONS.iter().find(|f| f.name == name)
}

pub fn lookup_constant(name: &str) -> Option<Real> {
    CONSTANTS
        .iter()
        .find(|(constant, _)| *constant == name)
        .map(|(_, value)| *value)
}
