#![doc = r#"
# fxcalc

The core of a scientific calculator: a restricted expression evaluator plus the
session state (expression buffer, angle mode, memory) a keypad front end folds
key presses into.

## Overview

Expressions go through two stages:

1. [`preprocess::normalize`] rewrites keypad shorthand into canonical text:
   `^` becomes `**`, `π` becomes `pi`, `√` becomes `sqrt`, and postfix
   factorials such as `5!` or `(2+1)!` become `factorial(...)` calls.
2. [`engine::evaluate`] parses the canonical text with a small Pratt parser,
   checks every node against a closed whitelist and reduces the tree to a
   number. Any failure (bad syntax, unknown name, wrong arity, domain error)
   comes back as the single [`Evaluation::Error`] outcome.

Nothing outside the whitelist can be named, so there is no path from an input
string to anything but arithmetic.

## Quick Start

```rust
use fxcalc::{AngleMode, Evaluation, calculate};

let result = calculate("2 + 3 * 4", AngleMode::Degrees);
assert_eq!(result, Evaluation::Value(14.0));

// Keypad shorthand is normalized first
assert_eq!(calculate("3!!", AngleMode::Degrees), Evaluation::Value(720.0));

// Trigonometry follows the angle mode
let sin90 = calculate("sin(90)", AngleMode::Degrees).value().unwrap();
assert!((sin90 - 1.0).abs() < 1e-12);

// Anything outside the whitelist is an error
assert!(calculate("open('f')", AngleMode::Degrees).is_error());
```

## Sessions

```rust
use fxcalc::{Key, Session};

let mut session = Session::new();
for label in ["2", "+", "3", "="] {
    session.press(&Key::from(label));
}
assert_eq!(session.display(), "5");

// The result seeds the next expression
session.press(&Key::from("*2"));
session.press(&Key::Evaluate);
assert_eq!(session.display(), "10");
```

## Supported Grammar

| Precedence | Operators               | Associativity |
|------------|-------------------------|---------------|
| 1          | `+` `-`                 | Left          |
| 2          | `*` `/`                 | Left          |
| 3          | unary `+` `-`           | Right (unary) |
| 4          | `**`                    | Right         |
| 5          | postfix `!`, calls      | Postfix       |

Functions: `sqrt`, `log` (base 10), `ln`, `sin`, `cos`, `tan`, `factorial`,
`abs`, each taking exactly one argument. Constants: `pi`, `e`.

## Feature Flags

- `f32`: Use 32-bit floating point for calculations (64-bit is the default)
- `cli`: Build the `fxcalc` command-line front end
"#]

pub mod display;
pub mod engine;
pub mod error;
pub mod eval;
pub mod functions;
pub mod lexer;
pub mod preprocess;
pub mod session;
pub mod types;

pub use display::format_number;
pub use engine::{calculate, evaluate, interp, parse_expression};
pub use error::{ErrorKind, ExprError};
pub use preprocess::normalize;
pub use session::{Key, Session, SessionConfig};
pub use types::*;

/// Define the floating-point type based on feature flags
#[cfg(feature = "f32")]
pub type Real = f32;

#[cfg(not(feature = "f32"))]
pub type Real = f64;

pub mod constants {
    use super::Real;

    #[cfg(feature = "f32")]
    pub const PI: Real = core::f32::consts::PI;
    #[cfg(feature = "f32")]
    pub const E: Real = core::f32::consts::E;
    #[cfg(feature = "f32")]
    pub const TEST_PRECISION: Real = 1e-5;

    #[cfg(not(feature = "f32"))]
    pub const PI: Real = core::f64::consts::PI;
    #[cfg(not(feature = "f32"))]
    pub const E: Real = core::f64::consts::E;
    #[cfg(not(feature = "f32"))]
    pub const TEST_PRECISION: Real = 1e-10;
}

/// Utility macro to check if two floating point values are approximately equal
/// within a specified epsilon. Supports an optional format message like assert_eq!.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr $(,)?) => {
        $crate::assert_approx_eq!($left, $right, $crate::constants::TEST_PRECISION)
    };
    ($left:expr, $right:expr, $epsilon:expr $(,)?) => {{
        let left_val = $left;
        let right_val = $right;
        let eps = $epsilon;
        assert!(
            (left_val - right_val).abs() < eps,
            "assertion failed: `(left ≈ right)` (left: `{}`, right: `{}`, epsilon: `{}`)",
            left_val,
            right_val,
            eps
        );
    }};
    ($left:expr, $right:expr, $epsilon:expr, $($arg:tt)+) => {{
        let left_val = $left;
        let right_val = $right;
        let eps = $epsilon;
        assert!((left_val - right_val).abs() < eps, $($arg)+);
    }};
}
