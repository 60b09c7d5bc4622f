//! Number formatting for the calculator display.
//!
//! The text produced here is fed back into the expression buffer (chained
//! results, memory recall), so it must always be something the lexer reads as
//! exactly the same number.

use crate::Real;

/// Integral values at or above this magnitude are not printed as integers.
const INTEGER_LIMIT: Real = 1e15;

/// Non-zero magnitudes below this are printed in exponent form.
const SMALL_LIMIT: Real = 1e-4;

/// Format a number for display and for re-entry into the buffer.
///
/// - integral values below 1e15 print without a fractional part: `14`, `-3`
/// - values at or above 1e15, or below 1e-4, print in exponent form: `1e20`
/// - everything else prints as the shortest decimal that reads back exactly
pub fn format_number(value: Real) -> String {
    let magnitude = value.abs();
    if value.fract() == 0.0 && magnitude < INTEGER_LIMIT {
        // -0.0 goes through the integer cast and prints as "0"
        return format!("{}", value as i64);
    }

    if magnitude >= INTEGER_LIMIT || (value != 0.0 && magnitude < SMALL_LIMIT) {
        return format!("{:e}", value);
    }

    format!("{}", value)
}
