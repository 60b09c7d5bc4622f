//! Keypad shorthand normalization.
//!
//! Rewrites what a keypad produces into the canonical text the parser reads,
//! without changing what the expression means:
//!
//! - `^` becomes `**`
//! - `π` becomes `pi`
//! - `√` becomes `sqrt`
//! - a postfix `!` after a number or a closing parenthesis becomes a
//!   `factorial(...)` call around that operand
//!
//! Malformed input is passed through; the evaluator is the one that rejects it.

use lazy_static::lazy_static;
use regex::Regex;

use crate::engine::MAX_EXPRESSION_LENGTH;

lazy_static! {
    /// A numeric literal at the very end of the text.
    static ref TRAILING_NUMBER: Regex = Regex::new(r"(?:\d+\.?\d*|\.\d+)$").unwrap();
}

/// Normalize raw keypad input into canonical expression text.
///
/// Pure and infallible. Applying it twice gives the same result as applying
/// it once. Text longer than the evaluator accepts only gets the character
/// replacements, since it can never evaluate anyway.
pub fn normalize(raw: &str) -> String {
    let expr = raw.replace('^', "**").replace('π', "pi").replace('√', "sqrt");
    if expr.len() > MAX_EXPRESSION_LENGTH {
        return expr;
    }
    rewrite_factorials(&expr)
}

/// Rewrite every postfix `!` that has a recognizable operand, left to right.
///
/// A run of `!` after one operand is wrapped in a single step, so `3!!!`
/// costs the same as `3!`. Operands are looked up in the text already
/// rewritten, so `(2!)!` wraps the inner call as part of the group.
fn rewrite_factorials(expr: &str) -> String {
    let mut out = String::with_capacity(expr.len());
    let mut rest = expr;

    while let Some(bang) = rest.find('!') {
        out.push_str(&rest[..bang]);
        let after = rest[bang..].trim_start_matches('!');
        let run = rest.len() - bang - after.len();

        match factorial_operand_start(&out) {
            Some(start) => {
                let operand = out.split_off(start);
                out.push_str(&"factorial(".repeat(run));
                out.push_str(&operand);
                out.push_str(&")".repeat(run));
            }
            None => out.push_str(&"!".repeat(run)),
        }
        rest = after;
    }

    out.push_str(rest);
    out
}

/// Find where the operand ending at the end of `before` starts.
fn factorial_operand_start(before: &str) -> Option<usize> {
    if before.ends_with(')') {
        let open = matching_open_paren(before)?;
        return Some(function_name_start(&before[..open]));
    }

    let literal = TRAILING_NUMBER.find(before)?;
    // The digits must not be the tail of an identifier or of another literal
    // ("x2!", "1e5!", "1.2.3!")
    match before[..literal.start()].chars().next_back() {
        Some(c) if is_identifier_char(c) || c == '.' => None,
        _ => Some(literal.start()),
    }
}

/// Index of the `(` matching the `)` that ends `before`.
fn matching_open_paren(before: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (index, c) in before.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

/// Start of a function name directly before a `(`, so that `sqrt(9)!`
/// wraps the whole call. Returns `text.len()` when there is none.
fn function_name_start(text: &str) -> usize {
    let mut start = text.len();
    for (index, c) in text.char_indices().rev() {
        if is_identifier_char(c) {
            start = index;
        } else {
            break;
        }
    }
    // Identifiers cannot start with a digit; leave any leading digits outside
    while text[start..].starts_with(|c: char| c.is_ascii_digit()) {
        start += 1;
    }
    start
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_replacements() {
        assert_eq!(normalize("2^3"), "2**3");
        assert_eq!(normalize("2^3^2"), "2**3**2");
        assert_eq!(normalize("π/2"), "pi/2");
        assert_eq!(normalize("2*π"), "2*pi");
        assert_eq!(normalize("√(16)"), "sqrt(16)");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("1+2"), "1+2");
    }

    #[test]
    fn test_number_factorial() {
        assert_eq!(normalize("5!"), "factorial(5)");
        assert_eq!(normalize("12!+1"), "factorial(12)+1");
        assert_eq!(normalize("2*3!"), "2*factorial(3)");
        assert_eq!(normalize("4.0!"), "factorial(4.0)");
        assert_eq!(normalize("3!*4!"), "factorial(3)*factorial(4)");
    }

    #[test]
    fn test_chained_factorial() {
        assert_eq!(normalize("3!!"), "factorial(factorial(3))");
        assert_eq!(normalize("2!!!"), "factorial(factorial(factorial(2)))");
    }

    #[test]
    fn test_parenthesized_factorial() {
        assert_eq!(normalize("(2+1)!"), "factorial((2+1))");
        assert_eq!(normalize("((1+1)*2)!"), "factorial(((1+1)*2))");
        assert_eq!(normalize("(2+1)!!"), "factorial(factorial((2+1)))");
        assert_eq!(normalize("sqrt(9)!"), "factorial(sqrt(9))");
        assert_eq!(normalize("1+abs(-3)!"), "1+factorial(abs(-3))");
        assert_eq!(normalize("sin((2)!)"), "sin(factorial((2)))");
    }

    #[test]
    fn test_unrewritable_factorial_passes_through() {
        assert_eq!(normalize("!5"), "!5");
        assert_eq!(normalize("pi!"), "pi!");
        assert_eq!(normalize("x2!"), "x2!");
        assert_eq!(normalize("1e5!"), "1e5!");
        assert_eq!(normalize("2+1)!"), "2+1)!");
        assert_eq!(normalize("!"), "!");
    }

    #[test]
    fn test_long_factorial_run_is_linear() {
        let raw = format!("3{}", "!".repeat(9_999));
        let start = std::time::Instant::now();
        let out = normalize(&raw);
        assert!(start.elapsed() < std::time::Duration::from_secs(1));
        assert!(out.starts_with("factorial(factorial("));
        assert!(out.ends_with("(3))"));
        assert_eq!(out.len(), 9_999 * "factorial()".len() + 1);
        assert_eq!(normalize(&out), out);
    }

    #[test]
    fn test_overlong_input_only_gets_replacements() {
        let raw = format!("{}1^2+5!", "1+".repeat(MAX_EXPRESSION_LENGTH));
        let out = normalize(&raw);
        assert!(out.ends_with("1**2+5!"));
        assert!(!out.contains("factorial"));
        assert_eq!(normalize(&out), out);
    }

    #[test]
    fn test_idempotent() {
        for input in ["5!", "3!!", "(2+1)!", "2^π", "√(4)!", "pi!", "x!!", "((", "1+2"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input {input:?}");
        }
    }
}
