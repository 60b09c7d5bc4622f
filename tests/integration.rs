//! Integration tests for the fxcalc library
//! These walk the public surface the way a keypad front end uses it

use fxcalc::{
    AngleMode, ErrorKind, Evaluation, Key, Real, Session, SessionConfig, assert_approx_eq,
    calculate, evaluate, interp, normalize,
};

fn value(expr: &str, mode: AngleMode) -> Real {
    match evaluate(expr, mode) {
        Evaluation::Value(v) => v,
        Evaluation::Error => panic!("{expr:?} should evaluate"),
    }
}

fn run(labels: &[&str]) -> Session {
    labels
        .iter()
        .map(|label| Key::from(*label))
        .fold(Session::new(), |session, key| session.apply(&key))
}

/// Level 1: plain arithmetic through `evaluate`
#[test]
fn test_basic_arithmetic() {
    assert_eq!(evaluate("2+3*4", AngleMode::Degrees), Evaluation::Value(14.0));
    assert_eq!(value("(2+3)*4", AngleMode::Degrees), 20.0);
    assert_eq!(value("10/4", AngleMode::Degrees), 2.5);
    assert_eq!(value("2**10", AngleMode::Degrees), 1024.0);
    assert_eq!(value("2**3**2", AngleMode::Degrees), 512.0);
    assert_eq!(value("-2**2", AngleMode::Degrees), -4.0);
    assert_eq!(value(" 7 - 10 ", AngleMode::Radians), -3.0);
    assert_approx_eq!(value("0.1+0.2", AngleMode::Degrees), 0.3);
}

/// Level 2: keypad shorthand through `normalize`
#[test]
fn test_shorthand_normalization() {
    assert_eq!(normalize("2^3"), "2**3");
    assert_eq!(value(&normalize("2^3"), AngleMode::Degrees), 8.0);
    assert_eq!(value(&normalize("5!"), AngleMode::Degrees), 120.0);
    assert_eq!(value(&normalize("3!!"), AngleMode::Degrees), 720.0);
    assert_approx_eq!(value(&normalize("2*π"), AngleMode::Degrees), 2.0 * fxcalc::constants::PI);
    assert_eq!(calculate("√(16)+(1+2)!", AngleMode::Degrees), Evaluation::Value(10.0));
}

/// Level 3: angle modes only affect trigonometric functions
#[test]
fn test_angle_modes() {
    assert_approx_eq!(value("sin(90)", AngleMode::Degrees), 1.0);
    assert_approx_eq!(value("sin(pi/2)", AngleMode::Radians), 1.0);
    assert_approx_eq!(value("cos(180)", AngleMode::Degrees), -1.0);
    assert_approx_eq!(value("tan(45)", AngleMode::Degrees), 1.0);

    let deg = value("sin(90)", AngleMode::Degrees);
    let rad = value("sin(90)", AngleMode::Radians);
    assert!((deg - rad).abs() > 0.1);

    for expr in ["sqrt(2)", "log(50)", "ln(3)", "abs(-4)", "factorial(6)", "e"] {
        assert_eq!(
            value(expr, AngleMode::Degrees),
            value(expr, AngleMode::Radians),
            "{expr} should not depend on the angle mode"
        );
    }
}

/// Domain violations collapse to the error outcome
#[test]
fn test_domain_errors() {
    for expr in ["sqrt(-1)", "log(0)", "ln(-2)", "1/0", "factorial(-3)", "factorial(2.5)"] {
        assert_eq!(evaluate(expr, AngleMode::Degrees), Evaluation::Error, "{expr}");
    }
    assert_eq!(interp("log(0)", AngleMode::Degrees).unwrap_err().kind(), ErrorKind::Domain);
}

/// Anything outside the whitelist is refused without running
#[test]
fn test_whitelist_refuses_everything_else() {
    let hostile = [
        "__import__('os')",
        "open('f')",
        "exec(1)",
        "os.system(1)",
        "x",
        "pi(2)",
        "sqrt",
        "[1]",
        "1;2",
        "\"s\"",
        "lambda: 1",
        "sqrt.__class__",
    ];
    for expr in hostile {
        assert_eq!(evaluate(expr, AngleMode::Degrees), Evaluation::Error, "{expr}");
        assert_eq!(calculate(expr, AngleMode::Radians), Evaluation::Error, "{expr}");
    }

    assert_eq!(interp("open(1)", AngleMode::Degrees).unwrap_err().kind(), ErrorKind::Name);
    assert_eq!(interp("sin(1, 2)", AngleMode::Degrees).unwrap_err().kind(), ErrorKind::Arity);
    assert_eq!(interp("2 +", AngleMode::Degrees).unwrap_err().kind(), ErrorKind::Syntax);
}

/// Evaluation is a pure function of its inputs
#[test]
fn test_evaluate_is_deterministic() {
    for expr in ["sin(30)+cos(60)", "1/0", "factorial(10)/factorial(8)"] {
        assert_eq!(evaluate(expr, AngleMode::Degrees), evaluate(expr, AngleMode::Degrees));
    }
}

#[test]
fn test_session_calculation() {
    let session = run(&["1", "2", "+", "3", "0", "="]);
    assert_eq!(session.display(), "42");

    let session = run(&["√(", "8", "1", ")", "+", "2", "^", "3", "="]);
    assert_eq!(session.display(), "17");
}

#[test]
fn test_session_memory_round_trip() {
    let session = run(&["1", "0", "M+", "C", "MR"]);
    assert_eq!(session.buffer(), "10");
    assert_eq!(session.memory(), 10.0);

    let session = session.apply(&Key::MemoryClear);
    assert_eq!(session.memory(), 0.0);
    assert_eq!(session.buffer(), "10");
}

#[test]
fn test_session_error_recovery() {
    let session = run(&["open(", "1", ")", "="]);
    assert!(session.is_error());
    assert_eq!(session.display(), "Error");
    assert_eq!(session.memory(), 0.0);

    let session = session.apply(&Key::from("3")).apply(&Key::Evaluate);
    assert_eq!(session.display(), "3");
}

#[test]
fn test_session_mode_from_config() {
    let config = SessionConfig {
        angle_mode: AngleMode::Radians,
    };
    let mut session = Session::with_config(&config);
    for label in ["cos(", "π", ")", "="] {
        session.press(&Key::from(label));
    }
    assert_eq!(session.display(), "-1");

    session.press(&Key::ToggleMode);
    assert_eq!(session.mode(), AngleMode::Degrees);
    assert_eq!(session.mode().label(), "DEG");
}
