#[cfg(test)]
mod unit {
    use fxcalc::engine::{MAX_EXPRESSION_LENGTH, interp, parse_expression};
    use fxcalc::error::ExprError;
    use fxcalc::eval::{eval_ast, validate};
    use fxcalc::functions::{FUNCTIONS, factorial, lookup_constant, lookup_function};
    use fxcalc::lexer::Lexer;
    use fxcalc::types::{AstExpr, BinaryOp, TokenKind};
    use fxcalc::{AngleMode, Real, assert_approx_eq, constants, format_number};

    #[test]
    fn test_lexer_positions_and_values() {
        let mut lexer = Lexer::new("12 + .5**x");
        let tokens: Vec<_> = core::iter::from_fn(|| lexer.next_token()).collect();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Number,
                TokenKind::Operator,
                TokenKind::Number,
                TokenKind::Operator,
                TokenKind::Variable,
            ]
        );
        assert_eq!(tokens[0].value, Some(12.0));
        assert_eq!(tokens[2].value, Some(0.5));
        assert_eq!(tokens[2].position, 5);
        assert_eq!(tokens[3].text.as_deref(), Some("**"));
    }

    #[test]
    fn test_lexer_rejects_foreign_characters() {
        for input in ["'", "\"", "[", ";", ":", "^", "π", "@"] {
            let token = Lexer::new(input).next_token().unwrap();
            assert_eq!(token.kind, TokenKind::Error, "{input:?}");
        }
    }

    #[test]
    fn test_parse_tree_shape() {
        let ast = parse_expression("1-2-3").unwrap();
        // Left associative: (1-2)-3
        match ast {
            AstExpr::Binary {
                op: BinaryOp::Sub,
                left,
                right,
            } => {
                assert!(matches!(*left, AstExpr::Binary { op: BinaryOp::Sub, .. }));
                assert_eq!(*right, AstExpr::Constant(3.0));
            }
            other => panic!("Expected subtraction, got {other:?}"),
        }

        let ast = parse_expression("4!").unwrap();
        assert_eq!(
            ast,
            AstExpr::Function {
                name: "factorial".to_string(),
                args: vec![AstExpr::Constant(4.0)],
            }
        );
    }

    #[test]
    fn test_validate_then_eval() {
        let ast = parse_expression("abs(-2)*pi").unwrap();
        validate(&ast).unwrap();
        assert_approx_eq!(eval_ast(&ast, AngleMode::Degrees).unwrap(), 2.0 * constants::PI);

        let ast = parse_expression("abs(-2)*tau").unwrap();
        assert_eq!(
            validate(&ast).unwrap_err(),
            ExprError::UnknownVariable {
                name: "tau".to_string()
            }
        );
    }

    #[test]
    fn test_builtin_table() {
        let names: Vec<_> = FUNCTIONS.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec!["sqrt", "log", "ln", "sin", "cos", "tan", "factorial", "abs"]
        );
        for name in ["sin", "cos", "tan"] {
            assert!(lookup_function(name).unwrap().uses_angle_mode());
        }
        assert!(!lookup_function("sqrt").unwrap().uses_angle_mode());
        assert!(lookup_function("exp").is_none());
        assert_eq!(lookup_constant("pi"), Some(constants::PI));
        assert_eq!(lookup_constant("PI"), None);
    }

    #[test]
    fn test_factorial_limits() {
        assert_eq!(factorial(0.0).unwrap(), 1.0);
        assert_eq!(factorial(1.0).unwrap(), 1.0);
        assert_eq!(factorial(10.0).unwrap(), 3628800.0);
        assert!(matches!(factorial(1000.0), Err(ExprError::Overflow(_))));
        assert!(matches!(factorial(-1.0), Err(ExprError::Domain { .. })));
    }

    #[test]
    fn test_expression_length_limit() {
        let long = "1+".repeat(MAX_EXPRESSION_LENGTH / 2) + "1";
        assert!(matches!(
            interp(&long, AngleMode::Degrees),
            Err(ExprError::ExpressionTooLong { .. })
        ));
    }

    #[test]
    fn test_formatted_results_read_back() {
        let values: [Real; 9] = [
            14.0,
            -3.0,
            2.5,
            1.0 / 3.0,
            1e-12,
            1e20,
            -0.125,
            -7e-5,
            Real::MAX,
        ];
        for value in values {
            let text = format_number(value);
            assert_eq!(interp(&text, AngleMode::Degrees).unwrap(), value, "{text}");
        }
    }
}
