use tracing::{debug, trace};

use crate::Real;
use crate::error::{ExprError, Result};
use crate::eval::{eval_ast, validate};
use crate::lexer::{Lexer, Token};
use crate::preprocess::normalize;
use crate::types::{AngleMode, AstExpr, BinaryOp, Evaluation, TokenKind, UnaryOp};

/// Maximum accepted expression length in bytes.
pub const MAX_EXPRESSION_LENGTH: usize = 10_000;

/// Maximum nesting depth of the parser, and of trees the evaluator accepts.
pub const MAX_RECURSION_DEPTH: usize = 512;

/// Pratt parser for canonical calculator expressions
struct PrattParser<'a> {
    lexer: Lexer<'a>,
    current: Option<Token>,
    recursion_depth: usize,
    max_recursion_depth: usize,
}

/// Token binding powers for the Pratt parser
#[derive(Debug, Clone, Copy)]
struct BindingPower {
    left: u8,
    right: u8,
}

impl BindingPower {
    const fn new(left: u8, right: u8) -> Self {
        Self { left, right }
    }

    // For left-associative operators, right binding power is left + 1
    const fn left_assoc(power: u8) -> Self {
        Self::new(power, power + 1)
    }

    // For right-associative operators, right binding power is left - 1
    const fn right_assoc(power: u8) -> Self {
        Self::new(power, power - 1)
    }
}

// Unary +/- sit between * and **: -2**2 is -(2**2), 2**-1 is 2**(-1)
const PREFIX_BINDING_POWER: u8 = 5;

impl<'a> PrattParser<'a> {
    fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            recursion_depth: 0,
            max_recursion_depth: MAX_RECURSION_DEPTH,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.current.take();
        self.current = self.lexer.next_token();
        tok
    }

    fn peek_is(&self, kind: TokenKind, text: &str) -> bool {
        self.peek()
            .is_some_and(|tok| tok.kind == kind && tok.text.as_deref() == Some(text))
    }

    // Get binding power for an infix operator
    fn get_binding_power(op: BinaryOp) -> BindingPower {
        match op {
            BinaryOp::Add | BinaryOp::Sub => BindingPower::left_assoc(1),
            BinaryOp::Mul | BinaryOp::Div => BindingPower::left_assoc(3),
            BinaryOp::Pow => BindingPower::right_assoc(8),
        }
    }

    fn describe(tok: &Token) -> String {
        tok.text.clone().unwrap_or_else(|| "unknown".to_string())
    }

    // Apply postfix operations: calls and factorial
    fn parse_postfix(&mut self, lhs: AstExpr) -> Result<AstExpr> {
        let mut result = lhs;

        loop {
            if self.peek_is(TokenKind::Open, "(") {
                result = self.parse_function_call(result)?;
            } else if self.peek_is(TokenKind::Operator, "!") {
                self.next(); // consume '!'
                result = AstExpr::Function {
                    name: "factorial".to_string(),
                    args: vec![result],
                };
            } else {
                break;
            }
        }

        Ok(result)
    }

    // Helper method for parsing parenthesized expressions
    fn parse_parenthesized_expr(&mut self) -> Result<AstExpr> {
        let open_position = self.peek().map(|t| t.position).unwrap_or(0);
        self.next(); // consume '('

        let expr = self.parse_expr(0)?;
        self.expect_closing(open_position)?;
        Ok(expr)
    }

    // Consume the ')' matching an opening parenthesis at `open_position`
    fn expect_closing(&mut self, open_position: usize) -> Result<()> {
        match self.peek() {
            Some(tok) if tok.kind == TokenKind::Close => {
                self.next();
                Ok(())
            }
            Some(tok) => Err(ExprError::Syntax(format!(
                "Expected closing parenthesis ')' but found '{}' at position {} (opening at position {})",
                Self::describe(tok),
                tok.position,
                open_position
            ))),
            None => Err(ExprError::UnmatchedParenthesis {
                position: open_position,
                found: "(".to_string(),
            }),
        }
    }

    // Helper method for parsing function calls
    fn parse_function_call(&mut self, expr: AstExpr) -> Result<AstExpr> {
        let open_position = self.peek().map(|t| t.position).unwrap_or(0);
        let name = match expr {
            AstExpr::Variable(name) => name,
            _ => {
                return Err(ExprError::Syntax(format!(
                    "Call on non-function expression at position {}",
                    open_position
                )));
            }
        };

        self.next(); // consume '('

        // Arguments are collected even though every builtin takes one, so a
        // wrong count is reported as an arity error rather than a syntax error
        let mut args = Vec::new();
        if !self.peek_is(TokenKind::Close, ")") {
            args.push(self.parse_expr(0)?);
            while self.peek_is(TokenKind::Separator, ",") {
                self.next(); // consume ','
                args.push(self.parse_expr(0)?);
            }
        }

        self.expect_closing(open_position)?;
        Ok(AstExpr::Function { name, args })
    }

    // Parse an expression with the given minimum binding power
    fn parse_expr(&mut self, min_bp: u8) -> Result<AstExpr> {
        // Check recursion depth to prevent stack overflow
        self.recursion_depth += 1;
        if self.recursion_depth > self.max_recursion_depth {
            self.recursion_depth -= 1;
            return Err(ExprError::RecursionLimit(format!(
                "Expression too complex: exceeded maximum nesting depth of {}",
                self.max_recursion_depth
            )));
        }

        let result = self.parse_expr_inner(min_bp);
        self.recursion_depth -= 1;
        result
    }

    fn parse_expr_inner(&mut self, min_bp: u8) -> Result<AstExpr> {
        let lhs = self.parse_prefix_or_primary()?;
        let lhs = self.parse_postfix(lhs)?;
        self.parse_infix_operators(lhs, min_bp)
    }

    fn parse_prefix_or_primary(&mut self) -> Result<AstExpr> {
        let prefix = self.peek().and_then(|tok| {
            if tok.kind == TokenKind::Operator {
                tok.text
                    .as_deref()
                    .and_then(UnaryOp::from_symbol)
                    .map(|op| (op, tok.position))
            } else {
                None
            }
        });

        let Some((op, op_position)) = prefix else {
            return self.parse_primary();
        };

        self.next(); // consume the operator
        if self.peek().is_none() {
            return Err(ExprError::Syntax(format!(
                "Expected expression after '{}' at position {}",
                op.symbol(),
                op_position
            )));
        }

        let operand = self.parse_expr(PREFIX_BINDING_POWER)?;
        Ok(AstExpr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_infix_operators(&mut self, mut lhs: AstExpr, min_bp: u8) -> Result<AstExpr> {
        loop {
            let Some(tok) = self.peek() else {
                break;
            };
            if tok.kind != TokenKind::Operator {
                break;
            }
            let Some(op) = tok.text.as_deref().and_then(BinaryOp::from_symbol) else {
                break;
            };
            let op_position = tok.position;

            let bp = Self::get_binding_power(op);
            if bp.left < min_bp {
                break;
            }

            self.next(); // consume the operator
            if self.peek().is_none() {
                return Err(ExprError::Syntax(format!(
                    "Expected expression after '{}' at position {}",
                    op.symbol(),
                    op_position
                )));
            }

            let rhs = self.parse_expr(bp.right)?;
            lhs = AstExpr::Binary {
                op,
                left: Box::new(lhs),
                right: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    // Parse a primary expression (number, identifier, parenthesized expression)
    fn parse_primary(&mut self) -> Result<AstExpr> {
        let tok = match self.peek() {
            Some(tok) => tok,
            None => return Err(ExprError::Syntax("Unexpected end of input".to_string())),
        };

        match tok.kind {
            TokenKind::Number => {
                let text = Self::describe(tok);
                let val = tok.value.ok_or(ExprError::Parse(text))?;
                self.next();
                Ok(AstExpr::Constant(val))
            }
            TokenKind::Variable => {
                let name = match &tok.text {
                    Some(name) => name.clone(),
                    None => return Err(ExprError::Syntax("Identifier is missing".to_string())),
                };
                self.next();
                Ok(AstExpr::Variable(name))
            }
            TokenKind::Open => self.parse_parenthesized_expr(),
            TokenKind::Close => Err(ExprError::Syntax(format!(
                "Unexpected closing parenthesis at position {}",
                tok.position
            ))),
            TokenKind::Error => Err(ExprError::Tokenizer(format!(
                "Unexpected input '{}' at position {}",
                Self::describe(tok),
                tok.position
            ))),
            TokenKind::Operator | TokenKind::Separator => Err(ExprError::Syntax(format!(
                "Unexpected token at position {}: '{}'",
                tok.position,
                Self::describe(tok)
            ))),
        }
    }

    // Check if the expression is too long
    fn check_expression_length(&self) -> Result<()> {
        let length = self.lexer.get_original_input().len();
        if length > MAX_EXPRESSION_LENGTH {
            return Err(ExprError::ExpressionTooLong {
                length,
                max: MAX_EXPRESSION_LENGTH,
            });
        }
        Ok(())
    }

    // Parse a complete expression
    fn parse(&mut self) -> Result<AstExpr> {
        self.check_expression_length()?;
        self.recursion_depth = 0;

        let expr = self.parse_expr(0)?;

        // Check for unexpected trailing tokens
        if let Some(tok) = self.peek() {
            return Err(match tok.kind {
                TokenKind::Close => ExprError::Syntax(format!(
                    "Unexpected closing parenthesis at position {}: check for balanced parentheses",
                    tok.position
                )),
                TokenKind::Error => ExprError::Tokenizer(format!(
                    "Unexpected input '{}' at position {}",
                    Self::describe(tok),
                    tok.position
                )),
                _ => ExprError::Syntax(format!(
                    "Unexpected token at position {}: '{}'",
                    tok.position,
                    Self::describe(tok)
                )),
            });
        }

        trace!(?expr, "parsed expression");
        Ok(expr)
    }
}

/// Parse an expression string into an AST using the Pratt parser.
///
/// The tree is not validated: identifiers outside the whitelist parse fine
/// and are rejected later by [`validate`].
pub fn parse_expression(input: &str) -> Result<AstExpr> {
    PrattParser::new(input).parse()
}

/// Parse, validate and evaluate canonical text, reporting why it failed.
///
/// This is the diagnostic form of [`evaluate`].
pub fn interp(expression: &str, mode: AngleMode) -> Result<Real> {
    let ast = parse_expression(expression)?;
    validate(&ast)?;
    eval_ast(&ast, mode)
}

/// Evaluate canonical text, collapsing every failure into [`Evaluation::Error`].
pub fn evaluate(expression: &str, mode: AngleMode) -> Evaluation {
    match interp(expression, mode) {
        Ok(value) => Evaluation::Value(value),
        Err(err) => {
            debug!(expression, kind = ?err.kind(), error = %err, "evaluation failed");
            Evaluation::Error
        }
    }
}

/// Normalize keypad shorthand and evaluate the result.
pub fn calculate(raw: &str, mode: AngleMode) -> Evaluation {
    evaluate(&normalize(raw), mode)
}
