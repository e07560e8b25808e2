//! A small ML-flavoured reference evaluator.
//!
//! Statements are integer `val` bindings in an SML-ish surface syntax:
//!
//! ```text
//! val x = 1
//! val y = x + 1
//! (1; 2) * 3          -- bare expressions bind `it`
//! ```
//!
//! Expressions support `+ - * div mod`, unary `~`, parenthesised sequences
//! (`(e1; e2)` evaluates to the last element), integer literals, and
//! variable references. Division or modulo by zero raises `Div`/`Mod`;
//! arithmetic overflow raises `Overflow`. Both are runtime exceptions:
//! bindings made before the raise stay visible.
//!
//! The evaluator receives fragments *without* their closing separator. A
//! fragment that ends inside an open parenthesis, or right after an
//! operator, is [`Outcome::Incomplete`]: the separator was consumed
//! mid-statement and the statement can still grow. A missing expression
//! anywhere else (an empty fragment, or nothing after the `=` of a binding)
//! is a static error: the separator really did close a malformed statement.

use crate::{Evaluate, Outcome};
use rustc_hash::FxHashMap;

/// Accumulated bindings. Cloned freely by the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MlState {
    env: FxHashMap<String, i64>,
}

impl MlState {
    /// Look up a binding.
    pub fn get(&self, name: &str) -> Option<i64> {
        self.env.get(name).copied()
    }

    /// Number of live bindings.
    pub fn len(&self) -> usize {
        self.env.len()
    }

    /// Check whether no bindings exist.
    pub fn is_empty(&self) -> bool {
        self.env.is_empty()
    }
}

/// The reference evaluator. Stateless between calls; all statement state
/// lives in [`MlState`] and is threaded by the engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct MlEvaluator;

impl MlEvaluator {
    /// Create a new evaluator.
    pub fn new() -> Self {
        MlEvaluator
    }
}

impl Evaluate for MlEvaluator {
    type State = MlState;

    fn evaluate(&mut self, fragment: &str, prior: Option<&MlState>) -> Outcome<MlState> {
        let tokens = match tokenize(fragment) {
            Ok(tokens) => tokens,
            Err((message, offset)) => {
                return Outcome::Error {
                    message,
                    offset: Some(offset),
                }
            }
        };

        let base = prior.cloned().unwrap_or_default();

        let (name, expr) = match Parser::new(&tokens, fragment.len()).statement() {
            Ok(stmt) => stmt,
            Err(ParseFailure::Incomplete) => return Outcome::Incomplete,
            Err(ParseFailure::Syntax { message, offset }) => {
                return Outcome::Error {
                    message,
                    offset: Some(offset),
                }
            }
        };

        match eval_expr(&expr, &base) {
            Ok(value) => {
                let mut state = base;
                state.env.insert(name.clone(), value);
                let rendering = format!("val {name} = {};\n", fmt_int(value));
                Outcome::Success { state, rendering }
            }
            Err(EvalFailure::Unbound { name, offset }) => Outcome::Error {
                message: format!("unbound variable {name}"),
                offset: Some(offset),
            },
            Err(EvalFailure::Raise(exception)) => Outcome::Exception {
                state: base,
                rendering: format!("Uncaught exception: {exception}\n"),
            },
        }
    }
}

/// SML prints negative integers with `~`.
fn fmt_int(value: i64) -> String {
    if value < 0 {
        format!("~{}", value.unsigned_abs())
    } else {
        value.to_string()
    }
}

// -- Tokens --

#[derive(Clone, Debug, PartialEq, Eq)]
enum TokenKind {
    Val,
    Ident(String),
    Int(i64),
    Plus,
    Minus,
    Star,
    Div,
    Mod,
    Neg,
    Eq,
    Semi,
    LParen,
    RParen,
}

#[derive(Clone, Debug)]
struct Token {
    kind: TokenKind,
    offset: usize,
}

fn tokenize(src: &str) -> Result<Vec<Token>, (String, usize)> {
    let mut tokens = Vec::new();
    let bytes = src.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b' ' | b'\t' | b'\r' | b'\n' => i += 1,
            b'+' | b'-' | b'*' | b'~' | b'=' | b';' | b'(' | b')' => {
                let kind = match b {
                    b'+' => TokenKind::Plus,
                    b'-' => TokenKind::Minus,
                    b'*' => TokenKind::Star,
                    b'~' => TokenKind::Neg,
                    b'=' => TokenKind::Eq,
                    b';' => TokenKind::Semi,
                    b'(' => TokenKind::LParen,
                    _ => TokenKind::RParen,
                };
                tokens.push(Token { kind, offset: i });
                i += 1;
            }
            b'0'..=b'9' => {
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                let text = &src[start..i];
                let value: i64 = text
                    .parse()
                    .map_err(|_| ("integer constant too large".to_string(), start))?;
                tokens.push(Token {
                    kind: TokenKind::Int(value),
                    offset: start,
                });
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                let start = i;
                while i < bytes.len()
                    && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'\'')
                {
                    i += 1;
                }
                let kind = match &src[start..i] {
                    "val" => TokenKind::Val,
                    "div" => TokenKind::Div,
                    "mod" => TokenKind::Mod,
                    name => TokenKind::Ident(name.to_string()),
                };
                tokens.push(Token { kind, offset: start });
            }
            _ => {
                let ch = src[i..].chars().next().unwrap_or('?');
                return Err((format!("unexpected character `{ch}`"), i));
            }
        }
    }

    Ok(tokens)
}

// -- Parsing --

#[derive(Clone, Debug, PartialEq, Eq)]
enum Expr {
    Int(i64),
    Var { name: String, offset: usize },
    Neg(Box<Expr>),
    Bin(BinOp, Box<Expr>, Box<Expr>),
    Seq(Vec<Expr>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

enum ParseFailure {
    /// End of fragment inside an open parenthesis or right after an
    /// operator: the statement can still grow past the separator that
    /// triggered this call.
    Incomplete,
    Syntax { message: String, offset: usize },
}

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    /// Open parenthesis depth; end-of-input inside parens is incomplete,
    /// end-of-input at depth zero is a syntax error.
    depth: u32,
    /// Fragment length, used as the offset of end-of-input errors.
    end: usize,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token], end: usize) -> Self {
        Parser {
            tokens,
            pos: 0,
            depth: 0,
            end,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// End-of-input directly after an operator leaves the statement able to
    /// grow, so the failure downgrades to incomplete. Only the end-of-input
    /// branch of [`Parser::fail_expected`] produces `offset == end`.
    fn incomplete_at_eof(&self, failure: ParseFailure) -> ParseFailure {
        match failure {
            ParseFailure::Syntax { offset, .. } if offset == self.end => {
                ParseFailure::Incomplete
            }
            other => other,
        }
    }

    fn fail_expected(&self, what: &str) -> ParseFailure {
        match self.peek() {
            Some(token) => ParseFailure::Syntax {
                message: format!("expected {what}"),
                offset: token.offset,
            },
            None if self.depth > 0 => ParseFailure::Incomplete,
            None => ParseFailure::Syntax {
                message: format!("expected {what}"),
                offset: self.end,
            },
        }
    }

    /// statement := `val` ident `=` expr | expr
    ///
    /// Bare expressions bind `it`, as in the SML REPL.
    fn statement(mut self) -> Result<(String, Expr), ParseFailure> {
        if self.tokens.is_empty() {
            return Err(ParseFailure::Syntax {
                message: "expected a declaration".to_string(),
                offset: 0,
            });
        }

        let (name, expr) = if matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Val)) {
            self.pos += 1;
            let name = match self.peek() {
                Some(Token {
                    kind: TokenKind::Ident(name),
                    ..
                }) => name.clone(),
                _ => return Err(self.fail_expected("a binding name")),
            };
            self.pos += 1;
            if !matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Eq)) {
                return Err(self.fail_expected("`=`"));
            }
            self.pos += 1;
            (name, self.expr()?)
        } else {
            ("it".to_string(), self.expr()?)
        };

        if let Some(token) = self.peek() {
            return Err(ParseFailure::Syntax {
                message: "expected end of declaration".to_string(),
                offset: token.offset,
            });
        }

        Ok((name, expr))
    }

    /// expr := term ((`+` | `-`) term)*
    fn expr(&mut self) -> Result<Expr, ParseFailure> {
        let mut lhs = self.term()?;
        while let Some(op) = match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Plus) => Some(BinOp::Add),
            Some(TokenKind::Minus) => Some(BinOp::Sub),
            _ => None,
        } {
            self.pos += 1;
            let rhs = self
                .term()
                .map_err(|failure| self.incomplete_at_eof(failure))?;
            lhs = Expr::Bin(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    /// term := atom ((`*` | `div` | `mod`) atom)*
    fn term(&mut self) -> Result<Expr, ParseFailure> {
        let mut lhs = self.atom()?;
        while let Some(op) = match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Star) => Some(BinOp::Mul),
            Some(TokenKind::Div) => Some(BinOp::Div),
            Some(TokenKind::Mod) => Some(BinOp::Mod),
            _ => None,
        } {
            self.pos += 1;
            let rhs = self
                .atom()
                .map_err(|failure| self.incomplete_at_eof(failure))?;
            lhs = Expr::Bin(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    /// atom := int | ident | `~` atom | `(` expr (`;` expr)* `)`
    fn atom(&mut self) -> Result<Expr, ParseFailure> {
        let Some(token) = self.peek() else {
            return Err(self.fail_expected("an expression"));
        };
        let offset = token.offset;
        match token.kind.clone() {
            TokenKind::Int(value) => {
                self.pos += 1;
                Ok(Expr::Int(value))
            }
            TokenKind::Ident(name) => {
                self.pos += 1;
                Ok(Expr::Var { name, offset })
            }
            TokenKind::Neg => {
                self.pos += 1;
                let inner = self
                    .atom()
                    .map_err(|failure| self.incomplete_at_eof(failure))?;
                Ok(Expr::Neg(Box::new(inner)))
            }
            TokenKind::LParen => {
                self.pos += 1;
                self.depth += 1;
                let mut items = vec![self.expr()?];
                loop {
                    match self.peek().map(|t| &t.kind) {
                        Some(TokenKind::Semi) => {
                            self.pos += 1;
                            items.push(self.expr()?);
                        }
                        Some(TokenKind::RParen) => {
                            self.pos += 1;
                            self.depth -= 1;
                            break;
                        }
                        _ => return Err(self.fail_expected("`;` or `)`")),
                    }
                }
                if items.len() == 1 {
                    Ok(items.remove(0))
                } else {
                    Ok(Expr::Seq(items))
                }
            }
            _ => Err(self.fail_expected("an expression")),
        }
    }
}

// -- Evaluation --

enum EvalFailure {
    /// Elaboration failure: the variable does not exist. Static.
    Unbound { name: String, offset: usize },
    /// A raised SML exception. Runtime; prior bindings survive.
    Raise(&'static str),
}

fn eval_expr(expr: &Expr, state: &MlState) -> Result<i64, EvalFailure> {
    match expr {
        Expr::Int(value) => Ok(*value),
        Expr::Var { name, offset } => state.get(name).ok_or_else(|| EvalFailure::Unbound {
            name: name.clone(),
            offset: *offset,
        }),
        Expr::Neg(inner) => eval_expr(inner, state)?
            .checked_neg()
            .ok_or(EvalFailure::Raise("Overflow")),
        Expr::Bin(op, lhs, rhs) => {
            let lhs = eval_expr(lhs, state)?;
            let rhs = eval_expr(rhs, state)?;
            match op {
                BinOp::Add => lhs.checked_add(rhs).ok_or(EvalFailure::Raise("Overflow")),
                BinOp::Sub => lhs.checked_sub(rhs).ok_or(EvalFailure::Raise("Overflow")),
                BinOp::Mul => lhs.checked_mul(rhs).ok_or(EvalFailure::Raise("Overflow")),
                BinOp::Div => {
                    if rhs == 0 {
                        Err(EvalFailure::Raise("Div"))
                    } else {
                        lhs.checked_div(rhs).ok_or(EvalFailure::Raise("Overflow"))
                    }
                }
                BinOp::Mod => {
                    if rhs == 0 {
                        Err(EvalFailure::Raise("Mod"))
                    } else {
                        lhs.checked_rem(rhs).ok_or(EvalFailure::Raise("Overflow"))
                    }
                }
            }
        }
        Expr::Seq(items) => {
            let mut last = 0;
            for item in items {
                last = eval_expr(item, state)?;
            }
            Ok(last)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn eval(fragment: &str, prior: Option<&MlState>) -> Outcome<MlState> {
        MlEvaluator::new().evaluate(fragment, prior)
    }

    fn expect_success(fragment: &str, prior: Option<&MlState>) -> (MlState, String) {
        match eval(fragment, prior) {
            Outcome::Success { state, rendering } => (state, rendering),
            other => panic!("expected success for {fragment:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_simple_binding() {
        let (state, rendering) = expect_success("val x = 1", None);
        assert_eq!(state.get("x"), Some(1));
        assert_eq!(rendering, "val x = 1;\n");
    }

    #[test]
    fn test_binding_uses_prior_state() {
        let (state, _) = expect_success("val x = 1", None);
        let (state, rendering) = expect_success("val y = x + 1", Some(&state));
        assert_eq!(state.get("y"), Some(2));
        assert_eq!(rendering, "val y = 2;\n");
    }

    #[test]
    fn test_bare_expression_binds_it() {
        let (state, rendering) = expect_success("2 * 3 + 4", None);
        assert_eq!(state.get("it"), Some(10));
        assert_eq!(rendering, "val it = 10;\n");
    }

    #[test]
    fn test_negative_rendering_uses_tilde() {
        let (_, rendering) = expect_success("val n = ~5", None);
        assert_eq!(rendering, "val n = ~5;\n");
    }

    #[test]
    fn test_precedence_and_sequence() {
        let (state, _) = expect_success("val x = (1; 2) * 3", None);
        assert_eq!(state.get("x"), Some(6));
    }

    #[test]
    fn test_open_paren_is_incomplete() {
        assert_eq!(eval("val x = (1", None), Outcome::Incomplete);
        assert_eq!(eval("val x = (1; 2", None), Outcome::Incomplete);
    }

    #[test]
    fn test_trailing_operator_is_incomplete() {
        assert_eq!(eval("val x = 1 +", None), Outcome::Incomplete);
        assert_eq!(eval("2 *", None), Outcome::Incomplete);
        assert_eq!(eval("val x = ~", None), Outcome::Incomplete);
    }

    #[test]
    fn test_operator_before_bad_token_stays_an_error() {
        // Only end-of-input after an operator is incomplete; an operator
        // followed by a non-expression token is malformed.
        match eval("val x = 1 + val", None) {
            Outcome::Error { message, offset } => {
                assert!(message.contains("expected an expression"), "{message}");
                assert_eq!(offset, Some(12));
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_expression_is_static_error() {
        // The statement was closed by a real separator, so a missing
        // expression is a syntax error, not an incomplete statement.
        match eval("val x = ", None) {
            Outcome::Error { message, offset } => {
                assert!(message.contains("expected an expression"), "{message}");
                assert_eq!(offset, Some(8));
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn test_unbound_variable_offset() {
        match eval("val x = 1 + nope", None) {
            Outcome::Error { message, offset } => {
                assert_eq!(message, "unbound variable nope");
                assert_eq!(offset, Some(12));
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_fragment_is_static_error() {
        match eval("   ", None) {
            Outcome::Error { offset, .. } => assert_eq!(offset, Some(0)),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn test_division_by_zero_preserves_prior_state() {
        let (state, _) = expect_success("val x = 1", None);
        match eval("val y = x div 0", Some(&state)) {
            Outcome::Exception { state, rendering } => {
                assert_eq!(rendering, "Uncaught exception: Div\n");
                assert_eq!(state.get("x"), Some(1));
                assert_eq!(state.get("y"), None);
            }
            other => panic!("expected exception, got {other:?}"),
        }
    }

    #[test]
    fn test_mod_by_zero_raises_mod() {
        match eval("3 mod 0", None) {
            Outcome::Exception { rendering, .. } => {
                assert_eq!(rendering, "Uncaught exception: Mod\n");
            }
            other => panic!("expected exception, got {other:?}"),
        }
    }

    #[test]
    fn test_overflow_raises() {
        let (state, _) = expect_success("val big = 9223372036854775807", None);
        match eval("val more = big + 1", Some(&state)) {
            Outcome::Exception { rendering, .. } => {
                assert_eq!(rendering, "Uncaught exception: Overflow\n");
            }
            other => panic!("expected exception, got {other:?}"),
        }
    }

    #[test]
    fn test_trailing_garbage_is_static_error() {
        match eval("val x = 1 2", None) {
            Outcome::Error { message, offset } => {
                assert_eq!(message, "expected end of declaration");
                assert_eq!(offset, Some(10));
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn test_deterministic() {
        let first = eval("val x = (1; 2) div 2", None);
        let second = eval("val x = (1; 2) div 2", None);
        assert_eq!(first, second);
    }
}
