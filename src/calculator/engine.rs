use super::value::{self, Value};
use crate::diagnostics::Diagnostics;
use crate::errors::{Error, Result};
use crate::grammar::{Assoc, BodySymbol::*, Grammar, GrammarBuilder};
use crate::lexer::{Scanner, TokenKind::*};
use crate::parsers::lr::{self, Parser};

/// Returns an ambiguous arithmetic grammar which relies entirely on its
/// precedence table for operator binding
fn grammar() -> Result<Grammar<Value>> {
    let mut g = GrammarBuilder::new();

    for op in [Plus, Minus, Star, Slash, Percent] {
        g.rule("expr", &[N("expr"), T(op), N("expr")], Some(binary));
    }

    g.rule_with_precedence("expr", &[T(Minus), N("expr")], Some(negate), Not)
        .rule("expr", &[T(Not), N("expr")], Some(not))
        .rule("expr", &[T(LParen), N("expr"), T(RParen)], Some(parenthesized))
        .rule("expr", &[T(IntConst)], None)
        .precedence(Assoc::Left, &[Plus, Minus])
        .precedence(Assoc::Left, &[Star, Slash, Percent])
        .precedence(Assoc::Right, &[Not]);

    g.build()
}

fn binary(values: Vec<Value>) -> Result<Value> {
    let [left, op, right]: [Value; 3] = values
        .try_into()
        .map_err(|_| Error::Reduction(String::from("expected a binary expression")))?;

    Ok(Value::Number(value::apply(
        op.operator()?,
        left.number()?,
        right.number()?,
    )?))
}

/// Returns the number held by the last value in a unary expression
fn operand(values: &[Value]) -> Result<i64> {
    values
        .last()
        .ok_or_else(|| Error::Reduction(String::from("expected an operand")))?
        .number()
}

fn negate(values: Vec<Value>) -> Result<Value> {
    Ok(Value::Number(value::negate(operand(&values)?)?))
}

fn not(values: Vec<Value>) -> Result<Value> {
    Ok(Value::Number(value::not(operand(&values)?)))
}

fn parenthesized(values: Vec<Value>) -> Result<Value> {
    values
        .into_iter()
        .nth(1)
        .ok_or_else(|| Error::Reduction(String::from("expected an expression")))
}

/// Evaluates integer expressions to demonstrate computing values directly
/// in reduction combinators
pub struct Engine {
    parser: Parser<Value>,
}

impl Engine {
    /// Returns a new expression evaluation engine
    pub fn new() -> Result<Engine> {
        Ok(Engine {
            parser: lr::new_lalr(grammar()?)?,
        })
    }

    /// Evaluates an expression. The first lexical error in the input is
    /// returned in preference to any syntax error it caused.
    pub fn evaluate(&self, input: &str) -> Result<i64> {
        let mut diagnostics = Diagnostics::new();
        let result = self.parser.parse(&mut Scanner::new(input), &mut diagnostics);

        if let Some(d) = diagnostics.reported().iter().find(|d| d.is_lexical()) {
            return Err(Error::Lexical(d.clone()));
        }

        result?.number()
    }
}
