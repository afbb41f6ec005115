use crate::errors::{Error, Result};
use crate::lexer::{Token, TokenKind, TokenValue};
use crate::parsers::lr::Semantic;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
/// A value on the calculator's parse stack. Integer constants become
/// numbers as soon as they are shifted; every other token is kept as is.
pub enum Value {
    Token(Token),
    Number(i64),
}

impl Semantic for Value {
    fn from_token(token: Token) -> Self {
        match token.value {
            TokenValue::Integer(n) => Value::Number(n),
            _ => Value::Token(token),
        }
    }
}

impl fmt::Display for Value {
    /// Formats a value as a string
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Token(t) => write!(f, "{}", t),
            Value::Number(n) => write!(f, "{}", n),
        }
    }
}

impl Value {
    /// Returns the number held by the value
    pub fn number(&self) -> Result<i64> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Token(t) => Err(Error::Reduction(format!(
                "expected a number, found '{}'",
                t.lexeme
            ))),
        }
    }

    /// Returns the operator kind of a token value
    pub fn operator(&self) -> Result<TokenKind> {
        match self {
            Value::Token(t) => Ok(t.kind),
            Value::Number(n) => Err(Error::Reduction(format!(
                "expected an operator, found {}",
                n
            ))),
        }
    }
}

/// Applies a binary arithmetic operator with overflow and division checks
pub fn apply(op: TokenKind, left: i64, right: i64) -> Result<i64> {
    let result = match op {
        TokenKind::Plus => left.checked_add(right),
        TokenKind::Minus => left.checked_sub(right),
        TokenKind::Star => left.checked_mul(right),
        TokenKind::Slash | TokenKind::Percent if right == 0 => {
            return Err(Error::DivideByZero);
        }
        TokenKind::Slash => left.checked_div(right),
        TokenKind::Percent => left.checked_rem(right),
        _ => {
            return Err(Error::Reduction(format!(
                "{} is not an arithmetic operator",
                op
            )))
        }
    };

    result.ok_or(Error::Overflow)
}

/// Negates a number with an overflow check
pub fn negate(n: i64) -> Result<i64> {
    n.checked_neg().ok_or(Error::Overflow)
}

/// Returns 1 if n is zero, and 0 otherwise
pub fn not(n: i64) -> i64 {
    i64::from(n == 0)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_apply() -> Result<()> {
        assert_eq!(apply(TokenKind::Plus, 2, 3)?, 5);
        assert_eq!(apply(TokenKind::Minus, 2, 3)?, -1);
        assert_eq!(apply(TokenKind::Star, -4, 3)?, -12);
        assert_eq!(apply(TokenKind::Slash, 7, 2)?, 3);
        assert_eq!(apply(TokenKind::Percent, 7, 3)?, 1);

        Ok(())
    }

    #[test]
    fn test_apply_fail() {
        assert_eq!(apply(TokenKind::Slash, 1, 0), Err(Error::DivideByZero));
        assert_eq!(apply(TokenKind::Percent, 1, 0), Err(Error::DivideByZero));
        assert_eq!(apply(TokenKind::Plus, i64::MAX, 1), Err(Error::Overflow));
        assert_eq!(apply(TokenKind::Slash, i64::MIN, -1), Err(Error::Overflow));
        assert!(matches!(
            apply(TokenKind::Less, 1, 2),
            Err(Error::Reduction(_))
        ));
    }

    #[test]
    fn test_unary() -> Result<()> {
        assert_eq!(negate(5)?, -5);
        assert_eq!(negate(i64::MIN), Err(Error::Overflow));
        assert_eq!(not(0), 1);
        assert_eq!(not(-3), 0);

        Ok(())
    }

    #[test]
    fn test_from_token() {
        let mut token = Token::new(TokenKind::IntConst, "42", 1);
        token.value = TokenValue::Integer(42);
        assert_eq!(Value::from_token(token), Value::Number(42));

        let plus = Value::from_token(Token::new(TokenKind::Plus, "+", 1));
        assert_eq!(plus.operator(), Ok(TokenKind::Plus));
        assert!(plus.number().is_err());
        assert_eq!(plus.to_string(), "+");
    }
}
