use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A binary arithmetic operator
#[derive(
    Debug, Clone, Copy, Hash, PartialEq, Eq, AsRefStr, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
}

impl Operator {
    /// Operators of higher priority bind tighter
    pub fn priority(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
        }
    }
}

/// The sign of a unary operation
#[derive(
    Debug, Clone, Copy, Hash, PartialEq, Eq, AsRefStr, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    #[strum(serialize = "+")]
    Plus,
    #[strum(serialize = "-")]
    Minus,
}

impl Sign {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::Plus => value,
            Self::Minus => -value,
        }
    }

    /// The single sign equivalent to applying `other` and then `self`
    pub fn combine(self, other: Sign) -> Sign {
        if self == other {
            Self::Plus
        } else {
            Self::Minus
        }
    }
}

impl From<Sign> for Operator {
    fn from(sign: Sign) -> Self {
        match sign {
            Sign::Plus => Operator::Add,
            Sign::Minus => Operator::Sub,
        }
    }
}

/// A parsed arithmetic expression
///
/// Trees are strictly owned: every node holds its children by value and a
/// tree is never mutated once the parser has returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[serde(tag = "type", content = "value")]
pub enum Expression {
    Literal(f64),
    Unary(Sign, Box<Expression>),
    Binary(Operator, Box<Expression>, Box<Expression>),
}

impl Expression {
    pub fn literal(value: f64) -> Expression {
        Expression::Literal(value)
    }

    pub fn unary(sign: Sign, operand: Expression) -> Expression {
        Expression::Unary(sign, Box::new(operand))
    }

    pub fn binary(operator: Operator, left: Expression, right: Expression) -> Expression {
        Expression::Binary(operator, Box::new(left), Box::new(right))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(value) => write!(f, "{}", value),
            Expression::Unary(sign, operand) => match operand.as_ref() {
                Expression::Unary(_, _) => write!(f, "{}({})", sign, operand),
                _ => write!(f, "{}{}", sign, operand),
            },
            Expression::Binary(op, left, right) => write!(f, "({} {} {})", left, op, right),
        }
    }
}
