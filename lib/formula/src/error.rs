use derive_more::Display;

use crate::ast::Operator;

#[derive(Debug, Display, Clone, PartialEq)]
pub enum ParseError {
    #[display(fmt = "Unclosed parenthesis")]
    UnclosedParenthesis,

    #[display(fmt = "Unexpected closing parenthesis")]
    UnexpectedClosingParenthesis,

    #[display(fmt = "Empty parenthesis group")]
    EmptyGroup,

    #[display(fmt = "Missing operand for \"{}\"", _0)]
    MissingOperand(Operator),

    #[display(fmt = "Missing operator between operands")]
    MissingOperator,

    #[display(fmt = "Unexpected operator \"{}\"", _0)]
    UnexpectedOperator(Operator),

    #[display(fmt = "Invalid numeric literal \"{}\"", _0)]
    InvalidLiteral(String),

    #[display(fmt = "Expression nested deeper than {} groups", _0)]
    NestingTooDeep(usize),
}

impl std::error::Error for ParseError {}
