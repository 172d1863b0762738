use log::{debug, warn};
use serde::Deserialize;

use crate::ast::{Expression, Operator, Sign};
use crate::error::ParseError;
use crate::token::Token;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ParserConfig {
    // Report malformed input instead of building a best-effort tree
    pub strict: bool,

    // Maximum number of nested parenthesis groups
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> ParserConfig {
        ParserConfig {
            strict: false,
            max_depth: 64,
        }
    }
}

/// Operator-precedence parser over a token sequence
///
/// Each parenthesis group is parsed recursively as an independent
/// expression, so a leading sign inside a group is always unary.
#[derive(Debug, Clone)]
pub struct Parser {
    strict: bool,
    max_depth: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new(&ParserConfig::default())
    }
}

impl Parser {
    pub fn new(config: &ParserConfig) -> Parser {
        Parser {
            strict: config.strict,
            max_depth: config.max_depth,
        }
    }

    /// Builds the tree for `tokens`, returning `None` if there is nothing to parse
    ///
    /// In lenient mode the only error is exceeding the nesting ceiling, any
    /// other malformed input yields a best-effort tree.
    pub fn parse(&self, tokens: &[Token]) -> Result<Option<Expression>, ParseError> {
        self.parse_group(tokens, 0)
    }

    fn recover(&self, error: ParseError) -> Result<(), ParseError> {
        if self.strict {
            return Err(error);
        }
        debug!("Ignoring malformed expression: {}", error);
        Ok(())
    }

    fn parse_group(&self, tokens: &[Token], depth: usize) -> Result<Option<Expression>, ParseError> {
        if depth > self.max_depth {
            return Err(ParseError::NestingTooDeep(self.max_depth));
        }

        let mut stacks = Stacks::default();
        let mut idx = 0;

        while let Some(token) = tokens.get(idx) {
            let previous = idx.checked_sub(1).and_then(|p| tokens.get(p));
            let follows_operand = matches!(previous, Some(Token::Number(_)) | Some(Token::RParen));

            match token {
                Token::Number(digits) => {
                    if follows_operand {
                        self.recover(ParseError::MissingOperator)?;
                    }
                    match digits.parse::<f64>() {
                        Ok(value) if value.is_finite() => {
                            stacks.push_operand(Expression::Literal(value))
                        }
                        _ => self.recover(ParseError::InvalidLiteral(digits.clone()))?,
                    }
                    idx += 1;
                }
                Token::LParen => {
                    if follows_operand {
                        self.recover(ParseError::MissingOperator)?;
                    }
                    let close = closing_paren(tokens, idx);
                    let inner = match close {
                        Some(close) => &tokens[idx + 1..close],
                        None => {
                            self.recover(ParseError::UnclosedParenthesis)?;
                            &tokens[idx + 1..]
                        }
                    };
                    match self.parse_group(inner, depth + 1)? {
                        Some(group) => stacks.push_operand(group),
                        None => self.recover(ParseError::EmptyGroup)?,
                    }
                    idx = close.map_or(tokens.len(), |close| close + 1);
                }
                Token::RParen => {
                    self.recover(ParseError::UnexpectedClosingParenthesis)?;
                    idx += 1;
                }
                _ => {
                    // A sign is unary at the start of a group or straight after another operator
                    let follows_operator = previous.map_or(true, Token::is_operator);
                    match (token.sign(), token.operator()) {
                        (Some(sign), _) if follows_operator => {
                            if stacks.sign.is_some() {
                                self.recover(ParseError::UnexpectedOperator(sign.into()))?;
                            }
                            stacks.push_sign(sign);
                        }
                        (_, Some(operator)) => {
                            if follows_operator {
                                self.recover(ParseError::UnexpectedOperator(operator))?;
                            }
                            stacks.push_operator(operator);
                        }
                        (_, None) => {}
                    }
                    idx += 1;
                }
            }
        }

        stacks.finish(self)
    }
}

/// Index of the `)` balancing the `(` at `open`
fn closing_paren(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0_usize;
    for (idx, token) in tokens.iter().enumerate().skip(open) {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

#[derive(Default)]
struct Stacks {
    operands: Vec<Expression>,
    operators: Vec<Operator>,
    // Unary sign waiting for its operand
    sign: Option<Sign>,
}

impl Stacks {
    fn push_operand(&mut self, operand: Expression) {
        let operand = match self.sign.take() {
            Some(sign) => Expression::unary(sign, operand),
            None => operand,
        };
        self.operands.push(operand);
    }

    fn push_sign(&mut self, sign: Sign) {
        self.sign = Some(match self.sign {
            Some(pending) => pending.combine(sign),
            None => sign,
        });
    }

    fn push_operator(&mut self, operator: Operator) {
        while let Some(&pending) = self.operators.last() {
            if pending.priority() < operator.priority() || self.operands.len() < 2 {
                break;
            }
            self.operators.pop();
            self.apply(pending);
        }
        self.operators.push(operator);
    }

    /// Combines the top two operands, returns false if there are not enough
    fn apply(&mut self, operator: Operator) -> bool {
        match (self.operands.pop(), self.operands.pop()) {
            (Some(right), Some(left)) => {
                self.operands
                    .push(Expression::binary(operator, left, right));
                true
            }
            // A lone operand stays put for the caller to recover
            (Some(right), None) => {
                self.operands.push(right);
                false
            }
            (None, _) => false,
        }
    }

    fn finish(mut self, parser: &Parser) -> Result<Option<Expression>, ParseError> {
        if let Some(sign) = self.sign.take() {
            parser.recover(ParseError::MissingOperand(sign.into()))?;
        }

        while let Some(operator) = self.operators.pop() {
            if !self.apply(operator) {
                parser.recover(ParseError::MissingOperand(operator))?;
            }
        }

        if self.operands.len() > 1 {
            parser.recover(ParseError::MissingOperator)?;
            debug!("Discarding {} dangling operands", self.operands.len() - 1);
        }
        Ok(self.operands.pop())
    }
}

/// Parses `tokens` leniently with the default configuration
pub fn parse(tokens: &[Token]) -> Option<Expression> {
    Parser::default().parse(tokens).unwrap_or_else(|e| {
        warn!("Failed to parse expression: {}", e);
        None
    })
}
