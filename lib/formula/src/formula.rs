use std::collections::HashMap;

use log::debug;
use serde::Deserialize;

use crate::ast::Expression;
use crate::error::ParseError;
use crate::eval::{Evaluator, EvaluatorConfig};
use crate::parser::{Parser, ParserConfig};
use crate::token::tokenize;
use crate::variables::substitute;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct FormulaConfig {
    pub parser: ParserConfig,
    pub evaluator: EvaluatorConfig,
}

/// A configured parser and evaluator pair
#[derive(Debug, Clone, Default)]
pub struct Formula {
    parser: Parser,
    evaluator: Evaluator,
}

impl Formula {
    pub fn new(config: &FormulaConfig) -> Formula {
        Formula {
            parser: Parser::new(&config.parser),
            evaluator: Evaluator::new(&config.evaluator),
        }
    }

    pub fn parse(&self, expression: &str) -> Result<Option<Expression>, ParseError> {
        let tokens = tokenize(expression);
        debug!("Tokenized \"{}\" into {} tokens", expression, tokens.len());
        self.parser.parse(&tokens)
    }

    pub fn evaluate(&self, expr: Option<&Expression>) -> Option<f64> {
        expr.and_then(|expr| self.evaluator.evaluate(expr))
    }

    /// Substitutes `variables` into `expression` then parses and evaluates it
    pub fn compute(
        &self,
        expression: &str,
        variables: &HashMap<String, f64>,
    ) -> Result<Option<f64>, ParseError> {
        let substituted = substitute(expression, variables);
        let expr = self.parse(&substituted)?;
        Ok(self.evaluate(expr.as_ref()))
    }
}
