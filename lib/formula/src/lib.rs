//! Arithmetic formula engine
//!
//! Turns a textual expression made of decimal literals, `+ - * /`, unary
//! signs and parenthesis into an [`Expression`] tree and reduces that tree
//! to a number. Named inputs are substituted into the text before it is
//! tokenized.
//!
//! ```
//! use std::collections::HashMap;
//!
//! let mut variables = HashMap::new();
//! variables.insert("salary".to_string(), 140000.);
//!
//! assert_eq!(formula::compute("salary * (50 / 100)", &variables), Some(70000.));
//! assert_eq!(formula::compute("salary / 0", &variables), None);
//! ```

use std::collections::HashMap;

pub use ast::{Expression, Operator, Sign};
pub use error::ParseError;
pub use eval::{evaluate, Evaluator, EvaluatorConfig};
pub use formula::{Formula, FormulaConfig};
pub use parser::{parse, Parser, ParserConfig};
pub use token::{tokenize, Token};
pub use variables::substitute;

mod ast;
mod error;
mod eval;
mod formula;
mod parser;
mod token;
mod variables;

/// Computes `expression` leniently with the default configuration
pub fn compute(expression: &str, variables: &HashMap<String, f64>) -> Option<f64> {
    let substituted = substitute(expression, variables);
    evaluate(parse(&tokenize(&substituted)).as_ref())
}
