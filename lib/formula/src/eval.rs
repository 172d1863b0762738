use bigdecimal::{BigDecimal, FromPrimitive, RoundingMode, ToPrimitive};
use log::debug;
use serde::Deserialize;

use crate::ast::{Expression, Operator, Sign};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EvaluatorConfig {
    // Decimal places literals are rounded to
    pub precision: u32,
}

impl Default for EvaluatorConfig {
    fn default() -> EvaluatorConfig {
        EvaluatorConfig { precision: 2 }
    }
}

/// Reduces a tree to a number
///
/// Literals are rounded to the configured precision when they are
/// evaluated, intermediate and final results are not.
#[derive(Debug, Clone)]
pub struct Evaluator {
    precision: i64,
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new(&EvaluatorConfig::default())
    }
}

enum Step<'a> {
    Visit(&'a Expression),
    Sign(Sign),
    Apply(Operator),
}

impl Evaluator {
    pub fn new(config: &EvaluatorConfig) -> Evaluator {
        Evaluator {
            precision: i64::from(config.precision),
        }
    }

    /// Returns `None` if the result is undefined, i.e. on division by zero
    ///
    /// Walks the tree with an explicit stack so long operator chains do not
    /// exhaust the thread's stack.
    pub fn evaluate(&self, expr: &Expression) -> Option<f64> {
        let mut steps = vec![Step::Visit(expr)];
        let mut values: Vec<Option<f64>> = Vec::new();

        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(Expression::Literal(value)) => values.push(Some(self.round(*value))),
                Step::Visit(Expression::Unary(sign, operand)) => {
                    steps.push(Step::Sign(*sign));
                    steps.push(Step::Visit(operand));
                }
                Step::Visit(Expression::Binary(op, left, right)) => {
                    steps.push(Step::Apply(*op));
                    steps.push(Step::Visit(right));
                    steps.push(Step::Visit(left));
                }
                Step::Sign(sign) => {
                    let operand = values.pop().flatten();
                    values.push(operand.map(|v| sign.apply(v)));
                }
                Step::Apply(op) => {
                    let right = values.pop().flatten();
                    let left = values.pop().flatten();
                    values.push(match (left, right) {
                        (Some(left), Some(right)) => apply(op, left, right),
                        _ => None,
                    });
                }
            }
        }
        values.pop().flatten()
    }

    /// Rounds the exact binary value of `value` half away from zero
    fn round(&self, value: f64) -> f64 {
        let decimal = match BigDecimal::from_f64(value) {
            Some(decimal) => decimal,
            None => return value,
        };
        let (_, scale) = decimal.as_bigint_and_exponent();
        if scale <= self.precision {
            return value;
        }
        decimal
            .with_scale_round(self.precision, RoundingMode::HalfUp)
            .to_f64()
            .unwrap_or(value)
    }
}

fn apply(op: Operator, left: f64, right: f64) -> Option<f64> {
    match op {
        Operator::Add => Some(left + right),
        Operator::Sub => Some(left - right),
        Operator::Mul => Some(left * right),
        Operator::Div if right == 0. => {
            debug!("Division by zero: {} / {}", left, right);
            None
        }
        Operator::Div => Some(left / right),
    }
}

/// Evaluates `expr` with the default precision
pub fn evaluate(expr: Option<&Expression>) -> Option<f64> {
    expr.and_then(|expr| Evaluator::default().evaluate(expr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::token::tokenize;

    fn eval_str(input: &str) -> Option<f64> {
        evaluate(parse(&tokenize(input)).as_ref())
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        match actual {
            Some(actual) => assert!(
                (actual - expected).abs() < 1e-6,
                "{} != {}",
                actual,
                expected
            ),
            None => panic!("expected {} but result was absent", expected),
        }
    }

    #[test]
    fn test_eval_absent() {
        assert_eq!(evaluate(None), None);
        assert_eq!(eval_str(""), None);
    }

    #[test]
    fn test_eval() {
        assert_eq!(eval_str("2 + 3"), Some(5.));
        assert_eq!(eval_str("2 * (3 + 4)"), Some(14.));
        assert_eq!(eval_str("-5 * 2"), Some(-10.));
        assert_eq!(eval_str("-3 + 5"), Some(2.));
        assert_eq!(eval_str("-10"), Some(-10.));
        assert_eq!(eval_str("+7"), Some(7.));
        assert_eq!(eval_str("-(-50 / -100)"), Some(-0.5));
        assert_eq!(eval_str("34 +6/ 2"), Some(37.));
        assert_eq!(eval_str("(34 +6)/ 2"), Some(20.));
        assert_eq!(eval_str("1 - 2 * -3 + 4"), Some(11.));
    }

    #[test]
    fn test_eval_precedence() {
        let precedenced = eval_str("(50 / 100) - (97 / 100) * (42 / 100) * 140000");
        let bracketed = eval_str("((50 / 100) - ((97 / 100) * (42 / 100))) * 140000");

        assert_close(precedenced, -57035.5);
        assert_close(bracketed, 12964.);
        assert_ne!(precedenced, bracketed);
    }

    #[test]
    fn test_eval_product() {
        let result = eval_str("(50 / 100) * (97 / 100) * (42 / 100) * 140000");
        assert_close(result, 28518.);

        // Evaluating right to left nests every division inside the next
        let naive = 50. / (100. * (97. / (100. * (42. / (140000. * 100.)))));
        assert!((result.unwrap_or_default() - naive).abs() > 1.);
    }

    #[test]
    fn test_eval_division_by_zero() {
        assert_eq!(eval_str("1 / 0"), None);
        assert_eq!(eval_str("1 / -0"), None);
        assert_eq!(eval_str("2 * (3 + (4 / (1 - 1)))"), None);
        assert_eq!(eval_str("-(5 / 0)"), None);
        assert_eq!(eval_str("(5 / 0) * 0"), None);
        // Literals rounding to zero are zero divisors too
        assert_eq!(eval_str("1 / 0.001"), None);
        assert_eq!(eval_str("0 / 5"), Some(0.));
    }

    #[test]
    fn test_eval_literal_rounding() {
        let evaluator = Evaluator::default();

        assert_eq!(evaluator.evaluate(&Expression::literal(7.45678)), Some(7.46));
        assert_eq!(evaluator.evaluate(&Expression::literal(2.999)), Some(3.));
        assert_eq!(evaluator.evaluate(&Expression::literal(0.125)), Some(0.13));
        assert_eq!(evaluator.evaluate(&Expression::literal(-0.125)), Some(-0.13));
        // Stored just below the midpoint, so they round down
        assert_eq!(evaluator.evaluate(&Expression::literal(1.005)), Some(1.));
        assert_eq!(evaluator.evaluate(&Expression::literal(0.015)), Some(0.01));
        assert_eq!(evaluator.evaluate(&Expression::literal(0.045)), Some(0.04));
        assert_eq!(evaluator.evaluate(&Expression::literal(0.155)), Some(0.15));
        assert_eq!(evaluator.evaluate(&Expression::literal(-0.155)), Some(-0.15));
        assert_eq!(
            evaluator.evaluate(&Expression::literal(f64::MAX)),
            Some(f64::MAX)
        );
        assert_eq!(evaluator.evaluate(&Expression::literal(4.)), Some(4.));
    }

    #[test]
    fn test_eval_long_chain() {
        let chain = vec!["1"; 20_000].join("+");
        assert_eq!(eval_str(&chain), Some(20000.));

        let chain = vec!["1"; 20_000].join("*-1*");
        assert_eq!(eval_str(&chain), Some(-1.));
    }

    #[test]
    fn test_eval_results_not_rounded() {
        assert_eq!(eval_str("1 / 3"), Some(1. / 3.));
        assert_eq!(eval_str("0.1 + 0.2"), Some(0.1 + 0.2));
        assert_eq!(eval_str("1.234 * 1"), Some(1.23));
    }

    #[test]
    fn test_eval_precision() {
        let evaluator = Evaluator::new(&EvaluatorConfig { precision: 0 });
        assert_eq!(evaluator.evaluate(&Expression::literal(2.5)), Some(3.));

        let evaluator = Evaluator::new(&EvaluatorConfig { precision: 4 });
        assert_eq!(
            evaluator.evaluate(&Expression::literal(7.45678)),
            Some(7.4568)
        );

        // Wider than any literal's binary expansion
        for precision in [400, u32::MAX].iter() {
            let evaluator = Evaluator::new(&EvaluatorConfig {
                precision: *precision,
            });
            assert_eq!(
                evaluator.evaluate(&Expression::literal(0.015)),
                Some(0.015)
            );
        }
    }

    #[test]
    fn test_eval_repeatable() {
        let expr = Expression::binary(
            Operator::Div,
            Expression::unary(Sign::Minus, Expression::literal(10.)),
            Expression::literal(4.),
        );
        let evaluator = Evaluator::default();

        for _ in 0..10 {
            assert_eq!(evaluator.evaluate(&expr), Some(-2.5));
        }
    }

    #[test]
    fn test_eval_threads() -> Result<(), Box<dyn std::error::Error>> {
        let expr = std::sync::Arc::new(
            parse(&tokenize("(1 + 2) * 3 - 4 / 8")).ok_or("no expression")?,
        );

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let expr = expr.clone();
                std::thread::spawn(move || evaluate(Some(expr.as_ref())))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().map_err(|_| "thread panicked")?, Some(8.5));
        }
        Ok(())
    }
}
