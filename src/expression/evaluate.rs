//! Postfix evaluation with a step trace
//!
//! Every token produces one [`EvaluationStep`] holding a description of what
//! happened and a bottom-to-top copy of the operand stack afterwards.

use super::errors::ExpressionError;
use crate::config::DEFAULT_EXPRESSION_CAPACITY;
use crate::structures::Stack;
use serde::{Deserialize, Serialize};

/// One consumed token and the operand stack it left behind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationStep {
    pub action: String,
    #[serde(rename = "stack")]
    pub stack_snapshot: Vec<f64>,
}

/// Evaluate a whitespace-separated postfix expression
///
/// Returns the final value and one step per token.
pub fn evaluate_postfix(expression: &str) -> Result<(f64, Vec<EvaluationStep>), ExpressionError> {
    evaluate(expression, DEFAULT_EXPRESSION_CAPACITY)
}

pub(crate) fn evaluate(
    expression: &str,
    capacity: usize,
) -> Result<(f64, Vec<EvaluationStep>), ExpressionError> {
    let mut operands: Stack<f64> = Stack::new(capacity);
    let mut steps = Vec::new();

    for token in expression.split_whitespace() {
        let action = if token.chars().all(|c| c.is_ascii_digit()) {
            let value: f64 = token
                .parse()
                .map_err(|_| ExpressionError::InvalidOperand(token.to_string()))?;
            operands.push(value)?;
            format!("Push operand {}", token)
        } else {
            let operator = parse_operator(token)?;
            // Right operand is on top
            let right = operands
                .pop()
                .map_err(|_| ExpressionError::MissingOperand { operator })?;
            let left = operands
                .pop()
                .map_err(|_| ExpressionError::MissingOperand { operator })?;
            let result = apply(operator, left, right)?;
            operands.push(result)?;
            format!(
                "Apply {} on last two operands: {} {} {} = {}",
                operator, left, operator, right, result
            )
        };

        steps.push(EvaluationStep {
            action,
            stack_snapshot: operands.to_list(),
        });
    }

    match operands.size() {
        0 => Err(ExpressionError::Empty),
        1 => Ok((operands.pop()?, steps)),
        n => Err(ExpressionError::LeftoverOperands(n)),
    }
}

fn parse_operator(token: &str) -> Result<char, ExpressionError> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(op @ ('+' | '-' | '*' | '/')), None) => Ok(op),
        _ => Err(ExpressionError::UnknownOperator(token.to_string())),
    }
}

fn apply(operator: char, left: f64, right: f64) -> Result<f64, ExpressionError> {
    match operator {
        '+' => Ok(left + right),
        '-' => Ok(left - right),
        '*' => Ok(left * right),
        '/' if right == 0.0 => Err(ExpressionError::DivisionByZero),
        '/' => Ok(left / right),
        other => Err(ExpressionError::UnknownOperator(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_are_recorded() {
        let (result, steps) = evaluate_postfix("3 4 2 * +").unwrap();
        assert_eq!(result, 11.0);

        let actions: Vec<&str> = steps.iter().map(|s| s.action.as_str()).collect();
        assert_eq!(
            actions,
            vec![
                "Push operand 3",
                "Push operand 4",
                "Push operand 2",
                "Apply * on last two operands: 4 * 2 = 8",
                "Apply + on last two operands: 3 + 8 = 11",
            ]
        );
        assert_eq!(steps[2].stack_snapshot, vec![3.0, 4.0, 2.0]);
        assert_eq!(steps[3].stack_snapshot, vec![3.0, 8.0]);
        assert_eq!(steps[4].stack_snapshot, vec![11.0]);
    }

    #[test]
    fn test_operand_order_and_true_division() {
        assert_eq!(evaluate_postfix("10 4 -").unwrap().0, 6.0);
        let (result, steps) = evaluate_postfix("7 2 /").unwrap();
        assert_eq!(result, 3.5);
        assert_eq!(steps[2].action, "Apply / on last two operands: 7 / 2 = 3.5");
    }

    #[test]
    fn test_missing_operand() {
        assert_eq!(
            evaluate_postfix("1 +").unwrap_err(),
            ExpressionError::MissingOperand { operator: '+' }
        );
    }

    #[test]
    fn test_unknown_operator() {
        let err = evaluate_postfix("2 3 ^").unwrap_err();
        assert_eq!(err, ExpressionError::UnknownOperator("^".to_string()));
        assert_eq!(err.to_string(), "Unknown operator: ^");
    }

    #[test]
    fn test_leftover_and_empty() {
        assert_eq!(
            evaluate_postfix("1 2").unwrap_err(),
            ExpressionError::LeftoverOperands(2)
        );
        assert_eq!(evaluate_postfix("   ").unwrap_err(), ExpressionError::Empty);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            evaluate_postfix("4 0 /").unwrap_err(),
            ExpressionError::DivisionByZero
        );
    }
}
