//! Infix expression conversion and traced postfix evaluation
//!
//! The pipeline mirrors the textbook two-stack approach:
//!
//! ```text
//! "3 + 4 * 2"  →  convert  →  "3 4 2 * +"  →  evaluate  →  11 (+ one step per token)
//! ```
//!
//! - [`convert`]: operator-precedence conversion over an operator [`Stack`]
//! - [`evaluate`]: operand-stack evaluation recording an [`EvaluationStep`]
//!   after every token
//!
//! Only non-negative integer literals and the binary operators `+ - * /` are
//! understood. Division is true division, so results are `f64`.
//!
//! [`Stack`]: crate::structures::Stack

pub mod convert;
pub mod errors;
pub mod evaluate;

pub use convert::infix_to_postfix;
pub use errors::ExpressionError;
pub use evaluate::{evaluate_postfix, EvaluationStep};

use crate::config::DEFAULT_EXPRESSION_CAPACITY;
use serde::Serialize;

/// Operator precedence; anything unrecognized binds loosest
pub fn precedence(op: char) -> u8 {
    match op {
        '+' | '-' => 1,
        '*' | '/' => 2,
        _ => 0,
    }
}

/// Result of evaluating one infix expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub expression: String,
    pub postfix: String,
    #[serde(rename = "evaluation_steps")]
    pub steps: Vec<EvaluationStep>,
    #[serde(rename = "final_result")]
    pub result: f64,
}

/// Converts and evaluates expressions using private stacks of a fixed capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpressionEngine {
    stack_capacity: usize,
}

impl ExpressionEngine {
    pub fn new(stack_capacity: usize) -> Self {
        ExpressionEngine { stack_capacity }
    }

    pub fn stack_capacity(&self) -> usize {
        self.stack_capacity
    }

    pub fn to_postfix(&self, expression: &str) -> Result<String, ExpressionError> {
        convert::convert(expression, self.stack_capacity)
    }

    pub fn evaluate_postfix(
        &self,
        postfix: &str,
    ) -> Result<(f64, Vec<EvaluationStep>), ExpressionError> {
        evaluate::evaluate(postfix, self.stack_capacity)
    }

    /// Convert `expression` to postfix and evaluate it
    pub fn evaluate(&self, expression: &str) -> Result<Evaluation, ExpressionError> {
        let postfix = self.to_postfix(expression)?;
        let (result, steps) = self.evaluate_postfix(&postfix)?;
        Ok(Evaluation {
            expression: expression.to_string(),
            postfix,
            steps,
            result,
        })
    }
}

impl Default for ExpressionEngine {
    fn default() -> Self {
        Self::new(DEFAULT_EXPRESSION_CAPACITY)
    }
}
