use crate::structures::StructureError;
use thiserror::Error;

/// Errors raised while converting or evaluating an expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    /// An operator found fewer than two operands on the stack
    #[error("Malformed expression: '{operator}' needs two operands")]
    MissingOperand { operator: char },

    /// A postfix token that is neither a numeral nor a known operator
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    /// A numeral that does not fit a number
    #[error("Invalid operand: {0}")]
    InvalidOperand(String),

    /// A `(` without `)` or the other way round
    #[error("Malformed expression: unmatched parenthesis")]
    UnmatchedParenthesis,

    #[error("Division by zero")]
    DivisionByZero,

    /// Nothing left on the stack to report as the result
    #[error("Malformed expression: nothing to evaluate")]
    Empty,

    /// More than one value left once every token was consumed
    #[error("Malformed expression: {0} operands left without an operator")]
    LeftoverOperands(usize),

    /// The private stack ran out of room
    #[error("Expression too long: {0}")]
    Stack(#[from] StructureError),
}

impl ExpressionError {
    /// True for every error caused by the shape of the input
    pub fn is_malformed(&self) -> bool {
        !matches!(self, ExpressionError::DivisionByZero | ExpressionError::Stack(_))
    }
}
