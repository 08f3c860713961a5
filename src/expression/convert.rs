//! Infix to postfix conversion
//!
//! Whitespace is dropped first, so `"1 2"` reads as the numeral `12`.
//! Consecutive digits form one numeral; every other character is an operator
//! or a parenthesis. Operators pop everything of equal or higher precedence
//! before being pushed, which makes `+ - * /` left-associative.

use super::errors::ExpressionError;
use super::precedence;
use crate::config::DEFAULT_EXPRESSION_CAPACITY;
use crate::structures::Stack;

/// Convert an infix expression to space-separated postfix
pub fn infix_to_postfix(expression: &str) -> Result<String, ExpressionError> {
    convert(expression, DEFAULT_EXPRESSION_CAPACITY)
}

pub(crate) fn convert(expression: &str, capacity: usize) -> Result<String, ExpressionError> {
    let mut chars = expression
        .chars()
        .filter(|c| !c.is_whitespace())
        .peekable();
    let mut output: Vec<String> = Vec::new();
    let mut operators: Stack<char> = Stack::new(capacity);

    while let Some(c) = chars.next() {
        match c {
            '0'..='9' => {
                let mut numeral = c.to_string();
                while let Some(&digit) = chars.peek() {
                    if !digit.is_ascii_digit() {
                        break;
                    }
                    numeral.push(digit);
                    chars.next();
                }
                output.push(numeral);
            }
            '(' => operators.push(c)?,
            ')' => loop {
                match operators.pop() {
                    Ok('(') => break,
                    Ok(op) => output.push(op.to_string()),
                    Err(_) => return Err(ExpressionError::UnmatchedParenthesis),
                }
            },
            op => {
                while let Some(&top) = operators.peek() {
                    if top == '(' || precedence(top) < precedence(op) {
                        break;
                    }
                    output.push(operators.pop()?.to_string());
                }
                operators.push(op)?;
            }
        }
    }

    while let Ok(op) = operators.pop() {
        if op == '(' {
            return Err(ExpressionError::UnmatchedParenthesis);
        }
        output.push(op.to_string());
    }

    Ok(output.join(" "))
}
