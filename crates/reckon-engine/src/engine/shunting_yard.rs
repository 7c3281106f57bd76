//! Infix to postfix conversion.

use super::error::{FormulaError, FormulaResult};
use super::expr::Bindings;
use super::operators::OperatorRegistry;
use super::tokenizer::Token;

enum Stacked {
    Operator(char),
    Paren,
}

/// Reorder infix tokens into postfix (reverse Polish) order.
///
/// Identifiers must already be declared in `bindings`.
pub fn to_postfix<I>(
    tokens: I,
    registry: &OperatorRegistry,
    bindings: &Bindings,
) -> FormulaResult<Vec<Token>>
where
    I: IntoIterator<Item = Token>,
{
    let mut output = Vec::new();
    let mut stack: Vec<Stacked> = Vec::new();

    for token in tokens {
        match token {
            Token::Number(_) => output.push(token),
            Token::Identifier(ref name) => {
                if !bindings.contains(name) {
                    return Err(FormulaError::UnknownVariable(name.clone()));
                }
                output.push(token);
            }
            Token::Operator(symbol) => {
                let incoming = registry.lookup(symbol)?;
                while let Some(Stacked::Operator(top)) = stack.last() {
                    if !registry.lookup(*top)?.pops_before(&incoming) {
                        break;
                    }
                    output.push(Token::Operator(*top));
                    stack.pop();
                }
                stack.push(Stacked::Operator(symbol));
            }
            Token::LeftParen => stack.push(Stacked::Paren),
            Token::RightParen => loop {
                match stack.pop() {
                    Some(Stacked::Operator(op)) => output.push(Token::Operator(op)),
                    Some(Stacked::Paren) => break,
                    None => return Err(FormulaError::MismatchedParentheses),
                }
            },
        }
    }

    while let Some(top) = stack.pop() {
        match top {
            Stacked::Operator(op) => output.push(Token::Operator(op)),
            Stacked::Paren => return Err(FormulaError::MismatchedParentheses),
        }
    }

    Ok(output)
}
