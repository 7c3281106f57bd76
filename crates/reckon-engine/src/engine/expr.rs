//! Expression trees and their variable bindings.
//!
//! A formula body is tokenized, converted to postfix and folded into an
//! [`Expr`] tree with an explicit stack. Variables in the tree only carry a
//! name; their values live in the tree's [`Bindings`] table and must be set
//! before [`ExpressionTree::evaluate`] is called.
//!
//! Building, evaluating and dropping a tree all use explicit stacks, so the
//! nesting depth of a formula is bounded by memory rather than the call stack.

use std::collections::HashMap;
use std::mem;

use super::error::{FormulaError, FormulaResult};
use super::operators::{OperatorRegistry, OperatorSpec};
use super::shunting_yard::to_postfix;
use super::tokenizer::{Token, Tokenizer};

/// Name → value table. `None` marks a declared but unset variable.
#[derive(Clone, Debug, Default)]
pub struct Bindings {
    values: HashMap<String, Option<f64>>,
    order: Vec<String>,
}

impl Bindings {
    /// Declare `name` as unset. Existing entries are left alone.
    pub fn declare(&mut self, name: &str) {
        if !self.values.contains_key(name) {
            self.values.insert(name.to_string(), None);
            self.order.push(name.to_string());
        }
    }

    /// Overwrite the value of a declared variable.
    pub fn set(&mut self, name: &str, value: f64) -> FormulaResult<()> {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = Some(value);
                Ok(())
            }
            None => Err(FormulaError::UnknownVariable(name.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied().flatten()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Declared names in first-seen order.
    pub fn names(&self) -> &[String] {
        &self.order
    }
}

/// A node of a parsed formula.
#[derive(Debug, PartialEq)]
pub enum Expr {
    Constant(f64),
    Variable(String),
    Binary {
        op: OperatorSpec,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

enum Step<'a> {
    Visit(&'a Expr),
    Apply(&'a OperatorSpec),
}

impl Expr {
    /// Evaluate the tree, left operand before right. The first error wins.
    pub fn evaluate(&self, bindings: &Bindings) -> FormulaResult<f64> {
        let mut steps = vec![Step::Visit(self)];
        let mut values: Vec<f64> = Vec::new();

        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(Expr::Constant(n)) => values.push(*n),
                Step::Visit(Expr::Variable(name)) => values.push(
                    bindings
                        .get(name)
                        .ok_or_else(|| FormulaError::UnboundVariable(name.clone()))?,
                ),
                Step::Visit(Expr::Binary { op, left, right }) => {
                    steps.push(Step::Apply(op));
                    steps.push(Step::Visit(right));
                    steps.push(Step::Visit(left));
                }
                Step::Apply(op) => {
                    let r = values.pop().ok_or(FormulaError::MalformedExpression)?;
                    let l = values.pop().ok_or(FormulaError::MalformedExpression)?;
                    values.push(op.apply(l, r)?);
                }
            }
        }

        values.pop().ok_or(FormulaError::MalformedExpression)
    }

    /// Move both children of a binary node out, leaving constants behind.
    fn take_children(&mut self, into: &mut Vec<Expr>) {
        if let Expr::Binary { left, right, .. } = self {
            into.push(mem::replace(&mut **left, Expr::Constant(0.0)));
            into.push(mem::replace(&mut **right, Expr::Constant(0.0)));
        }
    }
}

impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.take_children(&mut pending);
        }
    }
}

/// Fold a postfix token stream into a tree.
fn build_tree(postfix: Vec<Token>, registry: &OperatorRegistry) -> FormulaResult<Option<Expr>> {
    let mut stack: Vec<Expr> = Vec::new();

    for token in postfix {
        match token {
            Token::Number(n) => stack.push(Expr::Constant(n)),
            Token::Identifier(name) => stack.push(Expr::Variable(name)),
            Token::Operator(symbol) => {
                let op = registry.lookup(symbol)?;
                let right = stack.pop().ok_or(FormulaError::MalformedExpression)?;
                let left = stack.pop().ok_or(FormulaError::MalformedExpression)?;
                stack.push(Expr::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                });
            }
            Token::LeftParen | Token::RightParen => {
                return Err(FormulaError::MismatchedParentheses);
            }
        }
    }

    let root = stack.pop();
    if !stack.is_empty() {
        return Err(FormulaError::MalformedExpression);
    }
    Ok(root)
}

/// A parsed formula together with its binding table.
#[derive(Debug)]
pub struct ExpressionTree {
    root: Option<Expr>,
    bindings: Bindings,
}

impl ExpressionTree {
    /// Parse a formula body using the arithmetic operators.
    pub fn parse(formula: &str) -> FormulaResult<Self> {
        Self::parse_with(formula, &OperatorRegistry::arithmetic())
    }

    pub fn parse_with(formula: &str, registry: &OperatorRegistry) -> FormulaResult<Self> {
        let tokens = Tokenizer::new(formula).collect::<FormulaResult<Vec<_>>>()?;

        let mut bindings = Bindings::default();
        for token in &tokens {
            if let Token::Identifier(name) = token {
                bindings.declare(name);
            }
        }

        let postfix = to_postfix(tokens, registry, &bindings)?;
        let root = build_tree(postfix, registry)?;
        Ok(ExpressionTree { root, bindings })
    }

    pub fn set_variable(&mut self, name: &str, value: f64) -> FormulaResult<()> {
        self.bindings.set(name, value)
    }

    /// Variable names in the order they appear in the formula.
    pub fn variables(&self) -> &[String] {
        self.bindings.names()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<&Expr> {
        self.root.as_ref()
    }

    pub fn evaluate(&self) -> FormulaResult<f64> {
        self.root
            .as_ref()
            .ok_or(FormulaError::MalformedExpression)?
            .evaluate(&self.bindings)
    }
}
