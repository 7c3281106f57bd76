//! Binary operator registry.
//!
//! Operators are declared up front in a static table. A numerically lower
//! precedence value binds tighter, so `*` (1) is applied before `+` (2).

use std::collections::HashMap;

use super::error::{FormulaError, FormulaResult};

/// How operators of equal precedence group.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Associativity {
    Left,
    Right,
}

/// Evaluation rule for a binary operator.
pub type ApplyFn = fn(f64, f64) -> FormulaResult<f64>;

/// Identity and evaluation rule of one registered operator.
#[derive(Clone, Copy, Debug)]
pub struct OperatorSpec {
    pub symbol: char,
    pub precedence: u8,
    pub associativity: Associativity,
    pub apply: ApplyFn,
}

impl OperatorSpec {
    pub fn apply(&self, left: f64, right: f64) -> FormulaResult<f64> {
        (self.apply)(left, right)
    }

    /// Whether `self` sitting on the operator stack must be emitted before
    /// `incoming` is pushed.
    pub fn pops_before(&self, incoming: &OperatorSpec) -> bool {
        match incoming.associativity {
            Associativity::Left => self.precedence <= incoming.precedence,
            Associativity::Right => self.precedence < incoming.precedence,
        }
    }
}

impl PartialEq for OperatorSpec {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
            && self.precedence == other.precedence
            && self.associativity == other.associativity
    }
}

fn add(left: f64, right: f64) -> FormulaResult<f64> {
    Ok(left + right)
}

fn subtract(left: f64, right: f64) -> FormulaResult<f64> {
    Ok(left - right)
}

fn multiply(left: f64, right: f64) -> FormulaResult<f64> {
    Ok(left * right)
}

fn divide(left: f64, right: f64) -> FormulaResult<f64> {
    if right == 0.0 {
        return Err(FormulaError::DivideByZero);
    }
    Ok(left / right)
}

/// The arithmetic operators every formula understands.
const ARITHMETIC: [(char, u8, Associativity, ApplyFn); 4] = [
    ('+', 2, Associativity::Left, add),
    ('-', 2, Associativity::Left, subtract),
    ('*', 1, Associativity::Left, multiply),
    ('/', 1, Associativity::Left, divide),
];

/// Symbol → operator table consulted by the converter and the tree builder.
#[derive(Clone, Debug)]
pub struct OperatorRegistry {
    operators: HashMap<char, OperatorSpec>,
}

impl OperatorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        OperatorRegistry {
            operators: HashMap::new(),
        }
    }

    /// Registry with `+ - * /` declared.
    pub fn arithmetic() -> Self {
        let mut registry = Self::new();
        for (symbol, precedence, associativity, apply) in ARITHMETIC {
            registry.register(symbol, precedence, associativity, apply);
        }
        registry
    }

    /// Register (or replace) an operator.
    pub fn register(
        &mut self,
        symbol: char,
        precedence: u8,
        associativity: Associativity,
        apply: ApplyFn,
    ) {
        self.operators.insert(
            symbol,
            OperatorSpec {
                symbol,
                precedence,
                associativity,
                apply,
            },
        );
    }

    pub fn lookup(&self, symbol: char) -> FormulaResult<OperatorSpec> {
        self.operators
            .get(&symbol)
            .copied()
            .ok_or(FormulaError::UnsupportedOperator(symbol))
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.operators.contains_key(&symbol)
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::arithmetic()
    }
}
