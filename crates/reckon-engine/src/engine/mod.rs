//! Formula engine API.
//!
//! This module provides the formula pipeline for the spreadsheet:
//!
//! - [`Tokenizer`], [`Token`] - Split formula text into tokens
//! - [`OperatorRegistry`] - Symbol → precedence/associativity/evaluation table
//! - [`to_postfix`] - Shunting-yard conversion to postfix order
//! - [`ExpressionTree`], [`Expr`], [`Bindings`] - Expression trees and variable values
//! - [`CellRef`] - Cell reference parsing (A1 notation ↔ row/col indices)
//! - [`extract_dependencies`] - Parse formula dependencies
//! - [`find_cycle`] - Circular dependency detection
//! - [`format_number`] - Canonical number formatting

mod cell_ref;
mod cycle;
mod deps;
mod error;
mod expr;
mod format;
mod operators;
mod shunting_yard;
mod tokenizer;

pub use cell_ref::CellRef;
pub use cycle::find_cycle;
pub use deps::extract_dependencies;
pub use error::{FormulaError, FormulaResult};
pub use expr::{Bindings, Expr, ExpressionTree};
pub use format::format_number;
pub use operators::{ApplyFn, Associativity, OperatorRegistry, OperatorSpec};
pub use shunting_yard::to_postfix;
pub use tokenizer::{Token, Tokenizer, tokenize};
