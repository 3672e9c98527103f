//! Syntax: terms and logic variables.

mod term;
mod variable;

pub use term::{Atom, Shape, Slice, Term};
pub use variable::{
    dispatch_shape, is_variable, var, vars, with_variables, Token, Var, VariableScope,
};
