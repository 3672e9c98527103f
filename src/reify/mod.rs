//! Reification: resolving the bound logic variables of a term.

mod reify;

pub(crate) use reify::{FreeVariables, GroundCheck};
pub use reify::{free_variables, is_ground, reify, ReifyAlgorithm, ReifyTable};
