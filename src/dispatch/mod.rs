//! Dispatch: selecting an algorithm from the shapes of its arguments.

mod table;

pub use table::{DispatchError, DispatchTable, Pattern};
