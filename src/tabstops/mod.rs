//! Tabstop handling for expanded abbreviations
//!
//! - `scanner` - parses `${N}` / `${N:default}` tokens into a [`Template`]
//! - `renumber` - assigns collision-free indices and picks the exit point

mod renumber;
mod scanner;

pub use renumber::{
    escape_text, renumber, ExitPoint, Renumbered, RenumberedPlaceholder, FINAL_STOP_MARKER,
};
pub use scanner::{Placeholder, Segment, Template};
