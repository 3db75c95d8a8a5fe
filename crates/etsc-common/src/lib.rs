#![allow(clippy::too_many_arguments, clippy::collapsible_if, clippy::collapsible_else_if,
         clippy::manual_range_contains, clippy::comparison_chain, clippy::float_cmp)]

pub mod q_shared;
pub mod common;
pub mod cvar;
pub mod keys;
