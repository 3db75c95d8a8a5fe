#![allow(clippy::too_many_arguments, clippy::collapsible_if, clippy::collapsible_else_if,
         clippy::manual_range_contains, clippy::comparison_chain, clippy::float_cmp,
         clippy::field_reassign_with_default)]
// Client game module — shoutcaster overlay
pub mod bg_misc;
pub mod cg_local;
pub mod cg_syscalls;
pub mod cg_draw;
pub mod cg_players;
pub mod cg_event;
pub mod cg_shoutcast;

#[cfg(test)]
pub mod testing;
