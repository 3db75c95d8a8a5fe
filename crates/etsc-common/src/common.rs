// common.rs — console print plumbing shared by the cgame and the host

// ============================================================
// Com_Printf / Com_DPrintf
// ============================================================

/// Console print on the `console` tracing target.
pub fn com_printf(msg: &str) {
    tracing::info!(target: "console", "{}", msg.trim_end_matches('\n'));
}

/// Developer-only print. Filtered by the subscriber's level instead of a cvar.
pub fn com_dprintf(msg: &str) {
    tracing::debug!(target: "console", "{}", msg.trim_end_matches('\n'));
}
