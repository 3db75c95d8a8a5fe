// cg_syscalls.rs — calls from the cgame back into the host client

use etsc_common::keys::KeyCatch;

// ============================================================
// Host callback trait (to be provided by the client)
// ============================================================

/// Services the host client offers the cgame outside of rendering.
pub trait CgameImport {
    /// Queue a reliable command string for the server.
    fn send_client_command(&mut self, cmd: &str);

    fn key_get_catcher(&self) -> KeyCatch;
    fn key_set_catcher(&mut self, catcher: KeyCatch);

    /// Localize a UI string. Identity when no translation table is loaded.
    fn translate_string(&self, s: &str) -> String {
        s.to_string()
    }
}
