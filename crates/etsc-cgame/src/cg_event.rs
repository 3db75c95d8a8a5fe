// cg_event.rs — cgame event handling mode and key routing

use etsc_common::keys::KeyCatch;

use crate::cg_local::{Cg, Cgs};
use crate::cg_shoutcast::{check_key_catcher, Shoutcast};
use crate::cg_syscalls::CgameImport;

/// Which cgame feature currently owns key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventHandling {
    #[default]
    None,
    Shoutcast,
}

/// CG_EventHandling
pub fn event_handling(cgs: &mut Cgs, imports: &mut dyn CgameImport, kind: EventHandling) {
    match kind {
        EventHandling::None => {
            let catcher = imports.key_get_catcher();
            imports.key_set_catcher(catcher - KeyCatch::CGAME);
        }
        EventHandling::Shoutcast => {
            imports.key_set_catcher(KeyCatch::CGAME);
        }
    }

    if cgs.event_handling != kind {
        tracing::debug!(from = ?cgs.event_handling, to = ?kind, "event handling changed");
    }
    cgs.event_handling = kind;
}

/// CG_KeyEvent — a key routed to the cgame because KEYCATCH_CGAME is set.
pub fn key_event(
    overlay: &Shoutcast,
    cgs: &Cgs,
    imports: &mut dyn CgameImport,
    key: i32,
    down: bool,
) {
    match cgs.event_handling {
        EventHandling::Shoutcast => overlay.key_handling(imports, key, down),
        EventHandling::None => {}
    }
}

/// CG_KeyCatcherChanged — notification from the host after the catcher changed.
pub fn key_catcher_changed(cg: &mut Cg, cgs: &mut Cgs, imports: &mut dyn CgameImport, catcher: KeyCatch) {
    check_key_catcher(cg, cgs, imports, catcher);
    cg.last_key_catcher = catcher;
}
