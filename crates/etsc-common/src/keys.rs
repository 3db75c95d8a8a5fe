// keys.rs — key codes and key catcher bits shared with the host input layer

// ============================================================
// Key constants (from keycodes.h)
// ============================================================

pub const K_TAB: i32 = 9;
pub const K_ENTER: i32 = 13;
pub const K_ESCAPE: i32 = 27;
pub const K_SPACE: i32 = 32;
pub const K_BACKSPACE: i32 = 127;
pub const K_COMMAND: i32 = 128;
pub const K_CAPSLOCK: i32 = 129;
pub const K_POWER: i32 = 130;
pub const K_PAUSE: i32 = 131;
pub const K_UPARROW: i32 = 132;
pub const K_DOWNARROW: i32 = 133;
pub const K_LEFTARROW: i32 = 134;
pub const K_RIGHTARROW: i32 = 135;
pub const K_ALT: i32 = 136;
pub const K_CTRL: i32 = 137;
pub const K_SHIFT: i32 = 138;
pub const K_INS: i32 = 139;
pub const K_DEL: i32 = 140;
pub const K_PGDN: i32 = 141;
pub const K_PGUP: i32 = 142;
pub const K_HOME: i32 = 143;
pub const K_END: i32 = 144;
pub const K_F1: i32 = 145;
pub const K_F2: i32 = 146;
pub const K_F3: i32 = 147;
pub const K_F4: i32 = 148;
pub const K_F5: i32 = 149;
pub const K_F6: i32 = 150;
pub const K_F7: i32 = 151;
pub const K_F8: i32 = 152;
pub const K_F9: i32 = 153;
pub const K_F10: i32 = 154;
pub const K_F11: i32 = 155;
pub const K_F12: i32 = 156;

/// Set on key events that carry a translated character rather than a key.
pub const K_CHAR_FLAG: i32 = 1024;

/// Zero-based function key number for F1..F12, `None` for anything else.
pub fn function_key_index(key: i32) -> Option<usize> {
    if (K_F1..=K_F12).contains(&key) {
        Some((key - K_F1) as usize)
    } else {
        None
    }
}

bitflags::bitflags! {
    /// Which subsystem receives key events.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct KeyCatch: i32 {
        const CONSOLE = 0x0001;
        const UI      = 0x0002;
        const MESSAGE = 0x0004;
        const CGAME   = 0x0008;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_key_index() {
        assert_eq!(function_key_index(K_F1), Some(0));
        assert_eq!(function_key_index(K_F12), Some(11));
        assert_eq!(function_key_index(K_END), None);
        assert_eq!(function_key_index(K_F12 + 1), None);
        assert_eq!(function_key_index(K_F1 | K_CHAR_FLAG), None);
    }

    #[test]
    fn test_key_catch_bits() {
        let catcher = KeyCatch::UI | KeyCatch::CGAME;
        assert!(catcher.contains(KeyCatch::UI));
        assert_eq!((catcher - KeyCatch::CGAME), KeyCatch::UI);
        assert_eq!(KeyCatch::from_bits_truncate(0x0a), catcher);
    }
}
