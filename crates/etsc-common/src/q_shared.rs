// q_shared.rs — foundational types and functions shared by all modules

// ============================================================
// Basic types
// ============================================================

pub type Vec4 = [f32; 4];

/// Renderer handle for a registered shader/image. 0 means "nothing".
pub type QHandle = i32;

pub const MAX_CLIENTS: usize = 64;
pub const MAX_NAME_LENGTH: usize = 36;

/// Virtual screen the 2D HUD is laid out in, before widescreen adjustment.
pub const SCREEN_WIDTH: f32 = 640.0;
pub const SCREEN_HEIGHT: f32 = 480.0;

pub const M_TAU_F: f32 = std::f32::consts::TAU;

// ============================================================
// Colors
// ============================================================

pub const COLOR_BLACK: Vec4 = [0.0, 0.0, 0.0, 1.0];
pub const COLOR_RED: Vec4 = [1.0, 0.0, 0.0, 1.0];
pub const COLOR_GREEN: Vec4 = [0.0, 1.0, 0.0, 1.0];
pub const COLOR_YELLOW: Vec4 = [1.0, 1.0, 0.0, 1.0];
pub const COLOR_WHITE: Vec4 = [1.0, 1.0, 1.0, 1.0];
pub const COLOR_LT_GREY: Vec4 = [0.75, 0.75, 0.75, 1.0];
pub const COLOR_MD_GREY: Vec4 = [0.5, 0.5, 0.5, 1.0];
pub const COLOR_MD_RED: Vec4 = [0.5, 0.0, 0.0, 1.0];
pub const COLOR_MD_GREEN: Vec4 = [0.0, 0.5, 0.0, 1.0];

/// Linear blend: `v1 * (1 - blend) + v2 * blend`. Blend is not clamped.
pub fn vector4_average(v1: &Vec4, v2: &Vec4, blend: f32) -> Vec4 {
    let b1 = 1.0 - blend;
    [
        v1[0] * b1 + v2[0] * blend,
        v1[1] * b1 + v2[1] * blend,
        v1[2] * b1 + v2[2] * blend,
        v1[3] * b1 + v2[3] * blend,
    ]
}

// ============================================================
// Color strings
// ============================================================

pub const Q_COLOR_ESCAPE: char = '^';

/// True when `s` starts with a color escape sequence (`^` followed by a non-`^` char).
pub fn q_is_color_string(s: &str) -> bool {
    let mut chars = s.chars();
    matches!((chars.next(), chars.next()), (Some(Q_COLOR_ESCAPE), Some(c)) if c != Q_COLOR_ESCAPE)
}

/// Number of printable characters, skipping color escapes.
pub fn q_print_strlen(s: &str) -> usize {
    let mut len = 0;
    let mut rest = s;
    while let Some(c) = rest.chars().next() {
        if q_is_color_string(rest) {
            // escape char plus the code char
            let code_len = rest[1..].chars().next().map_or(0, char::len_utf8);
            rest = &rest[1 + code_len..];
            continue;
        }
        len += 1;
        rest = &rest[c.len_utf8()..];
    }
    len
}

/// Remove all color escapes.
pub fn q_clean_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(c) = rest.chars().next() {
        if q_is_color_string(rest) {
            let code_len = rest[1..].chars().next().map_or(0, char::len_utf8);
            rest = &rest[1 + code_len..];
            continue;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// Prefix `input` with `^<color_code>`, keeping the result within
/// `out_buffer_len - 1` bytes like the fixed name buffers of the HUD.
pub fn q_colorize_string(color_code: char, input: &str, out_buffer_len: usize) -> String {
    let max_len = out_buffer_len.saturating_sub(1);
    let mut out = String::with_capacity(max_len);

    if max_len < 2 {
        return out;
    }

    out.push(Q_COLOR_ESCAPE);
    out.push(color_code);

    for c in input.chars() {
        if out.len() + c.len_utf8() > max_len {
            break;
        }
        out.push(c);
    }
    out
}

// ============================================================
// Cvar flags
// ============================================================

pub const CVAR_ARCHIVE: i32 = 1;
pub const CVAR_USERINFO: i32 = 2;
pub const CVAR_SERVERINFO: i32 = 4;
pub const CVAR_ROM: i32 = 64;
