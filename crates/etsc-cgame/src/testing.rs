// testing.rs — recording test doubles for the renderer and host imports

use etsc_common::keys::KeyCatch;
use etsc_common::q_shared::{q_print_strlen, QHandle, Vec4};

use crate::cg_draw::{Font, Renderer};
use crate::cg_syscalls::CgameImport;

/// Advance per printable character at scale 1.
pub const CHAR_WIDTH: f32 = 10.0;
pub const CHAR_HEIGHT: f32 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    SetColor(Option<Vec4>),
    FillRect { x: f32, y: f32, w: f32, h: f32, color: Vec4 },
    Pic { x: f32, y: f32, w: f32, h: f32, shader: QHandle },
    Text { x: f32, y: f32, scale: f32, color: Vec4, text: String, limit: usize, font: Font },
    CountryFlag { x: f32, y: f32, client_num: i32 },
}

/// Stores every draw call. Text is measured as a fixed-width font.
#[derive(Default)]
pub struct RecordingRenderer {
    pub calls: Vec<DrawCall>,
}

impl RecordingRenderer {
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn find_text(&self, needle: &str) -> Option<&DrawCall> {
        self.calls
            .iter()
            .find(|c| matches!(c, DrawCall::Text { text, .. } if text == needle))
    }

    pub fn pics(&self) -> Vec<QHandle> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Pic { shader, .. } => Some(*shader),
                _ => None,
            })
            .collect()
    }

    pub fn has_pic(&self, shader: QHandle) -> bool {
        self.pics().contains(&shader)
    }
}

fn printable_len(text: &str, limit: usize) -> usize {
    let len = q_print_strlen(text);
    if limit > 0 { len.min(limit) } else { len }
}

impl Renderer for RecordingRenderer {
    fn set_color(&mut self, color: Option<&Vec4>) {
        self.calls.push(DrawCall::SetColor(color.copied()));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: &Vec4) {
        self.calls.push(DrawCall::FillRect { x, y, w, h, color: *color });
    }

    fn draw_pic(&mut self, x: f32, y: f32, w: f32, h: f32, shader: QHandle) {
        self.calls.push(DrawCall::Pic { x, y, w, h, shader });
    }

    fn text_width(&self, text: &str, scale: f32, limit: usize, _font: Font) -> f32 {
        printable_len(text, limit) as f32 * CHAR_WIDTH * scale
    }

    fn text_height(&self, text: &str, scale: f32, _limit: usize, _font: Font) -> f32 {
        if text.is_empty() { 0.0 } else { CHAR_HEIGHT * scale }
    }

    fn text_paint(&mut self, x: f32, y: f32, scale: f32, color: &Vec4, text: &str, limit: usize, font: Font) {
        self.calls.push(DrawCall::Text {
            x,
            y,
            scale,
            color: *color,
            text: text.to_string(),
            limit,
            font,
        });
    }

    fn draw_country_flag(&mut self, x: f32, y: f32, _scale: f32, client_num: i32) {
        self.calls.push(DrawCall::CountryFlag { x, y, client_num });
    }
}

/// Records outgoing commands and owns a key catcher.
#[derive(Default)]
pub struct RecordingImports {
    pub commands: Vec<String>,
    pub catcher: KeyCatch,
}

impl CgameImport for RecordingImports {
    fn send_client_command(&mut self, cmd: &str) {
        self.commands.push(cmd.to_string());
    }

    fn key_get_catcher(&self) -> KeyCatch {
        self.catcher
    }

    fn key_set_catcher(&mut self, catcher: KeyCatch) {
        self.catcher = catcher;
    }
}
