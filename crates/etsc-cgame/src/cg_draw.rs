// cg_draw.rs — 2D drawing primitives for the HUD
//
// All coordinates are in the 640x480 virtual screen, widened horizontally by
// `Cgs::adr43`. The renderer does the final scaling.

use etsc_common::q_shared::{vector4_average, QHandle, Vec4};

// ============================================================
// Rendering callback trait (to be provided by the renderer)
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// limboFont1, used for the match clock.
    Header,
    /// limboFont2, used for everything else.
    Text,
}

pub trait Renderer {
    /// Tint for subsequent pics. `None` resets to opaque white.
    fn set_color(&mut self, color: Option<&Vec4>);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: &Vec4);
    /// A negative width mirrors the image horizontally.
    fn draw_pic(&mut self, x: f32, y: f32, w: f32, h: f32, shader: QHandle);

    /// Width of the first `limit` printable chars (0 for all), color escapes skipped.
    fn text_width(&self, text: &str, scale: f32, limit: usize, font: Font) -> f32;
    fn text_height(&self, text: &str, scale: f32, limit: usize, font: Font) -> f32;
    /// `y` is the text baseline.
    fn text_paint(&mut self, x: f32, y: f32, scale: f32, color: &Vec4, text: &str, limit: usize, font: Font);

    /// Country flag of a client, from the GeoIP lookup on the server.
    fn draw_country_flag(&mut self, x: f32, y: f32, scale: f32, client_num: i32);
}

// ============================================================
// Rectangles
// ============================================================

/// CG_DrawRect_FixedBorder — outline of `border` units drawn inside the box.
pub fn draw_rect_fixed_border(r: &mut dyn Renderer, x: f32, y: f32, w: f32, h: f32, border: f32, color: &Vec4) {
    r.fill_rect(x, y, w, border, color);
    r.fill_rect(x, y + h - border, w, border, color);
    r.fill_rect(x, y, border, h, color);
    r.fill_rect(x + w - border, y, border, h, color);
}

// ============================================================
// Bars
// ============================================================

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct BarFlags: u32 {
        /// Grow from the right edge (top edge when vertical).
        const LEFT            = 0x0001;
        const CENTER          = 0x0002;
        const VERT            = 0x0004;
        const BG              = 0x0010;
        const BGSPACING_X0Y5  = 0x0020;
        const BGSPACING_X0Y0  = 0x0040;
        /// Blend start to end color by the fill fraction.
        const LERP_COLOR      = 0x0100;
    }
}

const BAR_DEFAULT_BG: Vec4 = [1.0, 1.0, 1.0, 0.25];
const BAR_INDENT: f32 = 2.0;

/// CG_FilledBar — a bar filled to `frac`, clamped to [0, 1].
#[allow(clippy::too_many_arguments)]
pub fn filled_bar(
    r: &mut dyn Renderer,
    mut x: f32,
    mut y: f32,
    mut w: f32,
    mut h: f32,
    start_color: &Vec4,
    end_color: Option<&Vec4>,
    bg_color: Option<&Vec4>,
    frac: f32,
    flags: BarFlags,
) {
    let frac = if frac.is_nan() { 0.0 } else { frac.clamp(0.0, 1.0) };

    if flags.contains(BarFlags::BG) {
        r.fill_rect(x, y, w, h, bg_color.unwrap_or(&BAR_DEFAULT_BG));

        // X0Y0 fills the whole background
        if !flags.contains(BarFlags::BGSPACING_X0Y0) {
            if flags.contains(BarFlags::BGSPACING_X0Y5) {
                y += 5.0;
                h -= 10.0;
            } else {
                x += BAR_INDENT;
                y += BAR_INDENT;
                w -= BAR_INDENT * 2.0;
                h -= BAR_INDENT * 2.0;
            }
        }
    }

    let color = match end_color {
        Some(end) if flags.contains(BarFlags::LERP_COLOR) => vector4_average(start_color, end, frac),
        _ => *start_color,
    };

    if flags.contains(BarFlags::VERT) {
        if flags.contains(BarFlags::LEFT) {
            r.fill_rect(x, y, w, h * frac, &color);
        } else if flags.contains(BarFlags::CENTER) {
            r.fill_rect(x, y + h * (1.0 - frac) / 2.0, w, h * frac, &color);
        } else {
            r.fill_rect(x, y + h * (1.0 - frac), w, h * frac, &color);
        }
    } else if flags.contains(BarFlags::LEFT) {
        r.fill_rect(x + w * (1.0 - frac), y, w * frac, h, &color);
    } else if flags.contains(BarFlags::CENTER) {
        r.fill_rect(x + w * (1.0 - frac) / 2.0, y, w * frac, h, &color);
    } else {
        r.fill_rect(x, y, w * frac, h, &color);
    }
}

/// GradientBar_Paint
pub fn gradient_bar_paint(r: &mut dyn Renderer, x: f32, y: f32, w: f32, h: f32, color: &Vec4, shader: QHandle) {
    r.set_color(Some(color));
    r.draw_pic(x, y, w, h, shader);
    r.set_color(None);
}

// ============================================================
// Colors
// ============================================================

/// CG_GetColorForHealth — white at full health, through yellow to red.
pub fn get_color_for_health(health: i32) -> Vec4 {
    if health <= 0 {
        return [0.0, 0.0, 0.0, 1.0];
    }

    let h = health as f32;
    let b = if health >= 100 {
        1.0
    } else if health < 66 {
        0.0
    } else {
        (h - 66.0) / 33.0
    };
    let g = if health > 60 {
        1.0
    } else if health < 30 {
        0.0
    } else {
        (h - 30.0) / 30.0
    };

    [1.0, g, b, 1.0]
}
