// cg_shoutcast.rs — shoutcaster overlay
//
// Player cards for both teams, the followed player's status panel, the match
// clock with team banners, the objective indicator and F1-F12 follow keys.

use etsc_common::common::com_printf;
use etsc_common::cvar::{with_cvar_ctx, CvarContext};
use etsc_common::keys::{function_key_index, KeyCatch, K_CHAR_FLAG, K_ESCAPE};
use etsc_common::q_shared::{
    q_colorize_string, q_print_strlen, vector4_average, Vec4, COLOR_BLACK, COLOR_LT_GREY,
    COLOR_MD_GREEN, COLOR_MD_GREY, COLOR_MD_RED, COLOR_RED, COLOR_WHITE, COLOR_YELLOW, CVAR_ARCHIVE,
    MAX_NAME_LENGTH, M_TAU_F, SCREEN_HEIGHT,
};

use crate::bg_misc::{
    is_skill_available, is_valid_weapon, skill_num_for_class, EntityFlags, GameState, GameType,
    PlayerClass, PmFlags, PmType, PowerupBits, Team, WeaponAttributes, PW_ADRENALINE, PW_BLUEFLAG,
    PW_INVULNERABLE, PW_OPS_DISGUISED, PW_REDFLAG, SPRINTTIME, WP_ARTY, WP_BINOCULARS,
};
use crate::cg_draw::{
    draw_rect_fixed_border, filled_bar, get_color_for_health, gradient_bar_paint, BarFlags, Font,
    Renderer,
};
use crate::cg_event::{event_handling, EventHandling};
use crate::cg_local::{Cg, Cgs, ClientInfo, GameStats, PlayerState, ShowState, WeaponInfo};
use crate::cg_players::{calculate_shoutcaster_reinf_time, get_player_current_weapon, get_player_max_health};
use crate::cg_syscalls::CgameImport;

// ============================================================
// Layout
// ============================================================

/// Cards per team.
pub const MAX_PLAYERS: usize = 6;

const PLAYER_LIST_STATUS_WIDTH: f32 = 28.0;
const PLAYER_LIST_STATUS_HEIGHT: f32 = 28.0;

const PLAYER_LIST_WIDTH: f32 = 142.0;
const PLAYER_LIST_HEIGHT: f32 = 28.0;
const PLAYER_LIST_X: f32 = 15.0;
const PLAYER_LIST_Y: f32 = SCREEN_HEIGHT - 180.0;

const PLAYER_STATUS_NAMEBOX_WIDTH: f32 = 150.0;
const PLAYER_STATUS_NAMEBOX_HEIGHT: f32 = 16.0;
const PLAYER_STATUS_NAMEBOX_Y: f32 = SCREEN_HEIGHT - 75.0;

const PLAYER_STATUS_STATSBOX_WIDTH: f32 = 224.0;
const PLAYER_STATUS_STATSBOX_HEIGHT: f32 = 20.0;
const PLAYER_STATUS_STATSBOX_Y: f32 = PLAYER_STATUS_NAMEBOX_Y + PLAYER_STATUS_NAMEBOX_HEIGHT;

const MINIMAP_HEIGHT: f32 = 150.0;
const MINIMAP_Y: f32 = 31.0;

const GAMETIME_WIDTH: f32 = 60.0;
const GAMETIME_HEIGHT: f32 = 30.0;
const GAMETIME_Y: f32 = 12.0;

const TEAMNAMES_WIDTH: f32 = 190.0;
const TEAMNAMES_HEIGHT: f32 = GAMETIME_HEIGHT;
const TEAMNAME_MAX_WIDTH: f32 = 174.0;
const TEAMNAME_MAX_CHARS: usize = 20;

const POWERUPS_WIDTH: f32 = 36.0;
const POWERUPS_HEIGHT: f32 = 36.0;
const POWERUPS_Y: f32 = MINIMAP_Y + MINIMAP_HEIGHT + 5.0;

const NAME_MAX_CHARS: usize = 20;
const NAME_BUFFER_LEN: usize = MAX_NAME_LENGTH + 2;

/// Minimum time between two `sgstats` requests.
const STATS_REQUEST_INTERVAL: i32 = 2000;

pub const COLOR_BG: Vec4 = [0.0, 0.0, 0.0, 0.7];
pub const COLOR_ALLIES: Vec4 = [0.121, 0.447, 0.811, 0.45];
pub const COLOR_AXIS: Vec4 = [0.749, 0.129, 0.129, 0.45];

fn namebox_x(cgs: &Cgs) -> f32 {
    let w = cgs.screen_width();
    w - w / 2.0 - PLAYER_STATUS_NAMEBOX_WIDTH / 2.0
}

fn statsbox_x(cgs: &Cgs) -> f32 {
    let w = cgs.screen_width();
    w - w / 2.0 - PLAYER_STATUS_STATSBOX_WIDTH / 2.0
}

fn gametime_x(cgs: &Cgs) -> f32 {
    cgs.screen_width() / 2.0 - GAMETIME_WIDTH / 2.0
}

fn powerups_x(cgs: &Cgs) -> f32 {
    cgs.screen_width() - POWERUPS_WIDTH - PLAYER_LIST_X
}

// ============================================================
// Configuration
// ============================================================

/// Overlay settings backed by cvars.
#[derive(Debug, Clone)]
pub struct ShoutcastConfig {
    /// cg_shoutcastDrawPlayers
    pub draw_players: bool,
    /// cg_shoutcastDrawTeamNames
    pub draw_team_names: bool,
    /// cg_shoutcastTeamNameRed, empty for the default "Axis".
    pub team_name_red: String,
    /// cg_shoutcastTeamNameBlue, empty for the default "Allies".
    pub team_name_blue: String,
}

impl Default for ShoutcastConfig {
    fn default() -> Self {
        Self {
            draw_players: true,
            draw_team_names: true,
            team_name_red: String::new(),
            team_name_blue: String::new(),
        }
    }
}

impl ShoutcastConfig {
    /// Create the overlay cvars with their defaults.
    pub fn register_cvars(ctx: &mut CvarContext) {
        ctx.get("cg_shoutcastDrawPlayers", "1", CVAR_ARCHIVE);
        ctx.get("cg_shoutcastDrawTeamNames", "1", CVAR_ARCHIVE);
        ctx.get("cg_shoutcastTeamNameRed", "", CVAR_ARCHIVE);
        ctx.get("cg_shoutcastTeamNameBlue", "", CVAR_ARCHIVE);
        tracing::info!("registered shoutcast cvars");
    }

    pub fn update_from(&mut self, ctx: &CvarContext) {
        self.draw_players = ctx.variable_integer("cg_shoutcastDrawPlayers") != 0;
        self.draw_team_names = ctx.variable_integer("cg_shoutcastDrawTeamNames") != 0;
        self.team_name_red = ctx.variable_string("cg_shoutcastTeamNameRed").to_string();
        self.team_name_blue = ctx.variable_string("cg_shoutcastTeamNameBlue").to_string();
    }

    /// Refresh from the global cvar table. Keeps the current values if
    /// the cvar system is not running.
    pub fn update_from_cvars(&mut self) {
        with_cvar_ctx(|ctx| self.update_from(ctx));
    }
}

// ============================================================
// Slot table
// ============================================================

/// Client drawn at each card position, axis in 0..6 and allies in 6..12.
/// Entries are overwritten as cards are drawn and never cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerSlots(pub [i32; MAX_PLAYERS * 2]);

impl PlayerSlots {
    pub fn get(&self, slot: usize) -> Option<i32> {
        self.0.get(slot).copied()
    }
}

// ============================================================
// Overlay
// ============================================================

#[derive(Debug, Clone, Default)]
pub struct Shoutcast {
    pub config: ShoutcastConfig,
    pub slots: PlayerSlots,
}

/// Stat columns of the status panel: label, left pad, advance pad, value color.
const STAT_COLUMNS: [(&str, f32, f32, Vec4); 5] = [
    ("K", 6.0, 6.0, COLOR_WHITE),
    ("D", 6.0, 6.0, COLOR_WHITE),
    ("SK", 4.0, 4.0, COLOR_WHITE),
    ("DG", 15.0, 15.0, COLOR_MD_GREEN),
    ("DR", 7.0, 5.0, COLOR_RED),
];

impl Shoutcast {
    pub fn new(config: ShoutcastConfig) -> Self {
        Self { config, slots: PlayerSlots::default() }
    }

    /// Per-frame entry point while the local client is a shoutcaster.
    pub fn draw_overlay(&mut self, r: &mut dyn Renderer, cg: &Cg, cgs: &mut Cgs, imports: &mut dyn CgameImport) {
        if !cgs.is_shoutcaster(cg.client_num) {
            return;
        }

        self.draw_timer(r, cg, cgs, imports);

        if self.config.draw_players {
            self.draw_player_list(r, cg, cgs);
        }

        if cg.snap.ps.pm_flags.contains(PmFlags::FOLLOW) {
            self.draw_player_status(r, cg, cgs, imports);
        }

        self.draw_powerups(r, cg, cgs);
    }

    // --------------------------------------------------------
    // Player cards
    // --------------------------------------------------------

    /// Left side card. The HP bar grows from the status swatch.
    pub fn draw_player_card_axis(&self, r: &mut dyn Renderer, cg: &Cg, cgs: &Cgs, player: &ClientInfo, x: f32, y: f32, index: usize) {
        let border = card_border_color(player);
        let row_y = y + PLAYER_LIST_HEIGHT * 0.75;

        r.fill_rect(x, y, PLAYER_LIST_WIDTH, PLAYER_LIST_HEIGHT, &COLOR_BG);
        r.fill_rect(x, y, PLAYER_LIST_STATUS_WIDTH, PLAYER_LIST_STATUS_HEIGHT, &COLOR_AXIS);
        draw_rect_fixed_border(r, x, y, PLAYER_LIST_STATUS_WIDTH, PLAYER_LIST_STATUS_HEIGHT, 2.0, &border);
        draw_rect_fixed_border(
            r,
            x + PLAYER_LIST_STATUS_WIDTH - 0.75,
            y,
            PLAYER_LIST_WIDTH - PLAYER_LIST_STATUS_WIDTH + 0.5,
            PLAYER_LIST_HEIGHT / 2.0,
            2.0,
            &border,
        );
        draw_rect_fixed_border(r, x, y, PLAYER_LIST_WIDTH, PLAYER_LIST_HEIGHT, 2.0, outer_border_color(cg, player, &border));

        let frac = health_fraction(cgs, player);
        filled_bar(
            r,
            x + PLAYER_LIST_STATUS_WIDTH,
            y + 1.0,
            PLAYER_LIST_WIDTH - PLAYER_LIST_STATUS_WIDTH - 1.0,
            PLAYER_LIST_HEIGHT / 2.0 - 1.75,
            &COLOR_AXIS,
            Some(&COLOR_AXIS),
            Some(&COLOR_BG),
            frac,
            BarFlags::BGSPACING_X0Y0,
        );

        draw_card_health(r, cgs, player, x + PLAYER_LIST_STATUS_WIDTH / 2.0, y);

        let name = card_name(player);
        let th = r.text_height(&name, 0.16, 0, Font::Text);
        r.text_paint(
            x + PLAYER_LIST_STATUS_WIDTH + 1.0,
            y + PLAYER_LIST_HEIGHT / 4.0 + th / 2.0,
            0.16,
            &COLOR_WHITE,
            &name,
            NAME_MAX_CHARS,
            Font::Text,
        );

        let bind = format!("(F{})", index + 1);
        let tw = r.text_width(&bind, 0.12, 0, Font::Text);
        r.text_paint(
            x + PLAYER_LIST_WIDTH - tw - 2.0,
            y + PLAYER_LIST_HEIGHT / 4.0 + 2.0,
            0.12,
            follow_bind_color(player),
            &bind,
            0,
            Font::Text,
        );

        // class, then the class taken on respawn
        let mut bx = x;
        r.draw_pic(bx + PLAYER_LIST_STATUS_WIDTH + 4.0, row_y - 6.0, 12.0, 12.0, class_icon(cgs, player.cls));
        bx += PLAYER_LIST_STATUS_WIDTH + 16.0;

        if player.cls != player.latched_cls {
            let tw = r.text_width("->", 0.2, 0, Font::Text);
            let th = r.text_height("->", 0.2, 0, Font::Text);
            r.text_paint(bx, row_y + th / 2.0 + 0.5, 0.2, &COLOR_YELLOW, "->", 0, Font::Text);
            bx += tw;
            r.draw_pic(bx + 1.0, row_y - 6.0, 12.0, 12.0, class_icon(cgs, player.latched_cls));
        }

        // powerups stack leftwards from the right edge
        let mut bx = x + PLAYER_LIST_WIDTH;
        for shader in card_powerup_icons(cgs, player) {
            r.draw_pic(bx - 14.0, row_y - 6.5, 12.0, 12.0, shader);
            bx -= 14.0;
        }

        if let Some((info, icon)) = current_weapon_icon(cgs, player.client_num) {
            let weap_scale = (info.weapon_icon_scale * 10) as f32;
            let mut bx = x + PLAYER_LIST_WIDTH - 63.0;
            if info.weapon_icon_scale == 1 {
                bx += weap_scale;
            }
            r.draw_pic(bx, row_y - 5.0, -weap_scale, 10.0, icon);
        }
    }

    /// Right side card, mirrored: the swatch sits on the right.
    pub fn draw_player_card_allies(&self, r: &mut dyn Renderer, cg: &Cg, cgs: &Cgs, player: &ClientInfo, x: f32, y: f32, index: usize) {
        let border = card_border_color(player);
        let row_y = y + PLAYER_LIST_HEIGHT * 0.75;
        let swatch_x = x + PLAYER_LIST_WIDTH - PLAYER_LIST_STATUS_WIDTH;

        r.fill_rect(x + 0.75, y, PLAYER_LIST_WIDTH - 1.0, PLAYER_LIST_HEIGHT, &COLOR_BG);
        r.fill_rect(swatch_x, y, PLAYER_LIST_STATUS_WIDTH, PLAYER_LIST_STATUS_HEIGHT, &COLOR_ALLIES);
        draw_rect_fixed_border(r, swatch_x, y, PLAYER_LIST_STATUS_WIDTH, PLAYER_LIST_STATUS_HEIGHT, 2.0, &border);
        draw_rect_fixed_border(
            r,
            x,
            y,
            PLAYER_LIST_WIDTH - PLAYER_LIST_STATUS_WIDTH + 0.75,
            PLAYER_LIST_HEIGHT / 2.0,
            2.0,
            &border,
        );
        draw_rect_fixed_border(r, x, y, PLAYER_LIST_WIDTH, PLAYER_LIST_HEIGHT, 2.0, outer_border_color(cg, player, &border));

        let frac = health_fraction(cgs, player);
        filled_bar(
            r,
            x + 1.0,
            y + 1.0,
            PLAYER_LIST_WIDTH - PLAYER_LIST_STATUS_WIDTH - 1.0,
            PLAYER_LIST_HEIGHT / 2.0 - 1.5,
            &COLOR_ALLIES,
            Some(&COLOR_ALLIES),
            Some(&COLOR_BG),
            frac,
            BarFlags::BGSPACING_X0Y0 | BarFlags::LEFT,
        );

        draw_card_health(r, cgs, player, x + PLAYER_LIST_WIDTH - PLAYER_LIST_STATUS_WIDTH / 2.0, y);

        // right aligned against the swatch
        let name = card_name(player);
        let tw = r.text_width(&name, 0.16, 0, Font::Text).min(116.0);
        let th = r.text_height(&name, 0.16, 0, Font::Text);
        r.text_paint(
            x + PLAYER_LIST_WIDTH - tw - 30.0,
            y + PLAYER_LIST_HEIGHT / 4.0 + th / 2.0,
            0.16,
            &COLOR_WHITE,
            &name,
            NAME_MAX_CHARS,
            Font::Text,
        );

        let bind = format!("(F{})", index + 7);
        r.text_paint(
            x + 1.0,
            y + PLAYER_LIST_HEIGHT / 4.0 + 2.0,
            0.12,
            follow_bind_color(player),
            &bind,
            0,
            Font::Text,
        );

        let mut bx = swatch_x;
        r.draw_pic(bx - 16.0, row_y - 6.0, 12.0, 12.0, class_icon(cgs, player.cls));
        bx -= 16.0;

        if player.cls != player.latched_cls {
            let tw = r.text_width("<-", 0.2, 0, Font::Text);
            let th = r.text_height("<-", 0.2, 0, Font::Text);
            r.text_paint(bx - tw - 1.0, row_y + th / 2.0 + 0.5, 0.2, &COLOR_YELLOW, "<-", 0, Font::Text);
            bx = bx - tw - 1.0;
            r.draw_pic(bx - 12.0, row_y - 6.0, 12.0, 12.0, class_icon(cgs, player.latched_cls));
        }

        let mut bx = x;
        for shader in card_powerup_icons(cgs, player) {
            r.draw_pic(bx + 2.0, row_y - 6.5, 12.0, 12.0, shader);
            bx += 14.0;
        }

        if let Some((info, icon)) = current_weapon_icon(cgs, player.client_num) {
            let weap_scale = (info.weapon_icon_scale * 10) as f32;
            r.draw_pic(x + 43.0, row_y - 5.0, weap_scale, 10.0, icon);
        }
    }

    /// Draw up to six cards per team in client order and record who sits
    /// in which slot.
    pub fn draw_player_list(&mut self, r: &mut dyn Renderer, cg: &Cg, cgs: &Cgs) {
        if cgs.topshots_show == ShowState::On {
            return;
        }

        let mut axis = 0;
        let mut allies = 0;
        let allies_x = cgs.screen_width() - PLAYER_LIST_WIDTH - PLAYER_LIST_X;

        for ci in &cgs.clientinfo {
            if !ci.info_valid || ci.team == Team::Spectator {
                continue;
            }

            if ci.team == Team::Axis && axis < MAX_PLAYERS {
                let y = PLAYER_LIST_Y + (PLAYER_LIST_HEIGHT + 1.0) * axis as f32;
                self.draw_player_card_axis(r, cg, cgs, ci, PLAYER_LIST_X, y, axis);
                self.slots.0[axis] = ci.client_num;
                axis += 1;
            }

            if ci.team == Team::Allies && allies < MAX_PLAYERS {
                let y = PLAYER_LIST_Y + (PLAYER_LIST_HEIGHT + 1.0) * allies as f32;
                self.draw_player_card_allies(r, cg, cgs, ci, allies_x, y, allies);
                self.slots.0[allies + MAX_PLAYERS] = ci.client_num;
                allies += 1;
            }

            if axis >= MAX_PLAYERS && allies >= MAX_PLAYERS {
                break;
            }
        }
    }

    // --------------------------------------------------------
    // Followed player
    // --------------------------------------------------------

    /// Name box and stats box of the followed player, plus the round stats
    /// once the server has answered an `sgstats` request.
    pub fn draw_player_status(&self, r: &mut dyn Renderer, cg: &Cg, cgs: &mut Cgs, imports: &mut dyn CgameImport) {
        if cgs.topshots_show == ShowState::On {
            return;
        }

        let client_num = cg.snap.ps.client_num;
        let Some(player) = cgs.client(client_num) else {
            return;
        };

        self.draw_status_name_box(r, cgs, player);
        self.draw_status_stats_box(r, cg, cgs, player);

        request_player_stats(cg.time, &mut cgs.gamestats, imports, client_num);

        let gs = &cgs.gamestats;
        if gs.has_stats && gs.client_id == client_num {
            draw_round_stats(r, cgs, gs);
        }
    }

    fn draw_status_name_box(&self, r: &mut dyn Renderer, cgs: &Cgs, player: &ClientInfo) {
        let x = namebox_x(cgs);
        let y = PLAYER_STATUS_NAMEBOX_Y;
        let w = PLAYER_STATUS_NAMEBOX_WIDTH;
        let h = PLAYER_STATUS_NAMEBOX_HEIGHT;

        r.fill_rect(x, y, w, h, &COLOR_BG);
        draw_rect_fixed_border(r, x, y, w, h, 2.0, &COLOR_LT_GREY);

        let flag = if player.team == Team::Allies { cgs.media.allied_flag } else { cgs.media.axis_flag };
        r.draw_pic(x + 4.0, y + h / 2.0 - 4.5, 14.0, 9.0, flag);

        let name = q_colorize_string('7', &player.clean_name, NAME_BUFFER_LEN);
        let tw = r.text_width(&name, 0.19, 0, Font::Text).min(110.0);
        let th = r.text_height(&name, 0.19, 0, Font::Text);
        r.text_paint(x + w / 2.0 - tw / 2.0, y + h / 2.0 + th / 2.0, 0.19, &COLOR_WHITE, &name, NAME_MAX_CHARS, Font::Text);

        r.draw_country_flag(x + w - 17.0, y + h / 2.0 - 7.0, 1.0, player.client_num);
    }

    fn draw_status_stats_box(&self, r: &mut dyn Renderer, cg: &Cg, cgs: &Cgs, player: &ClientInfo) {
        let ps = &cg.snap.ps;
        let mut x = statsbox_x(cgs);
        let y = PLAYER_STATUS_STATSBOX_Y;
        let w = PLAYER_STATUS_STATSBOX_WIDTH;
        let h = PLAYER_STATUS_STATSBOX_HEIGHT;

        r.fill_rect(x, y, w, h, &COLOR_BG);
        draw_rect_fixed_border(r, x, y, w, h, 2.0, &COLOR_LT_GREY);

        // powerups trail to the right of the box
        let mut px = x + w;
        for shader in status_powerup_icons(cgs, ps, player) {
            r.draw_pic(px + 3.0, y, 20.0, 20.0, shader);
            px += 23.0;
        }

        self.draw_charge_bar(r, cg, cgs, x, y + h, w / 2.0, 2.0, BarFlags::BG | BarFlags::BGSPACING_X0Y0 | BarFlags::LEFT);
        self.draw_stamina_bar(r, cg, x + w / 2.0, y + h, w / 2.0, 2.0, BarFlags::BG | BarFlags::BGSPACING_X0Y0);

        if let Some(text) = ammo_text(cg.ammo.ammo, cg.ammo.clip) {
            let tw = r.text_width(&text, 0.19, 0, Font::Text);
            r.text_paint(x + w - tw / 2.0 - 16.0, y + h / 2.0 + 2.0, 0.19, &COLOR_WHITE, &text, 0, Font::Text);
        }

        if let Some((info, icon)) = current_weapon_icon(cgs, player.client_num) {
            let weap_scale = (info.weapon_icon_scale * 10) as f32;
            let mut wx = x + w - 50.0;
            if info.weapon_icon_scale == 1 {
                wx += weap_scale;
            }
            r.draw_pic(wx, y + h / 2.0 - 5.0, -weap_scale, 10.0, icon);
        }

        if ps.health > 0 {
            let color = get_color_for_health(ps.health);
            let text = ps.health.to_string();
            let tw = r.text_width(&text, 0.19, 0, Font::Text);
            let th = r.text_height(&text, 0.19, 0, Font::Text);
            r.text_paint(x - tw / 2.0 + 10.0, y + h / 2.0 + th / 2.0, 0.19, &color, &text, 0, Font::Text);
        } else if ps.pm_flags.contains(PmFlags::LIMBO) {
            r.draw_pic(x + 5.0, y + h / 2.0 - 6.0, 12.0, 12.0, cgs.media.score_eliminated_shader);
        } else {
            r.draw_pic(x + 5.0, y + h / 2.0 - 6.0, 12.0, 12.0, cgs.media.medic_icon);
        }

        x += 18.0;
        r.draw_pic(x + 1.0, y + h / 2.0 - 6.0, 12.0, 12.0, class_icon(cgs, player.cls));
        x += 13.0;

        if player.cls != player.latched_cls {
            let tw = r.text_width("->", 0.19, 0, Font::Text);
            let th = r.text_height("->", 0.19, 0, Font::Text);
            r.text_paint(x + 1.0, y + h / 2.0 + th / 2.0 + 1.0, 0.19, &COLOR_YELLOW, "->", 0, Font::Text);
            x += 1.0 + tw;
            r.draw_pic(x + 1.0, y + h / 2.0 - 6.0, 12.0, 12.0, class_icon(cgs, player.latched_cls));
        }
    }

    // --------------------------------------------------------
    // Bars
    // --------------------------------------------------------

    /// Class ability recharge of the followed player.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_charge_bar(&self, r: &mut dyn Renderer, cg: &Cg, cgs: &Cgs, x: f32, y: f32, w: f32, h: f32, flags: BarFlags) {
        let ps = &cg.snap.ps;
        let Some(team) = ps.team.playing_index() else {
            return;
        };

        let charge_time = cg.charge_times.for_class(ps.player_class)[team];
        let elapsed = cg.time - ps.class_weapon_time;
        let Some(frac) = charge_bar_fraction(elapsed, charge_time) else {
            return;
        };

        let color = charge_bar_color(frac, charge_ready(cg, cgs, elapsed, charge_time));
        filled_bar(r, x, y, w, h, &color, None, Some(&COLOR_BG), frac, flags);
    }

    /// Sprint reserve of the followed player.
    pub fn draw_stamina_bar(&self, r: &mut dyn Renderer, cg: &Cg, x: f32, y: f32, w: f32, h: f32, flags: BarFlags) {
        let (frac, color) = stamina_bar(&cg.snap.ps, cg.time);
        filled_bar(r, x, y, w, h, &color, None, Some(&COLOR_BG), frac, flags);
    }

    // --------------------------------------------------------
    // Match clock
    // --------------------------------------------------------

    pub fn draw_timer(&self, r: &mut dyn Renderer, cg: &Cg, cgs: &Cgs, imports: &dyn CgameImport) {
        if cgs.gamestats.show == ShowState::On {
            return;
        }

        let mut color: Vec4 = [0.6, 0.6, 0.6, 1.0];
        let mut rt_axis = String::new();
        let mut rt_allies = String::new();

        let clock = match_clock(cg, cgs);
        match clock {
            MatchClock::Warmup | MatchClock::Expired => color[3] = clock_pulse(cg.time),
            _ => {
                if cgs.gametype != GameType::WolfLms && cgs.is_shoutcaster(cg.client_num) {
                    rt_axis = format!("^1{}", calculate_shoutcaster_reinf_time(cg, cgs, Team::Axis));
                    rt_allies = format!("^${}", calculate_shoutcaster_reinf_time(cg, cgs, Team::Allies));
                }
            }
        }
        let text = clock.text(imports);

        let x = gametime_x(cgs);
        let y = GAMETIME_Y;
        let w = GAMETIME_WIDTH;
        let h = GAMETIME_HEIGHT;

        r.fill_rect(x, y, w, h, &COLOR_BG);
        draw_rect_fixed_border(r, x, y, w, h, 2.0, &COLOR_LT_GREY);

        if !text.is_empty() {
            let tw = r.text_width(&text, 0.23, 0, Font::Header);
            r.text_paint(x + w / 2.0 - tw / 2.0, y + 13.0, 0.23, &color, &text, 0, Font::Header);
        }

        if !rt_axis.is_empty() {
            r.text_paint(x + 3.0, y + h - 5.0, 0.2, &color, &rt_axis, 0, Font::Header);
        }
        if !rt_allies.is_empty() {
            let tw = r.text_width(&rt_allies, 0.2, 0, Font::Header);
            r.text_paint(x + w - tw - 3.0, y + h - 5.0, 0.2, &color, &rt_allies, 0, Font::Header);
        }

        if cgs.gametype == GameType::WolfStopwatch {
            let round = format!("{}/2", cgs.current_round + 1);
            let tw = r.text_width(&round, 0.15, 0, Font::Header);
            r.text_paint(x + w / 2.0 - tw / 2.0, y + h - 5.5, 0.15, &COLOR_WHITE, &round, 0, Font::Header);
        }

        self.draw_team_names(r, cgs);
    }

    /// Team banners either side of the clock.
    pub fn draw_team_names(&self, r: &mut dyn Renderer, cgs: &Cgs) {
        if !self.config.draw_team_names {
            return;
        }

        let gx = gametime_x(cgs);
        let banners = [
            (&self.config.team_name_red, "Axis", gx - TEAMNAMES_WIDTH, &COLOR_AXIS),
            (&self.config.team_name_blue, "Allies", gx + GAMETIME_WIDTH, &COLOR_ALLIES),
        ];

        for (configured, default, x, color) in banners {
            let text = if q_print_strlen(configured) > 0 { configured.as_str() } else { default };
            let y = GAMETIME_Y;

            gradient_bar_paint(r, x, y, TEAMNAMES_WIDTH, TEAMNAMES_HEIGHT, color, cgs.media.gradient_bar);

            let tw = r.text_width(text, 0.3, 0, Font::Text).min(TEAMNAME_MAX_WIDTH);
            let th = r.text_height(text, 0.3, 0, Font::Text);
            let tx = x + TEAMNAMES_WIDTH / 2.0 - tw / 2.0;
            let ty = y + TEAMNAMES_HEIGHT / 2.0 + th / 2.0;

            r.text_paint(tx + 1.35, ty + 1.35, 0.3, &COLOR_BLACK, text, TEAMNAME_MAX_CHARS, Font::Text);
            r.text_paint(tx, ty, 0.3, &COLOR_WHITE, text, TEAMNAME_MAX_CHARS, Font::Text);
        }
    }

    // --------------------------------------------------------
    // Objective indicator
    // --------------------------------------------------------

    /// Held or dropped objective, red flag first.
    pub fn draw_powerups(&self, r: &mut dyn Renderer, cg: &Cg, cgs: &Cgs) {
        let counter = if cg.flag_indicator & (1 << PW_REDFLAG) != 0 {
            cg.red_flag_counter
        } else if cg.flag_indicator & (1 << PW_BLUEFLAG) != 0 {
            cg.blue_flag_counter
        } else {
            return;
        };

        let shader = if counter > 0 {
            cgs.media.objective_team_shader
        } else {
            cgs.media.objective_dropped_shader
        };
        r.draw_pic(powerups_x(cgs), POWERUPS_Y, POWERUPS_WIDTH, POWERUPS_HEIGHT, shader);
    }

    // --------------------------------------------------------
    // Keys
    // --------------------------------------------------------

    pub fn key_handling(&self, imports: &mut dyn CgameImport, key: i32, down: bool) {
        if down {
            self.check_exec_key(key, Some(imports));
        }
    }

    /// True if the overlay handles `key`. With `imports`, F1-F12 also send
    /// the follow command for their slot. Escape is reported as handled so
    /// the menu still opens.
    pub fn check_exec_key(&self, key: i32, imports: Option<&mut dyn CgameImport>) -> bool {
        if key == K_ESCAPE {
            return true;
        }

        if key & K_CHAR_FLAG != 0 {
            return false;
        }

        let Some(slot) = function_key_index(key) else {
            return false;
        };
        let Some(client_num) = self.slots.get(slot) else {
            return false;
        };

        if let Some(imports) = imports {
            tracing::debug!(slot, client_num, "follow key");
            imports.send_client_command(&format!("follow {}", client_num));
        }
        true
    }

    /// Console report of the overlay settings and the slot table.
    pub fn info(&self) -> String {
        let mut out = String::new();
        out.push_str("Shoutcast overlay:\n");
        out.push_str(&format!("  draw players    : {}\n", self.config.draw_players as i32));
        out.push_str(&format!("  draw team names : {}\n", self.config.draw_team_names as i32));
        out.push_str(&format!("  axis name       : \"{}\"\n", self.config.team_name_red));
        out.push_str(&format!("  allies name     : \"{}\"\n", self.config.team_name_blue));
        for (i, client_num) in self.slots.0.iter().enumerate() {
            out.push_str(&format!("  F{:<2} -> client {}\n", i + 1, client_num));
        }

        com_printf(&out);
        out
    }
}

// ============================================================
// Card helpers
// ============================================================

fn card_border_color(player: &ClientInfo) -> Vec4 {
    if player.health > 0 {
        COLOR_LT_GREY
    } else {
        COLOR_BG
    }
}

/// The followed player's card is outlined in yellow.
fn outer_border_color<'a>(cg: &Cg, player: &ClientInfo, border: &'a Vec4) -> &'a Vec4 {
    if cg.snap.ps.client_num == player.client_num {
        &COLOR_YELLOW
    } else {
        border
    }
}

fn follow_bind_color(player: &ClientInfo) -> &'static Vec4 {
    if player.health < 0 {
        &COLOR_MD_GREY
    } else {
        &COLOR_WHITE
    }
}

/// Clean name, greyed out once the player is gibbed.
fn card_name(player: &ClientInfo) -> String {
    let code = if player.health < 0 { '9' } else { '7' };
    q_colorize_string(code, &player.clean_name, NAME_BUFFER_LEN)
}

fn health_fraction(cgs: &Cgs, player: &ClientInfo) -> f32 {
    let max = get_player_max_health(cgs, player.client_num, player.cls, player.team);
    player.health as f32 / max as f32
}

/// Health number, or the medic icon when wounded and the eliminated icon
/// when gibbed. `center_x` is the middle of the status swatch.
fn draw_card_health(r: &mut dyn Renderer, cgs: &Cgs, player: &ClientInfo, center_x: f32, y: f32) {
    let mid_y = y + PLAYER_LIST_HEIGHT / 2.0;

    if player.health > 0 {
        let color = get_color_for_health(player.health);
        let text = player.health.to_string();
        let tw = r.text_width(&text, 0.27, 0, Font::Text);
        r.text_paint(center_x - tw / 2.0 - 0.5, mid_y + 4.0, 0.27, &color, &text, 0, Font::Text);
    } else if player.health == 0 {
        r.draw_pic(center_x - 10.0, mid_y - 10.0, 20.0, 20.0, cgs.media.medic_icon);
    } else {
        r.draw_pic(center_x - 10.0, mid_y - 10.0, 20.0, 20.0, cgs.media.score_eliminated_shader);
    }
}

fn class_icon(cgs: &Cgs, cls: PlayerClass) -> i32 {
    cgs.media.skill_pics[skill_num_for_class(cls) as usize]
}

/// Uniform of the team a covert op is disguised as.
fn disguise_uniform(cgs: &Cgs, team: Team) -> i32 {
    if team == Team::Axis {
        cgs.media.allied_uniform_shader
    } else {
        cgs.media.axis_uniform_shader
    }
}

fn card_powerup_icons(cgs: &Cgs, player: &ClientInfo) -> Vec<i32> {
    let mut icons = Vec::with_capacity(3);
    if player.powerups.intersects(PowerupBits::REDFLAG | PowerupBits::BLUEFLAG) {
        icons.push(cgs.media.objective_shader);
    }
    if player.powerups.contains(PowerupBits::OPS_DISGUISED) {
        icons.push(disguise_uniform(cgs, player.team));
    }
    if player.powerups.contains(PowerupBits::INVULNERABLE) {
        icons.push(cgs.media.spawn_invincible_shader);
    }
    icons
}

fn status_powerup_icons(cgs: &Cgs, ps: &PlayerState, player: &ClientInfo) -> Vec<i32> {
    let mut icons = Vec::with_capacity(3);
    if ps.powerups[PW_REDFLAG] != 0 || ps.powerups[PW_BLUEFLAG] != 0 {
        icons.push(cgs.media.objective_shader);
    }
    if ps.powerups[PW_OPS_DISGUISED] != 0 {
        icons.push(disguise_uniform(cgs, player.team));
    }
    if ps.powerups[PW_INVULNERABLE] != 0 {
        icons.push(cgs.media.spawn_invincible_shader);
    }
    icons
}

/// Icon for the weapon a player holds. Nothing for WP_NONE, invalid
/// weapons or weapons without a registered icon.
fn current_weapon_icon(cgs: &Cgs, client_num: i32) -> Option<(&WeaponInfo, i32)> {
    let weapon = get_player_current_weapon(cgs, client_num)?;
    if !is_valid_weapon(weapon) {
        return None;
    }
    let info = cgs.weapon_info(weapon)?;
    Some((info, info.icon()?))
}

pub fn ammo_text(ammo: i32, clip: i32) -> Option<String> {
    if ammo <= 0 && clip <= 0 {
        return None;
    }
    if clip == -1 {
        Some(ammo.to_string())
    } else {
        Some(format!("{}/{}", ammo, clip))
    }
}

fn draw_round_stats(r: &mut dyn Renderer, cgs: &Cgs, gs: &GameStats) {
    let values = [
        parse_stats(gs.extra(3), 1), // kills
        parse_stats(gs.extra(4), 1), // deaths
        parse_stats(gs.extra(4), 2), // self kills
        parse_stats(gs.extra(0), 1), // damage given
        parse_stats(gs.extra(1), 1), // damage received
    ];

    let mid_y = PLAYER_STATUS_STATSBOX_Y + PLAYER_STATUS_STATSBOX_HEIGHT / 2.0;
    let mut x = statsbox_x(cgs) + 55.0;

    for ((label, pad, advance, color), value) in STAT_COLUMNS.iter().zip(values.iter()) {
        let lw = r.text_width(label, 0.16, 0, Font::Text);
        let lh = r.text_height(label, 0.16, 0, Font::Text);
        r.text_paint(x + pad, mid_y - lh / 2.0, 0.16, &COLOR_MD_GREY, label, 0, Font::Text);

        let vh = r.text_height(value, 0.19, 0, Font::Text);
        let vw = r.text_width(value, 0.19, 0, Font::Text);
        r.text_paint(x + pad + lw / 2.0 - vw / 2.0, mid_y + vh / 2.0 + 4.0, 0.19, color, value, 0, Font::Text);
        x += advance + vw;
    }
}

// ============================================================
// Bar values
// ============================================================

/// Fill fraction of the charge bar, `None` when the class has no charge
/// bar. A zero charge time counts as fully charged.
pub fn charge_bar_fraction(elapsed: i32, charge_time: i32) -> Option<f32> {
    if charge_time < 0 {
        None
    } else if charge_time == 0 {
        Some(1.0)
    } else {
        Some((elapsed as f32 / charge_time as f32).clamp(0.0, 1.0))
    }
}

/// Whether the held weapon (or artillery when a field op is zoomed in)
/// has enough charge to be used. Weapons without a charge cost are
/// always ready.
fn charge_ready(cg: &Cg, cgs: &Cgs, elapsed: i32, charge_time: i32) -> bool {
    let pred = &cg.predicted_player_state;

    let rules = match cgs.weapon_table_data(pred.weapon) {
        Some(wt) if wt.attributes.contains(WeaponAttributes::CHARGE_TIME) => Some(wt),
        _ if (pred.eflags.contains(EntityFlags::ZOOMING) || pred.weapon == WP_BINOCULARS)
            && cgs.client(cg.snap.ps.client_num).is_some_and(|ci| ci.cls == PlayerClass::FieldOps) =>
        {
            cgs.weapon_table_data(WP_ARTY)
        }
        _ => None,
    };

    let Some(wt) = rules else {
        return true;
    };

    let skill = cgs.client(cg.client_num).map(|ci| ci.skill).unwrap_or_default();
    let coeff = wt.charge_time_coeff[is_skill_available(&skill, wt.skill_based, wt.charge_time_skill) as usize];
    elapsed as f32 >= charge_time as f32 * coeff
}

pub fn charge_bar_color(frac: f32, ready: bool) -> Vec4 {
    if ready {
        [1.0, 1.0, frac, 0.25 + frac * 0.5]
    } else {
        [1.0, 0.1, 0.1, 0.5]
    }
}

/// Fill fraction and color of the stamina bar. Adrenaline makes it pulse.
pub fn stamina_bar(ps: &PlayerState, time: i32) -> (f32, Vec4) {
    let frac = ps.sprint_time as f32 / SPRINTTIME;
    let mut color: Vec4 = [0.1, 1.0, 0.1, 0.5];

    let adrenaline = ps.powerups[PW_ADRENALINE];
    if adrenaline != 0 {
        if ps.pm_flags.contains(PmFlags::FOLLOW) {
            let blend = (time as f64 * 0.005).sin() as f32;
            color = vector4_average(&color, &COLOR_WHITE, blend);
        } else {
            let msec = adrenaline - time;
            if msec >= 0 {
                let blend = 0.5 + ((0.2 * (msec as f64).sqrt()) * M_TAU_F as f64).sin() as f32 * 0.5;
                color = vector4_average(&color, &COLOR_MD_RED, blend);
            }
        }
    } else {
        color[0] = 1.0 - frac;
        color[1] = frac;
    }

    (frac, color)
}

// ============================================================
// Match clock values
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchClock {
    Warmup,
    /// A time limit is set and has run out.
    Expired,
    NoLimit,
    Running { mins: i32, tens: i32, secs: i32 },
}

impl MatchClock {
    /// Clock text. The warmup label goes through the host's translation.
    pub fn text(&self, imports: &dyn CgameImport) -> String {
        match self {
            MatchClock::Warmup => format!("^7{}", imports.translate_string("WARMUP")),
            MatchClock::Expired => "^70:00".to_string(),
            MatchClock::NoLimit => String::new(),
            MatchClock::Running { mins, tens, secs } => format!("^7{:2}:{}{}", mins, tens, secs),
        }
    }
}

pub fn match_clock(cg: &Cg, cgs: &Cgs) -> MatchClock {
    let msec = (cgs.timelimit * 60000.0 - (cg.time - cgs.level_start_time) as f32) as i32;

    if cgs.gamestate != GameState::Playing {
        return MatchClock::Warmup;
    }
    if msec < 0 && cgs.timelimit > 0.0 {
        return MatchClock::Expired;
    }
    if cgs.timelimit <= 0.0 {
        return MatchClock::NoLimit;
    }

    let mut seconds = msec / 1000;
    let mins = seconds / 60;
    seconds -= mins * 60;
    let tens = seconds / 10;
    seconds -= tens * 10;

    MatchClock::Running { mins, tens, secs: seconds }
}

/// Alpha for the blinking warmup and expired clock.
fn clock_pulse(time: i32) -> f32 {
    (time as f64 * 0.002).sin().abs() as f32
}

// ============================================================
// Mode and stats plumbing
// ============================================================

/// Give the overlay the keyboard while the viewer is a shoutcaster.
pub fn toggle_shoutcaster_mode(cgs: &mut Cgs, imports: &mut dyn CgameImport, shoutcaster: bool) {
    let kind = if shoutcaster { EventHandling::Shoutcast } else { EventHandling::None };
    event_handling(cgs, imports, kind);
}

/// Take the keyboard back once a menu closes. Only fires on the change
/// away from KEYCATCH_UI, not while no menu was ever open.
pub fn check_key_catcher(cg: &Cg, cgs: &mut Cgs, imports: &mut dyn CgameImport, catcher: KeyCatch) {
    if cgs.is_shoutcaster(cg.client_num)
        && cgs.event_handling == EventHandling::None
        && cg.snap.ps.pm_type != PmType::Intermission
        && !catcher.contains(KeyCatch::UI)
        && cg.last_key_catcher.contains(KeyCatch::UI)
    {
        toggle_shoutcaster_mode(cgs, imports, true);
    }
}

/// Ask the server for round stats of `client_num`, at most once every two
/// seconds. Returns true if a request went out.
pub fn request_player_stats(time: i32, gs: &mut GameStats, imports: &mut dyn CgameImport, client_num: i32) -> bool {
    if gs.request_time >= time {
        return false;
    }

    gs.request_time = time + STATS_REQUEST_INTERVAL;
    imports.send_client_command(&format!("sgstats {}", client_num));
    tracing::debug!(client_num, "requested player stats");
    true
}

/// Digits of the `index`th colon separated field, starting at the first
/// digit in that field. Empty if there is no such field or no digit in it.
pub fn parse_stats(data: &str, index: usize) -> String {
    data.split(':')
        .nth(index)
        .map(|field| {
            field
                .chars()
                .skip_while(|c| !c.is_ascii_digit())
                .take_while(char::is_ascii_digit)
                .collect()
        })
        .unwrap_or_default()
}
