// main.rs — headless host for the shoutcaster overlay
//
// Plays a short scripted match: registers the overlay cvars, runs frames,
// answers the overlay's server commands and presses follow keys. Draw calls
// are logged on the `etsc_sys::draw` target at trace level.

use anyhow::{bail, Context};

use etsc_cgame::bg_misc::{
    GameType, PlayerClass, PmFlags, PowerupBits, Team, PW_ADRENALINE, PW_NUM_POWERUPS, PW_REDFLAG,
    WP_MOBILE_MG42, WP_NUM_WEAPONS,
};
use etsc_cgame::cg_draw::{Font, Renderer};
use etsc_cgame::cg_event::{key_catcher_changed, key_event};
use etsc_cgame::cg_local::{Cg, Cgs, WeaponInfo, WeaponTableData};
use etsc_cgame::cg_shoutcast::{toggle_shoutcaster_mode, Shoutcast, ShoutcastConfig};
use etsc_cgame::cg_syscalls::CgameImport;
use etsc_common::cvar::{cvar_init, cvar_set, cvar_shutdown, with_cvar_ctx};
use etsc_common::keys::{KeyCatch, K_ESCAPE, K_F1, K_F2, K_F7};
use etsc_common::q_shared::{q_clean_str, q_print_strlen, QHandle, Vec4};

const FRAME_MSEC: i32 = 50;
const FRAMES: i32 = 60;

// ============================================================
// Logging renderer
// ============================================================

/// Renderer that only logs. Text is measured as a fixed 10 unit font.
#[derive(Default)]
struct LogRenderer {
    calls: usize,
}

impl Renderer for LogRenderer {
    fn set_color(&mut self, color: Option<&Vec4>) {
        self.calls += 1;
        tracing::trace!(target: "etsc_sys::draw", ?color, "set_color");
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: &Vec4) {
        self.calls += 1;
        tracing::trace!(target: "etsc_sys::draw", x, y, w, h, ?color, "fill_rect");
    }

    fn draw_pic(&mut self, x: f32, y: f32, w: f32, h: f32, shader: QHandle) {
        self.calls += 1;
        tracing::trace!(target: "etsc_sys::draw", x, y, w, h, shader, "draw_pic");
    }

    fn text_width(&self, text: &str, scale: f32, limit: usize, _font: Font) -> f32 {
        let len = q_print_strlen(text);
        let len = if limit > 0 { len.min(limit) } else { len };
        len as f32 * 10.0 * scale
    }

    fn text_height(&self, _text: &str, scale: f32, _limit: usize, _font: Font) -> f32 {
        10.0 * scale
    }

    fn text_paint(&mut self, x: f32, y: f32, scale: f32, color: &Vec4, text: &str, limit: usize, font: Font) {
        self.calls += 1;
        tracing::trace!(target: "etsc_sys::draw", x, y, scale, ?color, text, limit, ?font, "text");
    }

    fn draw_country_flag(&mut self, x: f32, y: f32, scale: f32, client_num: i32) {
        self.calls += 1;
        tracing::trace!(target: "etsc_sys::draw", x, y, scale, client_num, "country_flag");
    }
}

// ============================================================
// Host side of the cgame imports
// ============================================================

#[derive(Default)]
struct HostImports {
    catcher: KeyCatch,
    outbox: Vec<String>,
}

impl CgameImport for HostImports {
    fn send_client_command(&mut self, cmd: &str) {
        tracing::info!(cmd, "client command");
        self.outbox.push(cmd.to_string());
    }

    fn key_get_catcher(&self) -> KeyCatch {
        self.catcher
    }

    fn key_set_catcher(&mut self, catcher: KeyCatch) {
        self.catcher = catcher;
    }
}

// ============================================================
// Scripted match
// ============================================================

const ROSTER: [(&str, Team, PlayerClass, i32); 9] = [
    ("^3caster", Team::Spectator, PlayerClass::Soldier, 100),
    ("^1Fritz", Team::Axis, PlayerClass::Medic, 112),
    ("^1Hans^7|ETc", Team::Axis, PlayerClass::Engineer, 40),
    ("Klaus", Team::Axis, PlayerClass::Soldier, 0),
    ("^1Otto", Team::Axis, PlayerClass::FieldOps, -30),
    ("^4Joe", Team::Allies, PlayerClass::CovertOps, 95),
    ("^4Sam", Team::Allies, PlayerClass::Medic, 121),
    ("Mike", Team::Allies, PlayerClass::FieldOps, 63),
    ("^4Lee", Team::Allies, PlayerClass::Soldier, 18),
];

fn build_match() -> (Cg, Cgs) {
    let mut cgs = Cgs {
        gametype: GameType::WolfStopwatch,
        timelimit: 12.0,
        level_start_time: 0,
        red_limbo_time: 30000,
        blue_limbo_time: 20000,
        adr43: 16.0 / 9.0 / (4.0 / 3.0),
        ..Default::default()
    };

    cgs.media.gradient_bar = 2;
    cgs.media.medic_icon = 3;
    cgs.media.score_eliminated_shader = 4;
    cgs.media.objective_shader = 5;
    cgs.media.objective_team_shader = 6;
    cgs.media.objective_dropped_shader = 7;
    cgs.media.allied_uniform_shader = 8;
    cgs.media.axis_uniform_shader = 9;
    cgs.media.spawn_invincible_shader = 10;
    cgs.media.allied_flag = 11;
    cgs.media.axis_flag = 12;
    cgs.media.skill_pics = [20, 21, 22, 23, 24, 25, 26];

    cgs.weapons = (0..WP_NUM_WEAPONS)
        .map(|w| WeaponInfo { weapon_icon: [100 + w, 0], weapon_icon_scale: if w == WP_MOBILE_MG42 { 2 } else { 1 } })
        .collect();
    cgs.weapon_table = vec![WeaponTableData::default(); WP_NUM_WEAPONS as usize];

    for (num, (name, team, cls, health)) in ROSTER.iter().enumerate() {
        let ci = &mut cgs.clientinfo[num];
        ci.info_valid = true;
        ci.clean_name = q_clean_str(name);
        ci.team = *team;
        ci.cls = *cls;
        ci.latched_cls = *cls;
        ci.health = *health;
        cgs.entities[num].weapon = 3 + num as i32;
    }
    cgs.clientinfo[0].shoutcaster = true;
    cgs.clientinfo[2].latched_cls = PlayerClass::Medic;
    cgs.clientinfo[5].powerups = PowerupBits::OPS_DISGUISED | PowerupBits::REDFLAG;
    cgs.clientinfo[6].powerups = PowerupBits::INVULNERABLE;

    let mut cg = Cg { client_num: 0, ..Default::default() };
    cg.snap.ps.client_num = 0;
    cg.snap.ps.team = Team::Spectator;
    cg.charge_times.soldier = [20000, 20000];
    cg.charge_times.medic = [45000, 45000];
    cg.charge_times.engineer = [30000, 30000];
    cg.charge_times.fieldops = [40000, 40000];
    cg.charge_times.covertops = [30000, 30000];
    cg.flag_indicator = 1 << PW_REDFLAG;
    cg.red_flag_counter = 1;

    (cg, cgs)
}

/// Server side of `follow` and `sgstats`.
fn server_reply(cmd: &str, cg: &mut Cg, cgs: &mut Cgs) -> anyhow::Result<()> {
    let mut args = cmd.split_whitespace();
    let name = args.next().unwrap_or_default();
    let client_num: i32 = args
        .next()
        .context("missing client number")?
        .parse()
        .with_context(|| format!("bad client number in {:?}", cmd))?;

    let Some(ci) = cgs.client(client_num).cloned() else {
        bail!("no client {}", client_num);
    };

    match name {
        "follow" => {
            let ps = &mut cg.snap.ps;
            ps.client_num = client_num;
            ps.pm_flags = PmFlags::FOLLOW;
            ps.health = ci.health;
            ps.player_class = ci.cls;
            ps.team = ci.team;
            ps.sprint_time = 12000;
            ps.class_weapon_time = cg.time - 15000;
            ps.powerups = [0; PW_NUM_POWERUPS];
            if ci.health < 0 {
                ps.pm_flags |= PmFlags::LIMBO;
            }
            if client_num == 6 {
                ps.powerups[PW_ADRENALINE] = cg.time + 10000;
            }
            cg.predicted_player_state = ps.clone();
            cg.ammo.ammo = 60;
            cg.ammo.clip = 30;
            tracing::info!(client_num, name = %ci.clean_name, "now following");
        }
        "sgstats" => {
            let kills = 3 + client_num;
            cgs.gamestats.store_reply(
                client_num,
                &[
                    format!("Damage Given: {}", kills * 113),
                    format!("Damage Recvd: {}", 640 - kills * 17),
                    "Team Damage: 0".to_string(),
                    format!("Kills: {}", kills),
                    format!("Deaths: {} Selfkills: {}", client_num % 4, client_num % 2),
                ],
            );
        }
        other => bail!("unknown command {:?}", other),
    }
    Ok(())
}

fn run_frame(overlay: &mut Shoutcast, cg: &mut Cg, cgs: &mut Cgs, imports: &mut HostImports) -> anyhow::Result<()> {
    cg.time += FRAME_MSEC;
    overlay.config.update_from_cvars();

    let mut renderer = LogRenderer::default();
    overlay.draw_overlay(&mut renderer, cg, cgs, imports);
    tracing::debug!(time = cg.time, draw_calls = renderer.calls, "frame");

    for cmd in std::mem::take(&mut imports.outbox) {
        server_reply(&cmd, cg, cgs)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("etsc=debug".parse()?)
                .add_directive("console=info".parse()?),
        )
        .init();

    tracing::info!("starting shoutcast overlay host");

    cvar_init();
    with_cvar_ctx(ShoutcastConfig::register_cvars).context("cvar system not running")?;
    cvar_set("cg_shoutcastTeamNameRed", "^1Red Devils");

    let (mut cg, mut cgs) = build_match();
    let mut imports = HostImports::default();
    let mut overlay = Shoutcast::default();

    toggle_shoutcaster_mode(&mut cgs, &mut imports, true);

    for _ in 0..FRAMES / 3 {
        run_frame(&mut overlay, &mut cg, &mut cgs, &mut imports)?;
    }

    for key in [K_F1, K_F2, K_F7] {
        key_event(&overlay, &cgs, &mut imports, key, true);
        key_event(&overlay, &cgs, &mut imports, key, false);
        for _ in 0..FRAMES / 6 {
            run_frame(&mut overlay, &mut cg, &mut cgs, &mut imports)?;
        }
    }

    // open the menu, then close it again
    key_event(&overlay, &cgs, &mut imports, K_ESCAPE, true);
    toggle_shoutcaster_mode(&mut cgs, &mut imports, false);
    imports.catcher = KeyCatch::UI;
    key_catcher_changed(&mut cg, &mut cgs, &mut imports, KeyCatch::UI);
    imports.catcher = KeyCatch::empty();
    key_catcher_changed(&mut cg, &mut cgs, &mut imports, KeyCatch::empty());
    tracing::info!(event_handling = ?cgs.event_handling, "menu closed");

    cvar_set("cg_shoutcastDrawPlayers", "0");
    run_frame(&mut overlay, &mut cg, &mut cgs, &mut imports)?;

    overlay.info();

    let mut archived = Vec::new();
    with_cvar_ctx(|ctx| ctx.write_variables(&mut archived))
        .transpose()
        .context("writing archived cvars")?;
    print!("{}", String::from_utf8_lossy(&archived));

    cvar_shutdown();
    Ok(())
}
