// cg_local.rs — client game state read by the overlay
//
// Everything here is filled in by the host simulation each frame; the
// overlay only reads it, apart from the stats throttle and the event
// handling mode.

use etsc_common::keys::KeyCatch;
use etsc_common::q_shared::{QHandle, MAX_CLIENTS, SCREEN_WIDTH};

use crate::bg_misc::{
    EntityFlags, GameState, GameType, PlayerClass, PmFlags, PmType, PowerupBits, SkillType,
    Team, Weapon, WeaponAttributes, PW_NUM_POWERUPS, SK_NUM_SKILLS, WP_NONE,
};
use crate::cg_event::EventHandling;

// ============================================================
// Per-client records
// ============================================================

/// clientInfo_t — what the cgame knows about a connected client.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub info_valid: bool,
    pub client_num: i32,
    /// Name with color escapes stripped.
    pub clean_name: String,
    pub team: Team,
    pub cls: PlayerClass,
    /// Class the player respawns as.
    pub latched_cls: PlayerClass,
    pub health: i32,
    pub powerups: PowerupBits,
    pub skill: [i32; SK_NUM_SKILLS],
    pub shoutcaster: bool,
}

/// Entity state relevant for weapon selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct CEntity {
    pub eflags: EntityFlags,
    pub weapon: Weapon,
    /// The tank this entity is mounted on carries a browning.
    pub mounted_tank_browning: bool,
}

/// playerState_t subset drawn by the status panel.
#[derive(Debug, Clone, Default)]
pub struct PlayerState {
    pub client_num: i32,
    pub health: i32,
    pub player_class: PlayerClass,
    pub team: Team,
    pub weapon: Weapon,
    pub eflags: EntityFlags,
    pub pm_flags: PmFlags,
    pub pm_type: PmType,
    pub class_weapon_time: i32,
    pub sprint_time: i32,
    /// Expiry time (or nonzero marker) per PW_* index.
    pub powerups: [i32; PW_NUM_POWERUPS],
}

#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub ps: PlayerState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmmoValue {
    pub ammo: i32,
    /// -1 for weapons without a clip.
    pub clip: i32,
}

impl Default for AmmoValue {
    fn default() -> Self {
        Self { ammo: 0, clip: -1 }
    }
}

// ============================================================
// Per-frame state (cg_t)
// ============================================================

/// Class ability recharge durations per team, axis first. Negative means
/// the ability has no charge bar.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChargeTimes {
    pub soldier: [i32; 2],
    pub medic: [i32; 2],
    pub engineer: [i32; 2],
    pub fieldops: [i32; 2],
    pub covertops: [i32; 2],
}

impl ChargeTimes {
    pub fn for_class(&self, cls: PlayerClass) -> &[i32; 2] {
        match cls {
            PlayerClass::Engineer => &self.engineer,
            PlayerClass::Medic => &self.medic,
            PlayerClass::FieldOps => &self.fieldops,
            PlayerClass::CovertOps => &self.covertops,
            PlayerClass::Soldier => &self.soldier,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cg {
    /// Game time in milliseconds.
    pub time: i32,
    pub snap: Snapshot,
    pub predicted_player_state: PlayerState,
    /// Local client number.
    pub client_num: i32,
    pub charge_times: ChargeTimes,
    /// Bits of PW_REDFLAG / PW_BLUEFLAG while a flag is in play.
    pub flag_indicator: u32,
    pub red_flag_counter: i32,
    pub blue_flag_counter: i32,
    /// Ammo readout for the predicted weapon.
    pub ammo: AmmoValue,
    pub last_key_catcher: KeyCatch,
}

// ============================================================
// Per-level state (cgs_t)
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowState {
    #[default]
    Off,
    Shutdown,
    On,
}

/// Number of raw lines kept from a stats reply.
pub const GS_ITEMS: usize = 8;

/// gameStats_t — the last `sgstats` reply and the request throttle.
#[derive(Debug, Clone, Default)]
pub struct GameStats {
    pub show: ShowState,
    /// Game time before which no new request is sent.
    pub request_time: i32,
    pub has_stats: bool,
    /// Client the stored reply describes.
    pub client_id: i32,
    pub str_extra: [String; GS_ITEMS],
}

impl GameStats {
    /// Store a reply for `client_id`. Extra lines beyond GS_ITEMS are dropped.
    pub fn store_reply<S: AsRef<str>>(&mut self, client_id: i32, lines: &[S]) {
        self.client_id = client_id;
        for (slot, line) in self.str_extra.iter_mut().zip(lines.iter().map(AsRef::as_ref).chain(std::iter::repeat(""))) {
            *slot = line.to_string();
        }
        self.has_stats = true;
    }

    pub fn extra(&self, line: usize) -> &str {
        self.str_extra.get(line).map_or("", String::as_str)
    }
}

/// Registered shader handles.
#[derive(Debug, Clone, Default)]
pub struct CgMedia {
    pub gradient_bar: QHandle,
    pub medic_icon: QHandle,
    pub score_eliminated_shader: QHandle,
    pub objective_shader: QHandle,
    pub objective_team_shader: QHandle,
    pub objective_dropped_shader: QHandle,
    pub allied_uniform_shader: QHandle,
    pub axis_uniform_shader: QHandle,
    pub spawn_invincible_shader: QHandle,
    pub allied_flag: QHandle,
    pub axis_flag: QHandle,
    pub skill_pics: [QHandle; SK_NUM_SKILLS],
}

/// cg_weapons[] entry, the HUD side of a weapon.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeaponInfo {
    pub weapon_icon: [QHandle; 2],
    /// 1 for normal icons, 2 for wide ones.
    pub weapon_icon_scale: i32,
}

impl WeaponInfo {
    /// First registered icon, falling back to the alternate one.
    pub fn icon(&self) -> Option<QHandle> {
        self.weapon_icon.iter().copied().find(|&h| h != 0)
    }
}

/// Weapon rules table entry.
#[derive(Debug, Clone, Copy)]
pub struct WeaponTableData {
    pub attributes: WeaponAttributes,
    pub skill_based: SkillType,
    pub charge_time_skill: i32,
    /// Charge fraction needed, indexed by "charge skill available".
    pub charge_time_coeff: [f32; 2],
}

impl Default for WeaponTableData {
    fn default() -> Self {
        Self {
            attributes: WeaponAttributes::empty(),
            skill_based: SkillType::BattleSense,
            charge_time_skill: 0,
            charge_time_coeff: [1.0, 1.0],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Cgs {
    pub clientinfo: Vec<ClientInfo>,
    pub entities: Vec<CEntity>,
    pub gamestate: GameState,
    pub gametype: GameType,
    /// Minutes, 0 for no limit.
    pub timelimit: f32,
    pub level_start_time: i32,
    pub current_round: i32,
    /// Respawn wave length per team in milliseconds.
    pub red_limbo_time: i32,
    pub blue_limbo_time: i32,
    /// Wave offset indexed by team number.
    pub reinf_offset: [i32; 4],
    pub gamestats: GameStats,
    pub topshots_show: ShowState,
    pub event_handling: EventHandling,
    /// Horizontal widescreen factor applied to the 640 unit virtual width.
    pub adr43: f32,
    pub media: CgMedia,
    pub weapons: Vec<WeaponInfo>,
    pub weapon_table: Vec<WeaponTableData>,
}

impl Default for Cgs {
    fn default() -> Self {
        Self {
            clientinfo: (0..MAX_CLIENTS as i32)
                .map(|i| ClientInfo { client_num: i, ..Default::default() })
                .collect(),
            entities: vec![CEntity { weapon: WP_NONE, ..Default::default() }; MAX_CLIENTS],
            gamestate: GameState::default(),
            gametype: GameType::default(),
            timelimit: 0.0,
            level_start_time: 0,
            current_round: 0,
            red_limbo_time: 30000,
            blue_limbo_time: 30000,
            reinf_offset: [0; 4],
            gamestats: GameStats::default(),
            topshots_show: ShowState::Off,
            event_handling: EventHandling::None,
            adr43: 1.0,
            media: CgMedia::default(),
            weapons: Vec::new(),
            weapon_table: Vec::new(),
        }
    }
}

impl Cgs {
    /// Ccg_WideX
    pub fn wide_x(&self, x: f32) -> f32 {
        x * self.adr43
    }

    pub fn screen_width(&self) -> f32 {
        self.wide_x(SCREEN_WIDTH)
    }

    pub fn client(&self, client_num: i32) -> Option<&ClientInfo> {
        usize::try_from(client_num).ok().and_then(|n| self.clientinfo.get(n))
    }

    pub fn entity(&self, client_num: i32) -> Option<&CEntity> {
        usize::try_from(client_num).ok().and_then(|n| self.entities.get(n))
    }

    pub fn weapon_info(&self, weapon: Weapon) -> Option<&WeaponInfo> {
        usize::try_from(weapon).ok().and_then(|n| self.weapons.get(n))
    }

    pub fn weapon_table_data(&self, weapon: Weapon) -> Option<&WeaponTableData> {
        usize::try_from(weapon).ok().and_then(|n| self.weapon_table.get(n))
    }

    pub fn is_shoutcaster(&self, client_num: i32) -> bool {
        self.client(client_num).is_some_and(|ci| ci.shoutcaster)
    }
}
