// bg_misc.rs — game rule enums and constants shared with the simulation

// ============================================================
// Teams and classes
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum Team {
    #[default]
    Free = 0,
    Axis = 1,
    Allies = 2,
    Spectator = 3,
}

impl Team {
    /// Index into the per-team timer arrays (axis = 0, allies = 1).
    pub fn playing_index(self) -> Option<usize> {
        match self {
            Team::Axis => Some(0),
            Team::Allies => Some(1),
            _ => None,
        }
    }
}

impl From<i32> for Team {
    fn from(value: i32) -> Self {
        match value {
            1 => Team::Axis,
            2 => Team::Allies,
            3 => Team::Spectator,
            _ => Team::Free,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum PlayerClass {
    #[default]
    Soldier = 0,
    Medic = 1,
    Engineer = 2,
    FieldOps = 3,
    CovertOps = 4,
}

impl From<i32> for PlayerClass {
    fn from(value: i32) -> Self {
        match value {
            1 => PlayerClass::Medic,
            2 => PlayerClass::Engineer,
            3 => PlayerClass::FieldOps,
            4 => PlayerClass::CovertOps,
            _ => PlayerClass::Soldier,
        }
    }
}

// ============================================================
// Skills
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum SkillType {
    BattleSense = 0,
    ExplosivesAndConstruction = 1,
    FirstAid = 2,
    Signals = 3,
    LightWeapons = 4,
    HeavyWeapons = 5,
    MilitaryIntelligenceAndScopedWeapons = 6,
}

pub const SK_NUM_SKILLS: usize = 7;

/// Battle sense level granting the extra health.
pub const SK_BATTLE_SENSE_HEALTH: i32 = 3;

/// Skill whose icon represents a class.
pub fn skill_num_for_class(cls: PlayerClass) -> SkillType {
    match cls {
        PlayerClass::Soldier => SkillType::HeavyWeapons,
        PlayerClass::Medic => SkillType::FirstAid,
        PlayerClass::Engineer => SkillType::ExplosivesAndConstruction,
        PlayerClass::FieldOps => SkillType::Signals,
        PlayerClass::CovertOps => SkillType::MilitaryIntelligenceAndScopedWeapons,
    }
}

pub fn is_skill_available(skill: &[i32; SK_NUM_SKILLS], skill_type: SkillType, level: i32) -> bool {
    skill[skill_type as usize] >= level
}

// ============================================================
// Weapons
// ============================================================

pub type Weapon = i32;

pub const WP_NONE: Weapon = 0;
pub const WP_ARTY: Weapon = 13;
pub const WP_BINOCULARS: Weapon = 20;
pub const WP_MOBILE_MG42: Weapon = 30;
pub const WP_MOBILE_BROWNING: Weapon = 49;
pub const WP_NUM_WEAPONS: Weapon = 56;

/// WP_NONE is not a valid weapon.
pub fn is_valid_weapon(weapon: Weapon) -> bool {
    weapon > WP_NONE && weapon < WP_NUM_WEAPONS
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct WeaponAttributes: u32 {
        const FAST_RELOAD = 0x0001;
        const CHARGE_TIME = 0x0002;
        const NEVER_LOST  = 0x0004;
    }
}

/// Full sprint reserve in milliseconds.
pub const SPRINTTIME: f32 = 20000.0;

// ============================================================
// Powerups
// ============================================================

pub const PW_NONE: usize = 0;
pub const PW_INVULNERABLE: usize = 1;
pub const PW_REDFLAG: usize = 6;
pub const PW_BLUEFLAG: usize = 7;
pub const PW_OPS_DISGUISED: usize = 8;
pub const PW_ADRENALINE: usize = 12;
pub const PW_NUM_POWERUPS: usize = 16;

bitflags::bitflags! {
    /// Powerups a client carries, one bit per PW_* index.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct PowerupBits: u32 {
        const INVULNERABLE  = 1 << PW_INVULNERABLE;
        const REDFLAG       = 1 << PW_REDFLAG;
        const BLUEFLAG      = 1 << PW_BLUEFLAG;
        const OPS_DISGUISED = 1 << PW_OPS_DISGUISED;
        const ADRENALINE    = 1 << PW_ADRENALINE;
    }
}

// ============================================================
// Entity and pmove state
// ============================================================

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct EntityFlags: u32 {
        const DEAD          = 0x0000_0001;
        const CROUCHING     = 0x0000_0008;
        const MG42_ACTIVE   = 0x0000_0010;
        const MOUNTED_TANK  = 0x0000_2000;
        const ZOOMING       = 0x0001_0000;
        const PRONE         = 0x0002_0000;
        const AAGUN_ACTIVE  = 0x0010_0000;
    }
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct PmFlags: u32 {
        const DUCKED    = 0x0001;
        const RESPAWNED = 0x0200;
        const FOLLOW    = 0x1000;
        const LIMBO     = 0x4000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PmType {
    #[default]
    Normal,
    Noclip,
    Spectator,
    Dead,
    Freeze,
    Intermission,
}

// ============================================================
// Match state
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameType {
    SinglePlayer,
    Coop,
    #[default]
    Wolf,
    WolfStopwatch,
    WolfCampaign,
    WolfLms,
    WolfMapVote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    Playing,
    WarmupCountdown,
    Warmup,
    Intermission,
    WaitingForPlayers,
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_from_int() {
        assert_eq!(Team::from(1), Team::Axis);
        assert_eq!(Team::from(2), Team::Allies);
        assert_eq!(Team::from(3), Team::Spectator);
        assert_eq!(Team::from(42), Team::Free);
        assert_eq!(Team::Allies.playing_index(), Some(1));
        assert_eq!(Team::Spectator.playing_index(), None);
    }

    #[test]
    fn test_skill_for_class() {
        assert_eq!(skill_num_for_class(PlayerClass::Medic), SkillType::FirstAid);
        assert_eq!(skill_num_for_class(PlayerClass::FieldOps), SkillType::Signals);
        assert_eq!(skill_num_for_class(PlayerClass::Soldier), SkillType::HeavyWeapons);
    }

    #[test]
    fn test_skill_available() {
        let mut skill = [0; SK_NUM_SKILLS];
        assert!(!is_skill_available(&skill, SkillType::BattleSense, SK_BATTLE_SENSE_HEALTH));
        skill[SkillType::BattleSense as usize] = 4;
        assert!(is_skill_available(&skill, SkillType::BattleSense, SK_BATTLE_SENSE_HEALTH));
    }

    #[test]
    fn test_valid_weapon() {
        assert!(!is_valid_weapon(WP_NONE));
        assert!(is_valid_weapon(WP_MOBILE_MG42));
        assert!(!is_valid_weapon(WP_NUM_WEAPONS));
        assert!(!is_valid_weapon(-1));
    }

    #[test]
    fn test_powerup_bits() {
        let bits = PowerupBits::from_bits_truncate((1 << PW_REDFLAG) | (1 << PW_INVULNERABLE));
        assert!(bits.intersects(PowerupBits::REDFLAG | PowerupBits::BLUEFLAG));
        assert!(bits.contains(PowerupBits::INVULNERABLE));
        assert!(!bits.contains(PowerupBits::OPS_DISGUISED));
    }
}
