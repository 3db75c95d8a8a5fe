// cg_players.rs — per-player derived values for the HUD

use crate::bg_misc::{
    is_skill_available, EntityFlags, PlayerClass, SkillType, Team, Weapon, SK_BATTLE_SENSE_HEALTH,
    WP_MOBILE_BROWNING, WP_MOBILE_MG42,
};
use crate::cg_local::{Cg, Cgs};

const BASE_MAX_HEALTH: i32 = 100;
const MEDIC_BONUS_CAP: i32 = 125;

/// CG_GetPlayerMaxHealth
///
/// Every valid medic on the team adds 10 (capped at 125), battle sense 3
/// adds 15 and medics get a further 12 percent.
pub fn get_player_max_health(cgs: &Cgs, client_num: i32, cls: PlayerClass, team: Team) -> i32 {
    let mut max_health = BASE_MAX_HEALTH;

    for ci in &cgs.clientinfo {
        if !ci.info_valid || ci.team != team || ci.cls != PlayerClass::Medic {
            continue;
        }
        max_health += 10;
        if max_health >= MEDIC_BONUS_CAP {
            max_health = MEDIC_BONUS_CAP;
            break;
        }
    }

    if let Some(ci) = cgs.client(client_num) {
        if is_skill_available(&ci.skill, SkillType::BattleSense, SK_BATTLE_SENSE_HEALTH) {
            max_health += 15;
        }
    }

    if cls == PlayerClass::Medic {
        max_health = (max_health as f32 * 1.12) as i32;
    }

    max_health
}

/// Weapon a player is seen holding. Mounted guns override the entity weapon.
pub fn get_player_current_weapon(cgs: &Cgs, client_num: i32) -> Option<Weapon> {
    let cent = cgs.entity(client_num)?;

    let weapon = if cent.eflags.contains(EntityFlags::MOUNTED_TANK) {
        if cent.mounted_tank_browning {
            WP_MOBILE_BROWNING
        } else {
            WP_MOBILE_MG42
        }
    } else if cent.eflags.intersects(EntityFlags::MG42_ACTIVE | EntityFlags::AAGUN_ACTIVE) {
        WP_MOBILE_MG42
    } else {
        cent.weapon
    };

    Some(weapon)
}

/// Seconds until the next reinforcement wave for `team`, counting the
/// current second. 0 when the team has no respawn wave.
pub fn calculate_shoutcaster_reinf_time(cg: &Cg, cgs: &Cgs, team: Team) -> i32 {
    let deploy_time = match team {
        Team::Axis => cgs.red_limbo_time,
        Team::Allies => cgs.blue_limbo_time,
        _ => return 0,
    };
    if deploy_time <= 0 {
        return 0;
    }

    let offset = cgs.reinf_offset[team as usize];
    let elapsed = (offset + cg.time - cgs.level_start_time).rem_euclid(deploy_time);
    (1.0 + (deploy_time - elapsed) as f32 * 0.001) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bg_misc::WP_NONE;

    fn add_player(cgs: &mut Cgs, num: usize, team: Team, cls: PlayerClass) {
        let ci = &mut cgs.clientinfo[num];
        ci.info_valid = true;
        ci.team = team;
        ci.cls = cls;
    }

    #[test]
    fn test_max_health_base() {
        let mut cgs = Cgs::default();
        add_player(&mut cgs, 0, Team::Axis, PlayerClass::Soldier);
        assert_eq!(get_player_max_health(&cgs, 0, PlayerClass::Soldier, Team::Axis), 100);
    }

    #[test]
    fn test_max_health_medics_capped() {
        let mut cgs = Cgs::default();
        add_player(&mut cgs, 0, Team::Axis, PlayerClass::Soldier);
        for i in 1..5 {
            add_player(&mut cgs, i, Team::Axis, PlayerClass::Medic);
        }
        // enemy medics don't count
        add_player(&mut cgs, 10, Team::Allies, PlayerClass::Medic);
        assert_eq!(get_player_max_health(&cgs, 0, PlayerClass::Soldier, Team::Axis), 125);

        let mut cgs = Cgs::default();
        add_player(&mut cgs, 1, Team::Allies, PlayerClass::Medic);
        assert_eq!(get_player_max_health(&cgs, 0, PlayerClass::Soldier, Team::Allies), 110);
    }

    #[test]
    fn test_max_health_battle_sense_and_medic() {
        let mut cgs = Cgs::default();
        add_player(&mut cgs, 0, Team::Axis, PlayerClass::Medic);
        cgs.clientinfo[0].skill[SkillType::BattleSense as usize] = 3;
        // 100 + 10 (self) + 15 = 125, * 1.12 = 140
        assert_eq!(get_player_max_health(&cgs, 0, PlayerClass::Medic, Team::Axis), 140);
    }

    #[test]
    fn test_current_weapon_overrides() {
        let mut cgs = Cgs::default();
        cgs.entities[3].weapon = 8;
        assert_eq!(get_player_current_weapon(&cgs, 3), Some(8));

        cgs.entities[3].eflags = EntityFlags::AAGUN_ACTIVE;
        assert_eq!(get_player_current_weapon(&cgs, 3), Some(WP_MOBILE_MG42));

        cgs.entities[3].eflags = EntityFlags::MOUNTED_TANK;
        assert_eq!(get_player_current_weapon(&cgs, 3), Some(WP_MOBILE_MG42));

        cgs.entities[3].eflags = EntityFlags::MOUNTED_TANK | EntityFlags::MG42_ACTIVE;
        cgs.entities[3].mounted_tank_browning = true;
        assert_eq!(get_player_current_weapon(&cgs, 3), Some(WP_MOBILE_BROWNING));

        assert_eq!(get_player_current_weapon(&cgs, 99), None);
        assert_eq!(get_player_current_weapon(&cgs, 4), Some(WP_NONE));
    }

    #[test]
    fn test_reinf_time() {
        let mut cgs = Cgs { red_limbo_time: 30000, blue_limbo_time: 20000, level_start_time: 1000, ..Default::default() };
        let cg = Cg { time: 11000, ..Default::default() };
        // 10s into a 30s wave: 20s left, plus the current second
        assert_eq!(calculate_shoutcaster_reinf_time(&cg, &cgs, Team::Axis), 21);
        assert_eq!(calculate_shoutcaster_reinf_time(&cg, &cgs, Team::Allies), 11);

        cgs.reinf_offset[Team::Allies as usize] = 5000;
        assert_eq!(calculate_shoutcaster_reinf_time(&cg, &cgs, Team::Allies), 6);

        cgs.red_limbo_time = 0;
        assert_eq!(calculate_shoutcaster_reinf_time(&cg, &cgs, Team::Axis), 0);
        assert_eq!(calculate_shoutcaster_reinf_time(&cg, &cgs, Team::Spectator), 0);
    }
}
