//! Damage model: the rolled damage used in battle and the deterministic
//! prediction the AI plans with.

use crate::battle::state::TurnRng;
use crate::battle::stats::{
    effective_attack, effective_defense, get_type_effectiveness, stab_multiplier,
};
use crate::combatant::Combatant;
use schema::MoveData;

/// Level every combatant is treated as for the damage formula.
pub const BATTLE_LEVEL: f64 = 100.0;
pub const CRITICAL_MULTIPLIER: f64 = 1.5;
/// Roll used by [`predict_damage`], the midpoint of the 85..=100 roll range.
pub const PREDICTED_ROLL: f64 = 0.925;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub damage: u16,
    pub effectiveness: f32,
    pub is_critical: bool,
}

/// `((2 * level / 5 + 2) * power * attack / defense) / 50 + 2`
fn base_damage(attacker: &Combatant, defender: &Combatant, move_data: &MoveData) -> f64 {
    let attack = effective_attack(attacker, move_data) as f64;
    let defense = effective_defense(defender, move_data) as f64;
    let level_factor = 2.0 * BATTLE_LEVEL / 5.0 + 2.0;
    (level_factor * move_data.power as f64 * attack / defense) / 50.0 + 2.0
}

fn finalize(value: f64) -> u16 {
    value.floor().clamp(0.0, u16::MAX as f64) as u16
}

/// Roll damage for one use of a move. Power-0 moves return 0 without
/// consuming randomness; otherwise draws the damage roll, then the critical check.
pub fn calculate_damage(
    attacker: &Combatant,
    defender: &Combatant,
    move_data: &MoveData,
    rng: &mut TurnRng,
) -> DamageOutcome {
    let effectiveness = get_type_effectiveness(move_data.move_type, &defender.types);
    if move_data.power == 0 {
        return DamageOutcome {
            damage: 0,
            effectiveness,
            is_critical: false,
        };
    }

    let roll = rng.next_range("Damage Roll", 85, 100) as f64 / 100.0;
    let is_critical = rng.next_range("Critical Hit", 1, 16) == 1;
    let critical = if is_critical { CRITICAL_MULTIPLIER } else { 1.0 };

    let damage = base_damage(attacker, defender, move_data)
        * stab_multiplier(attacker, move_data)
        * effectiveness as f64
        * roll
        * critical;

    DamageOutcome {
        damage: finalize(damage),
        effectiveness,
        is_critical,
    }
}

/// Expected damage with the roll fixed at 0.925 and no critical hit.
/// Consumes no randomness.
pub fn predict_damage(attacker: &Combatant, defender: &Combatant, move_data: &MoveData) -> u16 {
    if move_data.power == 0 {
        return 0;
    }
    let effectiveness = get_type_effectiveness(move_data.move_type, &defender.types);
    finalize(
        base_damage(attacker, defender, move_data)
            * stab_multiplier(attacker, move_data)
            * effectiveness as f64
            * PREDICTED_ROLL,
    )
}
