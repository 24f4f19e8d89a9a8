use crate::combatant::{Combatant, StatusCondition};
use schema::{ElementType, MoveCategory, MoveData, StatType, DEFAULT_STAT_VALUE};

/// Combined type multiplier of an attack against every defender type.
/// The result is one of 0, 0.25, 0.5, 1, 2 or 4.
pub fn get_type_effectiveness(attack_type: ElementType, defender_types: &[ElementType]) -> f32 {
    defender_types.iter().fold(1.0, |multiplier, defend_type| {
        multiplier * ElementType::type_effectiveness(attack_type, *defend_type)
    })
}

/// A stat of 0 counts as unset and reads as the default.
fn battle_stat(combatant: &Combatant, stat: StatType) -> u16 {
    match combatant.stat(stat) {
        0 => DEFAULT_STAT_VALUE,
        value => value,
    }
}

/// Offensive stat used by a move: special attack for special moves, attack otherwise.
pub fn effective_attack(combatant: &Combatant, move_data: &MoveData) -> u16 {
    let stat = match move_data.category {
        MoveCategory::Special => StatType::SpecialAttack,
        MoveCategory::Physical | MoveCategory::Status => StatType::Attack,
    };
    battle_stat(combatant, stat)
}

/// Defensive stat matching [`effective_attack`].
pub fn effective_defense(combatant: &Combatant, move_data: &MoveData) -> u16 {
    let stat = match move_data.category {
        MoveCategory::Special => StatType::SpecialDefense,
        MoveCategory::Physical | MoveCategory::Status => StatType::Defense,
    };
    battle_stat(combatant, stat)
}

/// Speed used for turn order. Paralysis halves it regardless of that turn's roll.
pub fn effective_speed(combatant: &Combatant) -> u16 {
    let speed = battle_stat(combatant, StatType::Speed);
    if combatant.status == Some(StatusCondition::Paralysis) {
        speed / 2
    } else {
        speed
    }
}

/// Same-type attack bonus.
pub fn stab_multiplier(attacker: &Combatant, move_data: &MoveData) -> f64 {
    if attacker.has_type(move_data.move_type) {
        1.5
    } else {
        1.0
    }
}
