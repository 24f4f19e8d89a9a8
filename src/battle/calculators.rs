use crate::battle::ai::AiTier;
use crate::battle::commands::{BattleCommand, Side};
use crate::battle::conditions::{inflict_status, is_self_ko_move, status_for_move};
use crate::battle::damage::calculate_damage;
use crate::battle::state::{BattleEvent, TurnRng};
use crate::combatant::Combatant;
use crate::config::PpPolicy;
use schema::MoveCategory;

/// Battle-wide settings a move resolution depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackContext {
    pub attacker_side: Side,
    pub pp_policy: PpPolicy,
    pub ai_tier: AiTier,
}

impl AttackContext {
    /// Damage scaling for this attacker. Only the AI side is scaled.
    pub fn damage_multiplier(&self) -> f64 {
        match self.attacker_side {
            Side::Opponent => self.ai_tier.damage_multiplier(),
            Side::Player => 1.0,
        }
    }

    /// Tier miss chance for this attacker. Only the AI side misses this way.
    pub fn miss_chance(&self) -> u8 {
        match self.attacker_side {
            Side::Opponent => self.ai_tier.miss_chance(),
            Side::Player => 0,
        }
    }
}

/// Calculate the outcome of one move use.
///
/// Pure: reads the two combatants and returns the commands (state changes and
/// events) that the engine applies in order. Returns nothing when either side
/// has already fainted, so a stale resolution is a no-op.
pub fn calculate_attack_outcome(
    attacker: &Combatant,
    defender: &Combatant,
    move_index: usize,
    context: &AttackContext,
    rng: &mut TurnRng,
) -> Vec<BattleCommand> {
    if attacker.is_fainted() || defender.is_fainted() {
        return Vec::new();
    }

    let Some(move_instance) = attacker.moves.get(move_index) else {
        log::error!(
            "{} has no move at index {} ({} known)",
            attacker.name,
            move_index,
            attacker.moves.len()
        );
        return Vec::new();
    };
    let move_data = &move_instance.data;

    let mut commands = vec![BattleCommand::EmitEvent(BattleEvent::MoveUsed {
        side: context.attacker_side,
        attacker: attacker.name.clone(),
        move_name: move_data.name.clone(),
    })];

    let spend_pp = BattleCommand::DecrementPp {
        target_id: attacker.id.clone(),
        move_name: move_data.name.clone(),
    };

    if context.pp_policy == PpPolicy::DeductBeforeAccuracy {
        commands.push(spend_pp.clone());
    }

    // Accuracy gate
    if let Some(accuracy) = move_data.accuracy {
        let roll = rng.next_outcome("Accuracy Check");
        if roll > accuracy {
            commands.push(BattleCommand::EmitEvent(BattleEvent::MoveMissed {
                attacker: attacker.name.clone(),
                move_name: move_data.name.clone(),
            }));
            return commands;
        }
    }

    if context.pp_policy == PpPolicy::DeductOnHit {
        commands.push(spend_pp);
    }

    let outcome = calculate_damage(attacker, defender, move_data, rng);

    let miss_chance = context.miss_chance();
    if miss_chance > 0 && rng.next_outcome("Easy Miss") <= miss_chance {
        commands.push(BattleCommand::EmitEvent(BattleEvent::MoveMissed {
            attacker: attacker.name.clone(),
            move_name: move_data.name.clone(),
        }));
        return commands;
    }

    let multiplier = context.damage_multiplier();
    let damage = if multiplier == 1.0 {
        outcome.damage
    } else {
        (outcome.damage as f64 * multiplier).floor() as u16
    };

    if let Some(status) = status_for_move(move_data) {
        commands.extend(inflict_status(defender, status, rng));
        return commands;
    }

    if move_data.category == MoveCategory::Status {
        commands.push(BattleCommand::EmitEvent(BattleEvent::MoveHadNoEffect {
            move_name: move_data.name.clone(),
        }));
        return commands;
    }

    if outcome.is_critical {
        commands.push(BattleCommand::EmitEvent(BattleEvent::CriticalHit {
            attacker: attacker.name.clone(),
        }));
    }
    commands.push(BattleCommand::EmitEvent(BattleEvent::AttackTypeEffectiveness {
        multiplier: outcome.effectiveness,
    }));

    let removed = damage.min(defender.current_hp());
    let remaining_hp = defender.current_hp() - removed;

    commands.push(BattleCommand::EmitEvent(BattleEvent::DamageDealt {
        target: defender.name.clone(),
        damage: removed,
        percent: defender.hp_percent(removed),
        remaining_hp,
    }));
    commands.push(BattleCommand::DealDamage {
        target_id: defender.id.clone(),
        amount: damage,
    });
    commands.push(BattleCommand::RecordDamageDealt {
        target_id: attacker.id.clone(),
        amount: removed as u32,
    });
    commands.push(BattleCommand::RecordDamageTaken {
        target_id: defender.id.clone(),
        amount: removed as u32,
    });
    if remaining_hp == 0 {
        commands.push(BattleCommand::RecordKill {
            target_id: attacker.id.clone(),
        });
    }

    if is_self_ko_move(move_data) {
        commands.push(BattleCommand::EmitEvent(BattleEvent::SelfKnockout {
            name: attacker.name.clone(),
        }));
        commands.push(BattleCommand::FaintCombatant {
            target_id: attacker.id.clone(),
        });
    }

    commands
}
