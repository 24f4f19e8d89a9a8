//! Status conditions: which moves inflict them, whether a combatant may act,
//! and end-of-round damage. Every function here reads combatant values and
//! returns the commands the engine should apply.

use crate::battle::commands::BattleCommand;
use crate::battle::state::{BattleEvent, TurnRng};
use crate::combatant::{Combatant, StatusCondition};
use schema::{normalize_move_name, ElementType, MoveCategory, MoveData};

pub const SLEEP_MIN_TURNS: u8 = 2;
pub const SLEEP_MAX_TURNS: u8 = 4;
pub const THAW_CHANCE: u8 = 20;
pub const FULL_PARALYSIS_CHANCE: u8 = 25;
/// Burn and poison take `max_hp / 16` at the end of each round.
pub const STATUS_DAMAGE_DIVISOR: u16 = 16;

const SELF_KO_MOVES: [&str; 3] = ["self destruct", "explosion", "misty explosion"];

/// Status inflicted by a status-category move, looked up by normalized name.
pub fn status_for_move(move_data: &MoveData) -> Option<StatusCondition> {
    if move_data.category != MoveCategory::Status {
        return None;
    }
    match move_data.normalized_name().as_str() {
        "toxic" | "poison powder" | "poison gas" => Some(StatusCondition::Poison),
        "will o wisp" => Some(StatusCondition::Burn),
        "thunder wave" | "stun spore" | "glare" => Some(StatusCondition::Paralysis),
        "sleep powder" | "hypnosis" | "spore" | "sing" | "lovely kiss" | "yawn" => {
            Some(StatusCondition::Sleep)
        }
        _ => None,
    }
}

/// Moves that knock out their user after dealing damage.
pub fn is_self_ko_move(move_data: &MoveData) -> bool {
    let name = normalize_move_name(&move_data.name);
    // "selfdestruct" is a common spelling in older data sets.
    SELF_KO_MOVES.contains(&name.as_str()) || name == "selfdestruct"
}

pub fn is_immune_to_status(target: &Combatant, status: StatusCondition) -> bool {
    match status {
        StatusCondition::Burn => target.has_type(ElementType::Fire),
        StatusCondition::Poison => {
            target.has_type(ElementType::Poison) || target.has_type(ElementType::Steel)
        }
        StatusCondition::Paralysis => target.has_type(ElementType::Electric),
        StatusCondition::Sleep | StatusCondition::Freeze => false,
    }
}

/// Result of the start-of-action status check.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionCheck {
    pub can_act: bool,
    pub commands: Vec<BattleCommand>,
}

impl ActionCheck {
    fn act(commands: Vec<BattleCommand>) -> Self {
        Self {
            can_act: true,
            commands,
        }
    }

    fn blocked(commands: Vec<BattleCommand>) -> Self {
        Self {
            can_act: false,
            commands,
        }
    }
}

/// Decide whether a combatant may act this turn.
///
/// Sleep counts down first and wakes when it reaches 0. Freeze thaws 20% of
/// the time. Paralysis fully paralyzes 25% of the time. Burn and poison never
/// block.
pub fn check_can_act(combatant: &Combatant, rng: &mut TurnRng) -> ActionCheck {
    let Some(status) = combatant.status else {
        return ActionCheck::act(Vec::new());
    };

    let cure = |status| {
        vec![
            BattleCommand::SetStatus {
                target_id: combatant.id.clone(),
                status: None,
                turns: 0,
            },
            BattleCommand::EmitEvent(BattleEvent::StatusRemoved {
                target: combatant.name.clone(),
                status,
            }),
        ]
    };
    let prevented = |status| {
        BattleCommand::EmitEvent(BattleEvent::StatusPreventedAction {
            target: combatant.name.clone(),
            status,
        })
    };

    match status {
        StatusCondition::Sleep => {
            let remaining = combatant.status_turns.saturating_sub(1);
            if remaining == 0 {
                ActionCheck::act(cure(status))
            } else {
                ActionCheck::blocked(vec![
                    BattleCommand::SetStatus {
                        target_id: combatant.id.clone(),
                        status: Some(StatusCondition::Sleep),
                        turns: remaining,
                    },
                    prevented(status),
                ])
            }
        }
        StatusCondition::Freeze => {
            if rng.next_outcome("Thaw Check") <= THAW_CHANCE {
                ActionCheck::act(cure(status))
            } else {
                ActionCheck::blocked(vec![prevented(status)])
            }
        }
        StatusCondition::Paralysis => {
            if rng.next_outcome("Full Paralysis Check") <= FULL_PARALYSIS_CHANCE {
                ActionCheck::blocked(vec![prevented(status)])
            } else {
                ActionCheck::act(Vec::new())
            }
        }
        StatusCondition::Burn | StatusCondition::Poison => ActionCheck::act(Vec::new()),
    }
}

/// Try to give `target` a status. Fails if it already has one or is immune by type.
/// Sleep lasts a random 2..=4 counter.
pub fn inflict_status(
    target: &Combatant,
    status: StatusCondition,
    rng: &mut TurnRng,
) -> Vec<BattleCommand> {
    if target.status.is_some() {
        return vec![BattleCommand::EmitEvent(BattleEvent::StatusFailed {
            target: target.name.clone(),
        })];
    }

    if is_immune_to_status(target, status) {
        return vec![BattleCommand::EmitEvent(BattleEvent::StatusImmune {
            target: target.name.clone(),
            status,
        })];
    }

    let turns = match status {
        StatusCondition::Sleep => rng.next_range("Sleep Duration", SLEEP_MIN_TURNS, SLEEP_MAX_TURNS),
        _ => 0,
    };

    vec![
        BattleCommand::SetStatus {
            target_id: target.id.clone(),
            status: Some(status),
            turns,
        },
        BattleCommand::EmitEvent(BattleEvent::StatusApplied {
            target: target.name.clone(),
            status,
        }),
    ]
}

/// Burn and poison damage for a living combatant at the end of a round.
pub fn end_of_round_damage(combatant: &Combatant) -> Vec<BattleCommand> {
    if combatant.is_fainted() {
        return Vec::new();
    }

    let Some(status @ (StatusCondition::Burn | StatusCondition::Poison)) = combatant.status else {
        return Vec::new();
    };

    let damage = combatant.max_hp / STATUS_DAMAGE_DIVISOR;
    if damage == 0 {
        return Vec::new();
    }

    vec![
        BattleCommand::EmitEvent(BattleEvent::StatusDamage {
            target: combatant.name.clone(),
            status,
            damage,
            remaining_hp: combatant.current_hp().saturating_sub(damage),
        }),
        BattleCommand::DealDamage {
            target_id: combatant.id.clone(),
            amount: damage,
        },
    ]
}
