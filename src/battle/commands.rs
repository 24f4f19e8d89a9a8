use crate::battle::state::{BattleEvent, BattleSession, EventBus, GameState};
use crate::combatant::StatusCondition;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Battle side - provides type safety over raw indices.
/// `Opponent` is the AI-controlled side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub fn to_index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Opponent => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }

    pub fn from_index(index: usize) -> Option<Side> {
        match index {
            0 => Some(Side::Player),
            1 => Some(Side::Opponent),
            _ => None,
        }
    }

    pub fn both() -> [Side; 2] {
        [Side::Player, Side::Opponent]
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Player => "Player",
            Side::Opponent => "Opponent",
        }
    }
}

/// Atomic commands representing final state changes
#[derive(Debug, Clone, PartialEq)]
pub enum BattleCommand {
    // Direct state changes
    SetGameState(GameState),
    AdvanceRound,
    ClearActionQueue,

    // Combatant modifications, keyed by combatant id
    DealDamage {
        target_id: String,
        amount: u16,
    },
    FaintCombatant {
        target_id: String,
    },
    DecrementPp {
        target_id: String,
        move_name: String,
    },
    SetStatus {
        target_id: String,
        status: Option<StatusCondition>,
        turns: u8,
    },

    // Reporting counters
    RecordDamageDealt {
        target_id: String,
        amount: u32,
    },
    RecordDamageTaken {
        target_id: String,
        amount: u32,
    },
    RecordKill {
        target_id: String,
    },

    // Side changes
    SwitchActive {
        side: Side,
        team_index: usize,
    },

    // Battle flow
    EmitEvent(BattleEvent),
}

/// Error types for command execution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("no combatant with id {0}")]
    UnknownCombatant(String),
    #[error("combatant {combatant_id} has no move named {move_name}")]
    UnknownMove {
        combatant_id: String,
        move_name: String,
    },
    #[error("team index {team_index} is not a living member of the {side:?} side")]
    InvalidTeamIndex { side: Side, team_index: usize },
}

/// Execute a batch of commands in order, stopping at the first failure.
#[cfg(test)]
pub(crate) fn execute_command_batch(
    commands: Vec<BattleCommand>,
    session: &mut BattleSession,
    bus: &mut EventBus,
) -> Result<(), ExecutionError> {
    for command in commands {
        execute_command(command, session, bus)?;
    }
    Ok(())
}

/// Helper function to execute commands that operate on a single combatant
fn execute_combatant_command<F>(
    target_id: &str,
    session: &mut BattleSession,
    operation: F,
) -> Result<(), ExecutionError>
where
    F: FnOnce(&mut crate::combatant::Combatant) -> Result<(), ExecutionError>,
{
    match session.combatant_mut(target_id) {
        Some(combatant) => operation(combatant),
        None => Err(ExecutionError::UnknownCombatant(target_id.to_string())),
    }
}

/// Emit the faint event for a combatant that just hit 0 HP, and remember the
/// first side to run out of living members.
fn announce_faint(target_id: &str, session: &mut BattleSession, bus: &mut EventBus) {
    let Some((side, index)) = session.locate(target_id) else {
        return;
    };
    bus.push(BattleEvent::CombatantFainted {
        side,
        name: session.team(side)[index].name.clone(),
    });

    if session.first_wiped_out.is_none() && !session.has_living_members(side) {
        log::debug!("{} side has no living members left", side.label());
        session.first_wiped_out = Some(side);
    }
}

pub fn execute_command(
    command: BattleCommand,
    session: &mut BattleSession,
    bus: &mut EventBus,
) -> Result<(), ExecutionError> {
    match command {
        BattleCommand::EmitEvent(event) => {
            bus.push(event);
            Ok(())
        }
        BattleCommand::DealDamage { target_id, amount } => {
            let mut fainted_now = false;
            execute_combatant_command(&target_id, session, |combatant| {
                let was_fainted = combatant.is_fainted();
                combatant.take_damage(amount);
                fainted_now = !was_fainted && combatant.is_fainted();
                Ok(())
            })?;
            if fainted_now {
                announce_faint(&target_id, session, bus);
            }
            Ok(())
        }
        BattleCommand::FaintCombatant { target_id } => {
            let mut fainted_now = false;
            execute_combatant_command(&target_id, session, |combatant| {
                fainted_now = !combatant.is_fainted();
                combatant.set_hp(0);
                Ok(())
            })?;
            if fainted_now {
                announce_faint(&target_id, session, bus);
            }
            Ok(())
        }
        BattleCommand::DecrementPp {
            target_id,
            move_name,
        } => execute_combatant_command(&target_id, session, |combatant| {
            match combatant.moves.iter_mut().find(|m| m.name() == move_name) {
                Some(move_instance) => {
                    move_instance.use_pp();
                    Ok(())
                }
                None => Err(ExecutionError::UnknownMove {
                    combatant_id: combatant.id.clone(),
                    move_name: move_name.clone(),
                }),
            }
        }),
        BattleCommand::SetStatus {
            target_id,
            status,
            turns,
        } => execute_combatant_command(&target_id, session, |combatant| {
            combatant.status = status;
            combatant.status_turns = if status.is_some() { turns } else { 0 };
            Ok(())
        }),
        BattleCommand::RecordDamageDealt { target_id, amount } => {
            execute_combatant_command(&target_id, session, |combatant| {
                combatant.battle_stats.damage_dealt += amount;
                Ok(())
            })
        }
        BattleCommand::RecordDamageTaken { target_id, amount } => {
            execute_combatant_command(&target_id, session, |combatant| {
                combatant.battle_stats.damage_taken += amount;
                Ok(())
            })
        }
        BattleCommand::RecordKill { target_id } => {
            execute_combatant_command(&target_id, session, |combatant| {
                combatant.battle_stats.kills += 1;
                Ok(())
            })
        }
        BattleCommand::SwitchActive { side, team_index } => {
            let valid = session
                .team(side)
                .get(team_index)
                .is_some_and(|c| !c.is_fainted());
            if valid {
                session.active[side.to_index()] = team_index;
                Ok(())
            } else {
                Err(ExecutionError::InvalidTeamIndex { side, team_index })
            }
        }
        BattleCommand::SetGameState(new_state) => {
            session.game_state = new_state;
            Ok(())
        }
        BattleCommand::AdvanceRound => {
            session.round += 1;
            Ok(())
        }
        BattleCommand::ClearActionQueue => {
            session.action_queue = [None, None];
            Ok(())
        }
    }
}
