use crate::battle::ai::Behavior;
use crate::battle::calculators::{calculate_attack_outcome, AttackContext};
use crate::battle::commands::{execute_command, BattleCommand, Side};
use crate::battle::conditions::{check_can_act, end_of_round_damage};
use crate::battle::state::{BattleEvent, BattleSession, EventBus, GameState, PlayerAction, TurnRng};
use crate::battle::stats::effective_speed;
use crate::config::BattleConfig;

/// Ask `behavior` for an action for `side` unless one is already queued.
///
/// Switches resolve before moves, so a switch already queued by the other
/// side is applied to the board the behavior sees.
pub fn collect_npc_action(
    session: &mut BattleSession,
    side: Side,
    behavior: &dyn Behavior,
    rng: &mut TurnRng,
) {
    if session.is_over() || session.action_queue[side.to_index()].is_some() {
        return;
    }
    let action = match pending_switch_view(session, side.opponent()) {
        Some(view) => behavior.decide_action(side, &view, rng),
        None => behavior.decide_action(side, session, rng),
    };
    log::debug!("Chosen action for {} side: {}", side.label(), action);
    session.action_queue[side.to_index()] = Some(action);
}

/// The session as it will look once `side`'s queued switch has run, or `None`
/// when `side` has no valid switch queued.
fn pending_switch_view(session: &BattleSession, side: Side) -> Option<BattleSession> {
    let Some(PlayerAction::SwitchCombatant { team_index }) = session.action_queue[side.to_index()] else {
        return None;
    };
    let target = session.team(side).get(team_index)?;
    if target.is_fainted() || team_index == session.active_index(side) {
        return None;
    }
    let mut view = session.clone();
    view.active[side.to_index()] = team_index;
    Some(view)
}

/// Apply commands one at a time. A failing command is logged and skipped so
/// the round always runs to completion.
fn apply_commands(commands: Vec<BattleCommand>, session: &mut BattleSession, bus: &mut EventBus) {
    for command in commands {
        let description = format!("{:?}", command);
        if let Err(error) = execute_command(command, session, bus) {
            log::error!("Command {} failed: {}", description, error);
        }
    }
}

/// Main entry point for turn resolution.
///
/// Runs one complete round from the actions queued on the session:
/// switches, then moves in speed order, then end-of-round status damage,
/// faint replacement and the win check. Returns the round's events in order.
pub fn resolve_turn(session: &mut BattleSession, config: &BattleConfig, rng: &mut TurnRng) -> EventBus {
    let mut bus = EventBus::new();

    if session.is_over() {
        log::warn!("resolve_turn called on a finished battle {}", session.battle_id);
        return bus;
    }

    // 1. Initialization
    initialize_turn(session, &mut bus);
    let actions = session.action_queue;

    // 2. Voluntary switches go first and cost the switcher its turn
    for side in Side::both() {
        if let Some(PlayerAction::SwitchCombatant { team_index }) = actions[side.to_index()] {
            execute_switch(side, team_index, session, &mut bus);
        }
    }

    // 3. Moves, fastest first
    let movers: Vec<(Side, usize)> = Side::both()
        .into_iter()
        .filter_map(|side| match actions[side.to_index()] {
            Some(PlayerAction::UseMove { move_index }) => Some((side, move_index)),
            _ => None,
        })
        .collect();

    let ordered = determine_action_order(session, &movers, rng, &mut bus);
    for (side, move_index) in ordered {
        execute_move(side, move_index, session, config, rng, &mut bus);
    }

    // 4. End-of-Turn Phase
    execute_end_turn_phase(session, &mut bus);

    // 5. Cleanup & Finalization
    finalize_turn(session, &mut bus);

    bus
}

fn initialize_turn(session: &mut BattleSession, bus: &mut EventBus) {
    apply_commands(
        vec![BattleCommand::SetGameState(GameState::TurnInProgress)],
        session,
        bus,
    );
    bus.push(BattleEvent::RoundStarted {
        round: session.round,
    });
}

/// Order the sides using a move this round by effective speed. Exact ties are
/// a coin flip. Emits the ordering line when both sides are moving.
pub fn determine_action_order(
    session: &BattleSession,
    movers: &[(Side, usize)],
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> Vec<(Side, usize)> {
    let [first, second] = movers else {
        return movers.to_vec();
    };

    let first_combatant = session.active_combatant(first.0);
    let second_combatant = session.active_combatant(second.0);
    let first_speed = effective_speed(first_combatant);
    let second_speed = effective_speed(second_combatant);

    let first_goes_first = if first_speed != second_speed {
        first_speed > second_speed
    } else {
        rng.next_range("Speed Tie", 0, 1) == 0
    };

    let (leader, trailer) = if first_goes_first {
        (*first, *second)
    } else {
        (*second, *first)
    };
    let leader_combatant = session.active_combatant(leader.0);

    if first_speed == second_speed {
        bus.push(BattleEvent::SpeedTie {
            name: leader_combatant.name.clone(),
            speed: first_speed,
        });
    } else {
        let (leader_speed, trailer_speed) = if first_goes_first {
            (first_speed, second_speed)
        } else {
            (second_speed, first_speed)
        };
        bus.push(BattleEvent::Outspeeds {
            side: leader.0,
            name: leader_combatant.name.clone(),
            speed: leader_speed,
            other_speed: trailer_speed,
        });
    }

    log::debug!(
        "Turn order: {} ({}) then {} ({})",
        leader.0.label(),
        first_speed.max(second_speed),
        trailer.0.label(),
        first_speed.min(second_speed)
    );
    vec![leader, trailer]
}

/// Execute switch action - change the active combatant
fn execute_switch(side: Side, team_index: usize, session: &mut BattleSession, bus: &mut EventBus) {
    let old_name = session.active_combatant(side).name.clone();
    match execute_command(
        BattleCommand::SwitchActive { side, team_index },
        session,
        bus,
    ) {
        Ok(()) => bus.push(BattleEvent::CombatantSwitched {
            side,
            old_name,
            new_name: session.active_combatant(side).name.clone(),
        }),
        Err(error) => log::error!("Switch for {} side failed: {}", side.label(), error),
    }
}

/// Resolve one side's move. Re-reads both active combatants from the session,
/// so an actor that fainted earlier in the round does nothing.
fn execute_move(
    side: Side,
    move_index: usize,
    session: &mut BattleSession,
    config: &BattleConfig,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) {
    {
        let attacker = session.active_combatant(side);
        let defender = session.active_combatant(side.opponent());
        if attacker.is_fainted() || defender.is_fainted() {
            log::debug!("Skipping {}'s move: a participant has fainted", attacker.name);
            return;
        }
    }

    // Status gate
    let check = check_can_act(session.active_combatant(side), rng);
    apply_commands(check.commands, session, bus);
    if !check.can_act {
        return;
    }

    let context = AttackContext {
        attacker_side: side,
        pp_policy: config.pp_policy,
        ai_tier: config.ai_tier,
    };
    let commands = calculate_attack_outcome(
        session.active_combatant(side),
        session.active_combatant(side.opponent()),
        move_index,
        &context,
        rng,
    );
    apply_commands(commands, session, bus);
}

/// Burn and poison damage for each side's living active combatant.
pub fn execute_end_turn_phase(session: &mut BattleSession, bus: &mut EventBus) {
    for side in Side::both() {
        let commands = end_of_round_damage(session.active_combatant(side));
        apply_commands(commands, session, bus);
    }
}

fn finalize_turn(session: &mut BattleSession, bus: &mut EventBus) {
    // 1. Replace fainted active combatants
    replace_fainted_combatants(session, bus);

    // 2. Check for win conditions
    check_win_conditions(session, bus);

    // 3. Advance the round counter and reopen for actions if the battle is ongoing
    if session.game_state == GameState::TurnInProgress {
        apply_commands(
            vec![
                BattleCommand::AdvanceRound,
                BattleCommand::SetGameState(GameState::WaitingForActions),
            ],
            session,
            bus,
        );
    }

    // 4. Clear the action queue from the turn that just ended
    apply_commands(vec![BattleCommand::ClearActionQueue], session, bus);
}

/// A fainted active combatant is replaced by the first living member in
/// draft order. The replacement costs no turn.
fn replace_fainted_combatants(session: &mut BattleSession, bus: &mut EventBus) {
    for side in Side::both() {
        if !session.active_combatant(side).is_fainted() {
            continue;
        }
        let Some(team_index) = session.first_living_index(side) else {
            continue;
        };

        let fallen = session.active_combatant(side).name.clone();
        let replacement = session.team(side)[team_index].name.clone();
        apply_commands(
            vec![
                BattleCommand::SwitchActive { side, team_index },
                BattleCommand::EmitEvent(BattleEvent::ReplacementSent {
                    side,
                    fallen,
                    replacement,
                }),
            ],
            session,
            bus,
        );
    }
}

/// Check win conditions and update the session accordingly. When both sides
/// are wiped out in the same round, the side that ran out first loses.
fn check_win_conditions(session: &mut BattleSession, bus: &mut EventBus) {
    let player_alive = session.has_living_members(Side::Player);
    let opponent_alive = session.has_living_members(Side::Opponent);

    let loser = match (player_alive, opponent_alive) {
        (true, true) => return,
        (false, true) => Side::Player,
        (true, false) => Side::Opponent,
        (false, false) => session.first_wiped_out.unwrap_or_else(|| {
            log::error!("Both sides wiped out with no recorded order; ruling against the player");
            Side::Player
        }),
    };
    let winner = loser.opponent();
    let final_state = match winner {
        Side::Player => GameState::PlayerWin,
        Side::Opponent => GameState::OpponentWin,
    };

    apply_commands(
        vec![
            BattleCommand::SetGameState(final_state),
            BattleCommand::EmitEvent(BattleEvent::SideDefeated { side: loser }),
            BattleCommand::EmitEvent(BattleEvent::BattleEnded { winner }),
        ],
        session,
        bus,
    );
}
