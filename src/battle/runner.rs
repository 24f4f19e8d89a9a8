use crate::battle::ai::Behavior;
use crate::battle::commands::Side;
use crate::battle::engine::{collect_npc_action, resolve_turn};
use crate::battle::state::{BattleEvent, BattleSession, GameState, PlayerAction, TurnRng};
use crate::combatant::{Combatant, StatusCondition};
use crate::config::BattleConfig;
use crate::errors::{BattleError, BattleResult};
use schema::ElementType;
use serde::Serialize;
use std::cmp::Reverse;

/// High-level battle management interface for a host UI.
///
/// The host submits the player side's action; the runner validates it, asks
/// the configured AI for the opponent's action, resolves the round and
/// forwards the formatted lines to the session log.
pub struct BattleRunner {
    session: BattleSession,
    config: BattleConfig,
    ai: Box<dyn Behavior>,
    rng: TurnRng,
    accumulated_events: Vec<BattleEvent>,
}

/// Snapshot of the battle for API queries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleInfo {
    pub battle_id: String,
    pub round: u32,
    pub game_state: GameState,
    pub difficulty: &'static str,
    pub sides: Vec<SideInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideInfo {
    pub side: Side,
    pub active_index: usize,
    pub team: Vec<CombatantInfo>,
    pub remaining: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombatantInfo {
    pub id: String,
    pub name: String,
    pub types: Vec<ElementType>,
    pub current_hp: u16,
    pub max_hp: u16,
    pub is_fainted: bool,
    pub status: Option<StatusCondition>,
    pub moves: Vec<MoveInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveInfo {
    pub name: String,
    pub pp: u8,
    pub max_pp: u8,
}

/// Result of executing a battle round
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    pub events: Vec<BattleEvent>,
    pub log_lines: Vec<String>,
    pub new_game_state: GameState,
    pub battle_ended: bool,
    pub winner: Option<Side>,
}

/// Post-battle statistics line for one combatant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub side: Side,
    pub name: String,
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub kills: u32,
    pub fainted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleReport {
    pub winner: Option<Side>,
    pub rounds: u32,
    pub entries: Vec<ReportEntry>,
    /// Most kills, then most damage dealt. Ties go to the earlier entry,
    /// player side first.
    pub mvp: Option<ReportEntry>,
}

impl CombatantInfo {
    fn from_combatant(combatant: &Combatant) -> Self {
        Self {
            id: combatant.id.clone(),
            name: combatant.name.clone(),
            types: combatant.types.clone(),
            current_hp: combatant.current_hp(),
            max_hp: combatant.max_hp,
            is_fainted: combatant.is_fainted(),
            status: combatant.status,
            moves: combatant
                .moves
                .iter()
                .map(|m| MoveInfo {
                    name: m.name().to_string(),
                    pp: m.pp,
                    max_pp: m.max_pp(),
                })
                .collect(),
        }
    }
}

impl BattleRunner {
    /// Create a new runner. The RNG is seeded from `config.seed` when present.
    pub fn new(
        battle_id: String,
        player_team: Vec<Combatant>,
        opponent_team: Vec<Combatant>,
        config: BattleConfig,
    ) -> BattleResult<Self> {
        let rng = match config.seed {
            Some(seed) => TurnRng::from_seed(seed),
            None => TurnRng::new_random(),
        };
        Self::with_rng(battle_id, player_team, opponent_team, config, rng)
    }

    pub fn with_rng(
        battle_id: String,
        player_team: Vec<Combatant>,
        opponent_team: Vec<Combatant>,
        config: BattleConfig,
        rng: TurnRng,
    ) -> BattleResult<Self> {
        let session = BattleSession::new(battle_id, player_team, opponent_team)?;
        log::debug!(
            "Starting battle {} on {} difficulty",
            session.battle_id,
            config.ai_tier.difficulty_label()
        );
        Ok(Self {
            session,
            ai: config.ai_tier.behavior(),
            config,
            rng,
            accumulated_events: Vec::new(),
        })
    }

    pub fn session(&self) -> &BattleSession {
        &self.session
    }

    /// Check if the battle has ended
    pub fn is_battle_ended(&self) -> bool {
        self.session.is_over()
    }

    pub fn winner(&self) -> Option<Side> {
        self.session.winner()
    }

    /// Get all events that have occurred in the battle so far
    pub fn all_events(&self) -> &[BattleEvent] {
        &self.accumulated_events
    }

    /// Get the battle log accumulated on the session
    pub fn log(&self) -> &[String] {
        &self.session.log
    }

    /// Get current battle information for API queries
    pub fn battle_info(&self) -> BattleInfo {
        let sides = Side::both()
            .into_iter()
            .map(|side| {
                let team = self.session.team(side);
                SideInfo {
                    side,
                    active_index: self.session.active_index(side),
                    team: team.iter().map(CombatantInfo::from_combatant).collect(),
                    remaining: team.iter().filter(|c| !c.is_fainted()).count(),
                }
            })
            .collect();

        BattleInfo {
            battle_id: self.session.battle_id.clone(),
            round: self.session.round,
            game_state: self.session.game_state,
            difficulty: self.config.ai_tier.difficulty_label(),
            sides,
        }
    }

    pub fn combatant_info(&self, id: &str) -> BattleResult<CombatantInfo> {
        self.session
            .combatant(id)
            .map(CombatantInfo::from_combatant)
            .ok_or_else(|| BattleError::UnknownCombatant(id.to_string()))
    }

    /// Submit the player side's action. The AI picks the opponent's action and
    /// the round is resolved immediately.
    pub fn submit_action(&mut self, action: PlayerAction) -> BattleResult<ExecutionResult> {
        self.validate_action(Side::Player, &action)?;
        self.session.action_queue[Side::Player.to_index()] = Some(action);
        Ok(self.execute_round())
    }

    /// Let a behavior play the player side too (AI vs AI).
    pub fn run_ai_round(&mut self, player_behavior: &dyn Behavior) -> BattleResult<ExecutionResult> {
        if self.is_battle_ended() {
            return Err(BattleError::BattleOver);
        }
        collect_npc_action(&mut self.session, Side::Player, player_behavior, &mut self.rng);
        Ok(self.execute_round())
    }

    fn execute_round(&mut self) -> ExecutionResult {
        collect_npc_action(&mut self.session, Side::Opponent, self.ai.as_ref(), &mut self.rng);

        let bus = resolve_turn(&mut self.session, &self.config, &mut self.rng);
        bus.forward_to(&mut self.session);

        let log_lines = bus.formatted_lines();
        let events = bus.into_events();
        self.accumulated_events.extend(events.iter().cloned());

        ExecutionResult {
            events,
            log_lines,
            new_game_state: self.session.game_state,
            battle_ended: self.is_battle_ended(),
            winner: self.winner(),
        }
    }

    /// Validate an action against the current session.
    pub fn validate_action(&self, side: Side, action: &PlayerAction) -> BattleResult<()> {
        if self.is_battle_ended() {
            return Err(BattleError::BattleOver);
        }

        let active = self.session.active_combatant(side);
        match action {
            PlayerAction::UseMove { move_index } => {
                if active.is_fainted() {
                    return Err(BattleError::ActiveFainted);
                }
                let move_instance = active.moves.get(*move_index).ok_or(
                    BattleError::InvalidMoveIndex {
                        index: *move_index,
                        available: active.moves.len(),
                    },
                )?;
                if move_instance.pp == 0 {
                    return Err(BattleError::MoveOutOfPp {
                        move_name: move_instance.name().to_string(),
                    });
                }
            }
            PlayerAction::SwitchCombatant { team_index } => {
                let target = self
                    .session
                    .team(side)
                    .get(*team_index)
                    .ok_or(BattleError::InvalidTeamIndex(*team_index))?;
                if *team_index == self.session.active_index(side) {
                    return Err(BattleError::AlreadyActive(target.name.clone()));
                }
                if target.is_fainted() {
                    return Err(BattleError::SwitchTargetFainted(target.name.clone()));
                }
            }
        }

        Ok(())
    }

    /// Per-combatant statistics and the match MVP.
    pub fn battle_report(&self) -> BattleReport {
        let entries: Vec<ReportEntry> = Side::both()
            .into_iter()
            .flat_map(|side| {
                self.session.team(side).iter().map(move |c| ReportEntry {
                    side,
                    name: c.name.clone(),
                    damage_dealt: c.battle_stats.damage_dealt,
                    damage_taken: c.battle_stats.damage_taken,
                    kills: c.battle_stats.kills,
                    fainted: c.is_fainted(),
                })
            })
            .collect();

        let mvp = entries
            .iter()
            .enumerate()
            .max_by_key(|(index, e)| (e.kills, e.damage_dealt, Reverse(*index)))
            .map(|(_, e)| e.clone());

        BattleReport {
            winner: self.winner(),
            rounds: self.session.round,
            entries,
            mvp,
        }
    }
}

impl std::fmt::Debug for BattleRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleRunner")
            .field("session", &self.session)
            .field("config", &self.config)
            .field("rng", &self.rng)
            .finish_non_exhaustive()
    }
}
