use crate::battle::commands::Side;
use crate::combatant::{Combatant, StatusCondition};
use crate::errors::{BattleError, BattleResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Copy)]
pub enum GameState {
    WaitingForActions,
    TurnInProgress,
    PlayerWin,
    OpponentWin,
}

impl GameState {
    pub fn is_over(self) -> bool {
        matches!(self, GameState::PlayerWin | GameState::OpponentWin)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    // The index refers to the move's position (0-3) in the active combatant's move list.
    UseMove { move_index: usize },

    // The index refers to the combatant's position in the side's draft order.
    SwitchCombatant { team_index: usize },
}

impl std::fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerAction::UseMove { move_index } => write!(f, "use move #{}", move_index),
            PlayerAction::SwitchCombatant { team_index } => {
                write!(f, "switch to team slot #{}", team_index)
            }
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Round Management
    RoundStarted {
        round: u32,
    },
    Outspeeds {
        side: Side,
        name: String,
        speed: u16,
        other_speed: u16,
    },
    SpeedTie {
        name: String,
        speed: u16,
    },

    // Combatant Actions
    CombatantSwitched {
        side: Side,
        old_name: String,
        new_name: String,
    },
    MoveUsed {
        side: Side,
        attacker: String,
        move_name: String,
    },
    MoveMissed {
        attacker: String,
        move_name: String,
    },
    MoveHadNoEffect {
        move_name: String,
    },
    CriticalHit {
        attacker: String,
    },
    AttackTypeEffectiveness {
        multiplier: f32,
    },
    DamageDealt {
        target: String,
        damage: u16,
        percent: u16,
        remaining_hp: u16,
    },

    // Status Effects
    StatusApplied {
        target: String,
        status: StatusCondition,
    },
    StatusFailed {
        target: String,
    },
    StatusImmune {
        target: String,
        status: StatusCondition,
    },
    StatusPreventedAction {
        target: String,
        status: StatusCondition,
    },
    StatusRemoved {
        target: String,
        status: StatusCondition,
    },
    StatusDamage {
        target: String,
        status: StatusCondition,
        damage: u16,
        remaining_hp: u16,
    },

    // Fainting
    SelfKnockout {
        name: String,
    },
    CombatantFainted {
        side: Side,
        name: String,
    },
    ReplacementSent {
        side: Side,
        fallen: String,
        replacement: String,
    },

    // Battle End
    SideDefeated {
        side: Side,
    },
    BattleEnded {
        winner: Side,
    },
}

impl BattleEvent {
    /// Formats the event into a single human-readable log line.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self) -> Option<String> {
        match self {
            BattleEvent::RoundStarted { round } => Some(format!("=== Round {} ===", round)),
            BattleEvent::Outspeeds {
                side,
                name,
                speed,
                other_speed,
            } => Some(format!(
                "{}{} outspeeds! (SPD: {} vs {})",
                Self::side_prefix(*side),
                name,
                speed,
                other_speed
            )),
            BattleEvent::SpeedTie { name, speed } => Some(format!(
                "Speed tie at {}! {} moves first.",
                speed, name
            )),

            BattleEvent::CombatantSwitched {
                old_name, new_name, ..
            } => Some(format!("{} returned! Go {}!", old_name, new_name)),
            BattleEvent::MoveUsed {
                attacker,
                move_name,
                ..
            } => Some(format!("{} used {}!", attacker, move_name)),
            BattleEvent::MoveMissed { attacker, .. } => {
                Some(format!("{}'s attack missed!", attacker))
            }
            BattleEvent::MoveHadNoEffect { .. } => Some("But nothing happened!".to_string()),
            BattleEvent::CriticalHit { .. } => Some("Critical Hit!".to_string()),
            BattleEvent::AttackTypeEffectiveness { multiplier } => match *multiplier {
                m if m > 1.0 => Some("It's super effective!".to_string()),
                m if m < 1.0 && m > 0.0 => Some("It's not very effective...".to_string()),
                m if m == 0.0 => Some("It had no effect...".to_string()),
                _ => None, // Neutral, no message
            },
            BattleEvent::DamageDealt {
                target, percent, ..
            } => Some(format!("({} took {}% damage)", target, percent)),

            BattleEvent::StatusApplied { target, status } => Some(format!(
                "{} {}",
                target,
                Self::format_status_applied(*status)
            )),
            BattleEvent::StatusFailed { .. } => Some("But it failed!".to_string()),
            BattleEvent::StatusImmune { target, .. } => {
                Some(format!("It doesn't affect {}...", target))
            }
            BattleEvent::StatusPreventedAction { target, status } => Some(format!(
                "{} {}",
                target,
                Self::format_status_prevented(*status)
            )),
            BattleEvent::StatusRemoved { target, status } => Some(format!(
                "{} {}",
                target,
                Self::format_status_removed(*status)
            )),
            BattleEvent::StatusDamage {
                target,
                status,
                damage,
                ..
            } => Some(format!(
                "{} is hurt by its {}! ({} damage)",
                target,
                status.name(),
                damage
            )),

            BattleEvent::SelfKnockout { name } => {
                Some(format!("{} was caught in its own blast!", name))
            }
            BattleEvent::CombatantFainted { name, .. } => Some(format!("{} fainted!", name)),
            BattleEvent::ReplacementSent {
                fallen,
                replacement,
                ..
            } => Some(format!(
                "{} has fallen! Sending out {}...",
                fallen, replacement
            )),

            BattleEvent::SideDefeated { side } => {
                Some(format!("{} is out of usable combatants!", side.label()))
            }
            BattleEvent::BattleEnded { winner } => {
                Some(format!("{} has won the battle!", winner.label()))
            }
        }
    }

    // --- Private Helper Functions ---

    fn side_prefix(side: Side) -> &'static str {
        match side {
            Side::Player => "",
            Side::Opponent => "Enemy ",
        }
    }

    fn format_status_applied(status: StatusCondition) -> &'static str {
        match status {
            StatusCondition::Sleep => "fell asleep!",
            StatusCondition::Poison => "was poisoned!",
            StatusCondition::Burn => "was burned!",
            StatusCondition::Freeze => "was frozen solid!",
            StatusCondition::Paralysis => "is paralyzed! It may be unable to move!",
        }
    }

    fn format_status_prevented(status: StatusCondition) -> &'static str {
        match status {
            StatusCondition::Sleep => "is fast asleep.",
            StatusCondition::Freeze => "is frozen solid!",
            StatusCondition::Paralysis => "is fully paralyzed!",
            StatusCondition::Burn | StatusCondition::Poison => "couldn't move!",
        }
    }

    fn format_status_removed(status: StatusCondition) -> String {
        match status {
            StatusCondition::Sleep => "woke up!".to_string(),
            StatusCondition::Freeze => "thawed out!".to_string(),
            other => format!("was cured of its {}!", other.name()),
        }
    }
}

/// Anything that accepts formatted battle log lines, one call per line.
pub trait LogSink {
    fn add_log(&mut self, message: String);
}

impl LogSink for Vec<String> {
    fn add_log(&mut self, message: String) {
        self.push(message);
    }
}

/// Event bus for collecting battle events in the order they happened.
///
/// ```rust,ignore
/// let bus = resolve_turn(&mut session, &config, &mut rng);
/// bus.forward_to(&mut session);      // One log line per visible event
/// println!("{}", bus);               // Display impl, debug format
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }

    /// Formatted lines for every visible event, in order.
    pub fn formatted_lines(&self) -> Vec<String> {
        self.events.iter().filter_map(BattleEvent::format).collect()
    }

    /// Send every visible event to a log sink, one line per event.
    pub fn forward_to<S: LogSink + ?Sized>(&self, sink: &mut S) {
        for line in self.formatted_lines() {
            sink.add_log(line);
        }
    }

    /// Return true if the event bus contains no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Return the number of events in the bus.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl std::fmt::Display for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum RngSource {
    Scripted { outcomes: Vec<u8>, index: usize },
    Seeded(StdRng),
}

/// Source of every random draw the engine makes.
///
/// Scripted outcomes are percentile rolls in 1..=100. Ranged draws made from a
/// scripted source scale the roll linearly across the range, so 1 maps to the
/// low end and 100 to the high end.
#[derive(Debug, Clone)]
pub struct TurnRng {
    source: RngSource,
}

impl TurnRng {
    pub fn new_for_test(outcomes: Vec<u8>) -> Self {
        Self {
            source: RngSource::Scripted { outcomes, index: 0 },
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: RngSource::Seeded(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn new_random() -> Self {
        Self {
            source: RngSource::Seeded(StdRng::from_os_rng()),
        }
    }

    /// A percentile roll in 1..=100.
    pub fn next_outcome(&mut self, reason: &str) -> u8 {
        let outcome = match &mut self.source {
            RngSource::Seeded(rng) => rng.random_range(1..=100),
            RngSource::Scripted { outcomes, index } => Self::next_scripted(outcomes, index, reason),
        };
        log::trace!("[RNG] Consumed {} for: {}", outcome, reason);
        outcome
    }

    /// A uniform integer in `low..=high`.
    pub fn next_range(&mut self, reason: &str, low: u8, high: u8) -> u8 {
        let value = match &mut self.source {
            RngSource::Seeded(rng) => rng.random_range(low..=high),
            RngSource::Scripted { outcomes, index } => {
                let outcome = Self::next_scripted(outcomes, index, reason).clamp(1, 100) as u32;
                let span = (high - low) as u32 + 1;
                low + (((outcome - 1) * span) / 100) as u8
            }
        };
        log::trace!("[RNG] Drew {} in {}..={} for: {}", value, low, high, reason);
        value
    }

    fn next_scripted(outcomes: &[u8], index: &mut usize, reason: &str) -> u8 {
        if *index >= outcomes.len() {
            // Add the reason to the panic message for better debugging!
            panic!(
                "TurnRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                reason
            );
        }
        let outcome = outcomes[*index];
        *index += 1;
        outcome
    }

    /// Number of scripted outcomes consumed so far. Always 0 for seeded sources.
    pub fn consumed(&self) -> usize {
        match &self.source {
            RngSource::Scripted { index, .. } => *index,
            RngSource::Seeded(_) => 0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BattleSession {
    pub battle_id: String,
    pub teams: [Vec<Combatant>; 2],  // Draft order, indexed by Side
    pub active: [usize; 2],          // Active slot per side
    pub round: u32,
    pub game_state: GameState,
    pub action_queue: [Option<PlayerAction>; 2],
    pub log: Vec<String>,
    pub first_wiped_out: Option<Side>, // First side to run out of living members
}

impl BattleSession {
    pub fn new(
        id: String,
        player_team: Vec<Combatant>,
        opponent_team: Vec<Combatant>,
    ) -> BattleResult<Self> {
        if player_team.is_empty() || opponent_team.is_empty() {
            return Err(BattleError::EmptyTeam);
        }

        Ok(Self {
            battle_id: id,
            teams: [player_team, opponent_team],
            active: [0, 0],
            round: 1,
            game_state: GameState::WaitingForActions,
            action_queue: [None, None],
            log: Vec::new(),
            first_wiped_out: None,
        })
    }

    pub fn team(&self, side: Side) -> &[Combatant] {
        &self.teams[side.to_index()]
    }

    pub fn team_mut(&mut self, side: Side) -> &mut Vec<Combatant> {
        &mut self.teams[side.to_index()]
    }

    pub fn active_index(&self, side: Side) -> usize {
        self.active[side.to_index()]
    }

    pub fn active_combatant(&self, side: Side) -> &Combatant {
        &self.teams[side.to_index()][self.active[side.to_index()]]
    }

    pub fn active_combatant_mut(&mut self, side: Side) -> &mut Combatant {
        let index = self.active[side.to_index()];
        &mut self.teams[side.to_index()][index]
    }

    /// Locate a combatant by id, returning its side and team index.
    pub fn locate(&self, id: &str) -> Option<(Side, usize)> {
        Side::both().into_iter().find_map(|side| {
            self.team(side)
                .iter()
                .position(|c| c.id == id)
                .map(|index| (side, index))
        })
    }

    pub fn combatant(&self, id: &str) -> Option<&Combatant> {
        self.locate(id)
            .map(|(side, index)| &self.teams[side.to_index()][index])
    }

    pub fn combatant_mut(&mut self, id: &str) -> Option<&mut Combatant> {
        let (side, index) = self.locate(id)?;
        self.teams[side.to_index()].get_mut(index)
    }

    pub fn has_living_members(&self, side: Side) -> bool {
        self.team(side).iter().any(|c| !c.is_fainted())
    }

    /// First living member in draft order, if any.
    pub fn first_living_index(&self, side: Side) -> Option<usize> {
        self.team(side).iter().position(|c| !c.is_fainted())
    }

    pub fn is_over(&self) -> bool {
        self.game_state.is_over()
    }

    pub fn winner(&self) -> Option<Side> {
        match self.game_state {
            GameState::PlayerWin => Some(Side::Player),
            GameState::OpponentWin => Some(Side::Opponent),
            _ => None,
        }
    }
}

impl LogSink for BattleSession {
    fn add_log(&mut self, message: String) {
        self.log.push(message);
    }
}
