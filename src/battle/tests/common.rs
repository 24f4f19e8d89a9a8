use crate::battle::state::{BattleSession, TurnRng};
use crate::combatant::{Combatant, StatBlock, StatusCondition};
use schema::{ElementType, MoveCategory, MoveData, StatType};

/// A builder for creating test combatants with common defaults: 100 max HP,
/// every stat at 50 and a single Tackle.
///
/// # Example
/// ```ignore
/// let combatant = TestCombatantBuilder::new("p1", "Pikachu", ElementType::Electric)
///     .with_moves(vec![tackle()])
///     .with_status(StatusCondition::Paralysis)
///     .build();
/// ```
pub struct TestCombatantBuilder {
    id: String,
    name: String,
    types: Vec<ElementType>,
    stats: StatBlock,
    max_hp: u16,
    moves: Option<Vec<MoveData>>,
    status: Option<StatusCondition>,
    status_turns: u8,
    current_hp: Option<u16>,
}

impl TestCombatantBuilder {
    pub fn new(id: &str, name: &str, element: ElementType) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            types: vec![element],
            stats: StatBlock::default(),
            max_hp: 100,
            moves: None,
            status: None,
            status_turns: 0,
            current_hp: None,
        }
    }

    pub fn with_types(mut self, types: Vec<ElementType>) -> Self {
        self.types = types;
        self
    }

    pub fn with_stat(mut self, stat: StatType, value: u16) -> Self {
        self.stats.set(stat, value);
        self
    }

    pub fn with_max_hp(mut self, max_hp: u16) -> Self {
        self.max_hp = max_hp;
        self
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn with_moves(mut self, moves: Vec<MoveData>) -> Self {
        self.moves = Some(moves);
        self
    }

    pub fn with_status(mut self, status: StatusCondition) -> Self {
        self.status = Some(status);
        self
    }

    /// Remaining sleep counter.
    pub fn with_status_turns(mut self, turns: u8) -> Self {
        self.status_turns = turns;
        self
    }

    pub fn build(self) -> Combatant {
        let moves = self.moves.unwrap_or_else(|| vec![tackle()]);
        let mut combatant = Combatant::new(
            self.id,
            0,
            &self.name,
            self.types,
            self.stats,
            self.max_hp,
            moves,
        );
        combatant.status = self.status;
        combatant.status_turns = self.status_turns;
        if let Some(hp) = self.current_hp {
            combatant.set_hp(hp);
        }
        combatant
    }
}

/// Creates a session with the given teams, player side first.
pub fn create_test_session(player_team: Vec<Combatant>, opponent_team: Vec<Combatant>) -> BattleSession {
    match BattleSession::new("test_battle".to_string(), player_team, opponent_team) {
        Ok(session) => session,
        Err(err) => panic!("Failed to create test session: {}", err),
    }
}

/// Creates a `TurnRng` instance with a long list of default values (50).
/// Rolls of 50 always hit, never crit and land the damage roll on 92.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![50; 100])
}

pub fn tackle() -> MoveData {
    MoveData::new("Tackle", ElementType::Normal, MoveCategory::Physical, 40, Some(100), 35)
}

pub fn damaging_move(name: &str, move_type: ElementType, category: MoveCategory, power: u16) -> MoveData {
    MoveData::new(name, move_type, category, power, Some(100), 10)
}

pub fn status_move(name: &str, move_type: ElementType) -> MoveData {
    MoveData::new(name, move_type, MoveCategory::Status, 0, Some(100), 20)
}
