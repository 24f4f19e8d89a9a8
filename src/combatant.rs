use crate::roster::CombatantTemplate;
use schema::{ElementType, MoveData, StatType, DEFAULT_STAT_VALUE};
use serde::{Deserialize, Serialize};

/// Flat bonus added to the base HP stat when a combatant is drafted.
pub const DRAFT_HP_BONUS: u16 = 60;

/// Max number of moves a combatant carries into battle.
pub const MAX_MOVES: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCondition {
    Burn,
    Poison,
    Paralysis,
    Sleep,
    Freeze,
}

impl StatusCondition {
    pub fn name(&self) -> &'static str {
        match self {
            StatusCondition::Burn => "burn",
            StatusCondition::Poison => "poison",
            StatusCondition::Paralysis => "paralysis",
            StatusCondition::Sleep => "sleep",
            StatusCondition::Freeze => "freeze",
        }
    }
}

/// Base stat block. Stats the roster source leaves out read as 50.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatBlock {
    pub hp: Option<u16>,
    pub attack: Option<u16>,
    pub defense: Option<u16>,
    pub special_attack: Option<u16>,
    pub special_defense: Option<u16>,
    pub speed: Option<u16>,
}

impl StatBlock {
    pub fn new(
        hp: u16,
        attack: u16,
        defense: u16,
        special_attack: u16,
        special_defense: u16,
        speed: u16,
    ) -> Self {
        Self {
            hp: Some(hp),
            attack: Some(attack),
            defense: Some(defense),
            special_attack: Some(special_attack),
            special_defense: Some(special_defense),
            speed: Some(speed),
        }
    }

    pub fn get(&self, stat: StatType) -> u16 {
        let value = match stat {
            StatType::Hp => self.hp,
            StatType::Attack => self.attack,
            StatType::Defense => self.defense,
            StatType::SpecialAttack => self.special_attack,
            StatType::SpecialDefense => self.special_defense,
            StatType::Speed => self.speed,
        };
        value.unwrap_or(DEFAULT_STAT_VALUE)
    }

    pub fn set(&mut self, stat: StatType, value: u16) {
        let slot = match stat {
            StatType::Hp => &mut self.hp,
            StatType::Attack => &mut self.attack,
            StatType::Defense => &mut self.defense,
            StatType::SpecialAttack => &mut self.special_attack,
            StatType::SpecialDefense => &mut self.special_defense,
            StatType::Speed => &mut self.speed,
        };
        *slot = Some(value);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveInstance {
    pub data: MoveData,
    pub pp: u8,
}

impl MoveInstance {
    /// Create a new move instance with max PP
    pub fn new(data: MoveData) -> Self {
        let pp = data.max_pp;
        Self { data, pp }
    }

    pub fn max_pp(&self) -> u8 {
        self.data.max_pp
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    /// Spend one PP, flooring at 0. Returns false if the move was already empty.
    pub fn use_pp(&mut self) -> bool {
        if self.pp > 0 {
            self.pp -= 1;
            true
        } else {
            false
        }
    }
}

/// Per-battle counters, used for the post-battle report only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleStats {
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub kills: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: String,                      // Unique within a battle
    pub species_id: u32,                 // Key from the roster source
    pub name: String,
    pub types: Vec<ElementType>,         // 1-2 types, ordered
    pub stats: StatBlock,
    pub max_hp: u16,
    current_hp: u16,
    pub moves: Vec<MoveInstance>,        // 1-4 moves
    pub status: Option<StatusCondition>,
    pub status_turns: u8,                // Remaining sleep counter
    pub battle_stats: BattleStats,
}

impl Combatant {
    /// Create a combatant at full HP with no status and full PP.
    pub fn new(
        id: String,
        species_id: u32,
        name: &str,
        types: Vec<ElementType>,
        stats: StatBlock,
        max_hp: u16,
        moves: Vec<MoveData>,
    ) -> Self {
        Self {
            id,
            species_id,
            name: name.to_string(),
            types,
            stats,
            max_hp,
            current_hp: max_hp,
            moves: moves
                .into_iter()
                .take(MAX_MOVES)
                .map(MoveInstance::new)
                .collect(),
            status: None,
            status_turns: 0,
            battle_stats: BattleStats::default(),
        }
    }

    /// Build a combatant from a roster template: `max_hp` is the base HP stat
    /// plus [`DRAFT_HP_BONUS`], moves are the first four candidates, and the id
    /// is a fresh UUID.
    pub fn from_template(template: &CombatantTemplate) -> Self {
        let max_hp = template
            .stats
            .get(StatType::Hp)
            .saturating_add(DRAFT_HP_BONUS);

        Self::new(
            uuid::Uuid::new_v4().to_string(),
            template.species_id,
            &template.name,
            template.types.clone(),
            template.stats.clone(),
            max_hp,
            template.moves.clone(),
        )
    }

    pub fn current_hp(&self) -> u16 {
        self.current_hp
    }

    /// Set HP directly, clamped to `max_hp`.
    pub fn set_hp(&mut self, hp: u16) {
        self.current_hp = hp.min(self.max_hp);
    }

    /// Apply damage, flooring at 0. Returns the HP actually removed.
    pub fn take_damage(&mut self, amount: u16) -> u16 {
        let removed = amount.min(self.current_hp);
        self.current_hp -= removed;
        removed
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn stat(&self, stat: StatType) -> u16 {
        self.stats.get(stat)
    }

    pub fn has_type(&self, element: ElementType) -> bool {
        self.types.contains(&element)
    }

    /// Percentage of max HP represented by `amount`, floored.
    pub fn hp_percent(&self, amount: u16) -> u16 {
        if self.max_hp == 0 {
            return 0;
        }
        ((amount as u32 * 100) / self.max_hp as u32) as u16
    }

    pub fn has_usable_move(&self) -> bool {
        self.moves.iter().any(|m| m.pp > 0)
    }
}
