// In: src/lib.rs

//! Creature Battler
//!
//! A turn-based, two-sided creature battle engine: drafted teams, element
//! type matchups, status conditions and a tiered AI opponent. The host UI
//! drives a battle through [`BattleRunner`] and renders the returned events.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod combatant;
pub mod config;
pub mod errors;
pub mod roster;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{ElementType, MoveCategory, MoveData, StatType};

// --- From this crate's modules (`src/`) ---

// Core battle engine functions and state.
pub use battle::ai::{AiTier, Behavior};
pub use battle::commands::Side;
pub use battle::engine::{collect_npc_action, resolve_turn};
pub use battle::runner::{BattleInfo, BattleReport, BattleRunner, ExecutionResult};
pub use battle::state::{BattleEvent, BattleSession, EventBus, GameState, PlayerAction, TurnRng};

// Core runtime types for a battle.
pub use combatant::{BattleStats, Combatant, MoveInstance, StatBlock, StatusCondition};
pub use config::{BattleConfig, PpPolicy};
pub use roster::{CombatantTemplate, RonRosterSource, RosterSource};

// Crate-specific error and result types.
pub use errors::{BattleError, BattleResult, ConfigError, RosterError, RosterResult};
