use std::path::PathBuf;
use thiserror::Error;

/// Caller contract violations detected by the battle host facade.
///
/// Domain outcomes (misses, immunities, failed status moves) are never errors;
/// they are reported through battle events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    #[error("invalid move index {index}: the active combatant knows {available} moves")]
    InvalidMoveIndex { index: usize, available: usize },
    #[error("{move_name} has no PP remaining")]
    MoveOutOfPp { move_name: String },
    #[error("invalid team index {0}")]
    InvalidTeamIndex(usize),
    #[error("cannot switch to {0}: it has fainted")]
    SwitchTargetFainted(String),
    #[error("{0} is already active")]
    AlreadyActive(String),
    #[error("the active combatant has fainted and cannot act")]
    ActiveFainted,
    #[error("the battle is already over")]
    BattleOver,
    #[error("unknown combatant id {0}")]
    UnknownCombatant(String),
    #[error("a side needs at least one combatant")]
    EmptyTeam,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to read roster {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse roster: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("roster contains no combatants")]
    EmptyRoster,
    #[error("{0} has no moves to draft from")]
    NoMoves(String),
}

/// Type alias for Results using BattleError
pub type BattleResult<T> = Result<T, BattleError>;

pub type RosterResult<T> = Result<T, RosterError>;
