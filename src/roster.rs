//! Roster sources: where combatant templates come from before a battle starts.
//!
//! The battle core never fetches or validates species data itself. A roster
//! source hands it fully resolved templates, and [`Combatant::from_template`]
//! turns each one into a battle-ready combatant.

use crate::combatant::{Combatant, StatBlock, MAX_MOVES};
use crate::errors::{RosterError, RosterResult};
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use schema::{ElementType, MoveData};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Draft-time description of a combatant: types, base stats and the candidate
/// moves it may bring into battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantTemplate {
    pub species_id: u32,
    pub name: String,
    pub types: Vec<ElementType>,
    #[serde(default)]
    pub stats: StatBlock,
    pub moves: Vec<MoveData>,
}

/// On-disk shape of a roster file.
#[derive(Debug, Clone, Deserialize)]
struct RosterFile {
    combatants: Vec<CombatantTemplate>,
}

pub trait RosterSource {
    fn load_templates(&self) -> RosterResult<Vec<CombatantTemplate>>;
}

/// Reads combatant templates from a RON document, either a file on disk or
/// an in-memory string.
#[derive(Debug, Clone)]
pub enum RonRosterSource {
    File(PathBuf),
    Inline(String),
}

impl RonRosterSource {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        RonRosterSource::File(path.as_ref().to_path_buf())
    }

    pub fn from_ron_str(content: &str) -> Self {
        RonRosterSource::Inline(content.to_string())
    }

    fn parse(content: &str) -> RosterResult<Vec<CombatantTemplate>> {
        let roster: RosterFile = ron::from_str(content)?;
        if roster.combatants.is_empty() {
            return Err(RosterError::EmptyRoster);
        }
        if let Some(empty) = roster.combatants.iter().find(|t| t.moves.is_empty()) {
            return Err(RosterError::NoMoves(empty.name.clone()));
        }
        Ok(roster.combatants)
    }
}

impl RosterSource for RonRosterSource {
    fn load_templates(&self) -> RosterResult<Vec<CombatantTemplate>> {
        match self {
            RonRosterSource::File(path) => {
                let content = fs::read_to_string(path).map_err(|source| RosterError::Io {
                    path: path.clone(),
                    source,
                })?;
                Self::parse(&content)
            }
            RonRosterSource::Inline(content) => Self::parse(content),
        }
    }
}

/// Pick up to four random moves from a candidate list, in random order.
pub fn draft_random_moves<R: Rng + ?Sized>(candidates: &[MoveData], rng: &mut R) -> Vec<MoveData> {
    let mut pool = candidates.to_vec();
    pool.shuffle(rng);
    pool.truncate(MAX_MOVES);
    pool
}

/// Build a team in template order, each combatant keeping its first four moves.
pub fn build_team(templates: &[CombatantTemplate]) -> Vec<Combatant> {
    templates.iter().map(Combatant::from_template).collect()
}

/// Bot draft: `size` distinct random templates, each with four random moves.
pub fn draft_bot_team<R: Rng + ?Sized>(
    templates: &[CombatantTemplate],
    size: usize,
    rng: &mut R,
) -> RosterResult<Vec<Combatant>> {
    if templates.is_empty() {
        return Err(RosterError::EmptyRoster);
    }

    let picks: Vec<&CombatantTemplate> = templates.choose_multiple(rng, size).collect();
    let mut team = Vec::with_capacity(picks.len());
    for template in picks {
        if template.moves.is_empty() {
            return Err(RosterError::NoMoves(template.name.clone()));
        }
        let drafted = CombatantTemplate {
            moves: draft_random_moves(&template.moves, rng),
            ..template.clone()
        };
        team.push(Combatant::from_template(&drafted));
    }

    log::debug!(
        "Drafted bot team: {:?}",
        team.iter().map(|c| c.name.as_str()).collect::<Vec<_>>()
    );
    Ok(team)
}
