//! A module for defining AI behaviors for battle opponents.

use crate::battle::commands::Side;
use crate::battle::damage::predict_damage;
use crate::battle::state::{BattleSession, PlayerAction, TurnRng};
use crate::combatant::Combatant;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::str::FromStr;

/// Weight of the damage a combatant expects to take in its matchup score.
pub const TAKEN_DAMAGE_WEIGHT: f64 = 0.5;
/// Above the low-HP threshold an alternative must beat the current score by this fraction.
pub const SWITCH_MARGIN: f64 = 0.2;

/// AI policy, fixed for the whole battle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiTier {
    /// Easy: random moves.
    Random,
    /// Normal: highest predicted damage.
    #[default]
    Greedy,
    /// Hard: greedy, plus matchup-driven switching.
    Tactical,
}

impl AiTier {
    pub fn difficulty_label(self) -> &'static str {
        match self {
            AiTier::Random => "Easy",
            AiTier::Greedy => "Normal",
            AiTier::Tactical => "Hard",
        }
    }

    /// Scaling applied to damage dealt by the AI side.
    pub fn damage_multiplier(self) -> f64 {
        match self {
            AiTier::Random => 0.7,
            AiTier::Greedy => 1.0,
            AiTier::Tactical => 1.3,
        }
    }

    /// Extra miss chance, in percent, applied to the AI side's moves after
    /// the accuracy check.
    pub fn miss_chance(self) -> u8 {
        match self {
            AiTier::Random => 15,
            AiTier::Greedy | AiTier::Tactical => 0,
        }
    }

    pub fn behavior(self) -> Box<dyn Behavior> {
        match self {
            AiTier::Random => Box::new(RandomAI),
            AiTier::Greedy => Box::new(GreedyAI),
            AiTier::Tactical => Box::new(TacticalAI),
        }
    }
}

impl FromStr for AiTier {
    type Err = String;

    /// Accepts tier names and difficulty labels, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" | "easy" => Ok(AiTier::Random),
            "greedy" | "normal" => Ok(AiTier::Greedy),
            "tactical" | "hard" => Ok(AiTier::Tactical),
            other => Err(format!("unknown AI tier '{}'", other)),
        }
    }
}

/// A trait for any system that can decide on a battle action.
/// This provides a common interface for different AI difficulties or strategies.
pub trait Behavior {
    /// Inspects the session and decides on the next action for the given side.
    fn decide_action(&self, side: Side, session: &BattleSession, rng: &mut TurnRng)
        -> PlayerAction;
}

/// Indices of the moves the AI may pick from: those with PP left, or every
/// move when all are exhausted.
fn candidate_moves(combatant: &Combatant) -> Vec<usize> {
    let exhausted = !combatant.has_usable_move();
    combatant
        .moves
        .iter()
        .enumerate()
        .filter(|(_, m)| exhausted || m.pp > 0)
        .map(|(index, _)| index)
        .collect()
}

/// Move with the highest predicted damage against `defender`; ties go to the
/// earliest move. Returns the index and its prediction.
fn best_move(attacker: &Combatant, defender: &Combatant) -> Option<(usize, u16)> {
    candidate_moves(attacker)
        .into_iter()
        .map(|index| {
            (
                index,
                predict_damage(attacker, defender, &attacker.moves[index].data),
            )
        })
        .max_by_key(|(index, damage)| (*damage, Reverse(*index)))
}

/// `best predicted damage dealt - 0.5 * worst predicted damage taken`
pub fn matchup_score(candidate: &Combatant, opponent: &Combatant) -> f64 {
    let dealt = best_move(candidate, opponent)
        .map(|(_, damage)| damage)
        .unwrap_or(0) as f64;
    let taken = opponent
        .moves
        .iter()
        .map(|m| predict_damage(opponent, candidate, &m.data))
        .max()
        .unwrap_or(0) as f64;

    dealt - TAKEN_DAMAGE_WEIGHT * taken
}

/// Uniform pick among moves with PP left.
pub struct RandomAI;

impl Behavior for RandomAI {
    fn decide_action(
        &self,
        side: Side,
        session: &BattleSession,
        rng: &mut TurnRng,
    ) -> PlayerAction {
        let candidates = candidate_moves(session.active_combatant(side));
        let move_index = match candidates.len() {
            0 | 1 => candidates.first().copied().unwrap_or(0),
            count => {
                let pick = rng.next_range("Random AI Move", 0, (count - 1) as u8);
                candidates[pick as usize]
            }
        };
        log::debug!("{} side (random AI) picks move #{}", side.label(), move_index);
        PlayerAction::UseMove { move_index }
    }
}

/// Highest predicted damage against the opposing active combatant.
pub struct GreedyAI;

impl Behavior for GreedyAI {
    fn decide_action(
        &self,
        side: Side,
        session: &BattleSession,
        _rng: &mut TurnRng,
    ) -> PlayerAction {
        let attacker = session.active_combatant(side);
        let defender = session.active_combatant(side.opponent());
        let move_index = best_move(attacker, defender)
            .map(|(index, _)| index)
            .unwrap_or(0);
        log::debug!("{} side (greedy AI) picks move #{}", side.label(), move_index);
        PlayerAction::UseMove { move_index }
    }
}

/// Greedy, but first considers switching to a better matchup.
///
/// At or below 25% HP any strictly better alternative is taken; otherwise an
/// alternative must beat the current score by at least 20%.
pub struct TacticalAI;

impl TacticalAI {
    fn best_switch(&self, side: Side, session: &BattleSession) -> Option<(usize, f64)> {
        let opponent = session.active_combatant(side.opponent());
        let active_index = session.active_index(side);

        session
            .team(side)
            .iter()
            .enumerate()
            .filter(|(index, c)| *index != active_index && !c.is_fainted())
            .map(|(index, c)| (index, matchup_score(c, opponent)))
            .max_by_key(|(index, score)| (OrderedFloat(*score), Reverse(*index)))
    }
}

impl Behavior for TacticalAI {
    fn decide_action(
        &self,
        side: Side,
        session: &BattleSession,
        rng: &mut TurnRng,
    ) -> PlayerAction {
        let active = session.active_combatant(side);
        let opponent = session.active_combatant(side.opponent());
        let current_score = matchup_score(active, opponent);

        if let Some((team_index, score)) = self.best_switch(side, session) {
            let low_hp = (active.current_hp() as u32) * 4 <= active.max_hp as u32;
            let worth_switching = if low_hp {
                score > current_score
            } else {
                score > current_score && score - current_score >= SWITCH_MARGIN * current_score.abs()
            };

            log::debug!(
                "{} side (tactical AI): current {:.1}, best alternative #{} {:.1}, low HP {}",
                side.label(),
                current_score,
                team_index,
                score,
                low_hp
            );

            if worth_switching {
                return PlayerAction::SwitchCombatant { team_index };
            }
        }

        GreedyAI.decide_action(side, session, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(AiTier::Random, "Easy", 0.7, 15)]
    #[case(AiTier::Greedy, "Normal", 1.0, 0)]
    #[case(AiTier::Tactical, "Hard", 1.3, 0)]
    fn test_tier_labels_and_multipliers(
        #[case] tier: AiTier,
        #[case] label: &str,
        #[case] multiplier: f64,
        #[case] miss_chance: u8,
    ) {
        assert_eq!(tier.difficulty_label(), label);
        assert_eq!(tier.damage_multiplier(), multiplier);
        assert_eq!(tier.miss_chance(), miss_chance);
    }

    #[rstest]
    #[case("easy", AiTier::Random)]
    #[case("Greedy", AiTier::Greedy)]
    #[case("HARD", AiTier::Tactical)]
    fn test_tier_from_str(#[case] input: &str, #[case] expected: AiTier) {
        assert_eq!(input.parse::<AiTier>(), Ok(expected));
    }

    #[test]
    fn test_unknown_tier() {
        assert!("nightmare".parse::<AiTier>().is_err());
    }
}
