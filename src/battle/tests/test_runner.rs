#[cfg(test)]
mod tests {
    use crate::battle::ai::AiTier;
    use crate::battle::commands::Side;
    use crate::battle::runner::BattleRunner;
    use crate::battle::state::{BattleEvent, GameState, PlayerAction, TurnRng};
    use crate::battle::tests::common::{damaging_move, predictable_rng, status_move, TestCombatantBuilder};
    use crate::combatant::Combatant;
    use crate::config::BattleConfig;
    use crate::errors::BattleError;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::{ElementType, MoveCategory, StatType};

    fn player_team() -> Vec<Combatant> {
        vec![
            TestCombatantBuilder::new("p1", "Machamp", ElementType::Fighting)
                .with_stat(StatType::Speed, 100)
                .build(),
            TestCombatantBuilder::new("p2", "Hitmonlee", ElementType::Fighting).build(),
            TestCombatantBuilder::new("p3", "Primeape", ElementType::Fighting)
                .with_hp(0)
                .build(),
        ]
    }

    fn runner_with(opponent_team: Vec<Combatant>) -> BattleRunner {
        BattleRunner::with_rng(
            "runner_test".to_string(),
            player_team(),
            opponent_team,
            BattleConfig::default(),
            predictable_rng(),
        )
        .unwrap()
    }

    fn runner() -> BattleRunner {
        runner_with(vec![TestCombatantBuilder::new("o1", "Snorlax", ElementType::Normal)
            .with_max_hp(300)
            .build()])
    }

    #[test]
    fn test_submit_resolves_a_full_round() {
        let mut runner = runner();

        let result = runner.submit_action(PlayerAction::UseMove { move_index: 0 }).unwrap();

        assert_eq!(result.new_game_state, GameState::WaitingForActions);
        assert!(!result.battle_ended);
        assert_eq!(result.winner, None);
        assert_eq!(result.log_lines[0], "=== Round 1 ===");
        assert_eq!(result.log_lines[1], "Machamp outspeeds! (SPD: 100 vs 50)");
        assert_eq!(runner.log(), result.log_lines.as_slice());
        assert_eq!(runner.all_events(), result.events.as_slice());
        assert_eq!(runner.session().round, 2);
    }

    #[test]
    fn test_events_accumulate_across_rounds() {
        let mut runner = runner();

        let first = runner.submit_action(PlayerAction::UseMove { move_index: 0 }).unwrap();
        let second = runner.submit_action(PlayerAction::UseMove { move_index: 0 }).unwrap();

        assert_eq!(runner.all_events().len(), first.events.len() + second.events.len());
        assert_eq!(runner.log().len(), first.log_lines.len() + second.log_lines.len());
    }

    #[rstest]
    #[case(PlayerAction::UseMove { move_index: 2 }, BattleError::InvalidMoveIndex { index: 2, available: 1 })]
    #[case(PlayerAction::SwitchCombatant { team_index: 5 }, BattleError::InvalidTeamIndex(5))]
    #[case(PlayerAction::SwitchCombatant { team_index: 0 }, BattleError::AlreadyActive("Machamp".to_string()))]
    #[case(PlayerAction::SwitchCombatant { team_index: 2 }, BattleError::SwitchTargetFainted("Primeape".to_string()))]
    fn test_invalid_actions_are_rejected(#[case] action: PlayerAction, #[case] expected: BattleError) {
        let mut runner = runner();

        assert_eq!(runner.submit_action(action), Err(expected));
        // Nothing was resolved
        assert_eq!(runner.session().round, 1);
        assert!(runner.all_events().is_empty());
    }

    #[test]
    fn test_move_out_of_pp_is_rejected() {
        let mut runner = BattleRunner::with_rng(
            "pp_test".to_string(),
            vec![TestCombatantBuilder::new("p", "Ditto", ElementType::Normal)
                .with_max_hp(2000)
                .with_moves(vec![status_move("Transform", ElementType::Normal)])
                .build()],
            vec![TestCombatantBuilder::new("o", "Snorlax", ElementType::Normal).build()],
            BattleConfig::default(),
            TurnRng::new_for_test(vec![50; 200]),
        )
        .unwrap();

        for _ in 0..20 {
            runner.submit_action(PlayerAction::UseMove { move_index: 0 }).unwrap();
        }

        assert_eq!(
            runner.submit_action(PlayerAction::UseMove { move_index: 0 }),
            Err(BattleError::MoveOutOfPp {
                move_name: "Transform".to_string(),
            })
        );
    }

    #[test]
    fn test_valid_switch_is_accepted() {
        let mut runner = runner();

        let result = runner
            .submit_action(PlayerAction::SwitchCombatant { team_index: 1 })
            .unwrap();

        assert_eq!(result.log_lines[1], "Machamp returned! Go Hitmonlee!");
        assert_eq!(runner.session().active_index(Side::Player), 1);
    }

    #[test]
    fn test_winning_ends_the_battle_and_locks_actions() {
        let mut runner = runner_with(vec![TestCombatantBuilder::new("o1", "Caterpie", ElementType::Bug)
            .with_hp(1)
            .build()]);

        let result = runner.submit_action(PlayerAction::UseMove { move_index: 0 }).unwrap();

        assert!(result.battle_ended);
        assert_eq!(result.winner, Some(Side::Player));
        assert_eq!(result.new_game_state, GameState::PlayerWin);
        assert_eq!(result.log_lines.last().map(String::as_str), Some("Player has won the battle!"));
        assert!(runner.is_battle_ended());
        assert_eq!(
            runner.submit_action(PlayerAction::UseMove { move_index: 0 }),
            Err(BattleError::BattleOver)
        );
    }

    #[test]
    fn test_battle_info_snapshot() {
        let runner = runner();

        let info = runner.battle_info();

        assert_eq!(info.battle_id, "runner_test");
        assert_eq!(info.round, 1);
        assert_eq!(info.difficulty, "Normal");
        assert_eq!(info.sides.len(), 2);
        assert_eq!(info.sides[0].side, Side::Player);
        assert_eq!(info.sides[0].remaining, 2);
        assert!(info.sides[0].team[2].is_fainted);
        assert_eq!(info.sides[1].team[0].max_hp, 300);
        assert_eq!(info.sides[1].team[0].moves[0].name, "Tackle");
        assert_eq!(info.sides[1].team[0].moves[0].pp, 35);
    }

    #[test]
    fn test_combatant_lookup() {
        let runner = runner();

        assert_eq!(runner.combatant_info("p2").unwrap().name, "Hitmonlee");
        assert_eq!(
            runner.combatant_info("missing"),
            Err(BattleError::UnknownCombatant("missing".to_string()))
        );
    }

    #[test]
    fn test_empty_team_is_rejected() {
        let result = BattleRunner::new(
            "empty".to_string(),
            player_team(),
            Vec::new(),
            BattleConfig::default().with_tier(AiTier::Tactical),
        );
        assert!(matches!(result, Err(BattleError::EmptyTeam)));
    }

    fn with_stats(id: &str, name: &str, kills: u32, damage_dealt: u32) -> Combatant {
        let mut combatant = TestCombatantBuilder::new(id, name, ElementType::Normal).build();
        combatant.battle_stats.kills = kills;
        combatant.battle_stats.damage_dealt = damage_dealt;
        combatant
    }

    #[rstest]
    // Kills beat damage
    #[case(vec![(1, 50), (0, 300)], vec![(0, 10)], "p0")]
    // Equal kills fall back to damage dealt
    #[case(vec![(1, 50), (1, 80)], vec![(1, 60)], "p1")]
    // Opponent side can win outright
    #[case(vec![(0, 50)], vec![(2, 10)], "o0")]
    // Full tie keeps the earlier entry, player side first
    #[case(vec![(1, 50)], vec![(1, 50)], "p0")]
    fn test_report_mvp(
        #[case] player: Vec<(u32, u32)>,
        #[case] opponent: Vec<(u32, u32)>,
        #[case] expected_mvp: &str,
    ) {
        let build = |prefix: &str, stats: Vec<(u32, u32)>| -> Vec<Combatant> {
            stats
                .into_iter()
                .enumerate()
                .map(|(i, (kills, damage))| {
                    let id = format!("{}{}", prefix, i);
                    with_stats(&id, &id, kills, damage)
                })
                .collect()
        };
        let runner = BattleRunner::with_rng(
            "report".to_string(),
            build("p", player),
            build("o", opponent),
            BattleConfig::default(),
            predictable_rng(),
        )
        .unwrap();

        let report = runner.battle_report();

        assert_eq!(report.mvp.map(|e| e.name), Some(expected_mvp.to_string()));
        assert_eq!(report.winner, None);
        assert_eq!(report.rounds, 1);
    }

    #[test]
    fn test_ai_vs_ai_round() {
        let mut runner = runner();
        let player_ai = AiTier::Greedy.behavior();

        let result = runner.run_ai_round(player_ai.as_ref()).unwrap();

        assert_eq!(result.log_lines[2], "Machamp used Tackle!");
        assert!(runner.session().active_combatant(Side::Opponent).current_hp() < 300);
    }

    #[test]
    fn test_opponent_answers_the_switched_in_combatant() {
        let mut runner = BattleRunner::with_rng(
            "switch_target".to_string(),
            vec![
                TestCombatantBuilder::new("p1", "Oddish", ElementType::Grass).build(),
                TestCombatantBuilder::new("p2", "Squirtle", ElementType::Water).build(),
            ],
            vec![TestCombatantBuilder::new("o", "Porygon", ElementType::Normal)
                .with_moves(vec![
                    damaging_move("Ember", ElementType::Fire, MoveCategory::Special, 40),
                    damaging_move("Thunder Shock", ElementType::Electric, MoveCategory::Special, 40),
                ])
                .build()],
            BattleConfig::default(),
            predictable_rng(),
        )
        .unwrap();

        let result = runner
            .submit_action(PlayerAction::SwitchCombatant { team_index: 1 })
            .unwrap();

        let opponent_moves: Vec<&str> = result
            .events
            .iter()
            .filter_map(|e| match e {
                BattleEvent::MoveUsed {
                    side: Side::Opponent,
                    move_name,
                    ..
                } => Some(move_name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(opponent_moves, vec!["Thunder Shock"]);
    }
}
