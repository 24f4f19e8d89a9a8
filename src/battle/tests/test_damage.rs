#[cfg(test)]
mod tests {
    use crate::battle::damage::{calculate_damage, predict_damage};
    use crate::battle::state::TurnRng;
    use crate::battle::tests::common::{damaging_move, predictable_rng, tackle, TestCombatantBuilder};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::{ElementType, MoveCategory, StatType};

    // All stats at 50, Tackle: base = (42 * 40 * 50 / 50) / 50 + 2 = 35.6

    #[test]
    fn test_prediction_uses_mid_roll_and_stab() {
        let normal = TestCombatantBuilder::new("a", "Rattata", ElementType::Normal).build();
        let electric = TestCombatantBuilder::new("b", "Pikachu", ElementType::Electric).build();
        let defender = TestCombatantBuilder::new("d", "Target", ElementType::Water).build();

        // 35.6 * 1.5 * 0.925 = 49.39
        assert_eq!(predict_damage(&normal, &defender, &tackle()), 49);
        // 35.6 * 0.925 = 32.93
        assert_eq!(predict_damage(&electric, &defender, &tackle()), 32);
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let attacker = TestCombatantBuilder::new("a", "Rattata", ElementType::Normal).build();
        let defender = TestCombatantBuilder::new("d", "Target", ElementType::Water).build();

        let first = predict_damage(&attacker, &defender, &tackle());
        let second = predict_damage(&attacker, &defender, &tackle());
        assert_eq!(first, second);
    }

    #[test]
    fn test_rolled_damage_with_predictable_rng() {
        let attacker = TestCombatantBuilder::new("a", "Pikachu", ElementType::Electric).build();
        let defender = TestCombatantBuilder::new("d", "Target", ElementType::Normal).build();
        let mut rng = predictable_rng();

        let outcome = calculate_damage(&attacker, &defender, &tackle(), &mut rng);

        // Roll of 50 lands on 92, no crit: 35.6 * 0.92 = 32.75
        assert_eq!(outcome.damage, 32);
        assert!(!outcome.is_critical);
        assert_eq!(outcome.effectiveness, 1.0);
        assert_eq!(rng.consumed(), 2);
    }

    #[test]
    fn test_critical_hit_multiplies_damage() {
        let attacker = TestCombatantBuilder::new("a", "Pikachu", ElementType::Electric).build();
        let defender = TestCombatantBuilder::new("d", "Target", ElementType::Normal).build();
        // Lowest damage roll (85), then a critical
        let mut rng = TurnRng::new_for_test(vec![1, 1]);

        let outcome = calculate_damage(&attacker, &defender, &tackle(), &mut rng);

        // 35.6 * 0.85 * 1.5 = 45.39
        assert!(outcome.is_critical);
        assert_eq!(outcome.damage, 45);
    }

    #[test]
    fn test_zero_power_move_deals_nothing_and_draws_nothing() {
        let attacker = TestCombatantBuilder::new("a", "Pikachu", ElementType::Electric).build();
        let defender = TestCombatantBuilder::new("d", "Target", ElementType::Normal).build();
        let growl = damaging_move("Growl", ElementType::Normal, MoveCategory::Status, 0);
        let mut rng = TurnRng::new_for_test(vec![]);

        let outcome = calculate_damage(&attacker, &defender, &growl, &mut rng);

        assert_eq!(outcome.damage, 0);
        assert!(!outcome.is_critical);
        assert_eq!(rng.consumed(), 0);
        assert_eq!(predict_damage(&attacker, &defender, &growl), 0);
    }

    #[test]
    fn test_immune_target_takes_no_damage() {
        let attacker = TestCombatantBuilder::new("a", "Rattata", ElementType::Normal).build();
        let ghost = TestCombatantBuilder::new("d", "Gastly", ElementType::Ghost).build();
        let mut rng = predictable_rng();

        let outcome = calculate_damage(&attacker, &ghost, &tackle(), &mut rng);

        assert_eq!(outcome.damage, 0);
        assert_eq!(outcome.effectiveness, 0.0);
        assert_eq!(predict_damage(&attacker, &ghost, &tackle()), 0);
    }

    #[test]
    fn test_dual_type_effectiveness_stacks() {
        let attacker = TestCombatantBuilder::new("a", "Geodude", ElementType::Rock).build();
        let fire_flying = TestCombatantBuilder::new("d", "Charizard", ElementType::Fire)
            .with_types(vec![ElementType::Fire, ElementType::Flying])
            .build();
        let rock_throw = damaging_move("Rock Throw", ElementType::Rock, MoveCategory::Physical, 50);
        let mut rng = predictable_rng();

        let outcome = calculate_damage(&attacker, &fire_flying, &rock_throw, &mut rng);
        assert_eq!(outcome.effectiveness, 4.0);
    }

    #[test]
    fn test_special_moves_use_special_stats() {
        let attacker = TestCombatantBuilder::new("a", "Pikachu", ElementType::Electric)
            .with_stat(StatType::Attack, 10)
            .with_stat(StatType::SpecialAttack, 100)
            .build();
        let defender = TestCombatantBuilder::new("d", "Target", ElementType::Normal)
            .with_stat(StatType::Defense, 200)
            .build();
        let water_pulse = damaging_move("Water Pulse", ElementType::Water, MoveCategory::Special, 40);

        // (42 * 40 * 100 / 50) / 50 + 2 = 69.2, * 0.925 = 64.01
        assert_eq!(predict_damage(&attacker, &defender, &water_pulse), 64);
    }

    #[rstest]
    #[case(25, 50)]
    #[case(50, 100)]
    #[case(100, 150)]
    #[case(150, 250)]
    fn test_damage_grows_with_attack(#[case] lower: u16, #[case] higher: u16) {
        let defender = TestCombatantBuilder::new("d", "Target", ElementType::Water).build();
        let weak = TestCombatantBuilder::new("a", "Weak", ElementType::Normal)
            .with_stat(StatType::Attack, lower)
            .build();
        let strong = TestCombatantBuilder::new("b", "Strong", ElementType::Normal)
            .with_stat(StatType::Attack, higher)
            .build();

        assert!(
            predict_damage(&strong, &defender, &tackle())
                >= predict_damage(&weak, &defender, &tackle())
        );
    }

    #[rstest]
    #[case(25, 50)]
    #[case(50, 100)]
    #[case(100, 150)]
    fn test_damage_shrinks_with_defense(#[case] lower: u16, #[case] higher: u16) {
        let attacker = TestCombatantBuilder::new("a", "Rattata", ElementType::Normal).build();
        let soft = TestCombatantBuilder::new("d", "Soft", ElementType::Water)
            .with_stat(StatType::Defense, lower)
            .build();
        let hard = TestCombatantBuilder::new("e", "Hard", ElementType::Water)
            .with_stat(StatType::Defense, higher)
            .build();

        assert!(
            predict_damage(&attacker, &hard, &tackle())
                <= predict_damage(&attacker, &soft, &tackle())
        );
    }

    const DRAWS: u32 = 500;

    fn average_rolled_damage(
        attacker: &crate::combatant::Combatant,
        defender: &crate::combatant::Combatant,
        seed: u64,
    ) -> f64 {
        let mut rng = TurnRng::from_seed(seed);
        let total: u32 = (0..DRAWS)
            .map(|_| u32::from(calculate_damage(attacker, defender, &tackle(), &mut rng).damage))
            .sum();
        f64::from(total) / f64::from(DRAWS)
    }

    #[rstest]
    #[case(25, 50, 1)]
    #[case(50, 100, 2)]
    #[case(100, 150, 3)]
    #[case(150, 250, 4)]
    fn test_rolled_damage_grows_with_attack_on_average(
        #[case] lower: u16,
        #[case] higher: u16,
        #[case] seed: u64,
    ) {
        let defender = TestCombatantBuilder::new("d", "Target", ElementType::Water).build();
        let weak = TestCombatantBuilder::new("a", "Weak", ElementType::Normal)
            .with_stat(StatType::Attack, lower)
            .build();
        let strong = TestCombatantBuilder::new("b", "Strong", ElementType::Normal)
            .with_stat(StatType::Attack, higher)
            .build();

        let weak_average = average_rolled_damage(&weak, &defender, seed);
        let strong_average = average_rolled_damage(&strong, &defender, seed);

        assert!(
            strong_average > weak_average,
            "attack {} averaged {}, attack {} averaged {}",
            higher,
            strong_average,
            lower,
            weak_average
        );
    }

    #[rstest]
    #[case(25, 50, 5)]
    #[case(50, 100, 6)]
    #[case(100, 150, 7)]
    fn test_rolled_damage_shrinks_with_defense_on_average(
        #[case] lower: u16,
        #[case] higher: u16,
        #[case] seed: u64,
    ) {
        let attacker = TestCombatantBuilder::new("a", "Rattata", ElementType::Normal).build();
        let soft = TestCombatantBuilder::new("d", "Soft", ElementType::Water)
            .with_stat(StatType::Defense, lower)
            .build();
        let hard = TestCombatantBuilder::new("e", "Hard", ElementType::Water)
            .with_stat(StatType::Defense, higher)
            .build();

        let soft_average = average_rolled_damage(&attacker, &soft, seed);
        let hard_average = average_rolled_damage(&attacker, &hard, seed);

        assert!(
            hard_average < soft_average,
            "defense {} averaged {}, defense {} averaged {}",
            higher,
            hard_average,
            lower,
            soft_average
        );
    }
}
