//! Tests for the AI decision pipeline.

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use crate::ai::{AiController, BehaviorState, ComboPlan, Difficulty, OpponentView};
    use crate::combat::{AttackKind, Combatant};
    use crate::components::Facing;
    use crate::config::{ArchetypeRegistry, ArenaConfig, AttackTable};

    /// Warrior с центром в x = 130.
    fn warrior() -> Combatant {
        Combatant::new(
            ArchetypeRegistry::builtin().character("warrior").unwrap(),
            &ArenaConfig::default(),
            100.0,
        )
    }

    fn opponent_at(center_x: f32) -> OpponentView {
        OpponentView {
            center_x,
            health_ratio: 1.0,
            is_attacking: false,
            is_alive: true,
        }
    }

    /// Контроллер, который всегда проходит attack rolls.
    fn decisive(difficulty: Difficulty) -> AiController {
        let mut ai = AiController::new(difficulty);
        ai.profile.accuracy = 1.0;
        ai.profile.aggressiveness = 1.0;
        ai.profile.attack_frequency = 1.0;
        ai
    }

    #[test]
    fn test_initial_state() {
        let ai = AiController::new(Difficulty::Hard);
        assert_eq!(ai.behavior, BehaviorState::Aggressive);
        assert_eq!(ai.state_timer, 0);
        assert_eq!(ai.decision_timer, 0);
        assert_eq!(ai.attack_timer, 0);
        assert_eq!(ai.dodge_timer, 0);
        assert_eq!(ai.consecutive_attacks, 0);
        assert!(ai.combo.is_none());
    }

    #[test]
    fn test_combo_plan_by_energy() {
        use AttackKind::*;
        assert_eq!(ComboPlan::for_energy(100.0).sequence, vec![Punch, Kick, Special, Ultimate]);
        assert_eq!(ComboPlan::for_energy(70.0).sequence, vec![Punch, Kick, Special, Ultimate]);
        assert_eq!(ComboPlan::for_energy(69.0).sequence, vec![Punch, Kick, Special]);
        assert_eq!(ComboPlan::for_energy(29.0).sequence, vec![Punch, Kick, Punch, Kick]);
    }

    #[test]
    fn test_urgency_is_additive() {
        let ai = AiController::new(Difficulty::Normal);
        let me = warrior();

        // Punch range + opponent <50% и <30%
        let view = OpponentView {
            health_ratio: 0.25,
            ..opponent_at(170.0)
        };
        assert!((ai.attack_urgency(&me, &view, 40.0) - 1.5).abs() < 1e-5);

        // Kick range, никаких бонусов
        assert!((ai.attack_urgency(&me, &opponent_at(0.0), 60.0) - 0.6).abs() < 1e-5);

        // Вне всех дистанций
        assert_eq!(ai.attack_urgency(&me, &opponent_at(0.0), 500.0), 0.0);
    }

    #[test]
    fn test_idle_when_opponent_dead() {
        let mut ai = AiController::new(Difficulty::Nightmare);
        let mut me = warrior();
        me.set_move_direction(1);
        let view = OpponentView {
            is_alive: false,
            ..opponent_at(150.0)
        };
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        ai.update(&mut me, &view, &mut rng);
        assert_eq!(me.move_direction, 0);
        assert!(me.attack.is_none());
    }

    #[test]
    fn test_faces_and_pursues_distant_target() {
        let mut ai = AiController::new(Difficulty::Normal);
        let mut me = warrior();
        me.face(Facing::Left);
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        ai.update(&mut me, &opponent_at(600.0), &mut rng);
        assert_eq!(me.body.facing, Facing::Right);
        assert_eq!(me.move_direction, 1);
        assert_eq!(ai.pursuit_timer, 60);
        assert!(me.attack.is_none());
    }

    #[test]
    fn test_reactive_block_uses_ai_timings() {
        let mut ai = AiController::new(Difficulty::Normal);
        ai.profile.block_chance = 1.0;
        let mut me = warrior();
        let view = OpponentView {
            is_attacking: true,
            ..opponent_at(180.0)
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        ai.update(&mut me, &view, &mut rng);
        assert!(me.is_blocking());
        assert_eq!(me.guard.remaining, 25);
        assert_eq!(me.guard.pending_cooldown, 40);
        assert_eq!(me.move_direction, 0, "blocking freezes movement");
    }

    #[test]
    fn test_dodge_retreats_from_attacker() {
        let mut dodged = 0;
        for seed in 0..40 {
            let mut ai = AiController::new(Difficulty::Hard);
            ai.profile.block_chance = 0.0;
            let mut me = warrior();
            me.cooldowns = AttackTable::splat(100);
            let view = OpponentView {
                is_attacking: true,
                ..opponent_at(180.0)
            };
            let mut rng = ChaCha8Rng::seed_from_u64(seed);

            ai.update(&mut me, &view, &mut rng);
            if ai.dodge_timer == 25 {
                dodged += 1;
                assert_eq!(me.move_direction, -1, "seed {}", seed);
            }
        }
        assert!(dodged > 0);
    }

    #[test]
    fn test_dodge_retreat_ends_with_window() {
        let calm = opponent_at(180.0);
        let attacking = OpponentView {
            is_attacking: true,
            ..calm
        };

        let mut dodged = 0;
        for seed in 0..40 {
            let mut ai = AiController::new(Difficulty::Hard);
            ai.profile.block_chance = 0.0;
            ai.decision_timer = 10_000;
            let mut me = warrior();
            me.cooldowns = AttackTable::splat(1_000);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);

            ai.update(&mut me, &attacking, &mut rng);
            if ai.dodge_timer != 25 {
                continue;
            }
            dodged += 1;
            assert_eq!(ai.movement_bias, 0, "dodge не трогает bias");

            // Первые 10 кадров окна: отход
            for _ in 0..9 {
                ai.update(&mut me, &calm, &mut rng);
                assert_eq!(me.move_direction, -1, "seed {}", seed);
            }

            // Дальше Hold: только случайный drift
            let mut retreating = 0;
            for _ in 0..13 {
                ai.update(&mut me, &calm, &mut rng);
                if me.move_direction == -1 {
                    retreating += 1;
                }
            }
            assert!(retreating < 13, "seed {}: retreat outlived the dodge window", seed);
            assert_eq!(ai.movement_bias, 0);
        }
        assert!(dodged > 0);
    }

    #[test]
    fn test_combo_exhaustion_reverts_to_aggressive() {
        let mut ai = decisive(Difficulty::Normal);
        ai.behavior = BehaviorState::Combo;
        ai.state_timer = 100;
        ai.combo = Some(ComboPlan {
            sequence: vec![AttackKind::Punch],
            cursor: 0,
        });
        let mut me = warrior();
        let view = OpponentView {
            health_ratio: 0.1,
            ..opponent_at(160.0)
        };
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        ai.update(&mut me, &view, &mut rng);
        assert_eq!(me.attack.map(|a| a.kind), Some(AttackKind::Punch));
        assert_eq!(ai.consecutive_attacks, 1);
        assert_eq!(ai.behavior, BehaviorState::Aggressive);
        assert!(ai.combo.is_none());
        assert!((10..=25).contains(&ai.attack_timer));
    }

    #[test]
    fn test_combo_skips_unaffordable_entries() {
        let mut ai = decisive(Difficulty::Normal);
        ai.behavior = BehaviorState::Combo;
        ai.state_timer = 100;
        ai.combo = Some(ComboPlan {
            sequence: vec![AttackKind::Special, AttackKind::Punch],
            cursor: 0,
        });
        let mut me = warrior();
        me.energy.current = 10.0;
        let view = OpponentView {
            health_ratio: 0.1,
            ..opponent_at(160.0)
        };
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        ai.update(&mut me, &view, &mut rng);
        assert_eq!(me.attack.map(|a| a.kind), Some(AttackKind::Punch));
        assert_eq!(me.energy.current, 10.0);
        assert_eq!(ai.behavior, BehaviorState::Aggressive);
    }

    #[test]
    fn test_low_health_switches_to_defensive() {
        let mut ai = AiController::new(Difficulty::Normal);
        let mut me = warrior();
        me.health.current = 20; // 20/120
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        ai.update(&mut me, &opponent_at(600.0), &mut rng);
        assert_eq!(ai.behavior, BehaviorState::Defensive);
        assert_eq!(ai.state_timer, 120);
    }

    #[test]
    fn test_weak_opponent_triggers_combo() {
        let mut ai = AiController::new(Difficulty::Normal);
        let mut me = warrior();
        let view = OpponentView {
            health_ratio: 0.2,
            ..opponent_at(600.0)
        };
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        ai.update(&mut me, &view, &mut rng);
        assert_eq!(ai.behavior, BehaviorState::Combo);
        assert_eq!(ai.state_timer, 90);
        assert_eq!(
            ai.combo.as_ref().map(|plan| plan.sequence.len()),
            Some(4),
            "full energy builds the full sequence"
        );
    }

    #[test]
    fn test_never_attacks_beyond_energy() {
        for seed in 0..16u64 {
            let mut scenario = ChaCha8Rng::seed_from_u64(seed);
            let mut rng = ChaCha8Rng::seed_from_u64(seed + 1000);
            let difficulty = Difficulty::ALL[(seed % 4) as usize];
            let mut ai = decisive(difficulty);
            let mut me = warrior();

            for frame in 0..1500 {
                me.energy.current = scenario.gen_range(0.0..=100.0);
                let view = OpponentView {
                    center_x: me.center_x() + scenario.gen_range(-150.0..150.0),
                    health_ratio: scenario.gen_range(0.01..=1.0),
                    is_attacking: scenario.gen_bool(0.3),
                    is_alive: true,
                };
                let energy_before = me.energy.current;
                let was_attacking = me.is_attacking();

                ai.update(&mut me, &view, &mut rng);

                if let (false, Some(attack)) = (was_attacking, me.attack) {
                    assert!(
                        energy_before >= attack.kind.energy_cost(),
                        "seed {} frame {}: {:?} with {:.1} energy in {:?}",
                        seed,
                        frame,
                        attack.kind,
                        energy_before,
                        ai.behavior
                    );
                }
                me.tick();
            }
        }
    }

    #[test]
    fn test_seeded_controllers_agree() {
        let run = |seed: u64| {
            let mut ai = AiController::new(Difficulty::Hard);
            let mut me = warrior();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut trace = Vec::new();
            for frame in 0..600 {
                let view = OpponentView {
                    center_x: 200.0 + (frame % 120) as f32,
                    health_ratio: 1.0 - frame as f32 / 1200.0,
                    is_attacking: frame % 37 < 10,
                    is_alive: true,
                };
                ai.update(&mut me, &view, &mut rng);
                trace.push((me.move_direction, me.attack.map(|a| a.kind), ai.behavior));
                me.tick();
            }
            trace
        };

        assert_eq!(run(11), run(11));
    }
}
