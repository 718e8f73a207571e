//! Tests for the Combatant state machine.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::audio::SoundCue;
    use crate::combat::damage::{DamageOutcome, Hit};
    use crate::combat::{AttackKind, AttackPhase, Combatant};
    use crate::components::Facing;
    use crate::config::{ArchetypeRegistry, ArenaConfig, EquipmentCatalog};

    fn fighter(id: &str, x: f32) -> Combatant {
        let registry = ArchetypeRegistry::builtin();
        Combatant::new(registry.character(id).unwrap(), &ArenaConfig::default(), x)
    }

    fn punch_from(attacker: Entity, amount: u32) -> Hit {
        Hit {
            attacker,
            amount,
            attacker_facing: Facing::Right,
            kind: AttackKind::Punch,
        }
    }

    fn tick_n(combatant: &mut Combatant, frames: u32) {
        for _ in 0..frames {
            combatant.tick();
        }
    }

    #[test]
    fn test_no_double_trigger_for_any_kind() {
        for kind in AttackKind::ALL {
            let mut warrior = fighter("warrior", 100.0);

            assert!(warrior.attempt_attack(kind), "{:?} should start", kind);
            let attack = warrior.attack;
            let energy = warrior.energy.current;
            let cooldowns = warrior.cooldowns;

            assert!(!warrior.attempt_attack(kind));
            assert_eq!(warrior.attack, attack);
            assert_eq!(warrior.energy.current, energy);
            assert_eq!(warrior.cooldowns, cooldowns);
        }
    }

    #[test]
    fn test_attack_sets_cooldown_and_costs_energy() {
        let mut warrior = fighter("warrior", 100.0);

        assert!(warrior.attempt_attack(AttackKind::Special));
        assert_eq!(warrior.cooldowns[AttackKind::Special], 70);
        assert_eq!(warrior.cooldowns[AttackKind::Punch], 0);
        assert_eq!(warrior.energy.current, 70.0);
        assert_eq!(warrior.drain_cues(), vec![SoundCue::Special]);
    }

    #[test]
    fn test_special_without_energy_rejected() {
        let mut warrior = fighter("warrior", 100.0);
        warrior.energy.current = 0.0;

        assert!(!warrior.attempt_attack(AttackKind::Special));
        assert!(warrior.attack.is_none());
        assert_eq!(warrior.energy.current, 0.0);
        assert_eq!(warrior.cooldowns[AttackKind::Special], 0);
        assert!(!warrior.has_pending_cues());

        // Punch бесплатный
        assert!(warrior.attempt_attack(AttackKind::Punch));
    }

    #[test]
    fn test_attack_lifecycle_and_hitbox_window() {
        let mut warrior = fighter("warrior", 100.0);
        warrior.attempt_attack(AttackKind::Punch);

        let mut hitbox_frames = 0;
        for _ in 0..AttackKind::Punch.duration() {
            warrior.tick();
            match warrior.attack_phase() {
                Some(AttackPhase::Active) => {
                    assert!(warrior.hitbox.is_some());
                    hitbox_frames += 1;
                }
                _ => assert!(warrior.hitbox.is_none()),
            }
        }

        assert_eq!(hitbox_frames, 8);
        assert!(warrior.attack.is_none());
        assert!(warrior.hitbox.is_none());
    }

    #[test]
    fn test_cooldown_gates_next_attack() {
        let mut warrior = fighter("warrior", 100.0);
        warrior.attempt_attack(AttackKind::Punch);

        // Punch закончился (15), но cooldown 18 ещё держит
        tick_n(&mut warrior, 15);
        assert!(warrior.attack.is_none());
        assert!(!warrior.attempt_attack(AttackKind::Punch));
        // Другие виды атак не заблокированы
        assert!(warrior.can_attack(AttackKind::Kick));

        tick_n(&mut warrior, 3);
        assert!(warrior.attempt_attack(AttackKind::Punch));
    }

    #[test]
    fn test_block_and_attack_are_exclusive() {
        let mut warrior = fighter("warrior", 100.0);

        assert!(warrior.try_block(30, 60));
        assert!(!warrior.attempt_attack(AttackKind::Punch));

        let mut other = fighter("warrior", 100.0);
        other.attempt_attack(AttackKind::Kick);
        assert!(!other.try_block(30, 60));
        assert!(!other.is_blocking());
    }

    #[test]
    fn test_block_expires_then_cools_down() {
        let mut warrior = fighter("warrior", 100.0);
        assert!(warrior.try_block(30, 60));
        assert!(!warrior.try_block(30, 60));

        tick_n(&mut warrior, 30);
        assert!(!warrior.is_blocking());
        assert_eq!(warrior.guard.cooldown, 60);
        assert!(!warrior.try_block(30, 60));

        tick_n(&mut warrior, 60);
        assert!(warrior.try_block(30, 60));
    }

    #[test]
    fn test_blocking_dampens_movement() {
        let mut warrior = fighter("warrior", 100.0);
        warrior.set_move_direction(1);
        warrior.try_block(30, 60);
        warrior.tick();

        assert!((warrior.body.velocity.x - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_take_damage_unblocked() {
        let mut warrior = fighter("warrior", 100.0);
        let attacker = Entity::from_raw(7);

        let outcome = warrior.take_damage(punch_from(attacker, 10));
        assert_eq!(outcome, DamageOutcome::Taken { damage: 10 });
        assert_eq!(warrior.health.current, 110);
        assert_eq!(warrior.invulnerable_frames, 20);
        assert_eq!(warrior.combo.count, 1);
        assert_eq!(warrior.combo.timer, 120);
        assert_eq!(warrior.body.position.x, 108.0); // knockback 8 вправо
        assert_eq!(warrior.drain_cues(), vec![SoundCue::Hit]);
    }

    #[test]
    fn test_take_damage_blocked_uses_floor() {
        for (id, amount, expected) in [("warrior", 10, 7), ("tank", 15, 6), ("assassin", 55, 49)] {
            let mut defender = fighter(id, 300.0);
            defender.try_block(30, 60);
            let before = defender.health.current;

            let outcome = defender.take_damage(punch_from(Entity::from_raw(1), amount));
            assert_eq!(outcome, DamageOutcome::Blocked { damage: expected }, "{}", id);
            assert_eq!(defender.health.current, before - expected);
            assert_eq!(defender.invulnerable_frames, 10);
        }
    }

    #[test]
    fn test_invulnerable_never_changes_health() {
        let mut warrior = fighter("warrior", 100.0);
        warrior.take_damage(punch_from(Entity::from_raw(1), 10));
        let health = warrior.health.current;

        for frame in 0..19 {
            let outcome = warrior.take_damage(punch_from(Entity::from_raw(1), 50));
            assert_eq!(outcome, DamageOutcome::Ignored, "frame {}", frame);
            assert_eq!(warrior.health.current, health);
            warrior.tick();
        }

        warrior.tick();
        assert!(warrior.take_damage(punch_from(Entity::from_raw(1), 10)).landed());
    }

    #[test]
    fn test_heavy_hit_launches() {
        let mut warrior = fighter("warrior", 300.0);
        warrior.take_damage(Hit {
            attacker: Entity::from_raw(1),
            amount: 25,
            attacker_facing: Facing::Left,
            kind: AttackKind::Special,
        });

        assert_eq!(warrior.body.position.x, 280.0);
        assert_eq!(warrior.body.velocity.y, -5.0);
        assert!(!warrior.body.on_ground);
    }

    #[test]
    fn test_health_clamps() {
        let mut warrior = fighter("warrior", 100.0);
        warrior.take_damage(punch_from(Entity::from_raw(1), 500));
        assert_eq!(warrior.health.current, 0);
        assert!(!warrior.is_alive());

        // Heal не воскрешает
        warrior.heal(50);
        assert_eq!(warrior.health.current, 0);

        let mut other = fighter("warrior", 100.0);
        other.take_damage(punch_from(Entity::from_raw(1), 30));
        other.heal(1000);
        assert_eq!(other.health.current, other.health.max);
    }

    #[test]
    fn test_combo_counts_same_attacker_and_resets() {
        let mut warrior = fighter("warrior", 300.0);
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);

        warrior.take_damage(punch_from(a, 1));
        tick_n(&mut warrior, 25);
        warrior.take_damage(punch_from(a, 1));
        assert_eq!(warrior.combo.count, 2);

        tick_n(&mut warrior, 25);
        warrior.take_damage(punch_from(b, 1));
        assert_eq!(warrior.combo.count, 1, "другой атакующий начинает заново");

        tick_n(&mut warrior, 119);
        assert_eq!(warrior.combo.count, 1);
        warrior.tick();
        assert_eq!(warrior.combo.timer, 0);
        assert_eq!(warrior.combo.count, 0);
    }

    #[test]
    fn test_dead_fighter_is_frozen() {
        let mut warrior = fighter("warrior", 100.0);
        warrior.attempt_attack(AttackKind::Punch);
        warrior.set_move_direction(1);
        warrior.take_damage(punch_from(Entity::from_raw(1), 1000));

        assert!(warrior.attack.is_none());
        assert!(!warrior.attempt_attack(AttackKind::Kick));
        assert!(!warrior.try_block(30, 60));
        assert!(!warrior.jump(1.0));

        let x = warrior.body.position.x;
        warrior.set_move_direction(1);
        tick_n(&mut warrior, 10);
        assert_eq!(warrior.body.position.x, x);
    }

    #[test]
    fn test_energy_regenerates_per_frame() {
        let mut warrior = fighter("warrior", 100.0);
        warrior.attempt_attack(AttackKind::Ultimate);
        assert_eq!(warrior.energy.current, 30.0);

        tick_n(&mut warrior, 100);
        assert!((warrior.energy.current - 70.0).abs() < 1e-2);
    }

    #[test]
    fn test_equip_preserves_health_ratio_and_recomputes() {
        let catalog = EquipmentCatalog::builtin();
        let mut warrior = fighter("warrior", 100.0);
        warrior.take_damage(punch_from(Entity::from_raw(1), 60)); // 60/120

        warrior.equip(catalog.item("health_amulet").unwrap().clone());
        assert_eq!(warrior.health.max, 150);
        assert_eq!(warrior.health.current, 75);

        warrior.equip(catalog.item("power_gloves").unwrap().clone());
        warrior.equip(catalog.item("power_gloves").unwrap().clone());
        assert_eq!(warrior.stats.damage[AttackKind::Punch], 12, "повторный equip не компаундит");

        assert!(warrior.unequip("power_gloves"));
        assert!(!warrior.unequip("power_gloves"));
        assert_eq!(warrior.stats.damage[AttackKind::Punch], 10);
        assert_eq!(warrior.equipped_ids().collect::<Vec<_>>(), vec!["health_amulet"]);
    }

    #[test]
    fn test_jump_emits_cue_only_on_ground() {
        let mut warrior = fighter("warrior", 100.0);
        assert!(warrior.jump(1.0));
        assert!(!warrior.jump(1.0));
        assert_eq!(warrior.drain_cues(), vec![SoundCue::Jump]);
        assert_eq!(warrior.body.velocity.y, -18.0);
    }
}
