//! Tests for tank FSM transitions (pure step, no ECS).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use rstest::rstest;

    use crate::ai::tank_fsm::{muzzle_pose, step, Senses, TankAction, TankFrame};
    use crate::ai::{PatrolRoute, ScriptedDice, TankBrain, TankConfig, TankMode, TankDice};

    /// Танк в начале координат, смотрит в -Z
    struct Rig {
        brain: TankBrain,
        body: Transform,
        config: TankConfig,
        route: PatrolRoute,
    }

    impl Rig {
        fn new(mode: TankMode) -> Self {
            let mut brain = TankBrain::new(3.0);
            brain.mode = mode;
            brain.destination = Vec3::new(0.0, 0.0, -1000.0);

            Self {
                brain,
                body: Transform::IDENTITY,
                config: TankConfig::default(),
                route: PatrolRoute::new(vec![
                    Vec3::new(1000.0, 0.0, 0.0),
                    Vec3::new(-1000.0, 0.0, 0.0),
                ])
                .unwrap(),
            }
        }

        fn tick(
            &mut self,
            target: Option<Vec3>,
            health: i32,
            delta: f32,
            dice: &mut impl TankDice,
        ) -> Vec<TankAction> {
            let senses = Senses {
                delta,
                target,
                route: &self.route,
            };
            let mut frame = TankFrame {
                brain: &mut self.brain,
                body: &mut self.body,
                config: &self.config,
                health,
            };
            step(&mut frame, &senses, dice)
        }
    }

    fn ahead(distance: f32) -> Option<Vec3> {
        Some(Vec3::new(0.0, 0.0, -distance))
    }

    fn fired(actions: &[TankAction]) -> usize {
        actions
            .iter()
            .filter(|a| matches!(a, TankAction::Fire { .. }))
            .count()
    }

    fn exploded(actions: &[TankAction]) -> usize {
        actions
            .iter()
            .filter(|a| matches!(a, TankAction::Explode { .. }))
            .count()
    }

    #[test]
    fn test_dead_is_permanent() {
        let mut rig = Rig::new(TankMode::Dead);
        rig.brain.has_exploded = true;
        let mut dice = ScriptedDice::default();

        for _ in 0..10 {
            let actions = rig.tick(ahead(100.0), 100, 0.1, &mut dice);
            assert!(actions.is_empty());
            assert_eq!(rig.brain.mode, TankMode::Dead);
        }
        // Мёртвый танк не двигается
        assert_eq!(rig.body.translation, Vec3::ZERO);
    }

    #[test]
    fn test_zero_health_kills_same_tick_and_explodes_once() {
        let mut rig = Rig::new(TankMode::Patrol);
        let mut dice = ScriptedDice::new([0.25, 0.75]);

        let actions = rig.tick(None, 0, 0.1, &mut dice);
        assert_eq!(rig.brain.mode, TankMode::Dead);
        assert!(rig.brain.has_exploded);
        assert_eq!(exploded(&actions), 1);

        let TankAction::Explode { burst, .. } = &actions[0] else {
            panic!("expected explosion, got {:?}", actions);
        };
        assert_eq!(burst.spread_x, 15.0);
        assert_eq!(burst.spread_z, 25.0);

        for _ in 0..20 {
            let actions = rig.tick(ahead(100.0), -40, 0.1, &mut dice);
            assert_eq!(exploded(&actions), 0);
        }
    }

    #[test]
    fn test_negative_health_overrides_combat_mode() {
        let mut rig = Rig::new(TankMode::Sniper);
        let mut dice = ScriptedDice::default();

        let actions = rig.tick(ahead(1000.0), -25, 0.1, &mut dice);
        assert_eq!(rig.brain.mode, TankMode::Dead);
        assert_eq!(exploded(&actions), 1);
    }

    #[test]
    fn test_cooldown_grows_between_shots() {
        let mut rig = Rig::new(TankMode::Patrol);
        let mut dice = ScriptedDice::default();

        let mut last = rig.brain.cooldown.elapsed;
        for _ in 0..5 {
            rig.tick(None, 100, 0.25, &mut dice);
            assert!(rig.brain.cooldown.elapsed > last);
            last = rig.brain.cooldown.elapsed;
        }
        assert_eq!(last, 1.25);
    }

    #[test]
    fn test_patrol_ignores_far_target_and_drives() {
        let mut rig = Rig::new(TankMode::Patrol);
        let mut dice = ScriptedDice::default();

        rig.tick(Some(Vec3::new(500.0, 0.0, 0.0)), 100, 0.1, &mut dice);

        assert_eq!(rig.brain.mode, TankMode::Patrol);
        // 150 units/sec × 0.1 вперёд (-Z), к destination
        assert!((rig.body.translation.z + 15.0).abs() < 1e-3);
        assert!(rig.body.translation.distance(rig.brain.destination) < 1000.0);
    }

    #[rstest]
    #[case(0.0, TankMode::Flee)]
    #[case(0.14, TankMode::Flee)]
    #[case(0.16, TankMode::Chase)]
    #[case(0.9, TankMode::Chase)]
    fn test_patrol_spots_target(#[case] unit: f32, #[case] expected: TankMode) {
        let mut rig = Rig::new(TankMode::Patrol);
        let mut dice = ScriptedDice::new([unit]);

        rig.tick(Some(Vec3::new(380.0, 0.0, 0.0)), 100, 0.1, &mut dice);

        assert_eq!(rig.brain.mode, expected);
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn test_patrol_arrival_picks_next_point() {
        let mut rig = Rig::new(TankMode::Patrol);
        rig.brain.destination = Vec3::new(0.0, 0.0, -50.0);
        let mut dice = ScriptedDice::new([0.6]);

        // Цель рядом, но на прибытии бросок Chase/Flee не делается
        rig.tick(ahead(200.0), 100, 0.1, &mut dice);

        assert_eq!(rig.brain.mode, TankMode::Patrol);
        assert_eq!(rig.brain.destination, Vec3::new(-1000.0, 0.0, 0.0));
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn test_patrol_steers_towards_destination() {
        let mut rig = Rig::new(TankMode::Patrol);
        rig.brain.destination = Vec3::new(1000.0, 0.0, 0.0);
        let mut dice = ScriptedDice::default();

        rig.tick(None, 100, 0.1, &mut dice);

        assert!(rig.body.forward().x > 0.0);
    }

    #[rstest]
    #[case(250.0, TankMode::Attack)]
    #[case(299.0, TankMode::Attack)]
    #[case(300.0, TankMode::Attack)]
    #[case(350.0, TankMode::Chase)]
    #[case(400.0, TankMode::Patrol)]
    #[case(450.0, TankMode::Patrol)]
    fn test_chase_range_boundaries(#[case] distance: f32, #[case] expected: TankMode) {
        let mut rig = Rig::new(TankMode::Chase);
        let mut dice = ScriptedDice::default();

        rig.tick(ahead(distance), 100, 0.1, &mut dice);

        assert_eq!(rig.brain.mode, expected);
        assert_eq!(rig.brain.destination, ahead(distance).unwrap());
    }

    #[test]
    fn test_chase_drives_forward_without_turning() {
        let mut rig = Rig::new(TankMode::Chase);
        let mut dice = ScriptedDice::default();

        rig.tick(Some(Vec3::new(350.0, 0.0, 0.0)), 100, 0.1, &mut dice);

        assert_eq!(rig.body.rotation, Quat::IDENTITY);
        assert!((rig.body.translation.z + 15.0).abs() < 1e-3);
    }

    #[rstest]
    #[case(299.0, 0.0, TankMode::Attack)]
    #[case(300.0, 0.0, TankMode::Attack)]
    #[case(300.0, 0.5, TankMode::Sniper)]
    #[case(399.0, 0.9, TankMode::Sniper)]
    #[case(400.0, 0.0, TankMode::Patrol)]
    fn test_attack_band(#[case] distance: f32, #[case] stay_unit: f32, #[case] expected: TankMode) {
        let mut rig = Rig::new(TankMode::Attack);
        // Первый бросок — разброс прицела (0.5 → 0), второй — Attack/Sniper
        let mut dice = ScriptedDice::new([0.5, stay_unit]);

        rig.tick(ahead(distance), 100, 0.1, &mut dice);

        assert_eq!(rig.brain.mode, expected);
    }

    #[test]
    fn test_attack_jitters_destination_on_z() {
        let mut rig = Rig::new(TankMode::Attack);
        let mut dice = ScriptedDice::new([0.0]);

        rig.tick(ahead(250.0), 100, 0.1, &mut dice);

        assert_eq!(rig.brain.destination, Vec3::new(0.0, 0.0, -250.0 - 15.0));
    }

    #[test]
    fn test_attack_fires_when_cooldown_ready() {
        let mut rig = Rig::new(TankMode::Attack);
        rig.brain.cooldown.elapsed = 2.5;
        let mut dice = ScriptedDice::default();

        let actions = rig.tick(ahead(250.0), 100, 0.5, &mut dice);

        assert_eq!(fired(&actions), 1);
        assert_eq!(rig.brain.cooldown.elapsed, 0.0);
    }

    #[test]
    fn test_attack_holds_fire_during_cooldown() {
        let mut rig = Rig::new(TankMode::Attack);
        rig.brain.cooldown.elapsed = 1.0;
        let mut dice = ScriptedDice::default();

        let actions = rig.tick(ahead(250.0), 100, 0.5, &mut dice);

        assert_eq!(fired(&actions), 0);
        assert_eq!(rig.brain.cooldown.elapsed, 1.5);
    }

    #[test]
    fn test_attack_turret_tracks_target() {
        let mut rig = Rig::new(TankMode::Attack);
        let mut dice = ScriptedDice::default();

        rig.tick(Some(Vec3::new(250.0, 0.0, 0.0)), 100, 0.1, &mut dice);

        let turret_forward = rig.brain.turret * Vec3::NEG_Z;
        assert!(turret_forward.x > 0.0);
    }

    #[rstest]
    #[case(0.0, TankMode::Sniper)]
    #[case(0.5, TankMode::Chase)]
    fn test_sniper_free_shot(#[case] unit: f32, #[case] expected: TankMode) {
        let mut rig = Rig::new(TankMode::Sniper);
        let mut dice = ScriptedDice::new([unit]);

        // cooldown = 0, но снайпер стреляет сразу
        let actions = rig.tick(ahead(1000.0), 100, 0.1, &mut dice);

        assert_eq!(fired(&actions), 1);
        assert_eq!(rig.brain.cooldown.elapsed, 0.0);
        assert_eq!(rig.brain.mode, expected);
        // Снайпер стоит на месте
        assert_eq!(rig.body.translation, Vec3::ZERO);
    }

    #[rstest]
    #[case(100.0)]
    #[case(1600.0)]
    #[case(2500.0)]
    fn test_sniper_out_of_band_holds(#[case] distance: f32) {
        let mut rig = Rig::new(TankMode::Sniper);
        let mut dice = ScriptedDice::new([0.0]);

        let actions = rig.tick(ahead(distance), 100, 0.1, &mut dice);

        assert_eq!(fired(&actions), 0);
        assert_eq!(rig.brain.mode, TankMode::Sniper);
        assert_eq!(dice.remaining(), 1);
    }

    #[test]
    fn test_flee_backs_away_then_patrols() {
        let mut rig = Rig::new(TankMode::Flee);
        let mut dice = ScriptedDice::default();

        rig.tick(ahead(100.0), 100, 0.1, &mut dice);
        assert_eq!(rig.brain.mode, TankMode::Flee);
        // Задний ход: +Z, от цели
        assert!((rig.body.translation.z - 15.0).abs() < 1e-3);

        rig.tick(ahead(400.0), 100, 0.1, &mut dice);
        assert_eq!(rig.brain.mode, TankMode::Patrol);
    }

    #[rstest]
    #[case(TankMode::Chase)]
    #[case(TankMode::Attack)]
    #[case(TankMode::Sniper)]
    #[case(TankMode::Flee)]
    fn test_lost_target_falls_back_to_patrol(#[case] mode: TankMode) {
        let mut rig = Rig::new(mode);
        let mut dice = ScriptedDice::default();

        let actions = rig.tick(None, 100, 0.1, &mut dice);

        assert_eq!(rig.brain.mode, TankMode::Patrol);
        assert_eq!(fired(&actions), 0);
    }

    #[test]
    fn test_patrol_without_target_never_rolls() {
        let mut rig = Rig::new(TankMode::Patrol);
        let mut dice = ScriptedDice::new([0.0, 0.0, 0.0]);

        for _ in 0..30 {
            rig.tick(None, 100, 0.1, &mut dice);
            assert_eq!(rig.brain.mode, TankMode::Patrol);
        }
        assert_eq!(dice.remaining(), 3);
    }

    #[test]
    fn test_muzzle_follows_turret() {
        let mut rig = Rig::new(TankMode::Attack);
        rig.body.translation = Vec3::new(10.0, 0.0, 0.0);

        let frame = TankFrame {
            brain: &mut rig.brain,
            body: &mut rig.body,
            config: &rig.config,
            health: 100,
        };
        let muzzle = muzzle_pose(&frame);

        assert_eq!(muzzle.translation, Vec3::new(10.0, 1.5, -6.0));
        assert_eq!(muzzle.rotation, Quat::IDENTITY);
    }
}
