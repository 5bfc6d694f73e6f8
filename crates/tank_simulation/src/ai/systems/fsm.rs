//! Tank FSM systems (инициализация мозга + тик FSM).

use bevy::prelude::*;

use crate::ai::controller::{dispatch_actions, DeathEffects, Weapon};
use crate::ai::tank_fsm::{step, Senses, TankFrame};
use crate::ai::{CannonFired, PatrolRoute, TankBrain, TankConfig, TankDestroyed, TankMode};
use crate::combat::{DespawnAfter, ExplosionBurst};
use crate::components::{Health, Tank, TankTarget, WanderPoint};
use crate::DeterministicRng;

/// Система: навешивает TankBrain + PatrolRoute на только что заспавненные танки
///
/// - цель: TankTarget с минимальным Entity (детерминизм); нет цели → только патруль
/// - маршрут: все WanderPoint, отсортированные по Entity; пусто → танк остаётся инертным
pub fn init_tank_brains(
    mut commands: Commands,
    tanks: Query<(Entity, &Transform, &TankConfig), (Added<Tank>, Without<TankBrain>)>,
    targets: Query<Entity, With<TankTarget>>,
    wander_points: Query<(Entity, &Transform), With<WanderPoint>>,
    mut rng: ResMut<DeterministicRng>,
) {
    if tanks.is_empty() {
        return;
    }

    let target = targets.iter().min();

    let mut points: Vec<(Entity, Vec3)> = wander_points
        .iter()
        .map(|(entity, transform)| (entity, transform.translation))
        .collect();
    points.sort_by_key(|(entity, _)| *entity);
    let points: Vec<Vec3> = points.into_iter().map(|(_, point)| point).collect();

    for (entity, transform, config) in tanks.iter() {
        config.validate();

        let route = match PatrolRoute::new(points.clone()) {
            Ok(route) => route,
            Err(err) => {
                crate::log_error(&format!("❌ Tank {:?}: {} (tank stays inert)", entity, err));
                continue;
            }
        };

        let mut brain = TankBrain::new(config.shoot_period);
        brain.destination = route.pick_destination(transform.translation, &mut rng.rng);
        brain.turret = transform.rotation;
        brain.target = target;

        if target.is_none() {
            crate::log_warning(&format!(
                "Tank {:?}: target doesn't exist, patrol only",
                entity
            ));
        }

        crate::log(&format!(
            "🛡️ Tank {:?} initialized: {} waypoints, first destination {:?}",
            entity,
            route.points().len(),
            brain.destination
        ));

        // Health не трогаем: starting_health выставлен при спавне (хук Tank),
        // а урон этого тика уже применён в DamageIntake
        commands.entity(entity).insert((brain, route));
    }
}

/// Weapon → CannonFired event
struct CannonEvents<'a, 'w> {
    tank: Entity,
    events: &'a mut EventWriter<'w, CannonFired>,
}

impl Weapon for CannonEvents<'_, '_> {
    fn fire(&mut self, muzzle: Transform) {
        self.events.write(CannonFired {
            tank: self.tank,
            muzzle,
        });
    }
}

/// DeathEffects → TankDestroyed event + DespawnAfter
struct WreckEffects<'a, 'e, 'w, 's> {
    tank: Entity,
    events: &'a mut EventWriter<'e, TankDestroyed>,
    commands: &'a mut Commands<'w, 's>,
}

impl DeathEffects for WreckEffects<'_, '_, '_, '_> {
    fn trigger_destruction_effect(&mut self, origin: &Transform, burst: &ExplosionBurst) {
        self.events.write(TankDestroyed {
            tank: self.tank,
            origin: *origin,
            burst: *burst,
        });
    }

    fn schedule_removal(&mut self, delay: f32) {
        if let Ok(mut entity_commands) = self.commands.get_entity(self.tank) {
            entity_commands.insert(DespawnAfter::new(delay));
        }
    }
}

/// Система: один тик FSM для каждого танка
///
/// Танки обрабатываются в порядке Entity, чтобы броски RNG не зависели
/// от порядка хранения в архетипах.
pub fn tank_fsm_tick(
    mut commands: Commands,
    mut tanks: Query<(
        Entity,
        &mut TankBrain,
        &mut Transform,
        &TankConfig,
        &Health,
        &PatrolRoute,
    )>,
    targets: Query<&Transform, (With<TankTarget>, Without<TankBrain>)>,
    mut rng: ResMut<DeterministicRng>,
    mut fired_events: EventWriter<CannonFired>,
    mut destroyed_events: EventWriter<TankDestroyed>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    let mut order: Vec<Entity> = tanks.iter().map(|(entity, ..)| entity).collect();
    order.sort();

    for tank in order {
        let Ok((_, mut brain, mut body, config, health, route)) = tanks.get_mut(tank) else {
            continue;
        };

        let previous = brain.mode;
        let target = brain
            .target
            .and_then(|entity| targets.get(entity).ok())
            .map(|transform| transform.translation);

        if target.is_none() && previous.needs_target() {
            crate::log_warning(&format!("Tank {:?}: target lost in {:?}", tank, previous));
        }

        let senses = Senses {
            delta,
            target,
            route,
        };
        let mut frame = TankFrame {
            brain: &mut *brain,
            body: &mut *body,
            config,
            health: health.current,
        };
        let actions = step(&mut frame, &senses, &mut rng.rng);

        if brain.mode != previous {
            let icon = match brain.mode {
                TankMode::Dead => "💀",
                TankMode::Flee => "🏃",
                TankMode::Sniper => "🎯",
                _ => "🔄",
            };
            crate::log(&format!(
                "{} Tank {:?}: {:?} → {:?}",
                icon, tank, previous, brain.mode
            ));
        }

        let mut weapon = CannonEvents {
            tank,
            events: &mut fired_events,
        };
        let mut effects = WreckEffects {
            tank,
            events: &mut destroyed_events,
            commands: &mut commands,
        };
        dispatch_actions(actions, &mut weapon, &mut effects);
    }
}
