//! Приём урона и отложенное удаление
//!
//! Урон приходит снаружи (коллизия снаряда в движке) через ShellHit.
//! FSM сам урон не наносит — только смотрит на Health в конце тика.

use bevy::prelude::*;
use crate::components::Health;

/// Event: снаряд попал в танк (движок → симуляция)
#[derive(Event, Debug, Clone)]
pub struct ShellHit {
    /// Кто выстрелил (None — источник неизвестен)
    pub shooter: Option<Entity>,
    /// В кого попали
    pub target: Entity,
    /// Урон снаряда
    pub damage: i32,
}

/// Компонент: удалить entity через `remaining` секунд
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct DespawnAfter {
    pub remaining: f32,
}

impl DespawnAfter {
    pub fn new(seconds: f32) -> Self {
        Self { remaining: seconds }
    }
}

/// System: ShellHit → Health
pub fn apply_shell_hits(
    mut hit_events: EventReader<ShellHit>,
    mut targets: Query<&mut Health>,
) {
    for hit in hit_events.read() {
        if hit.shooter == Some(hit.target) {
            crate::log_warning(&format!("⚠️ SELF-HIT ignored: {:?}", hit.target));
            continue;
        }

        let Ok(mut health) = targets.get_mut(hit.target) else {
            crate::log_warning(&format!("ShellHit: target {:?} has no Health", hit.target));
            continue;
        };

        let before = health.current;
        health.take_damage(hit.damage);

        crate::log(&format!(
            "🎯 ShellHit: {:?} → {:?} dmg={} (HP: {} → {})",
            hit.shooter, hit.target, hit.damage, before, health.current
        ));
    }
}

/// System: тикаем DespawnAfter, удаляем истёкшие
pub fn despawn_after_timeout(
    mut commands: Commands,
    mut query: Query<(Entity, &mut DespawnAfter)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut timer) in query.iter_mut() {
        timer.remaining -= delta;
        if timer.remaining <= 0.0 {
            commands.entity(entity).despawn();
            crate::log(&format!("Despawned {:?} (timer expired)", entity));
        }
    }
}
