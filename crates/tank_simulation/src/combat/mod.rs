//! Combat module: пушка, урон, уничтожение
//!
//! Симуляция отвечает за:
//! - cooldown пушки (ShotCooldown внутри TankBrain)
//! - приём урона (ShellHit → Health)
//! - эффект уничтожения (TankDestroyed → rapier импульс) + DespawnAfter
//!
//! Движок отвечает за: спавн снарядов (CannonFired), коллизии (ShellHit).

use bevy::prelude::*;

pub mod cooldown;
pub mod damage;
pub mod explosion;

pub use cooldown::ShotCooldown;
pub use damage::{apply_shell_hits, despawn_after_timeout, DespawnAfter, ShellHit};
pub use explosion::{apply_destruction_effects, ExplosionBurst, REMOVAL_DELAY_SECS};

use crate::ai::TankDestroyed;
use crate::TankSimSet;

/// Combat Plugin
///
/// Порядок в FixedUpdate:
/// 1. apply_shell_hits (DamageIntake) — до FSM, чтобы Dead сработал в этом же тике
/// 2. apply_destruction_effects, despawn_after_timeout (Effects) — после FSM
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ShellHit>().add_event::<TankDestroyed>();

        app.add_systems(FixedUpdate, apply_shell_hits.in_set(TankSimSet::DamageIntake));
        app.add_systems(
            FixedUpdate,
            (apply_destruction_effects, despawn_after_timeout)
                .chain()
                .in_set(TankSimSet::Effects),
        );
    }
}
