//! Эффект уничтожения танка
//!
//! FSM бросает разброс один раз при входе в Dead (ExplosionBurst::roll),
//! ECS применяет его к rapier телу: импульс взрыва + скорость подброса.
//! Удаление танка — через DespawnAfter (см. damage.rs).

use bevy::prelude::*;
use bevy_rapier3d::prelude::{ExternalImpulse, RigidBody, Velocity};

use crate::ai::{TankDestroyed, TankDice};
use crate::physics::explosion_impulse;

/// Сила одного импульса взрыва
pub const EXPLOSION_FORCE: f32 = 10_000.0;
/// Радиус взрыва (метры)
pub const EXPLOSION_RADIUS: f32 = 40.0;
/// Смещение центра вниз для подброса вверх
pub const EXPLOSION_UPWARDS: f32 = 10.0;
/// Сколько раз импульс применяется подряд
pub const EXPLOSION_PULSES: u32 = 3;
/// Центр взрыва ниже корпуса на эту величину
const EXPLOSION_CENTER_DROP: f32 = 10.0;
/// Вертикальная составляющая скорости подброса (локальные оси)
const LAUNCH_LIFT: f32 = 20.0;
/// Разброс по X/Z
const SPREAD: std::ops::Range<f32> = 10.0..30.0;

/// Через сколько секунд после взрыва танк удаляется из симуляции
pub const REMOVAL_DELAY_SECS: f32 = 1.5;

/// Случайный разброс взрыва (X/Z), бросается один раз
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ExplosionBurst {
    pub spread_x: f32,
    pub spread_z: f32,
}

impl ExplosionBurst {
    pub fn roll(dice: &mut impl TankDice) -> Self {
        Self {
            spread_x: dice.range_f32(SPREAD),
            spread_z: dice.range_f32(SPREAD),
        }
    }

    /// Центр взрыва относительно корпуса
    pub fn center(&self, origin: &Transform) -> Vec3 {
        origin.translation - Vec3::new(self.spread_x, EXPLOSION_CENTER_DROP, self.spread_z)
    }

    /// Суммарный импульс всех пульсов
    pub fn impulse(&self, origin: &Transform) -> Vec3 {
        let single = explosion_impulse(
            origin.translation,
            self.center(origin),
            EXPLOSION_FORCE,
            EXPLOSION_RADIUS,
            EXPLOSION_UPWARDS,
        );
        single * EXPLOSION_PULSES as f32
    }

    /// Скорость подброса в мировых координатах
    pub fn launch_velocity(&self, origin: &Transform) -> Vec3 {
        origin.rotation * Vec3::new(self.spread_x, LAUNCH_LIFT, self.spread_z)
    }
}

/// System: TankDestroyed → rapier RigidBody::Dynamic + Velocity + ExternalImpulse на корпус
///
/// Корпус становится Dynamic только в момент взрыва.
pub fn apply_destruction_effects(
    mut commands: Commands,
    mut destroyed_events: EventReader<TankDestroyed>,
) {
    for event in destroyed_events.read() {
        let impulse = event.burst.impulse(&event.origin);
        let linvel = event.burst.launch_velocity(&event.origin);

        let Ok(mut entity_commands) = commands.get_entity(event.tank) else {
            continue;
        };

        entity_commands.insert((
            RigidBody::Dynamic,
            Velocity {
                linvel,
                angvel: Vec3::ZERO,
            },
            ExternalImpulse {
                impulse,
                torque_impulse: Vec3::ZERO,
            },
        ));

        crate::log_info(&format!(
            "💥 Tank {:?} destroyed: impulse {:?}, launch {:?}",
            event.tank, impulse, linvel
        ));
    }
}
