//! Tank AI events (симуляция → движок)
//!
//! Симуляция не спавнит снаряды и не рисует взрывы — только сообщает,
//! что это нужно сделать.

use bevy::prelude::*;

use crate::combat::ExplosionBurst;

/// Event: танк выстрелил (движок спавнит снаряд в `muzzle`)
#[derive(Event, Debug, Clone)]
pub struct CannonFired {
    pub tank: Entity,
    /// Позиция и ориентация дула
    pub muzzle: Transform,
}

/// Event: танк уничтожен (один раз за жизнь танка)
#[derive(Event, Debug, Clone)]
pub struct TankDestroyed {
    pub tank: Entity,
    /// Поза корпуса в момент смерти
    pub origin: Transform,
    pub burst: ExplosionBurst,
}
