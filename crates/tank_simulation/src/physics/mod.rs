//! Физические примитивы для FSM танка
//!
//! - steering: поворот к точке (slerp) + движение вдоль forward
//! - explosion: импульс взрыва (аналог AddExplosionForce)
//!
//! Конвенция Bevy: forward = -Z.

pub mod explosion;
pub mod steering;

pub use explosion::explosion_impulse;
pub use steering::{look_rotation, steer_towards, translate_forward};
