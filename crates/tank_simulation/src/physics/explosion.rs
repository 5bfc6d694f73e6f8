//! Импульс взрыва с линейным затуханием по радиусу.
//!
//! Центр для направления смещён вниз на `upwards` — тело подбрасывает вверх,
//! даже если взрыв на одной высоте с ним.

use bevy::prelude::*;

/// Импульс, который взрыв в `center` сообщает телу в `body`.
///
/// Снаружи радиуса — ноль.
pub fn explosion_impulse(body: Vec3, center: Vec3, force: f32, radius: f32, upwards: f32) -> Vec3 {
    let distance = body.distance(center);
    if radius <= 0.0 || distance >= radius {
        return Vec3::ZERO;
    }

    let falloff = 1.0 - distance / radius;
    let lifted_center = center - Vec3::Y * upwards;
    let direction = (body - lifted_center).normalize_or_zero();

    direction * force * falloff
}
