//! Steering primitives: rotation toward a point, translation along forward.

use bevy::prelude::*;

/// Ниже этого расстояния направление вырождено (точка совпадает с позицией)
const MIN_LOOK_DISTANCE_SQ: f32 = 1e-6;

/// Rotation, у которой forward (-Z) смотрит из `from` в `to`.
///
/// `None` если точки совпадают — вызывающий оставляет текущую rotation.
pub fn look_rotation(from: Vec3, to: Vec3) -> Option<Quat> {
    let direction = to - from;
    if direction.length_squared() < MIN_LOOK_DISTANCE_SQ {
        return None;
    }

    Some(Transform::IDENTITY.looking_to(direction, Vec3::Y).rotation)
}

/// Плавный поворот `current` к точке `to` со скоростью `rate` (slerp, t = rate × delta).
pub fn steer_towards(current: Quat, from: Vec3, to: Vec3, rate: f32, delta: f32) -> Quat {
    let Some(desired) = look_rotation(from, to) else {
        return current;
    };

    current.slerp(desired, (rate * delta).clamp(0.0, 1.0))
}

/// Сдвиг вдоль forward на `speed × delta`. Отрицательная скорость — задний ход.
pub fn translate_forward(transform: &mut Transform, speed: f32, delta: f32) {
    let forward = transform.forward();
    transform.translation += forward * (speed * delta);
}
