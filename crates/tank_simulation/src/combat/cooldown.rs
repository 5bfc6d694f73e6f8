//! Cooldown пушки танка
//!
//! Таймер считает ВВЕРХ от 0: выстрел разрешён когда `elapsed >= period`,
//! после выстрела сброс в 0.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ShotCooldown {
    /// Сколько прошло с последнего выстрела (секунды)
    pub elapsed: f32,
    /// Минимальный интервал между выстрелами (секунды)
    pub period: f32,
}

impl Default for ShotCooldown {
    fn default() -> Self {
        Self::new(3.0)
    }
}

impl ShotCooldown {
    pub fn new(period: f32) -> Self {
        Self {
            elapsed: 0.0,
            period,
        }
    }

    pub fn advance(&mut self, delta: f32) {
        self.elapsed += delta.max(0.0);
    }

    pub fn is_ready(&self) -> bool {
        self.elapsed >= self.period
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}
