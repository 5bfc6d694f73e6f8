//! Источник случайности для FSM танка
//!
//! Все броски FSM идут через TankDice, чтобы тесты могли подставить
//! ScriptedDice и получить точный исход перехода.
//! Production: ChaCha8Rng из DeterministicRng (детерминизм по seed).

use std::collections::VecDeque;
use std::ops::Range;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Броски кубиков для FSM
pub trait TankDice {
    /// Целое из полуинтервала `lo..hi` (пустой диапазон → `lo`)
    fn range_i32(&mut self, range: Range<i32>) -> i32;

    /// Вещественное из полуинтервала `lo..hi` (пустой диапазон → `lo`)
    fn range_f32(&mut self, range: Range<f32>) -> f32;

    /// Индекс в `0..len` (`len == 0` → 0)
    fn index(&mut self, len: usize) -> usize;
}

impl TankDice for ChaCha8Rng {
    fn range_i32(&mut self, range: Range<i32>) -> i32 {
        if range.is_empty() {
            return range.start;
        }
        self.gen_range(range)
    }

    fn range_f32(&mut self, range: Range<f32>) -> f32 {
        if range.is_empty() {
            return range.start;
        }
        self.gen_range(range)
    }

    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.gen_range(0..len)
    }
}

/// Максимальное значение unit (полуинтервал [0, 1))
const MAX_UNIT: f32 = 0.999_999;

/// Заранее записанные броски для тестов и реплеев
///
/// Хранит очередь unit-значений в [0, 1), каждый бросок забирает одно и
/// проецирует на запрошенный диапазон. Когда очередь пуста — `fallback`.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    units: VecDeque<f32>,
    fallback: f32,
}

impl Default for ScriptedDice {
    fn default() -> Self {
        Self::new(std::iter::empty())
    }
}

impl ScriptedDice {
    pub fn new(units: impl IntoIterator<Item = f32>) -> Self {
        Self {
            units: units.into_iter().map(clamp_unit).collect(),
            fallback: 0.5,
        }
    }

    pub fn with_fallback(mut self, unit: f32) -> Self {
        self.fallback = clamp_unit(unit);
        self
    }

    pub fn push(&mut self, unit: f32) {
        self.units.push_back(clamp_unit(unit));
    }

    /// Сколько записанных бросков ещё не использовано
    pub fn remaining(&self) -> usize {
        self.units.len()
    }

    fn next_unit(&mut self) -> f32 {
        self.units.pop_front().unwrap_or(self.fallback)
    }
}

fn clamp_unit(unit: f32) -> f32 {
    if unit.is_nan() {
        return 0.0;
    }
    unit.clamp(0.0, MAX_UNIT)
}

impl TankDice for ScriptedDice {
    fn range_i32(&mut self, range: Range<i32>) -> i32 {
        if range.is_empty() {
            return range.start;
        }
        let span = (range.end - range.start) as f32;
        let offset = (self.next_unit() * span).floor() as i32;
        (range.start + offset).min(range.end - 1)
    }

    fn range_f32(&mut self, range: Range<f32>) -> f32 {
        if range.is_empty() {
            return range.start;
        }
        range.start + self.next_unit() * (range.end - range.start)
    }

    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_unit() * len as f32) as usize).min(len - 1)
    }
}
