//! Tank FSM components (mode, brain, config, patrol route).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::TankDice;
use crate::combat::ShotCooldown;
use crate::error::TankSetupError;

/// Режим танка
///
/// Начальный — Patrol, терминальный — Dead (выхода нет).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum TankMode {
    /// Едем к случайной точке патруля, ищем цель в chase_range
    #[default]
    Patrol,
    /// Едем к цели (без поворота корпуса)
    Chase,
    /// Подруливаем к цели с разбросом, стреляем по cooldown
    Attack,
    /// Корпус уничтожен, один раз взрываемся
    Dead,
    /// Стоим, быстро доворачиваем башню, стреляем без cooldown
    Sniper,
    /// Пятимся от цели до chase_range
    Flee,
}

impl TankMode {
    pub fn is_dead(self) -> bool {
        self == TankMode::Dead
    }

    /// Режимы, которым нужна живая цель
    pub fn needs_target(self) -> bool {
        matches!(
            self,
            TankMode::Chase | TankMode::Attack | TankMode::Sniper | TankMode::Flee
        )
    }
}

/// Параметры танка (tuning)
///
/// Инвариант (не проверяется, только warning): `attack_range < chase_range`.
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct TankConfig {
    /// Дистанция, на которой замечаем цель / бросаем погоню
    pub chase_range: f32,
    /// Дистанция атаки
    pub attack_range: f32,
    /// Скорость движения (units/sec)
    pub move_speed: f32,
    /// Скорость поворота (slerp factor/sec)
    pub turn_rate: f32,
    /// Интервал между выстрелами (секунды)
    pub shoot_period: f32,
    /// Стартовое здоровье
    pub starting_health: i32,
    /// Patrol: точка считается достигнутой ближе этого радиуса
    pub arrival_radius: f32,
    /// Смещение дула от корпуса (в осях башни)
    pub muzzle_offset: Vec3,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            chase_range: 400.0,
            attack_range: 300.0,
            move_speed: 150.0,
            turn_rate: 2.0,
            shoot_period: 3.0,
            starting_health: 100,
            arrival_radius: 100.0,
            muzzle_offset: Vec3::new(0.0, 1.5, -6.0),
        }
    }
}

impl TankConfig {
    /// Загрузка из JSON (отсутствующие поля — из Default)
    pub fn from_json_str(json: &str) -> Result<Self, TankSetupError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate();
        Ok(config)
    }

    /// Проверяет `attack_range < chase_range`.
    ///
    /// Нарушение не отклоняется (FSM продолжит работать как есть), только warning.
    pub fn validate(&self) -> bool {
        if self.attack_range >= self.chase_range {
            crate::log_warning(&format!(
                "TankConfig: attack_range ({}) >= chase_range ({}), Attack/Chase bands overlap",
                self.attack_range, self.chase_range
            ));
            return false;
        }
        true
    }
}

/// Состояние FSM танка (всё, что меняется между тиками кроме Transform/Health)
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct TankBrain {
    pub mode: TankMode,
    /// Куда едем: точка патруля или позиция цели
    pub destination: Vec3,
    pub cooldown: ShotCooldown,
    /// Мировая rotation башни
    pub turret: Quat,
    /// One-shot latch: эффект уничтожения уже сработал
    pub has_exploded: bool,
    /// Отслеживаемая цель (weak ref, не владеем)
    pub target: Option<Entity>,
}

impl Default for TankBrain {
    fn default() -> Self {
        Self::new(TankConfig::default().shoot_period)
    }
}

impl TankBrain {
    pub fn new(shoot_period: f32) -> Self {
        Self {
            mode: TankMode::Patrol,
            destination: Vec3::ZERO,
            cooldown: ShotCooldown::new(shoot_period),
            turret: Quat::IDENTITY,
            has_exploded: false,
            target: None,
        }
    }
}

/// Patrol: ближе этого (по X и Z отдельно) точка считается "текущей позицией"
const NEAR_BOX: f32 = 50.0;
/// Patrol: разброс, которым сдвигаем слишком близкую точку
const NEAR_JITTER: f32 = 10.0;

/// Точки патруля, снятые один раз при инициализации
///
/// Инвариант: непустой (проверяется в `new`).
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PatrolRoute {
    points: Vec<Vec3>,
}

impl PatrolRoute {
    pub fn new(points: Vec<Vec3>) -> Result<Self, TankSetupError> {
        if points.is_empty() {
            return Err(TankSetupError::EmptyPatrolRoute);
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Случайная точка патруля.
    ///
    /// Если она в квадрате ±50 от `current` — один раз сдвигаем на ±10 по X/Z,
    /// чтобы не выбрать собственную позицию. Гарантии нет (одна попытка).
    pub fn pick_destination(&self, current: Vec3, dice: &mut impl TankDice) -> Vec3 {
        let index = dice.index(self.points.len());
        let Some(&point) = self.points.get(index).or_else(|| self.points.first()) else {
            return current;
        };

        if !is_near(point, current) {
            return point;
        }

        let jitter = Vec3::new(
            dice.range_f32(-NEAR_JITTER..NEAR_JITTER),
            0.0,
            dice.range_f32(-NEAR_JITTER..NEAR_JITTER),
        );
        point + jitter
    }
}

fn is_near(point: Vec3, current: Vec3) -> bool {
    (point.x - current.x).abs() <= NEAR_BOX && (point.z - current.z).abs() <= NEAR_BOX
}
