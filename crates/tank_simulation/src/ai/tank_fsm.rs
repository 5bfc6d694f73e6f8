//! Tank FSM (чистая логика)
//!
//! ```text
//! Patrol ─(target ≤ chase)────────► Chase 85% | Flee 15%
//! Chase  ─(dist ≤ attack)─────────► Attack
//!        ─(dist ≥ chase)──────────► Patrol
//! Attack ─(attack ≤ dist < chase)─► Attack 1/3 | Sniper 2/3
//!        ─(dist ≥ chase)──────────► Patrol
//! Sniper ─(attack ≤ dist < 4×chase)► выстрел, Sniper 1/50 | Chase 49/50
//! Flee   ─(dist ≥ chase)──────────► Patrol
//! *      ─(health ≤ 0)────────────► Dead (терминальный)
//! ```
//!
//! Одна функция на режим: `(&mut TankFrame, &Senses, dice) → Option<TankAction>`.
//! Никакого ECS и движка: вызывающий (система или TankController) собирает
//! кадр, а потом исполняет возвращённые actions (выстрел, взрыв).
//!
//! Порядок тика:
//! 1. cooldown += delta
//! 2. update активного режима
//! 3. health ≤ 0 → Dead (перебивает выбор режима в этом тике)
//! 4. если шаг 3 только что перевёл в Dead — сразу update_dead (взрыв в тике смерти)

use std::ops::Range;

use bevy::prelude::*;

use crate::ai::{PatrolRoute, TankBrain, TankConfig, TankDice, TankMode};
use crate::combat::ExplosionBurst;
use crate::physics::{steer_towards, translate_forward};

/// Patrol: шанс сбежать вместо погони (проценты)
pub const FLEE_CHANCE_PERCENT: i32 = 15;
/// Attack: остаться в Attack с шансом 1/N (иначе Sniper)
pub const ATTACK_STAY_ONE_IN: i32 = 3;
/// Sniper: остаться в Sniper с шансом 1/N (иначе Chase)
pub const SNIPER_STAY_ONE_IN: i32 = 50;
/// Sniper стреляет до `chase_range × N`
pub const SNIPER_RANGE_FACTOR: f32 = 4.0;
/// Sniper доворачивает в N раз быстрее (lock-on)
pub const SNIPER_TURN_FACTOR: f32 = 2.0;
/// Attack: разброс прицела по Z (целые единицы)
const AIM_JITTER: Range<i32> = -15..15;

/// Изменяемый кадр танка на один тик
pub struct TankFrame<'a> {
    pub brain: &'a mut TankBrain,
    pub body: &'a mut Transform,
    pub config: &'a TankConfig,
    /// Health на момент конца тика (урон уже применён снаружи)
    pub health: i32,
}

/// Что танк "видит" в этом тике
pub struct Senses<'a> {
    pub delta: f32,
    /// Позиция цели (None — цели нет или она исчезла)
    pub target: Option<Vec3>,
    pub route: &'a PatrolRoute,
}

/// Побочный эффект тика, исполняется вызывающим
#[derive(Debug, Clone, PartialEq)]
pub enum TankAction {
    /// Выстрел из дула (позиция + ориентация башни)
    Fire { muzzle: Transform },
    /// Эффект уничтожения + отложенное удаление
    Explode {
        origin: Transform,
        burst: ExplosionBurst,
    },
}

/// Один тик FSM.
pub fn step(frame: &mut TankFrame, senses: &Senses, dice: &mut impl TankDice) -> Vec<TankAction> {
    let mut actions = Vec::with_capacity(2);

    frame.brain.cooldown.advance(senses.delta);

    let action = match frame.brain.mode {
        TankMode::Patrol => update_patrol(frame, senses, dice),
        TankMode::Chase => update_chase(frame, senses),
        TankMode::Attack => update_attack(frame, senses, dice),
        TankMode::Dead => update_dead(frame, dice),
        TankMode::Sniper => update_sniper(frame, senses, dice),
        TankMode::Flee => update_flee(frame, senses),
    };
    actions.extend(action);

    if frame.health <= 0 && !frame.brain.mode.is_dead() {
        frame.brain.mode = TankMode::Dead;
        actions.extend(update_dead(frame, dice));
    }

    actions
}

/// Patrol: едем к точке; на месте — новая точка, иначе бросок Chase/Flee при цели в chase_range.
pub fn update_patrol(
    frame: &mut TankFrame,
    senses: &Senses,
    dice: &mut impl TankDice,
) -> Option<TankAction> {
    let position = frame.body.translation;

    if position.distance(frame.brain.destination) <= frame.config.arrival_radius {
        frame.brain.destination = senses.route.pick_destination(position, dice);
        crate::log(&format!(
            "Patrol: reached destination, next point {:?}",
            frame.brain.destination
        ));
    } else if let Some(target) = senses.target {
        if position.distance(target) <= frame.config.chase_range {
            frame.brain.mode = if dice.range_i32(0..100) < FLEE_CHANCE_PERCENT {
                TankMode::Flee
            } else {
                TankMode::Chase
            };
        }
    }

    frame.body.rotation = steer_towards(
        frame.body.rotation,
        position,
        frame.brain.destination,
        frame.config.turn_rate,
        senses.delta,
    );
    translate_forward(frame.body, frame.config.move_speed, senses.delta);

    None
}

/// Chase: едем вперёд (корпус не поворачиваем), проверяем дистанцию.
pub fn update_chase(frame: &mut TankFrame, senses: &Senses) -> Option<TankAction> {
    let Some(target) = senses.target else {
        return lose_target(frame);
    };

    frame.brain.destination = target;

    let distance = frame.body.translation.distance(target);
    if distance <= frame.config.attack_range {
        frame.brain.mode = TankMode::Attack;
    } else if distance >= frame.config.chase_range {
        frame.brain.mode = TankMode::Patrol;
    }

    translate_forward(frame.body, frame.config.move_speed, senses.delta);

    None
}

/// Attack: в полосе [attack, chase) подруливаем с разбросом и бросаем Attack/Sniper;
/// башня всегда на цель, выстрел по cooldown.
pub fn update_attack(
    frame: &mut TankFrame,
    senses: &Senses,
    dice: &mut impl TankDice,
) -> Option<TankAction> {
    let Some(target) = senses.target else {
        return lose_target(frame);
    };

    let jitter = dice.range_i32(AIM_JITTER) as f32;
    frame.brain.destination = target + Vec3::Z * jitter;

    let position = frame.body.translation;
    let distance = position.distance(target);

    if distance >= frame.config.attack_range && distance < frame.config.chase_range {
        frame.body.rotation = steer_towards(
            frame.body.rotation,
            position,
            frame.brain.destination,
            frame.config.turn_rate,
            senses.delta,
        );
        translate_forward(frame.body, frame.config.move_speed, senses.delta);

        frame.brain.mode = if dice.range_i32(0..ATTACK_STAY_ONE_IN) == 0 {
            TankMode::Attack
        } else {
            TankMode::Sniper
        };
    } else if distance >= frame.config.chase_range {
        frame.brain.mode = TankMode::Patrol;
    }

    let turn_rate = frame.config.turn_rate;
    aim_turret(frame, target, turn_rate, senses.delta);
    fire_when_ready(frame)
}

/// Sniper: стоим; в полосе [attack, 4×chase) доворачиваем корпус и стреляем сразу
/// (мимо cooldown), потом бросок Sniper/Chase. Башня всегда на цель с 2× скоростью.
pub fn update_sniper(
    frame: &mut TankFrame,
    senses: &Senses,
    dice: &mut impl TankDice,
) -> Option<TankAction> {
    let Some(target) = senses.target else {
        return lose_target(frame);
    };

    frame.brain.destination = target;

    let lock_rate = frame.config.turn_rate * SNIPER_TURN_FACTOR;
    let position = frame.body.translation;
    let distance = position.distance(target);
    let mut shot = None;

    if distance >= frame.config.attack_range
        && distance < frame.config.chase_range * SNIPER_RANGE_FACTOR
    {
        frame.body.rotation =
            steer_towards(frame.body.rotation, position, target, lock_rate, senses.delta);

        shot = Some(fire_now(frame));

        frame.brain.mode = if dice.range_i32(0..SNIPER_STAY_ONE_IN) == 0 {
            TankMode::Sniper
        } else {
            TankMode::Chase
        };
    }

    aim_turret(frame, target, lock_rate, senses.delta);
    shot
}

/// Flee: пятимся от цели, пока не выйдем за chase_range.
///
/// Обратного перехода Flee → Attack нет (известный пробел поведения).
pub fn update_flee(frame: &mut TankFrame, senses: &Senses) -> Option<TankAction> {
    let Some(target) = senses.target else {
        return lose_target(frame);
    };

    frame.brain.destination = target;

    if frame.body.translation.distance(target) >= frame.config.chase_range {
        frame.brain.mode = TankMode::Patrol;
    }

    translate_forward(frame.body, -frame.config.move_speed, senses.delta);

    None
}

/// Dead: не двигаемся; при первом входе — взрыв (latch).
pub fn update_dead(frame: &mut TankFrame, dice: &mut impl TankDice) -> Option<TankAction> {
    if frame.brain.has_exploded {
        return None;
    }
    frame.brain.has_exploded = true;

    Some(TankAction::Explode {
        origin: *frame.body,
        burst: ExplosionBurst::roll(dice),
    })
}

/// Цель пропала посреди боя — возвращаемся в патруль
fn lose_target(frame: &mut TankFrame) -> Option<TankAction> {
    frame.brain.mode = TankMode::Patrol;
    None
}

fn aim_turret(frame: &mut TankFrame, target: Vec3, rate: f32, delta: f32) {
    frame.brain.turret = steer_towards(
        frame.brain.turret,
        frame.body.translation,
        target,
        rate,
        delta,
    );
}

fn fire_when_ready(frame: &mut TankFrame) -> Option<TankAction> {
    if !frame.brain.cooldown.is_ready() {
        return None;
    }
    Some(fire_now(frame))
}

/// Выстрел без проверки cooldown (таймер всё равно сбрасывается)
fn fire_now(frame: &mut TankFrame) -> TankAction {
    frame.brain.cooldown.reset();
    TankAction::Fire {
        muzzle: muzzle_pose(frame),
    }
}

/// Поза дула: корпус + смещение в осях башни, ориентация башни
pub fn muzzle_pose(frame: &TankFrame) -> Transform {
    let turret = frame.brain.turret;
    Transform::from_translation(frame.body.translation + turret * frame.config.muzzle_offset)
        .with_rotation(turret)
}
