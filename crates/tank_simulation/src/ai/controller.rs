//! TankController — танк без ECS
//!
//! Владеет состоянием FSM, корпусом, здоровьем и коллабораторами
//! (цель, точки патруля, пушка, эффект уничтожения, кубики).
//! Хост вызывает `tick(delta)` раз в кадр и `apply_damage` при попаданиях.
//!
//! ECS-версия (системы в ai::systems) использует те же трейты и тот же `step`.

use bevy::prelude::*;

use crate::ai::tank_fsm::{step, Senses, TankAction, TankFrame};
use crate::ai::{PatrolRoute, TankBrain, TankConfig, TankDice, TankMode};
use crate::combat::{ExplosionBurst, REMOVAL_DELAY_SECS};
use crate::components::Health;
use crate::error::TankSetupError;

/// Позиция отслеживаемой цели (None — цели нет)
pub trait TargetProvider {
    fn current_position(&self) -> Option<Vec3>;
}

/// Точки патруля (опрашиваются один раз при инициализации)
pub trait WaypointProvider {
    fn all_points(&self) -> Vec<Vec3>;
}

/// Пушка: fire-and-forget спавн снаряда из дула
pub trait Weapon {
    fn fire(&mut self, muzzle: Transform);
}

/// Эффект уничтожения: оба метода вызываются ровно один раз за жизнь танка
pub trait DeathEffects {
    fn trigger_destruction_effect(&mut self, origin: &Transform, burst: &ExplosionBurst);
    fn schedule_removal(&mut self, delay: f32);
}

impl TargetProvider for Option<Vec3> {
    fn current_position(&self) -> Option<Vec3> {
        *self
    }
}

impl TargetProvider for Vec3 {
    fn current_position(&self) -> Option<Vec3> {
        Some(*self)
    }
}

impl WaypointProvider for [Vec3] {
    fn all_points(&self) -> Vec<Vec3> {
        self.to_vec()
    }
}

impl WaypointProvider for Vec<Vec3> {
    fn all_points(&self) -> Vec<Vec3> {
        self.clone()
    }
}

/// Исполняет actions тика через коллабораторов
pub fn dispatch_actions(
    actions: Vec<TankAction>,
    weapon: &mut impl Weapon,
    effects: &mut impl DeathEffects,
) {
    for action in actions {
        match action {
            TankAction::Fire { muzzle } => weapon.fire(muzzle),
            TankAction::Explode { origin, burst } => {
                effects.trigger_destruction_effect(&origin, &burst);
                effects.schedule_removal(REMOVAL_DELAY_SECS);
            }
        }
    }
}

pub struct TankController<T, W, D, R> {
    brain: TankBrain,
    body: Transform,
    health: Health,
    config: TankConfig,
    route: PatrolRoute,
    target: T,
    weapon: W,
    effects: D,
    dice: R,
}

impl<T, W, D, R> TankController<T, W, D, R>
where
    T: TargetProvider,
    W: Weapon,
    D: DeathEffects,
    R: TankDice,
{
    /// Инициализация: Patrol, health из конфига, таймеры в нуле, первая точка патруля.
    ///
    /// Пустой набор точек — ошибка (fail fast вместо паники в рантайме).
    /// Отсутствие цели — не ошибка, танк просто патрулирует.
    pub fn new<P>(
        config: TankConfig,
        body: Transform,
        waypoints: &P,
        target: T,
        weapon: W,
        effects: D,
        mut dice: R,
    ) -> Result<Self, TankSetupError>
    where
        P: WaypointProvider + ?Sized,
    {
        config.validate();

        let route = PatrolRoute::new(waypoints.all_points())?;

        let mut brain = TankBrain::new(config.shoot_period);
        brain.destination = route.pick_destination(body.translation, &mut dice);
        brain.turret = body.rotation;

        if target.current_position().is_none() {
            crate::log_warning("TankController: target doesn't exist, tank will only patrol");
        }

        Ok(Self {
            brain,
            body,
            health: Health::new(config.starting_health),
            config,
            route,
            target,
            weapon,
            effects,
            dice,
        })
    }

    /// Один шаг симуляции
    pub fn tick(&mut self, delta: f32) {
        let previous = self.brain.mode;
        let target = self.target.current_position();

        if target.is_none() && previous.needs_target() {
            crate::log_warning(&format!("Tank: target lost in {:?}", previous));
        }

        let senses = Senses {
            delta,
            target,
            route: &self.route,
        };
        let mut frame = TankFrame {
            brain: &mut self.brain,
            body: &mut self.body,
            config: &self.config,
            health: self.health.current,
        };
        let actions = step(&mut frame, &senses, &mut self.dice);

        if self.brain.mode != previous {
            crate::log(&format!("Tank: {:?} → {:?}", previous, self.brain.mode));
        }

        dispatch_actions(actions, &mut self.weapon, &mut self.effects);
    }

    /// Урон снаружи (попадание снаряда). Dead проверяется в конце следующего тика.
    pub fn apply_damage(&mut self, amount: i32) {
        self.health.take_damage(amount);
    }

    pub fn mode(&self) -> TankMode {
        self.brain.mode
    }

    pub fn brain(&self) -> &TankBrain {
        &self.brain
    }

    pub fn brain_mut(&mut self) -> &mut TankBrain {
        &mut self.brain
    }

    pub fn body(&self) -> &Transform {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Transform {
        &mut self.body
    }

    pub fn health(&self) -> Health {
        self.health
    }

    pub fn config(&self) -> &TankConfig {
        &self.config
    }

    pub fn route(&self) -> &PatrolRoute {
        &self.route
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn weapon(&self) -> &W {
        &self.weapon
    }

    pub fn effects(&self) -> &D {
        &self.effects
    }

    pub fn dice_mut(&mut self) -> &mut R {
        &mut self.dice
    }
}
