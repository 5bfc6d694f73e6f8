//! Базовые компоненты танкового боя: Tank, Health, TankTarget, WanderPoint

use bevy::ecs::component::HookContext;
use bevy::ecs::world::DeferredWorld;
use bevy::prelude::*;
use crate::ai::TankConfig;

/// Танк под управлением FSM
///
/// Автоматически добавляет TankConfig, Health, Transform через Required Components.
/// При спавне Health = `TankConfig::starting_health` (хук on_add).
/// TankBrain и PatrolRoute навешиваются позже в init_tank_brains.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(TankConfig, Health, Transform)]
#[component(on_add = apply_starting_health)]
pub struct Tank;

/// Hook: стартовое здоровье из конфига, один раз при добавлении Tank
fn apply_starting_health(mut world: DeferredWorld, context: HookContext) {
    let Some(starting) = world
        .get::<TankConfig>(context.entity)
        .map(|config| config.starting_health)
    else {
        return;
    };

    if let Some(mut health) = world.get_mut::<Health>(context.entity) {
        health.current = starting;
    }
}

/// Здоровье танка
///
/// Уменьшается только снаружи (попадания снарядов), никогда не растёт.
/// `current <= 0` → FSM переводит танк в Dead в конце тика.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: i32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100) // Default 100 HP
    }
}

impl Health {
    pub fn new(current: i32) -> Self {
        Self { current }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Отрицательный/нулевой урон игнорируется (лечения нет)
    pub fn take_damage(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }
        self.current = self.current.saturating_sub(amount);
    }
}

/// Маркер: цель, которую отслеживают танки (игрок)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct TankTarget;

/// Маркер: точка патруля (позиция берётся из Transform)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct WanderPoint;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tank_spawns_with_starting_health() {
        let mut world = World::new();
        let tank = world
            .spawn((
                Tank,
                TankConfig {
                    starting_health: 40,
                    ..Default::default()
                },
            ))
            .id();

        assert_eq!(world.get::<Health>(tank).map(|h| h.current), Some(40));
    }

    #[test]
    fn test_health_damage() {
        let mut health = Health::new(100);
        assert!(health.is_alive());

        health.take_damage(30);
        assert_eq!(health.current, 70);
        assert!(health.is_alive());

        health.take_damage(100); // Уходит в минус, как и положено
        assert_eq!(health.current, -30);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_health_never_increases() {
        let mut health = Health::new(40);

        health.take_damage(-25);
        assert_eq!(health.current, 40);

        health.take_damage(0);
        assert_eq!(health.current, 40);
    }

    #[test]
    fn test_health_saturates() {
        let mut health = Health::new(i32::MIN + 5);
        health.take_damage(100);
        assert_eq!(health.current, i32::MIN);
    }
}
