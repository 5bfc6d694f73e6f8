//! Tank AI module
//!
//! FSM танка: Patrol → Chase/Flee → Attack ⇄ Sniper → ... → Dead.
//! - tank_fsm: чистые функции переходов (без ECS)
//! - controller: standalone TankController + трейты коллабораторов
//! - systems: ECS-обвязка (init + tick в FixedUpdate)

use bevy::prelude::*;

pub mod components;
pub mod controller;
pub mod dice;
pub mod events;
pub mod systems;
pub mod tank_fsm;

#[cfg(test)]
mod tank_fsm_tests;

// Re-export основных типов
pub use components::*;
pub use controller::{
    dispatch_actions, DeathEffects, TankController, TargetProvider, WaypointProvider, Weapon,
};
pub use dice::{ScriptedDice, TankDice};
pub use events::{CannonFired, TankDestroyed};
pub use systems::{init_tank_brains, tank_fsm_tick};
pub use tank_fsm::{step, Senses, TankAction, TankFrame};

use crate::TankSimSet;

/// Tank AI Plugin
///
/// Регистрирует FSM системы в FixedUpdate для детерминизма:
/// 1. init_tank_brains — мозг для новых танков
/// 2. tank_fsm_tick — один шаг FSM
pub struct TankAiPlugin;

impl Plugin for TankAiPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CannonFired>()
            .add_event::<TankDestroyed>()
            .register_type::<TankBrain>()
            .register_type::<TankConfig>()
            .register_type::<PatrolRoute>();

        app.add_systems(
            FixedUpdate,
            (init_tank_brains, tank_fsm_tick)
                .chain() // Последовательное выполнение для детерминизма
                .in_set(TankSimSet::Decide),
        );
    }
}
