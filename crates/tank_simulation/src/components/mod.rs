//! ECS Components для игровых entity
//!
//! - actor: танк, здоровье, цель, точки патруля
//!
//! FSM-компоненты (TankBrain, TankConfig, PatrolRoute) живут в crate::ai.

pub mod actor;

pub use actor::*;
