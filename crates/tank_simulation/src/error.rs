//! Ошибки setup-фазы танка
//!
//! Runtime тики не падают: отсутствие цели или смерть — обычные состояния FSM.
//! Ошибкой считается только то, что ломает инициализацию.

use thiserror::Error;

/// Ошибка инициализации танка (маршрут патруля, конфиг)
#[derive(Debug, Error)]
pub enum TankSetupError {
    /// Нет ни одной WanderPoint — патрулировать нечего
    #[error("patrol route is empty: at least one wander point is required")]
    EmptyPatrolRoute,

    /// TankConfig не распарсился из JSON
    #[error("invalid tank config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}
