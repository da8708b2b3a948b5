//! Simulation error types.

use thiserror::Error;

use super::body::EntityId;

/// Faults raised while updating or placing simulated objects.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A position, direction, or timer became NaN or infinite.
    #[error("entity {entity:?} has invalid {what}")]
    InvalidNumeric { entity: EntityId, what: &'static str },
    /// Rejection sampling ran out of attempts.
    #[error("no valid {kind} position after {attempts} attempts")]
    PlacementExhausted { kind: &'static str, attempts: u32 },
    /// A skill upgrade referenced a slot that does not exist.
    #[error("unknown skill slot {0}")]
    UnknownSkill(usize),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
