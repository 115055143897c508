//! Closed error taxonomy shared by every subsystem.
//!
//! Validation and execution failures are returned by value, never thrown;
//! callers decide whether a failure is worth surfacing to a player. Only
//! genuine programmer errors (occupancy invariant violations, RNG misuse)
//! are expected to abort the process, and they do so via `panic!`/`debug_assert!`
//! at the call site rather than through this enum.

use crate::geometry::Vector;
use crate::unit::UnitId;

/// The closed set of reasons an action or map operation can fail.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("position {0} is out of bounds or blocked")]
    InvalidPosition(Vector),

    #[error("target is not the right kind, or no unit is present where one is required")]
    InvalidTarget,

    #[error("distance {distance} is outside the allowed range [{min}, {max}]")]
    OutOfRange { distance: u32, min: u32, max: u32 },

    #[error("destination is occupied or terrain is impassable")]
    Blocked,

    #[error("prepared action has no uses remaining")]
    NoUsesRemaining,

    #[error("validation failed: {0}")]
    ValidationFailed(&'static str),

    #[error("unit {0:?} was not found")]
    NotFound(UnitId),
}

/// Result alias used throughout the engine's public validate/execute surface.
pub type EngineResult<T> = Result<T, EngineError>;
