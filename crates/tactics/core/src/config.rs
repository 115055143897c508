//! Engine-wide tunable constants.

/// Tunable parameters and compile-time capacity bounds for the engine.
///
/// Capacities bound the small fixed-size collections used by hot-path
/// components (e.g. prepared actions per unit); map and roster sizes
/// themselves are unbounded and come from the scenario being played.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Default cap on simultaneously prepared interrupts per unit.
    pub default_interrupt_cap: usize,
    /// Manhattan radius scanned for morale fallout when a unit is defeated.
    pub morale_cascade_radius: u32,
    /// Turns a unit must wait after a failed rally attempt before trying again.
    pub rally_throttle_turns: u32,
}

impl EngineConfig {
    pub const MAX_PREPARED_ACTIONS: usize = 4;
    pub const MAX_AOE_TILES: usize = 25;
    pub const MAX_ACTIVE_WOUNDS: usize = 8;

    pub const fn new() -> Self {
        Self {
            default_interrupt_cap: 1,
            morale_cascade_radius: 3,
            rally_throttle_turns: 2,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
