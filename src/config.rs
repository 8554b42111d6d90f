/// How `spawn` checks a candidate placement for collisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Placement {
    /// Collision check and write both wrap around the end of the core.
    #[default]
    Wrapping,
    /// Cells at raw addresses past the end of the core are not checked,
    /// although the write still wraps onto them. Reproduces the legacy
    /// placement behaviour and can overwrite another program.
    Unwrapped,
}

/// Configuration for a battle engine.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Number of cells in the circular core.
    pub core_size: usize,
    /// Collision-check policy for random placement.
    pub placement: Placement,
    /// Random placements tried before `spawn` gives up.
    pub max_placement_attempts: usize,
    /// Whether SPL creates a new process (otherwise it behaves as NOP).
    pub split_processes: bool,
    /// Per-program process cap; SPL past it has no effect.
    pub max_processes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            core_size: 100,
            placement: Placement::Wrapping,
            max_placement_attempts: 10_000,
            split_processes: true,
            max_processes: 64,
        }
    }
}
