use crate::instruction::{Operand, ProgramId};

/// Errors returned to callers of the engine's public operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("core size must be positive")]
    EmptyCore,

    #[error("no runnable programs")]
    NoPrograms,

    #[error("program has no instructions")]
    EmptyProgram,

    #[error("program of {len} instructions does not fit a core of {core_size} cells")]
    ProgramTooLarge { len: usize, core_size: usize },

    #[error("program #{0} is already loaded")]
    DuplicateProgram(ProgramId),

    #[error("cell {address} is already occupied")]
    Occupied { address: i64 },

    #[error("no free placement found after {attempts} attempts")]
    NoPlacement { attempts: usize },
}

/// A fault raised while executing one instruction.
///
/// Faults never escape `step`: they kill the executing program and are
/// logged and recorded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Fault {
    #[error("code at {address} (owned by {}) is not owned by executing program #{executor}", fmt_owner(.owner))]
    OwnershipMismatch {
        address: i64,
        owner: Option<ProgramId>,
        executor: ProgramId,
    },

    #[error("instruction at {address} has no addressing mode for its {operand} operand")]
    MissingAddrMode { address: i64, operand: Operand },
}

fn fmt_owner(owner: &Option<ProgramId>) -> String {
    match owner {
        Some(id) => format!("program #{id}"),
        None => "nobody".to_string(),
    }
}

/// A fault together with where it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultRecord {
    /// Engine step (1-based) during which the fault occurred.
    pub step: u64,
    /// Program that was killed.
    pub program: ProgramId,
    pub fault: Fault,
}
