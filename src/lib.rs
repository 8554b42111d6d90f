pub mod instruction;
pub mod memory;
pub mod program;
pub mod config;
pub mod error;
pub mod engine;
pub mod warriors;
pub mod metrics;
pub mod render;

pub use config::{EngineConfig, Placement};
pub use engine::{Engine, Outcome};
pub use error::{EngineError, Fault, FaultRecord};
pub use instruction::{AddrMode, Instruction, Opcode, Operand, ProcessId, ProgramId};
