use std::collections::BTreeSet;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::config::{EngineConfig, Placement};
use crate::error::{EngineError, Fault, FaultRecord};
use crate::instruction::{AddrMode, Instruction, Opcode, Operand, ProcessId, ProgramId};
use crate::memory::Core;
use crate::program::ProgramGroup;

/// State of the game as seen from the set of surviving programs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Two or more programs are alive (or none has been loaded yet).
    Running,
    /// Exactly one program is alive.
    Winner(ProgramId),
    /// Every program has been killed.
    Draw,
}

/// A resolved operand: the cell it designates, plus the literal value for
/// immediate operands.
///
/// All three things callers want from an operand (its field pair, its cell,
/// its address) are read off this one value, so every addressing mode is
/// interpreted in exactly one place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Target {
    address: i64,
    immediate: Option<i64>,
}

/// The battle engine: a shared core and the programs competing in it.
///
/// Programs take turns in load order, one instruction per turn. Within a
/// program, processes take turns in the same way.
pub struct Engine<R = SmallRng> {
    core: Core,
    programs: Vec<ProgramGroup>,
    /// Index of the program whose turn is next. `None` until `start`.
    cur_program: Option<usize>,
    config: EngineConfig,
    rng: R,
    steps: u64,
    finished: bool,
    faults: Vec<FaultRecord>,
}

impl Engine<SmallRng> {
    /// Create an engine whose random placement is seeded with `seed`.
    pub fn new(config: EngineConfig, seed: u64) -> Result<Self, EngineError> {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Engine<R> {
    /// Create an engine drawing placements from `rng`.
    pub fn with_rng(config: EngineConfig, rng: R) -> Result<Self, EngineError> {
        if config.core_size == 0 {
            return Err(EngineError::EmptyCore);
        }
        Ok(Self {
            core: Core::new(config.core_size),
            programs: Vec::new(),
            cur_program: None,
            config,
            rng,
            steps: 0,
            finished: false,
            faults: Vec::new(),
        })
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn programs(&self) -> &[ProgramGroup] {
        &self.programs
    }

    pub fn program(&self, id: ProgramId) -> Option<&ProgramGroup> {
        self.programs.iter().find(|p| p.id() == id)
    }

    /// Number of instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn faults(&self) -> &[FaultRecord] {
        &self.faults
    }

    pub fn is_started(&self) -> bool {
        self.cur_program.is_some()
    }

    /// Load `code` at a uniformly random free location.
    ///
    /// Candidate locations are redrawn on collision, up to
    /// `max_placement_attempts` times. Returns the chosen start address.
    pub fn spawn(
        &mut self,
        program_id: ProgramId,
        process_id: ProcessId,
        code: &[Instruction],
    ) -> Result<i64, EngineError> {
        self.check_loadable(program_id, code)?;
        let attempts = self.config.max_placement_attempts;
        for _ in 0..attempts {
            let start = self.rng.gen_range(0..self.core.len()) as i64;
            if self.first_collision(start, code.len()).is_none() {
                self.place(program_id, process_id, code, start);
                return Ok(start);
            }
        }
        Err(EngineError::NoPlacement { attempts })
    }

    /// Load `code` starting at `address` (reduced into the core), failing if
    /// the placement collides with claimed cells.
    pub fn spawn_at(
        &mut self,
        program_id: ProgramId,
        process_id: ProcessId,
        code: &[Instruction],
        address: i64,
    ) -> Result<(), EngineError> {
        self.check_loadable(program_id, code)?;
        let address = self.core.wrap(address) as i64;
        if let Some(address) = self.first_collision(address, code.len()) {
            return Err(EngineError::Occupied { address });
        }
        self.place(program_id, process_id, code, address);
        Ok(())
    }

    fn check_loadable(&self, program_id: ProgramId, code: &[Instruction]) -> Result<(), EngineError> {
        if code.is_empty() {
            return Err(EngineError::EmptyProgram);
        }
        if code.len() > self.core.len() {
            return Err(EngineError::ProgramTooLarge {
                len: code.len(),
                core_size: self.core.len(),
            });
        }
        if self.program(program_id).is_some() {
            return Err(EngineError::DuplicateProgram(program_id));
        }
        Ok(())
    }

    /// First claimed cell (as a core index) in the `len` cells from `start`.
    fn first_collision(&self, start: i64, len: usize) -> Option<i64> {
        let n = self.core.len() as i64;
        (start..start + len as i64)
            .filter(|&addr| match self.config.placement {
                Placement::Wrapping => true,
                // Only raw addresses inside the core are checked.
                Placement::Unwrapped => addr < n,
            })
            .find(|&addr| self.core.is_occupied(addr))
            .map(|addr| self.core.wrap(addr) as i64)
    }

    fn place(
        &mut self,
        program_id: ProgramId,
        process_id: ProcessId,
        code: &[Instruction],
        start: i64,
    ) {
        let code: Vec<Instruction> = code
            .iter()
            .map(|ins| ins.owned_by(program_id, process_id))
            .collect();
        for (offset, ins) in code.iter().enumerate() {
            self.core.write(start + offset as i64, *ins);
        }
        debug!(program = program_id, start, len = code.len(), "spawned program");
        self.programs.push(ProgramGroup::new(program_id, code, start));
    }

    /// Begin the game with the first loaded program.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.programs.is_empty() {
            return Err(EngineError::NoPrograms);
        }
        self.cur_program = Some(0);
        Ok(())
    }

    /// Set of programs still alive.
    pub fn alive_programs(&self) -> BTreeSet<ProgramId> {
        self.programs
            .iter()
            .filter(|p| p.is_alive())
            .map(ProgramGroup::id)
            .collect()
    }

    pub fn outcome(&self) -> Outcome {
        if self.programs.is_empty() {
            return Outcome::Running;
        }
        let mut alive = self.programs.iter().filter(|p| p.is_alive());
        match (alive.next(), alive.next()) {
            (None, _) => Outcome::Draw,
            (Some(p), None) => Outcome::Winner(p.id()),
            _ => Outcome::Running,
        }
    }

    /// Execute one instruction for the next live program.
    ///
    /// Returns `true` while the game should continue. Returns `false` once a
    /// single program survives, once none do, or if the engine was never
    /// started. After returning `false` for a concluded game, further calls
    /// do nothing.
    pub fn step(&mut self) -> bool {
        let Some(cur) = self.cur_program else {
            warn!("step called before start");
            return false;
        };
        if self.finished {
            return false;
        }

        let n = self.programs.len();
        let Some(idx) = (0..n)
            .map(|k| (cur + k) % n)
            .find(|&i| self.programs[i].is_alive())
        else {
            self.finished = true;
            return false;
        };

        self.steps += 1;
        self.execute_code(idx);
        self.cur_program = Some((idx + 1) % n);

        match self.outcome() {
            Outcome::Running => true,
            Outcome::Winner(id) => {
                info!(winner = id, steps = self.steps, "game finished");
                self.finished = true;
                false
            }
            Outcome::Draw => {
                info!(steps = self.steps, "game finished with no survivors");
                self.finished = true;
                false
            }
        }
    }

    /// Step until the game concludes or `max_steps` instructions have run.
    pub fn run(&mut self, max_steps: u64) -> Outcome {
        for _ in 0..max_steps {
            if !self.step() {
                break;
            }
        }
        self.outcome()
    }

    /// Run one instruction of program `idx`, containing any fault to it.
    fn execute_code(&mut self, idx: usize) {
        let cur_location = self.programs[idx].next_process_pointer();
        if let Err(fault) = self.execute_at(idx, cur_location) {
            let program = self.programs[idx].id();
            warn!(program, step = self.steps, %fault, "program faulted");
            self.programs[idx].kill();
            self.faults.push(FaultRecord {
                step: self.steps,
                program,
                fault,
            });
        }
    }

    fn execute_at(&mut self, idx: usize, cur_location: i64) -> Result<(), Fault> {
        let code = self.core.read(cur_location);
        let executor = self.programs[idx].id();
        if code.owner_program() != Some(executor) {
            return Err(Fault::OwnershipMismatch {
                address: self.core.wrap(cur_location) as i64,
                owner: code.owner_program(),
                executor,
            });
        }

        match code.op {
            Opcode::Data => {
                debug!(program = executor, address = cur_location, "executed DAT");
                self.programs[idx].kill();
            }
            Opcode::Jmp => {
                self.programs[idx].jump_cur_process(cur_location.wrapping_add(code.a_field));
            }
            Opcode::Add => {
                let src = self.resolve(cur_location, &code, Operand::A)?;
                let dst = self.resolve(cur_location, &code, Operand::B)?;
                let (a1, b1) = self.fields(src);
                let (a2, b2) = self.fields(dst);
                self.core
                    .cell_mut(dst.address)
                    .set_fields((a1.wrapping_add(a2), b1.wrapping_add(b2)));
            }
            Opcode::Mov => {
                let src = self.resolve(cur_location, &code, Operand::A)?;
                let dst = self.resolve(cur_location, &code, Operand::B)?;
                let copy = self.core.read(src.address);
                self.core.write(dst.address, copy);
            }
            Opcode::Spl => {
                if self.config.split_processes {
                    let target = self.resolve(cur_location, &code, Operand::A)?;
                    let program = &mut self.programs[idx];
                    if program.processes().len() < self.config.max_processes {
                        program.split(target.address);
                        debug!(program = executor, at = target.address, "split process");
                    }
                }
            }
            Opcode::Nop => {}
        }
        Ok(())
    }

    /// Resolve `operand` of `code`, executing at `base`.
    fn resolve(&self, base: i64, code: &Instruction, operand: Operand) -> Result<Target, Fault> {
        let field = code.field(operand);
        let mode = code.mode(operand).ok_or(Fault::MissingAddrMode {
            address: self.core.wrap(base) as i64,
            operand,
        })?;
        let target = match mode {
            AddrMode::Direct => Target {
                address: base.wrapping_add(field),
                immediate: None,
            },
            AddrMode::Immediate => Target {
                address: base,
                immediate: Some(field),
            },
            AddrMode::AIndirect | AddrMode::BIndirect => {
                let pointer = base.wrapping_add(field);
                let cell = self.core.read(pointer);
                let offset = match mode {
                    AddrMode::AIndirect => cell.a_field,
                    _ => cell.b_field,
                };
                Target {
                    address: pointer.wrapping_add(offset),
                    immediate: None,
                }
            }
        };
        Ok(target)
    }

    /// Field pair of a resolved operand; immediates read as `(0, value)`.
    fn fields(&self, target: Target) -> (i64, i64) {
        match target.immediate {
            Some(value) => (0, value),
            None => self.core.read(target.address).fields(),
        }
    }
}
