use crate::instruction::Instruction;

/// The shared circular memory.
///
/// Every address is reduced modulo the core length before use, so any `i64`
/// (including negative offsets) names a valid cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Core {
    cells: Vec<Instruction>,
}

impl Core {
    /// A core of `size` empty cells. `size` must be positive; the engine
    /// validates this before building one.
    pub fn new(size: usize) -> Self {
        Self {
            cells: vec![Instruction::EMPTY; size],
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reduce an address to an index into the core.
    pub fn wrap(&self, addr: i64) -> usize {
        addr.rem_euclid(self.cells.len() as i64) as usize
    }

    pub fn read(&self, addr: i64) -> Instruction {
        self.cells[self.wrap(addr)]
    }

    pub fn write(&mut self, addr: i64, instr: Instruction) {
        let idx = self.wrap(addr);
        self.cells[idx] = instr;
    }

    /// Mutable access to a cell, for in-place field updates.
    pub fn cell_mut(&mut self, addr: i64) -> &mut Instruction {
        let idx = self.wrap(addr);
        &mut self.cells[idx]
    }

    pub fn is_occupied(&self, addr: i64) -> bool {
        !self.read(addr).is_empty()
    }

    pub fn cells(&self) -> &[Instruction] {
        &self.cells
    }

    /// Listing of every claimed cell, one per line.
    pub fn disassemble(&self) -> String {
        use std::fmt::Write;
        let mut out = String::new();
        for (i, ins) in self.cells.iter().enumerate() {
            if ins.is_empty() {
                continue;
            }
            let owner = match ins.owner {
                Some(o) => format!("p{}.{}", o.program, o.process),
                None => "--".to_string(),
            };
            let _ = writeln!(out, "{i:04}: {owner:<8} {ins}");
        }
        out
    }
}
