use std::fmt;

/// Identifier of a loaded program.
pub type ProgramId = u32;

/// Identifier of a process within a program, as stamped on the cells it spawned.
pub type ProcessId = u32;

/// The Redcode opcodes understood by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Copy the A operand cell to the B operand address.
    Mov,
    /// Non-executable data. Executing it kills the program.
    Data,
    /// Jump relative to the current instruction by the A field.
    Jmp,
    /// Add the A operand fields into the B operand cell.
    Add,
    /// Split off a new process at the A operand address.
    Spl,
    /// Do nothing.
    Nop,
}

impl Opcode {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Mov => "MOV",
            Opcode::Data => "DAT",
            Opcode::Jmp => "JMP",
            Opcode::Add => "ADD",
            Opcode::Spl => "SPL",
            Opcode::Nop => "NOP",
        }
    }
}

/// How an operand field is turned into a value or an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddrMode {
    /// The cell at `base + field`.
    Direct,
    /// The field itself is the value; the cell is the executing one.
    Immediate,
    /// Follow the A field of the cell at `base + field`.
    AIndirect,
    /// Follow the B field of the cell at `base + field`.
    BIndirect,
}

impl AddrMode {
    /// Redcode sigil for the mode.
    pub fn sigil(self) -> char {
        match self {
            AddrMode::Direct => '$',
            AddrMode::Immediate => '#',
            AddrMode::AIndirect => '*',
            AddrMode::BIndirect => '@',
        }
    }
}

/// Which operand of an instruction is being resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    A,
    B,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::A => f.write_str("A"),
            Operand::B => f.write_str("B"),
        }
    }
}

/// Ownership tag stamped on every claimed cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Owner {
    pub program: ProgramId,
    pub process: ProcessId,
}

/// A single core cell.
///
/// Instructions are plain values: copying one into the core never aliases
/// the template it came from. An unclaimed cell holds [`Instruction::EMPTY`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub op: Opcode,
    pub a_field: i64,
    pub a_mode: Option<AddrMode>,
    pub b_field: i64,
    pub b_mode: Option<AddrMode>,
    pub owner: Option<Owner>,
}

impl Instruction {
    /// The unclaimed-cell sentinel: `NOP 0, 0` with no modes and no owner.
    pub const EMPTY: Instruction = Instruction {
        op: Opcode::Nop,
        a_field: 0,
        a_mode: None,
        b_field: 0,
        b_mode: None,
        owner: None,
    };

    /// Build an unowned instruction with both addressing modes present.
    pub fn new(op: Opcode, a_field: i64, a_mode: AddrMode, b_field: i64, b_mode: AddrMode) -> Self {
        Self {
            op,
            a_field,
            a_mode: Some(a_mode),
            b_field,
            b_mode: Some(b_mode),
            owner: None,
        }
    }

    /// `JMP a`. The B operand is unused and carries no mode.
    pub fn jmp(a_field: i64) -> Self {
        Self {
            op: Opcode::Jmp,
            a_field,
            a_mode: Some(AddrMode::Direct),
            b_field: 0,
            b_mode: None,
            owner: None,
        }
    }

    /// `DAT #0, #0`.
    pub fn data() -> Self {
        Self::new(Opcode::Data, 0, AddrMode::Immediate, 0, AddrMode::Immediate)
    }

    /// Return a copy stamped with the given ownership tag.
    pub fn owned_by(self, program: ProgramId, process: ProcessId) -> Self {
        Self {
            owner: Some(Owner { program, process }),
            ..self
        }
    }

    /// True for the unclaimed-cell sentinel. Compares every field, not just
    /// the opcode, so a claimed `NOP` is never mistaken for free space.
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    pub fn owner_program(&self) -> Option<ProgramId> {
        self.owner.map(|o| o.program)
    }

    pub fn fields(&self) -> (i64, i64) {
        (self.a_field, self.b_field)
    }

    /// Overwrite both fields, leaving opcode, modes and ownership untouched.
    pub fn set_fields(&mut self, (a, b): (i64, i64)) {
        self.a_field = a;
        self.b_field = b;
    }

    pub fn field(&self, operand: Operand) -> i64 {
        match operand {
            Operand::A => self.a_field,
            Operand::B => self.b_field,
        }
    }

    pub fn mode(&self, operand: Operand) -> Option<AddrMode> {
        match operand {
            Operand::A => self.a_mode,
            Operand::B => self.b_mode,
        }
    }
}

impl Default for Instruction {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sigil = |mode: Option<AddrMode>| mode.map_or('?', AddrMode::sigil);
        write!(f, "{} {}{}", self.op.mnemonic(), sigil(self.a_mode), self.a_field)?;
        if self.b_mode.is_some() || self.b_field != 0 {
            write!(f, ", {}{}", sigil(self.b_mode), self.b_field)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_sentinel() {
        assert!(Instruction::EMPTY.is_empty());
        assert!(Instruction::default().is_empty());
        assert_eq!(Instruction::EMPTY.owner_program(), None);
    }

    #[test]
    fn test_owned_nop_is_not_empty() {
        // Same opcode and fields as the sentinel, but claimed.
        let nop = Instruction::EMPTY.owned_by(0, 0);
        assert_eq!(nop.op, Opcode::Nop);
        assert!(!nop.is_empty());
    }

    #[test]
    fn test_nop_with_modes_is_not_empty() {
        let nop = Instruction::new(Opcode::Nop, 0, AddrMode::Direct, 0, AddrMode::Direct);
        assert!(!nop.is_empty());
    }

    #[test]
    fn test_owned_by_tags_copy_only() {
        let template = Instruction::data();
        let owned = template.owned_by(3, 1);
        assert_eq!(template.owner, None);
        assert_eq!(owned.owner, Some(Owner { program: 3, process: 1 }));
        assert_eq!(owned.owner_program(), Some(3));
    }

    #[test]
    fn test_set_fields_keeps_everything_else() {
        let mut ins = Instruction::new(Opcode::Mov, 1, AddrMode::AIndirect, 2, AddrMode::BIndirect)
            .owned_by(7, 0);
        ins.set_fields((10, -20));
        assert_eq!(ins.fields(), (10, -20));
        assert_eq!(ins.op, Opcode::Mov);
        assert_eq!(ins.a_mode, Some(AddrMode::AIndirect));
        assert_eq!(ins.b_mode, Some(AddrMode::BIndirect));
        assert_eq!(ins.owner_program(), Some(7));
    }

    #[test]
    fn test_operand_accessors() {
        let ins = Instruction::new(Opcode::Add, 4, AddrMode::Immediate, 3, AddrMode::Direct);
        assert_eq!(ins.field(Operand::A), 4);
        assert_eq!(ins.field(Operand::B), 3);
        assert_eq!(ins.mode(Operand::A), Some(AddrMode::Immediate));
        assert_eq!(ins.mode(Operand::B), Some(AddrMode::Direct));
    }

    #[test]
    fn test_display() {
        let imp = Instruction::new(Opcode::Mov, 0, AddrMode::Direct, 1, AddrMode::Direct);
        assert_eq!(imp.to_string(), "MOV $0, $1");
        assert_eq!(Instruction::jmp(-2).to_string(), "JMP $-2");
        let bomb = Instruction::new(Opcode::Mov, 2, AddrMode::Direct, 2, AddrMode::BIndirect);
        assert_eq!(bomb.to_string(), "MOV $2, @2");
        assert_eq!(Instruction::EMPTY.to_string(), "NOP ?0");
    }
}
