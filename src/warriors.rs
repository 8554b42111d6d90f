//! Built-in demo programs.
//!
//! Templates are unowned; the engine stamps ownership when spawning them.

use crate::instruction::{AddrMode, Instruction, Opcode};

/// The imp: `MOV $0, $1`. Copies itself one cell ahead forever.
pub fn imp() -> Vec<Instruction> {
    vec![Instruction::new(
        Opcode::Mov,
        0,
        AddrMode::Direct,
        1,
        AddrMode::Direct,
    )]
}

/// The dwarf: drops a DAT bomb every fourth cell through the core.
///
/// ```text
/// ADD #4, $3
/// MOV $2, @2
/// JMP $-2
/// DAT #0, #0
/// ```
pub fn dwarf() -> Vec<Instruction> {
    vec![
        Instruction::new(Opcode::Add, 4, AddrMode::Immediate, 3, AddrMode::Direct),
        Instruction::new(Opcode::Mov, 2, AddrMode::Direct, 2, AddrMode::BIndirect),
        Instruction::jmp(-2),
        Instruction::data(),
    ]
}

/// Look up a built-in program by name.
pub fn by_name(name: &str) -> Option<Vec<Instruction>> {
    match name {
        "imp" => Some(imp()),
        "dwarf" => Some(dwarf()),
        _ => None,
    }
}

/// Names accepted by [`by_name`].
pub const NAMES: &[&str] = &["imp", "dwarf"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_are_unowned() {
        assert!(imp().iter().chain(dwarf().iter()).all(|i| i.owner.is_none()));
    }

    #[test]
    fn test_dwarf_listing() {
        let listing: Vec<String> = dwarf().iter().map(|i| i.to_string()).collect();
        assert_eq!(listing, ["ADD #4, $3", "MOV $2, @2", "JMP $-2", "DAT #0, #0"]);
    }

    #[test]
    fn test_by_name() {
        for name in NAMES {
            assert!(by_name(name).is_some());
        }
        assert_eq!(by_name("imp"), Some(imp()));
        assert!(by_name("mice").is_none());
    }
}
