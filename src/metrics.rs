use std::collections::BTreeMap;

use crate::instruction::{Instruction, ProgramId};

/// Count the cells claimed by each program.
///
/// Cells with no owner (including cells an ADD modified while empty) are
/// not counted.
pub fn cells_owned(cells: &[Instruction]) -> BTreeMap<ProgramId, usize> {
    let mut counts = BTreeMap::new();
    for program in cells.iter().filter_map(Instruction::owner_program) {
        *counts.entry(program).or_insert(0) += 1;
    }
    counts
}

/// Count the unclaimed cells.
pub fn empty_cells(cells: &[Instruction]) -> usize {
    cells.iter().filter(|c| c.is_empty()).count()
}

/// Fraction of the core holding something other than the sentinel.
pub fn occupancy(cells: &[Instruction]) -> f64 {
    if cells.is_empty() {
        return 0.0;
    }
    (cells.len() - empty_cells(cells)) as f64 / cells.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::{AddrMode, Opcode};

    fn cell(program: ProgramId) -> Instruction {
        Instruction::new(Opcode::Mov, 0, AddrMode::Direct, 1, AddrMode::Direct).owned_by(program, 0)
    }

    #[test]
    fn test_cells_owned() {
        let cells = vec![cell(0), Instruction::EMPTY, cell(1), cell(0), Instruction::EMPTY];
        let counts = cells_owned(&cells);
        assert_eq!(counts.get(&0), Some(&2));
        assert_eq!(counts.get(&1), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_cells_owned_empty_core() {
        let cells = vec![Instruction::EMPTY; 8];
        assert!(cells_owned(&cells).is_empty());
    }

    #[test]
    fn test_empty_cells() {
        let cells = vec![cell(0), Instruction::EMPTY, Instruction::EMPTY];
        assert_eq!(empty_cells(&cells), 2);
    }

    #[test]
    fn test_unowned_modified_cell_is_not_empty() {
        let mut touched = Instruction::EMPTY;
        touched.set_fields((0, 4));
        let cells = vec![touched, Instruction::EMPTY];
        assert_eq!(empty_cells(&cells), 1);
        assert!(cells_owned(&cells).is_empty());
    }

    #[test]
    fn test_occupancy() {
        assert_eq!(occupancy(&[]), 0.0);
        let cells = vec![cell(0), Instruction::EMPTY, cell(2), Instruction::EMPTY];
        assert_eq!(occupancy(&cells), 0.5);
    }
}
