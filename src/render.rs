//! Text rendering of the core's ownership map.

use std::fmt::Write;

use crate::instruction::Instruction;

const ANSI_RESET: &str = "\x1b[0m";

/// Background colours cycled through by program id.
const COLORS: [&str; 4] = [
    "\x1b[41m", // red
    "\x1b[44m", // blue
    "\x1b[43m", // yellow
    "\x1b[42m", // green
];

/// Render the core as rows of `width` cells.
///
/// Unowned cells print as `X`. Owned cells print as the owner's program id
/// (last digit), or as a coloured block when `color` is set.
pub fn render_core(cells: &[Instruction], width: usize, color: bool) -> String {
    let width = width.max(1);
    let mut out = String::new();
    for row in cells.chunks(width) {
        for cell in row {
            match cell.owner_program() {
                Some(id) if color => {
                    let _ = write!(out, "{} {} ", COLORS[id as usize % COLORS.len()], ANSI_RESET);
                }
                Some(id) => {
                    let _ = write!(out, "{} ", id % 10);
                }
                None => out.push_str("X "),
            }
        }
        out.push('\n');
    }
    out
}
