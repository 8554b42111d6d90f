use crate::instruction::{Instruction, ProgramId};

/// One loaded program: its code template plus the processes executing it.
///
/// Processes are instruction pointers scheduled round-robin within the
/// group. Pointers are kept as raw addresses and only reduced modulo the
/// core length when the core is accessed.
#[derive(Clone, Debug)]
pub struct ProgramGroup {
    id: ProgramId,
    code: Vec<Instruction>,
    processes: Vec<i64>,
    cur_process: usize,
    /// Index of the process handed out by the last `next_process_pointer`.
    last_process: usize,
    alive: bool,
}

impl ProgramGroup {
    /// A live group with a single process at `spawn_loc`.
    pub fn new(id: ProgramId, code: Vec<Instruction>, spawn_loc: i64) -> Self {
        Self {
            id,
            code,
            processes: vec![spawn_loc],
            cur_process: 0,
            last_process: 0,
            alive: true,
        }
    }

    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn code(&self) -> &[Instruction] {
        &self.code
    }

    pub fn processes(&self) -> &[i64] {
        &self.processes
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Fetch-then-advance: return the current process's pointer, bump it by
    /// one, and rotate to the next process.
    pub fn next_process_pointer(&mut self) -> i64 {
        let idx = self.cur_process;
        let ptr = self.processes[idx];
        self.processes[idx] = ptr.wrapping_add(1);
        self.last_process = idx;
        self.cur_process = (idx + 1) % self.processes.len();
        ptr
    }

    /// Redirect the process returned by the preceding `next_process_pointer`.
    pub fn jump_cur_process(&mut self, new_loc: i64) {
        self.processes[self.last_process] = new_loc;
    }

    /// Insert a new process at `loc` immediately after the process returned
    /// by the preceding `next_process_pointer`. It runs when the rotation
    /// reaches its slot.
    pub fn split(&mut self, loc: i64) {
        // cur_process is either `last_process + 1` (now the new slot) or 0
        // after wrapping, so it never needs shifting.
        self.processes.insert(self.last_process + 1, loc);
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(loc: i64) -> ProgramGroup {
        ProgramGroup::new(0, vec![Instruction::data().owned_by(0, 0)], loc)
    }

    #[test]
    fn test_new_group_has_one_process() {
        let g = group(7);
        assert!(g.is_alive());
        assert_eq!(g.processes(), &[7]);
        assert_eq!(g.code().len(), 1);
    }

    #[test]
    fn test_next_pointer_is_sequential() {
        let mut g = group(7);
        assert_eq!(g.next_process_pointer(), 7);
        assert_eq!(g.next_process_pointer(), 8);
        assert_eq!(g.next_process_pointer(), 9);
    }

    #[test]
    fn test_next_pointer_wraps_at_i64_max() {
        let mut g = group(i64::MAX);
        assert_eq!(g.next_process_pointer(), i64::MAX);
        assert_eq!(g.next_process_pointer(), i64::MIN);
    }

    #[test]
    fn test_jump_redirects_last_process() {
        let mut g = group(10);
        assert_eq!(g.next_process_pointer(), 10);
        g.jump_cur_process(8);
        assert_eq!(g.next_process_pointer(), 8);
    }

    #[test]
    fn test_kill_is_permanent() {
        let mut g = group(0);
        g.kill();
        assert!(!g.is_alive());
        g.next_process_pointer();
        assert!(!g.is_alive());
    }

    #[test]
    fn test_split_runs_new_process_next() {
        let mut g = group(0);
        assert_eq!(g.next_process_pointer(), 0);
        g.split(50);
        assert_eq!(g.processes(), &[1, 50]);
        assert_eq!(g.next_process_pointer(), 1);
        assert_eq!(g.next_process_pointer(), 50);
        assert_eq!(g.next_process_pointer(), 2);
    }

    #[test]
    fn test_split_inserts_after_current() {
        let mut g = group(0);
        g.next_process_pointer();
        g.split(100);
        // [1, 100]; run process 0, which splits again.
        assert_eq!(g.next_process_pointer(), 1);
        g.split(200);
        assert_eq!(g.processes(), &[2, 200, 100]);
        assert_eq!(g.next_process_pointer(), 200);
        assert_eq!(g.next_process_pointer(), 100);
        assert_eq!(g.next_process_pointer(), 2);
    }

    #[test]
    fn test_jump_with_many_processes_hits_the_right_one() {
        let mut g = group(0);
        g.next_process_pointer();
        g.split(100);
        // Processes [1, 100]; run the second one and jump it.
        assert_eq!(g.next_process_pointer(), 1);
        assert_eq!(g.next_process_pointer(), 100);
        g.jump_cur_process(40);
        assert_eq!(g.processes(), &[2, 40]);
    }
}
