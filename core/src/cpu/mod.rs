//! The seam between a board and the processor that runs its program.
//!
//! Boards never emulate instructions themselves. Any 6502-compatible core
//! plugs in by implementing [`Cpu`]; the board hands itself over as the
//! [`Bus`](crate::core::Bus) once per CPU cycle.

use crate::core::bus::InterruptState;
use crate::core::component::BusMasterComponent;

/// Generic CPU interface
pub trait Cpu: BusMasterComponent {
    /// Return to the power-on state (registers, internal sequencing).
    fn reset(&mut self);

    /// Load the program counter, e.g. with the word fetched from the reset vector.
    fn set_pc(&mut self, pc: u16);

    /// Current program counter.
    fn pc(&self) -> u16;

    /// Present the board's interrupt lines before the next cycle.
    fn signal_interrupt(&mut self, int: InterruptState);
}
