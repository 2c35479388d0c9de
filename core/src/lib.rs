//! Reusable pieces for the Super Breakout board: the CPU/bus seam, the
//! machine interface a driver talks to, and the small chips the board is
//! built from.

pub mod core;
pub mod cpu;
pub mod device;

pub mod prelude {
    pub use crate::core::machine::{InputButton, Machine};
    pub use crate::core::{Bus, BusMaster, BusMasterComponent, Component, bus::InterruptState};
    pub use crate::cpu::Cpu;
    pub use crate::device::{RasterGenerator, RasterPosition, RasterTiming};
}
