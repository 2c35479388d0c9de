pub mod config;
pub mod rom_loader;
pub mod super_breakout;

pub use config::{BoardConfig, DipSwitches};
pub use super_breakout::{SuperBreakoutBoard, SuperBreakoutSystem};
