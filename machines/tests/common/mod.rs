#![allow(dead_code)]

use std::collections::VecDeque;

use sbrkout_core::core::bus::InterruptState;
use sbrkout_core::core::{Bus, BusMaster, BusMasterComponent, Component};
use sbrkout_core::cpu::Cpu;
use sbrkout_machines::rom_loader::RomSet;

// --- ScriptedCpu: replays bus operations and records each cycle ---

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BusOp {
    Read,
    Write,
    Internal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BusCycle {
    pub addr: u16,
    pub data: u8,
    pub op: BusOp,
}

/// One scripted bus cycle.
#[derive(Clone, Copy, Debug)]
pub enum Step {
    Read(u16),
    Write(u16, u8),
    Idle,
}

/// Stand-in for a 6502 core. Each cycle performs the next scripted step;
/// with the script exhausted it fetches sequentially from PC, like a CPU
/// running a sled of single-byte instructions.
pub struct ScriptedCpu {
    pub script: VecDeque<Step>,
    pub cycles: Vec<BusCycle>,
    pub interrupts: InterruptState,
    pub pc: u16,
    pub resets: u32,
    pub free_run: bool,
}

impl ScriptedCpu {
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            cycles: Vec::new(),
            interrupts: InterruptState::default(),
            pc: 0,
            resets: 0,
            free_run: true,
        }
    }

    /// A CPU that only does what it is scripted to do.
    pub fn idle() -> Self {
        Self {
            free_run: false,
            ..Self::new()
        }
    }

    pub fn push(&mut self, step: Step) {
        self.script.push_back(step);
    }

    pub fn idle_cycles(&mut self, n: usize) {
        for _ in 0..n {
            self.push(Step::Idle);
        }
    }

    pub fn writes(&self) -> impl Iterator<Item = &BusCycle> {
        self.cycles.iter().filter(|c| c.op == BusOp::Write)
    }
}

impl Component for ScriptedCpu {
    fn tick(&mut self) -> bool {
        false
    }
}

impl BusMasterComponent for ScriptedCpu {
    type Bus = dyn Bus<Address = u16, Data = u8>;

    fn tick_with_bus(&mut self, bus: &mut Self::Bus, master: BusMaster) -> bool {
        let step = match self.script.pop_front() {
            Some(step) => step,
            None if self.free_run => {
                let addr = self.pc;
                self.pc = self.pc.wrapping_add(1);
                Step::Read(addr)
            }
            None => Step::Idle,
        };
        let cycle = match step {
            Step::Read(addr) => BusCycle {
                addr,
                data: bus.read(master, addr),
                op: BusOp::Read,
            },
            Step::Write(addr, data) => {
                bus.write(master, addr, data);
                BusCycle {
                    addr,
                    data,
                    op: BusOp::Write,
                }
            }
            Step::Idle => BusCycle {
                addr: 0,
                data: 0,
                op: BusOp::Internal,
            },
        };
        self.cycles.push(cycle);
        true
    }
}

impl Cpu for ScriptedCpu {
    fn reset(&mut self) {
        self.resets += 1;
        self.script.clear();
        self.cycles.clear();
    }

    fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }

    fn pc(&self) -> u16 {
        self.pc
    }

    fn signal_interrupt(&mut self, int: InterruptState) {
        self.interrupts = int;
    }
}

/// A program ROM set filled with `fill`, reset vector pointing at `entry`.
pub fn rom_set_with_vector(fill: u8, entry: u16) -> RomSet {
    let c1 = vec![fill; 0x800];
    let d1 = vec![fill; 0x800];
    let mut e1 = vec![fill; 0x800];
    // 0xFFFC -> ROM offset 0x17FC -> e1 offset 0x7FC
    e1[0x7FC..0x7FE].copy_from_slice(&entry.to_le_bytes());
    RomSet::from_slices(&[("033453.c1", &c1), ("033454.d1", &d1), ("033455.e1", &e1)])
}
