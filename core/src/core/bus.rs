/// Identifies who is driving the bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusMaster {
    Cpu(usize), // CPU 0 is the only processor on the boards here
    Loader,     // External ROM loader; may write regions the CPU cannot
}

/// Generic bus interface. One call is one bus cycle; nothing is queued.
pub trait Bus {
    type Address: Copy + Into<u64>; // u16 for 8-bit CPUs
    type Data; // u8

    fn read(&mut self, master: BusMaster, addr: Self::Address) -> Self::Data;
    fn write(&mut self, master: BusMaster, addr: Self::Address, data: Self::Data);

    /// Returns true if the master must pause before the next bus cycle
    /// (RDY held low). Boards without DMA never halt.
    fn is_halted_for(&self, master: BusMaster) -> bool;

    /// Current interrupt lines as seen by `target`.
    fn check_interrupts(&self, target: BusMaster) -> InterruptState;
}

/// Level of each interrupt input. NMI is edge-triggered inside the 6502,
/// so boards hold it as a level and the CPU detects the rising edge.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct InterruptState {
    pub nmi: bool,
    pub irq: bool,
}
