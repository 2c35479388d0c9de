//! I/O port block: cabinet switches, DIP bank and the output latch.
//!
//! Switch pins are active-low on the board. [`Switches`] stores them
//! active-high and flips them only when the CPU reads the port.

use sbrkout_core::device::latch::AddressableLatch;

/// Cabinet switches, by bit position in the switch port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Switch {
    Slam = 0,
    Test = 1,
    Select2 = 2,
    Select1 = 3,
    Serve = 4,
    Start2 = 5,
    Start1 = 6,
    Coin = 7,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Switches {
    closed: u8,
}

impl Switches {
    pub fn set(&mut self, switch: Switch, closed: bool) {
        let mask = 1u8 << switch as u8;
        if closed {
            self.closed |= mask;
        } else {
            self.closed &= !mask;
        }
    }

    pub fn is_closed(&self, switch: Switch) -> bool {
        self.closed & (1 << switch as u8) != 0
    }

    /// The byte the CPU sees: a closed switch reads as 0.
    pub fn to_port_byte(self) -> u8 {
        !self.closed
    }
}

// Output latch bits
const LATCH_SERVE_LAMP: u8 = 1;
const LATCH_LAMP1: u8 = 3;
const LATCH_LAMP2: u8 = 4;
const LATCH_NMI_MASK: u8 = 5;
const LATCH_COIN_COUNTER: u8 = 7;

/// Lamp and counter drive levels, true = energized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoardOutputs {
    pub lamp1: bool,
    pub lamp2: bool,
    pub serve_lamp: bool,
    pub coin_counter: bool,
}

pub struct IoPorts {
    pub switches: Switches,
    pub dip: u8,
    latch: AddressableLatch,
    coin_pulses: u32,
}

impl IoPorts {
    pub fn new(dip: u8) -> Self {
        Self {
            switches: Switches::default(),
            dip,
            latch: AddressableLatch::new(),
            coin_pulses: 0,
        }
    }

    /// Clear the latch and the coin count. Switch levels and the DIP bank
    /// are physical and survive a reset.
    pub fn reset(&mut self) {
        self.latch.reset();
        self.coin_pulses = 0;
    }

    /// A write in the latch window: the address picks the bit and its level.
    pub fn write_latch(&mut self, addr: u16) {
        let bit = ((addr >> 4) & 7) as u8;
        let value = addr & 1 != 0;
        let prev = self.latch.write(bit, value);
        if bit == LATCH_COIN_COUNTER && value && !prev {
            self.coin_pulses += 1;
        }
    }

    pub fn nmi_masked(&self) -> bool {
        self.latch.q(LATCH_NMI_MASK)
    }

    pub fn latch_byte(&self) -> u8 {
        self.latch.outputs()
    }

    pub fn outputs(&self) -> BoardOutputs {
        BoardOutputs {
            lamp1: self.latch.q(LATCH_LAMP1),
            lamp2: self.latch.q(LATCH_LAMP2),
            // Driven through an inverter: lit while the latch bit is low
            serve_lamp: !self.latch.q(LATCH_SERVE_LAMP),
            coin_counter: self.latch.q(LATCH_COIN_COUNTER),
        }
    }

    /// Rising edges on the coin counter since reset.
    pub fn coin_counter_pulses(&self) -> u32 {
        self.coin_pulses
    }
}
