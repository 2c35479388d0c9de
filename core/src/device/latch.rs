//! 8-bit addressable latch (9334 / 74LS259 family).
//!
//! Three address lines pick one of eight outputs and the data line sets or
//! clears it; the other seven outputs hold. Boards decode the address and
//! data from CPU address bits, so a single write touches a single output.

#[derive(Default)]
pub struct AddressableLatch {
    q: u8,
}

impl AddressableLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all outputs (the latch's /CLR input).
    pub fn reset(&mut self) {
        self.q = 0;
    }

    /// Drive output `bit` (0-7) to `value`. Returns the previous level of that output.
    pub fn write(&mut self, bit: u8, value: bool) -> bool {
        let mask = 1u8 << (bit & 7);
        let prev = self.q & mask != 0;
        if value {
            self.q |= mask;
        } else {
            self.q &= !mask;
        }
        prev
    }

    pub fn q(&self, bit: u8) -> bool {
        self.q & (1 << (bit & 7)) != 0
    }

    /// All eight outputs, Q0 in bit 0.
    pub fn outputs(&self) -> u8 {
        self.q
    }
}
