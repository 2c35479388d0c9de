//! The 1 KB display memory shared by the CPU, playfield renderer, motion
//! engine and tone generator.
//!
//! Layout (10-bit offset):
//!   0x000-0x37F  Playfield, 28 rows x 32 columns of 8x8 cells, bit 7 = brick
//!   0x390/2/4    Ball horizontal position (left pixel), balls 0-2
//!   0x391        Tone select (low nibble)
//!   0x398/A/C    Ball vertical position (top scanline), balls 0-2
//!   0x3A0-0x3A2  Ball velocity: dx in the high nibble, dy in the low nibble
//!   0x3A4        Ball enable, bits 0-2
//!   0x3A5        Hit latch: bits 0-2 brick, bits 4-6 paddle
//!   0x3A6        Miss latch: bits 0-2
//!   0x3A8        Paddle top scanline
//!   0x3A9        Paddle width in pixels (0 = no paddle)
//! Everything else is scratch for the program.

pub const DISPLAY_MEMORY_SIZE: usize = 0x400;

pub const PLAYFIELD_COLUMNS: usize = 32;
pub const PLAYFIELD_ROWS: usize = 28;
pub const CELL_SIZE: i16 = 8;
pub const BRICK_BIT: u8 = 0x80;

pub const BALL_SLOTS: usize = 3;
pub const BALL_H: [u16; BALL_SLOTS] = [0x390, 0x392, 0x394];
pub const TONE: u16 = 0x391;
pub const BALL_V: [u16; BALL_SLOTS] = [0x398, 0x39A, 0x39C];
pub const BALL_VEL: [u16; BALL_SLOTS] = [0x3A0, 0x3A1, 0x3A2];
pub const BALL_ENABLE: u16 = 0x3A4;
pub const HIT: u16 = 0x3A5;
pub const MISS: u16 = 0x3A6;
pub const PADDLE_ROW: u16 = 0x3A8;
pub const PADDLE_WIDTH: u16 = 0x3A9;

/// Largest speed a 4-bit signed velocity field can hold in both directions.
pub const MAX_SPEED: i8 = 7;

/// Typed view of one ball slot's registers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BallState {
    pub x: u8,
    pub y: u8,
    pub dx: i8,
    pub dy: i8,
    pub enabled: bool,
}

impl BallState {
    fn velocity_byte(&self) -> u8 {
        ((self.dx as u8 & 0x0F) << 4) | (self.dy as u8 & 0x0F)
    }
}

/// Sign-extend a 4-bit two's complement nibble.
fn nibble_to_i8(nibble: u8) -> i8 {
    ((nibble << 4) as i8) >> 4
}

/// Cell containing pixel `(x, y)`, or `None` outside the playfield.
pub fn cell_at(x: i16, y: i16) -> Option<(usize, usize)> {
    if x < 0 || y < 0 {
        return None;
    }
    let (col, row) = ((x / CELL_SIZE) as usize, (y / CELL_SIZE) as usize);
    (col < PLAYFIELD_COLUMNS && row < PLAYFIELD_ROWS).then_some((row, col))
}

pub struct DisplayMemory {
    bytes: [u8; DISPLAY_MEMORY_SIZE],
}

impl Default for DisplayMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayMemory {
    pub fn new() -> Self {
        Self {
            bytes: [0; DISPLAY_MEMORY_SIZE],
        }
    }

    pub fn reset(&mut self) {
        self.bytes.fill(0);
    }

    pub fn read(&self, offset: u16) -> u8 {
        self.bytes[offset as usize & (DISPLAY_MEMORY_SIZE - 1)]
    }

    pub fn write(&mut self, offset: u16, data: u8) {
        self.bytes[offset as usize & (DISPLAY_MEMORY_SIZE - 1)] = data;
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    // -- Playfield ---------------------------------------------------------

    pub fn brick(&self, row: usize, col: usize) -> bool {
        self.bytes[row * PLAYFIELD_COLUMNS + col] & BRICK_BIT != 0
    }

    /// Clear the brick bit only; the program's bits 0-6 survive.
    pub fn clear_brick(&mut self, row: usize, col: usize) {
        self.bytes[row * PLAYFIELD_COLUMNS + col] &= !BRICK_BIT;
    }

    pub fn brick_count(&self) -> usize {
        self.bytes[..PLAYFIELD_ROWS * PLAYFIELD_COLUMNS]
            .iter()
            .filter(|&&cell| cell & BRICK_BIT != 0)
            .count()
    }

    // -- Motion registers --------------------------------------------------

    pub fn ball(&self, slot: usize) -> BallState {
        let vel = self.read(BALL_VEL[slot]);
        BallState {
            x: self.read(BALL_H[slot]),
            y: self.read(BALL_V[slot]),
            dx: nibble_to_i8(vel >> 4),
            dy: nibble_to_i8(vel & 0x0F),
            enabled: self.read(BALL_ENABLE) & (1 << slot) != 0,
        }
    }

    pub fn set_ball(&mut self, slot: usize, ball: BallState) {
        self.write(BALL_H[slot], ball.x);
        self.write(BALL_V[slot], ball.y);
        self.write(BALL_VEL[slot], ball.velocity_byte());
        let enable = self.read(BALL_ENABLE);
        let mask = 1u8 << slot;
        self.write(
            BALL_ENABLE,
            if ball.enabled { enable | mask } else { enable & !mask },
        );
    }

    pub fn any_ball_enabled(&self) -> bool {
        self.read(BALL_ENABLE) & 0x07 != 0
    }

    /// OR `mask` into a sticky status register (HIT or MISS).
    pub fn latch_flags(&mut self, reg: u16, mask: u8) {
        let value = self.read(reg) | mask;
        self.write(reg, value);
    }

    pub fn tone_select(&self) -> u8 {
        self.read(TONE) & 0x0F
    }

    pub fn paddle_row(&self) -> u8 {
        self.read(PADDLE_ROW)
    }

    pub fn paddle_width(&self) -> u8 {
        self.read(PADDLE_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_nibbles_are_signed() {
        assert_eq!(nibble_to_i8(0x7), 7);
        assert_eq!(nibble_to_i8(0x8), -8);
        assert_eq!(nibble_to_i8(0xF), -1);

        let mut mem = DisplayMemory::new();
        mem.write(BALL_VEL[1], 0xE2);
        let ball = mem.ball(1);
        assert_eq!((ball.dx, ball.dy), (-2, 2));
    }

    #[test]
    fn set_ball_touches_only_its_enable_bit() {
        let mut mem = DisplayMemory::new();
        mem.write(BALL_ENABLE, 0x05);
        let mut ball = mem.ball(2);
        ball.enabled = false;
        ball.dx = -1;
        ball.dy = 3;
        mem.set_ball(2, ball);
        assert_eq!(mem.read(BALL_ENABLE), 0x01);
        assert_eq!(mem.read(BALL_VEL[2]), 0xF3);
    }

    #[test]
    fn cell_lookup_respects_playfield_bounds() {
        assert_eq!(cell_at(0, 0), Some((0, 0)));
        assert_eq!(cell_at(255, 223), Some((27, 31)));
        assert_eq!(cell_at(256, 0), None);
        assert_eq!(cell_at(0, 224), None);
        assert_eq!(cell_at(-1, 5), None);
    }
}
