//! Ball motion and collision engine.
//!
//! Clocked once per scanline at the start of horizontal blank. Every
//! fourth scanline it moves each enabled ball one velocity step, resolving
//! the vertical axis before the horizontal one:
//!
//! - vertical: top wall, paddle, bottom (miss), brick
//! - horizontal: left/right walls, brick
//!
//! Ball slots are processed 0, 1, 2 in order, each against the display
//! memory as the previous slot left it. All state lives in display memory,
//! so the CPU can read and steer balls between steps.

use sbrkout_core::device::raster::RasterPosition;

use super::display_memory::{
    BALL_ENABLE, BALL_H, BALL_SLOTS, BALL_V, BALL_VEL, DisplayMemory, HIT, MAX_SPEED, MISS,
    cell_at,
};

pub const BALL_SIZE: i16 = 2;
pub const FIELD_WIDTH: i16 = 256;
pub const FIELD_HEIGHT: i16 = 224;
pub const PADDLE_HEIGHT: u16 = 4;

/// Balls move on scanlines where `v % MOTION_LINE_DIVIDE == 0`.
pub const MOTION_LINE_DIVIDE: u16 = 4;

pub const SERVE_H: u8 = 0x80;
pub const SERVE_V: u8 = 0x70;
/// dx = +1, dy = +1
pub const SERVE_VELOCITY: u8 = 0x11;

/// Horizontal speed after a paddle hit, by quarter of the paddle struck.
const PADDLE_ENGLISH: [i8; 4] = [-2, -1, 1, 2];

/// What a motion step did, summed over all ball slots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MotionEvents {
    /// At least one wall, paddle or brick collision.
    pub tone_trigger: bool,
    pub bricks_cleared: u8,
    pub paddle_hits: u8,
    /// Slots that left through the bottom, bit n = slot n.
    pub misses: u8,
}

/// The paddle's collision window on the current step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaddleWindow {
    pub left: i16,
    pub width: i16,
    pub row: i16,
}

impl PaddleWindow {
    pub fn new(position: u8, width: u8, row: u8) -> Self {
        Self {
            left: paddle_left(position, width),
            width: width as i16,
            row: row as i16,
        }
    }

    /// Does a ball moving down from `y` to `ny` land on the paddle?
    fn catches(&self, x: i16, y: i16, ny: i16) -> bool {
        self.width > 0
            && y + BALL_SIZE <= self.row
            && ny + BALL_SIZE > self.row
            && x + BALL_SIZE > self.left
            && x < self.left + self.width
    }

    /// Horizontal velocity from where the ball's center struck.
    fn english(&self, x: i16) -> i8 {
        let offset = (x + BALL_SIZE / 2 - self.left).clamp(0, self.width - 1);
        let zone = ((offset * 4) / self.width).min(3);
        PADDLE_ENGLISH[zone as usize]
    }
}

/// Left edge of the paddle: the decoder position scaled onto the free travel.
pub fn paddle_left(position: u8, width: u8) -> i16 {
    let travel = i32::from(FIELD_WIDTH - i16::from(width));
    ((i32::from(position) * travel) / 255) as i16
}

fn reverse(speed: i8) -> i8 {
    (-speed).min(MAX_SPEED)
}

#[derive(Default)]
pub struct MotionEngine {
    serve_prev: bool,
}

impl MotionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// `serve_held` is the serve switch level at reset; a button held
    /// through reset must be released before it serves again.
    pub fn reset(&mut self, serve_held: bool) {
        self.serve_prev = serve_held;
    }

    /// Scanline clock. Moves the balls on motion lines, otherwise does nothing.
    pub fn clock_scanline(&mut self, mem: &mut DisplayMemory, v: u16, paddle_position: u8) -> MotionEvents {
        if !v.is_multiple_of(MOTION_LINE_DIVIDE) {
            return MotionEvents::default();
        }
        self.step(mem, paddle_position)
    }

    /// One motion step for all three slots.
    pub fn step(&mut self, mem: &mut DisplayMemory, paddle_position: u8) -> MotionEvents {
        let paddle = PaddleWindow::new(paddle_position, mem.paddle_width(), mem.paddle_row());
        let mut events = MotionEvents::default();
        for slot in 0..BALL_SLOTS {
            step_ball(mem, slot, paddle, &mut events);
        }
        events
    }

    /// Sample the serve input. On a rising edge with no ball in play, slot 0
    /// is launched from the serve position. Returns true if a ball was served.
    pub fn serve(&mut self, mem: &mut DisplayMemory, pressed: bool) -> bool {
        let rising = pressed && !self.serve_prev;
        self.serve_prev = pressed;
        if !rising || mem.any_ball_enabled() {
            return false;
        }
        mem.write(BALL_H[0], SERVE_H);
        mem.write(BALL_V[0], SERVE_V);
        mem.write(BALL_VEL[0], SERVE_VELOCITY);
        mem.latch_flags(BALL_ENABLE, 0x01);
        log::debug!("ball served at ({SERVE_H:#04X}, {SERVE_V:#04X})");
        true
    }

    /// Is any enabled ball drawn at this raster position?
    pub fn ball_at(mem: &DisplayMemory, pos: RasterPosition) -> bool {
        (0..BALL_SLOTS).any(|slot| {
            let ball = mem.ball(slot);
            ball.enabled
                && (ball.x as u16..ball.x as u16 + BALL_SIZE as u16).contains(&pos.h)
                && (ball.y as u16..ball.y as u16 + BALL_SIZE as u16).contains(&pos.v)
        })
    }

    /// Is the paddle drawn at this raster position?
    pub fn paddle_at(mem: &DisplayMemory, pos: RasterPosition, paddle_position: u8) -> bool {
        let width = mem.paddle_width();
        if width == 0 {
            return false;
        }
        let row = mem.paddle_row() as u16;
        let left = paddle_left(paddle_position, width) as u16;
        (row..row + PADDLE_HEIGHT).contains(&pos.v) && (left..left + width as u16).contains(&pos.h)
    }
}

fn step_ball(mem: &mut DisplayMemory, slot: usize, paddle: PaddleWindow, events: &mut MotionEvents) {
    let mut ball = mem.ball(slot);
    if !ball.enabled {
        return;
    }
    let (x, y) = (ball.x as i16, ball.y as i16);
    let slot_bit = 1u8 << slot;

    // Vertical axis
    let mut ny = y + ball.dy as i16;
    if ball.dy < 0 && ny < 0 {
        ball.dy = reverse(ball.dy);
        ny = 0;
        events.tone_trigger = true;
    } else if ball.dy > 0 && paddle.catches(x, y, ny) {
        ball.dy = -ball.dy.abs();
        ball.dx = paddle.english(x);
        ny = paddle.row - BALL_SIZE;
        mem.latch_flags(HIT, slot_bit << 4);
        events.paddle_hits += 1;
        events.tone_trigger = true;
    } else if ball.dy > 0 && ny > FIELD_HEIGHT - BALL_SIZE {
        ball.enabled = false;
        mem.set_ball(slot, ball);
        mem.latch_flags(MISS, slot_bit);
        events.misses |= slot_bit;
        log::debug!("ball {slot} missed");
        return;
    } else if ball.dy != 0 {
        let lead = if ball.dy > 0 { ny + BALL_SIZE - 1 } else { ny };
        if let Some((row, col)) = cell_at(x + BALL_SIZE / 2, lead)
            && mem.brick(row, col)
        {
            mem.clear_brick(row, col);
            mem.latch_flags(HIT, slot_bit);
            ball.dy = reverse(ball.dy);
            ny = y;
            events.bricks_cleared += 1;
            events.tone_trigger = true;
        }
    }

    // Horizontal axis
    let mut nx = x + ball.dx as i16;
    if ball.dx < 0 && nx < 0 {
        ball.dx = reverse(ball.dx);
        nx = 0;
        events.tone_trigger = true;
    } else if ball.dx > 0 && nx > FIELD_WIDTH - BALL_SIZE {
        ball.dx = reverse(ball.dx);
        nx = FIELD_WIDTH - BALL_SIZE;
        events.tone_trigger = true;
    } else if ball.dx != 0 {
        let lead = if ball.dx > 0 { nx + BALL_SIZE - 1 } else { nx };
        if let Some((row, col)) = cell_at(lead, ny + BALL_SIZE / 2)
            && mem.brick(row, col)
        {
            mem.clear_brick(row, col);
            mem.latch_flags(HIT, slot_bit);
            ball.dx = reverse(ball.dx);
            nx = x;
            events.bricks_cleared += 1;
            events.tone_trigger = true;
        }
    }

    ball.x = nx as u8;
    ball.y = ny as u8;
    mem.set_ball(slot, ball);
}
