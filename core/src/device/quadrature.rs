//! Quadrature position decoding for rotary paddle controls.
//!
//! The decoder watches two phase-offset lines (A, B). A valid transition
//! moves one step along the Gray sequence `00 → 01 → 11 → 10 → 00`;
//! forward steps increment a bounded position, backward steps decrement it.
//! Transitions where both lines change at once carry no direction and are
//! dropped.

/// Gray-code phase order, indexed by step. Each entry is `(a, b)`.
const PHASES: [(bool, bool); 4] = [(false, false), (false, true), (true, true), (true, false)];

/// Direction of a transition from `prev` to `curr`, both packed as `(a << 1) | b`.
/// Index is `(prev << 2) | curr`.
const TRANSITION: [i8; 16] = [
    0, 1, -1, 0, // 00 -> 00, 01, 10, 11
    -1, 0, 0, 1, // 01 -> 00, 01, 10, 11
    1, 0, 0, -1, // 10 -> 00, 01, 10, 11
    0, -1, 1, 0, // 11 -> 00, 01, 10, 11
];

fn pack(a: bool, b: bool) -> u8 {
    (u8::from(a) << 1) | u8::from(b)
}

pub struct QuadratureDecoder {
    last: u8,
    position: u8,
    min: u8,
    max: u8,
    center: u8,
}

impl QuadratureDecoder {
    /// Create a decoder whose position is clamped to `min..=max` and starts at `center`.
    pub fn new(min: u8, max: u8, center: u8) -> Self {
        debug_assert!(min <= center && center <= max);
        Self {
            last: 0,
            position: center,
            min,
            max,
            center,
        }
    }

    /// Recenter the position and forget the last phase.
    pub fn reset(&mut self) {
        self.last = 0;
        self.position = self.center;
    }

    /// Sample the A/B lines. Returns the direction of the step taken:
    /// +1, -1, or 0 for no change / invalid transition.
    pub fn input(&mut self, a: bool, b: bool) -> i8 {
        let curr = pack(a, b);
        let delta = TRANSITION[((self.last << 2) | curr) as usize];
        self.last = curr;
        self.step(delta);
        delta
    }

    /// Move the position by `delta`, saturating at the travel limits.
    pub fn step(&mut self, delta: i8) {
        let next = (self.position as i16 + delta as i16).clamp(self.min as i16, self.max as i16);
        self.position = next as u8;
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    pub fn min(&self) -> u8 {
        self.min
    }
}

/// Produces A/B phase lines from a direction, one Gray step per call.
///
/// Used to drive a [`QuadratureDecoder`] from digital left/right inputs.
#[derive(Default)]
pub struct QuadratureEncoder {
    step: u8,
}

impl QuadratureEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.step = 0;
    }

    /// Take one step forward or backward and return the new `(a, b)` lines.
    pub fn advance(&mut self, forward: bool) -> (bool, bool) {
        self.step = if forward {
            (self.step + 1) & 3
        } else {
            self.step.wrapping_sub(1) & 3
        };
        self.outputs()
    }

    pub fn outputs(&self) -> (bool, bool) {
        PHASES[self.step as usize]
    }
}
