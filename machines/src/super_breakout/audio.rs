//! Tone synthesizer.
//!
//! The board's discrete sound circuit is a square wave gated by vertical
//! counter bits, shaped by a decaying envelope. Here it is a table lookup
//! sampled once per scanline: the tone-select nibble picks both which vCount
//! bits gate the wave and the envelope's amplitude and length.

/// One sample per scanline: 6.048 MHz / 384.
pub const AUDIO_SAMPLE_RATE: u32 = 15_750;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToneRecipe {
    pub amplitude: i16,
    /// Envelope length in scanlines.
    pub decay_lines: u16,
}

const fn recipe(amplitude: i16, decay_lines: u16) -> ToneRecipe {
    ToneRecipe {
        amplitude,
        decay_lines,
    }
}

/// Indexed by tone select. Select 0 is silence.
pub const TONE_TABLE: [ToneRecipe; 16] = [
    recipe(0, 0),
    recipe(6000, 120),
    recipe(6000, 160),
    recipe(6500, 200),
    recipe(6500, 240),
    recipe(6500, 320),
    recipe(7000, 400),
    recipe(7000, 480),
    recipe(7000, 630),
    recipe(7000, 945),
    recipe(7500, 1260),
    recipe(7500, 1575),
    recipe(8000, 1890),
    recipe(8000, 2205),
    recipe(8000, 2520),
    recipe(8000, 3150),
];

#[derive(Default)]
pub struct ToneSynth {
    select: u8,
    remaining: u16,
    samples: Vec<i16>,
}

impl ToneSynth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.select = 0;
        self.remaining = 0;
        self.samples.clear();
    }

    /// Latch `select` and restart the envelope. A running tone is cut off,
    /// never mixed with the new one.
    pub fn trigger(&mut self, select: u8) {
        self.select = select & 0x0F;
        self.remaining = TONE_TABLE[self.select as usize].decay_lines;
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    /// Produce the sample for scanline `v` and advance the envelope.
    pub fn sample(&self, v: u16) -> i16 {
        if self.remaining == 0 {
            return 0;
        }
        let recipe = TONE_TABLE[self.select as usize];
        let level = (i32::from(recipe.amplitude) * i32::from(self.remaining)
            / i32::from(recipe.decay_lines)) as i16;
        let phase = u16::from(self.select) & (v >> 2) != 0;
        if phase { level } else { -level }
    }

    /// Scanline clock: emit one sample into the buffer.
    pub fn clock(&mut self, v: u16) {
        let sample = self.sample(v);
        self.samples.push(sample);
        self.remaining = self.remaining.saturating_sub(1);
    }

    /// Take every sample produced since the last drain.
    pub fn drain(&mut self) -> Vec<i16> {
        std::mem::take(&mut self.samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_until_triggered() {
        let mut synth = ToneSynth::new();
        for v in 0..10 {
            synth.clock(v);
        }
        assert!(synth.drain().iter().all(|&s| s == 0));
    }

    #[test]
    fn select_zero_is_silent() {
        let mut synth = ToneSynth::new();
        synth.trigger(0);
        assert!(!synth.is_active());
        synth.clock(4);
        assert_eq!(synth.drain(), vec![0]);
    }

    #[test]
    fn envelope_decays_to_zero() {
        let mut synth = ToneSynth::new();
        synth.trigger(1);
        // Select 1 gates on vCount bit 2: v = 4..8 is the high phase
        synth.clock(4);
        synth.clock(0);
        let samples = synth.drain();
        assert_eq!(samples[0], 6000);
        // 6000 * 119 / 120
        assert_eq!(samples[1], -5950);

        for v in 0..118 {
            synth.clock(v);
        }
        assert!(!synth.is_active());
        synth.clock(4);
        assert_eq!(synth.drain().last(), Some(&0));
    }

    #[test]
    fn retrigger_restarts_envelope() {
        let mut synth = ToneSynth::new();
        synth.trigger(15);
        for v in 0..100 {
            synth.clock(v);
        }
        synth.drain();
        synth.trigger(2);
        synth.clock(8);
        assert_eq!(synth.drain(), vec![6000]);
    }

    #[test]
    fn select_keeps_only_low_nibble() {
        let mut synth = ToneSynth::new();
        synth.trigger(0xF1);
        synth.clock(4);
        assert_eq!(synth.drain(), vec![6000]);
    }
}
