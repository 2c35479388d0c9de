//! Raster timing generator.
//!
//! Two free-running counters (horizontal pixel, vertical line) clocked by
//! the pixel clock. Sync and blanking are pure functions of the counters
//! against a fixed set of thresholds, so they are recomputed every tick and
//! carry no state of their own.

use crate::core::component::Component;

/// Periods and thresholds of one raster format, in pixel clocks and lines.
///
/// Every `*_end` value is exclusive: a signal is asserted for
/// `start <= count < end`. Blanking runs from the end of the active region
/// to the end of the period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RasterTiming {
    pub h_total: u16,
    pub h_active: u16,
    pub h_sync_start: u16,
    pub h_sync_end: u16,
    pub v_total: u16,
    pub v_active: u16,
    pub v_sync_start: u16,
    pub v_sync_end: u16,
}

impl RasterTiming {
    /// Pixel clocks in one complete frame.
    pub const fn ticks_per_frame(&self) -> u32 {
        self.h_total as u32 * self.v_total as u32
    }

    /// Derive the sync/blank lines for a raster position.
    pub fn signals(&self, pos: RasterPosition) -> SyncSignals {
        let h_blank = pos.h >= self.h_active;
        let v_blank = pos.v >= self.v_active;
        let h_sync = (self.h_sync_start..self.h_sync_end).contains(&pos.h);
        let v_sync = (self.v_sync_start..self.v_sync_end).contains(&pos.v);
        SyncSignals {
            h_sync,
            v_sync,
            h_blank,
            v_blank,
            composite_blank: h_blank || v_blank,
            // Exclusive-OR composite: hsync pulses invert during vsync
            composite_sync: h_sync != v_sync,
        }
    }
}

/// Current scan position. `h` is the pixel within the line, `v` the line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RasterPosition {
    pub h: u16,
    pub v: u16,
}

impl RasterPosition {
    /// True inside the visible (non-blanked) window.
    pub fn is_active(&self, timing: &RasterTiming) -> bool {
        self.h < timing.h_active && self.v < timing.v_active
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncSignals {
    pub h_sync: bool,
    pub v_sync: bool,
    pub h_blank: bool,
    pub v_blank: bool,
    pub composite_blank: bool,
    pub composite_sync: bool,
}

/// One-tick pulses produced by [`RasterGenerator::advance_tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RasterEvents {
    /// The counters just became `h = 0`.
    pub line_start: bool,
    /// The counters just became `(0, 0)`.
    pub frame_start: bool,
    /// The counters just became `(0, v_active)`: the first tick of vertical blank.
    pub vblank_edge: bool,
}

pub struct RasterGenerator {
    timing: RasterTiming,
    pos: RasterPosition,
    sync: SyncSignals,
}

impl RasterGenerator {
    pub fn new(timing: RasterTiming) -> Self {
        Self {
            timing,
            pos: RasterPosition::default(),
            sync: timing.signals(RasterPosition::default()),
        }
    }

    /// Return both counters to zero.
    pub fn reset(&mut self) {
        self.pos = RasterPosition::default();
        self.sync = self.timing.signals(self.pos);
    }

    /// Advance one pixel clock.
    pub fn advance_tick(&mut self) -> RasterEvents {
        let mut events = RasterEvents::default();

        self.pos.h += 1;
        if self.pos.h >= self.timing.h_total {
            self.pos.h = 0;
            self.pos.v += 1;
            events.line_start = true;
            if self.pos.v >= self.timing.v_total {
                self.pos.v = 0;
                events.frame_start = true;
            }
            events.vblank_edge = self.pos.v == self.timing.v_active;
        }

        self.sync = self.timing.signals(self.pos);
        events
    }

    pub fn position(&self) -> RasterPosition {
        self.pos
    }

    pub fn sync(&self) -> SyncSignals {
        self.sync
    }

    pub fn timing(&self) -> &RasterTiming {
        &self.timing
    }

    pub fn in_active_window(&self) -> bool {
        self.pos.is_active(&self.timing)
    }
}

impl Component for RasterGenerator {
    /// Significant event: the VBlank edge.
    fn tick(&mut self) -> bool {
        self.advance_tick().vblank_edge
    }
}
