//! Playfield renderer: one "brick present" bit per pixel.

use sbrkout_core::device::raster::{RasterPosition, RasterTiming};

use super::display_memory::{DisplayMemory, cell_at};

/// True when the raster is inside the visible window and the 8x8 cell
/// under it has its brick bit set. Reads only.
pub fn brick_at(mem: &DisplayMemory, pos: RasterPosition, timing: &RasterTiming) -> bool {
    if !pos.is_active(timing) {
        return false;
    }
    cell_at(pos.h as i16, pos.v as i16).is_some_and(|(row, col)| mem.brick(row, col))
}
