use super::bus::BusMaster;

/// Something clocked: a counter, a chip, a processor.
pub trait Component {
    /// One clock in the component's own domain. Returns true on the
    /// component's notable edge (VBLANK for the raster, end of instruction
    /// for a CPU).
    fn tick(&mut self) -> bool;
}

/// A component that drives the bus while it is clocked.
pub trait BusMasterComponent: Component {
    type Bus: super::bus::Bus + ?Sized;

    /// One clock with the bus attached. At most one read or write happens.
    fn tick_with_bus(&mut self, bus: &mut Self::Bus, master_id: BusMaster) -> bool;
}
