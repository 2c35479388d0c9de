pub mod latch;
pub mod quadrature;
pub mod raster;

pub use latch::AddressableLatch;
pub use quadrature::{QuadratureDecoder, QuadratureEncoder};
pub use raster::{RasterEvents, RasterGenerator, RasterPosition, RasterTiming, SyncSignals};
