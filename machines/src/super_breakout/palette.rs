//! Color overlay. The monitor is black and white; the cabinet tints it with
//! horizontal strips of colored film.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorBand {
    /// First pixel column of the band.
    pub h_start: u16,
    /// One past the last pixel column.
    pub h_end: u16,
    pub rgb: (u8, u8, u8),
}

const fn band(h_start: u16, h_end: u16, rgb: (u8, u8, u8)) -> ColorBand {
    ColorBand { h_start, h_end, rgb }
}

pub const COLOR_BANDS: [ColorBand; 8] = [
    band(0, 16, (0, 114, 255)),
    band(16, 48, (0, 255, 0)),
    band(48, 80, (255, 255, 0)),
    band(80, 112, (255, 128, 0)),
    band(112, 144, (255, 0, 0)),
    band(144, 176, (0, 255, 255)),
    band(176, 208, (0, 114, 255)),
    band(208, 256, (255, 255, 255)),
];

pub const WHITE: (u8, u8, u8) = (255, 255, 255);

/// Overlay color at column `h`, or `None` outside the visible width.
pub fn band_color(h: u16) -> Option<(u8, u8, u8)> {
    COLOR_BANDS
        .iter()
        .find(|b| (b.h_start..b.h_end).contains(&h))
        .map(|b| b.rgb)
}
