//! Operator configuration: the DIP switch bank and board options.
//!
//! The DIP bank is a single byte on the board. [`DipSwitches`] is its typed
//! form; every byte decodes to some setting, so conversion from a byte
//! never fails. [`BoardConfig`] adds the emulation-side options and can be
//! read from TOML:
//!
//! ```toml
//! watchdog = true
//! color_overlay = true
//! paddle_step_lines = 16
//! paddle_recenter = false
//!
//! [dip]
//! language = "german"
//! coinage = "one_coin_one_play"
//! balls = "five"
//! bonus = "at400"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    English,
    German,
    French,
    Spanish,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coinage {
    #[default]
    OneCoinOnePlay,
    OneCoinTwoPlays,
    TwoCoinsOnePlay,
    FreePlay,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BallCount {
    #[default]
    Three,
    Five,
}

impl BallCount {
    pub fn balls(self) -> u8 {
        match self {
            Self::Three => 3,
            Self::Five => 5,
        }
    }
}

/// Extended-play schedule. `At*` awards one extra ball at that score (in
/// hundreds of points); `Every*` keeps awarding at each multiple.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusSchedule {
    #[default]
    None,
    At200,
    At400,
    At600,
    At800,
    Every200,
    Every400,
    Every600,
}

impl BonusSchedule {
    const ALL: [Self; 8] = [
        Self::None,
        Self::At200,
        Self::At400,
        Self::At600,
        Self::At800,
        Self::Every200,
        Self::Every400,
        Self::Every600,
    ];

    /// Threshold score in points, or `None` when no bonus is awarded.
    pub fn threshold(self) -> Option<u32> {
        match self {
            Self::None => None,
            Self::At200 | Self::Every200 => Some(200),
            Self::At400 | Self::Every400 => Some(400),
            Self::At600 | Self::Every600 => Some(600),
            Self::At800 => Some(800),
        }
    }

    pub fn is_progressive(self) -> bool {
        matches!(self, Self::Every200 | Self::Every400 | Self::Every600)
    }
}

/// The DIP switch bank.
///
/// Byte layout: bits 0-1 language, bits 2-3 coinage, bit 4 ball count,
/// bits 5-7 bonus schedule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DipSwitches {
    pub language: Language,
    pub coinage: Coinage,
    pub balls: BallCount,
    pub bonus: BonusSchedule,
}

impl DipSwitches {
    pub fn from_byte(byte: u8) -> Self {
        let language = match byte & 0x03 {
            0 => Language::English,
            1 => Language::German,
            2 => Language::French,
            _ => Language::Spanish,
        };
        let coinage = match (byte >> 2) & 0x03 {
            0 => Coinage::OneCoinOnePlay,
            1 => Coinage::OneCoinTwoPlays,
            2 => Coinage::TwoCoinsOnePlay,
            _ => Coinage::FreePlay,
        };
        let balls = if byte & 0x10 != 0 {
            BallCount::Five
        } else {
            BallCount::Three
        };
        Self {
            language,
            coinage,
            balls,
            bonus: BonusSchedule::ALL[(byte >> 5) as usize],
        }
    }

    pub fn to_byte(self) -> u8 {
        let bonus = BonusSchedule::ALL
            .iter()
            .position(|&b| b == self.bonus)
            .unwrap_or(0) as u8;
        (self.language as u8)
            | ((self.coinage as u8) << 2)
            | ((self.balls as u8) << 4)
            | (bonus << 5)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read board config: {e}"),
            Self::Parse(e) => write!(f, "invalid board config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

/// Scanlines between paddle steps while a digital left/right input is held.
pub const DEFAULT_PADDLE_STEP_LINES: u16 = 16;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub dip: DipSwitches,
    /// Reset the board when the program stops restarting the watchdog.
    pub watchdog: bool,
    /// Tint the picture with the cabinet's color-band overlay.
    pub color_overlay: bool,
    pub paddle_step_lines: u16,
    /// Snap the paddle back to center at every VBLANK.
    pub paddle_recenter: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            dip: DipSwitches::default(),
            watchdog: true,
            color_overlay: true,
            paddle_step_lines: DEFAULT_PADDLE_STEP_LINES,
            paddle_recenter: false,
        }
    }
}

impl BoardConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_byte_round_trips() {
        for byte in 0..=255u8 {
            assert_eq!(DipSwitches::from_byte(byte).to_byte(), byte);
        }
    }

    #[test]
    fn factory_default_is_zero_byte() {
        assert_eq!(DipSwitches::default().to_byte(), 0x00);
        assert_eq!(DipSwitches::default().balls.balls(), 3);
    }

    #[test]
    fn toml_overrides_only_named_fields() {
        let cfg = BoardConfig::from_toml_str(
            r#"
            watchdog = false

            [dip]
            language = "french"
            balls = "five"
            bonus = "every400"
            "#,
        )
        .unwrap();
        assert!(!cfg.watchdog);
        assert!(cfg.color_overlay);
        assert_eq!(cfg.paddle_step_lines, DEFAULT_PADDLE_STEP_LINES);
        assert!(!cfg.paddle_recenter);
        assert_eq!(cfg.dip.language, Language::French);
        assert_eq!(cfg.dip.coinage, Coinage::OneCoinOnePlay);
        assert_eq!(cfg.dip.bonus.threshold(), Some(400));
        assert!(cfg.dip.bonus.is_progressive());
        assert_eq!(cfg.dip.to_byte(), 0b110_1_00_10);
    }

    #[test]
    fn unknown_variant_is_a_parse_error() {
        let err = BoardConfig::from_toml_str("[dip]\nlanguage = \"klingon\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
