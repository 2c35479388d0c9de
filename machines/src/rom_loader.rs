//! ROM set loading for the board's program region.
//!
//! A [`RomSet`] is a bag of named files, read from an extracted MAME-style
//! directory or built from byte slices in tests. A [`RomRegion`] says which
//! files make up a contiguous region and where each one lands; loading
//! checks sizes and, when a file lists known checksums, its CRC-32.

use std::collections::HashMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// CRC-32
// ---------------------------------------------------------------------------

/// Reflected CRC-32 table (polynomial 0xEDB88320), the ZIP/MAME variant.
const CRC32_TABLE: [u32; 256] = {
    let mut table = [0u32; 256];
    let mut i = 0u32;
    while i < 256 {
        let mut crc = i;
        let mut j = 0;
        while j < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ 0xEDB8_8320
            } else {
                crc >> 1
            };
            j += 1;
        }
        table[i as usize] = crc;
        i += 1;
    }
    table
};

pub fn crc32(data: &[u8]) -> u32 {
    !data.iter().fold(0xFFFF_FFFF_u32, |crc, &byte| {
        (crc >> 8) ^ CRC32_TABLE[((crc ^ byte as u32) & 0xFF) as usize]
    })
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum RomLoadError {
    /// Reading the ROM directory or a file failed.
    Io(std::io::Error),

    /// A file the region needs is not in the set.
    MissingFile(String),

    SizeMismatch {
        file: String,
        expected: usize,
        actual: usize,
    },

    /// The file's CRC-32 is none of the known dumps.
    ChecksumMismatch {
        file: String,
        expected: u32,
        actual: u32,
    },
}

impl std::fmt::Display for RomLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::MissingFile(name) => write!(f, "missing ROM file: {name}"),
            Self::SizeMismatch {
                file,
                expected,
                actual,
            } => write!(f, "ROM {file}: expected {expected} bytes, got {actual}"),
            Self::ChecksumMismatch {
                file,
                expected,
                actual,
            } => write!(
                f,
                "ROM {file}: CRC32 expected 0x{expected:08X}, got 0x{actual:08X}"
            ),
        }
    }
}

impl std::error::Error for RomLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RomLoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// RomSet
// ---------------------------------------------------------------------------

pub struct RomSet {
    files: HashMap<String, Vec<u8>>,
}

impl RomSet {
    /// Read every regular file in `path` (non-recursive), keyed by file name.
    pub fn from_directory(path: &Path) -> Result<Self, RomLoadError> {
        let mut files = HashMap::new();
        for entry in std::fs::read_dir(path)? {
            let file_path = entry?.path();
            if !file_path.is_file() {
                continue;
            }
            let Some(name) = file_path.file_name() else {
                continue;
            };
            let name = name.to_string_lossy().into_owned();
            files.insert(name, std::fs::read(&file_path)?);
        }
        log::debug!("read {} ROM files from {}", files.len(), path.display());
        Ok(Self { files })
    }

    /// Build a set from `(file name, contents)` pairs.
    pub fn from_slices(entries: &[(&str, &[u8])]) -> Self {
        let files = entries
            .iter()
            .map(|(name, data)| ((*name).to_string(), data.to_vec()))
            .collect();
        Self { files }
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name).map(Vec::as_slice)
    }

    pub fn require(&self, name: &str) -> Result<&[u8], RomLoadError> {
        self.get(name)
            .ok_or_else(|| RomLoadError::MissingFile(name.to_string()))
    }

    pub fn require_sized(&self, name: &str, expected_size: usize) -> Result<&[u8], RomLoadError> {
        let data = self.require(name)?;
        if data.len() != expected_size {
            return Err(RomLoadError::SizeMismatch {
                file: name.to_string(),
                expected: expected_size,
                actual: data.len(),
            });
        }
        Ok(data)
    }

    pub fn file_names(&self) -> Vec<&str> {
        self.files.keys().map(String::as_str).collect()
    }
}

// ---------------------------------------------------------------------------
// RomEntry / RomRegion
// ---------------------------------------------------------------------------

/// One file of a region.
pub struct RomEntry {
    pub name: &'static str,
    pub size: usize,
    /// Byte offset of the file within the region.
    pub offset: usize,
    /// Accepted CRC-32 values (one per known dump). Empty: not checked.
    pub crc32: &'static [u32],
}

pub struct RomRegion {
    pub size: usize,
    pub entries: &'static [RomEntry],
}

impl RomRegion {
    /// Assemble the region, validating sizes and checksums.
    pub fn load(&self, rom_set: &RomSet) -> Result<Vec<u8>, RomLoadError> {
        self.load_inner(rom_set, true)
    }

    /// Assemble the region, validating sizes only (modified or homebrew ROMs).
    pub fn load_skip_checksums(&self, rom_set: &RomSet) -> Result<Vec<u8>, RomLoadError> {
        self.load_inner(rom_set, false)
    }

    fn load_inner(&self, rom_set: &RomSet, verify_checksums: bool) -> Result<Vec<u8>, RomLoadError> {
        let mut region = vec![0u8; self.size];

        for entry in self.entries {
            debug_assert!(
                entry.offset + entry.size <= self.size,
                "RomEntry '{}' exceeds region bounds",
                entry.name,
            );

            let data = rom_set.require_sized(entry.name, entry.size)?;

            if verify_checksums && !entry.crc32.is_empty() {
                let actual = crc32(data);
                if !entry.crc32.contains(&actual) {
                    return Err(RomLoadError::ChecksumMismatch {
                        file: entry.name.to_string(),
                        expected: entry.crc32[0],
                        actual,
                    });
                }
            }

            region[entry.offset..entry.offset + entry.size].copy_from_slice(data);
        }

        Ok(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc32_check_value() {
        // CRC-32 catalogue check value for "123456789"
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
        assert_eq!(crc32(&[]), 0);
    }

    #[test]
    fn require_reports_missing_and_wrong_size() {
        let rom_set = RomSet::from_slices(&[("c1.bin", &[0u8; 16])]);
        assert!(matches!(
            rom_set.require("d1.bin"),
            Err(RomLoadError::MissingFile(_))
        ));
        assert!(matches!(
            rom_set.require_sized("c1.bin", 32),
            Err(RomLoadError::SizeMismatch {
                expected: 32,
                actual: 16,
                ..
            })
        ));
    }

    static SPLIT: [RomEntry; 2] = [
        RomEntry {
            name: "lo.bin",
            size: 4,
            offset: 0,
            crc32: &[],
        },
        RomEntry {
            name: "hi.bin",
            size: 4,
            offset: 4,
            crc32: &[0x1234_5678],
        },
    ];

    #[test]
    fn region_places_files_at_offsets() {
        let region = RomRegion {
            size: 8,
            entries: &SPLIT,
        };
        let rom_set = RomSet::from_slices(&[("lo.bin", &[1, 2, 3, 4]), ("hi.bin", &[5, 6, 7, 8])]);
        assert!(matches!(
            region.load(&rom_set),
            Err(RomLoadError::ChecksumMismatch { .. })
        ));
        let loaded = region.load_skip_checksums(&rom_set).unwrap();
        assert_eq!(loaded, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn any_listed_checksum_is_accepted() {
        let data: &[u8] = &[0xA9, 0x00, 0x60, 0xEA];
        let good = crc32(data);
        let entries: &'static [RomEntry] = Box::leak(Box::new([RomEntry {
            name: "alt.bin",
            size: 4,
            offset: 0,
            crc32: Box::leak(Box::new([0xDEAD_BEEF, good])),
        }]));
        let region = RomRegion { size: 4, entries };
        let rom_set = RomSet::from_slices(&[("alt.bin", data)]);
        assert_eq!(region.load(&rom_set).unwrap(), data);
    }

    #[test]
    fn from_directory_reads_files() {
        let dir = std::env::temp_dir().join("sbrkout_rom_loader_test");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("033453.c1"), [0xAA, 0xBB]).unwrap();

        let rom_set = RomSet::from_directory(&dir).unwrap();
        assert_eq!(rom_set.get("033453.c1"), Some(&[0xAA, 0xBB][..]));
        assert_eq!(rom_set.file_names(), vec!["033453.c1"]);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
