//! iNES ROM container parsing.
//!
//! The iNES layout is a 16-byte header, an optional 512-byte trainer, the
//! PRG-ROM image and finally the CHR-ROM image:
//!
//! ```text
//! Byte 0-3: Magic "NES" followed by MS-DOS EOF (4E 45 53 1A)
//! Byte 4:   PRG-ROM size in 16KB units
//! Byte 5:   CHR-ROM size in 8KB units (0 means the cartridge has CHR-RAM)
//! Byte 6:   Flags: mirroring (bit 0), trainer (bit 2), four-screen (bit 3),
//!           mapper low nibble (bits 4-7)
//! Byte 7:   Flags: mapper high nibble (bits 4-7)
//! Byte 8-15: Padding (ignored)
//! ```

use crate::{Mirroring, CHR_SIZE, PRG_BANK_SIZE};

/// Errors from iNES parsing and mapper selection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RomError {
    /// The file does not begin with the iNES magic number.
    #[error("missing iNES signature: expected [4E 45 53 1A], got {0:02X?}")]
    BadSignature([u8; 4]),

    /// The file is shorter than the sizes declared in its header.
    #[error("ROM file truncated: expected {expected} bytes, got {actual}")]
    ShortRead {
        /// Total size implied by the header.
        expected: usize,
        /// Actual file size.
        actual: usize,
    },

    /// The header declares zero PRG-ROM banks.
    #[error("ROM declares no PRG-ROM")]
    EmptyProgramRom,

    /// The header names a mapper this crate does not implement.
    #[error("unsupported mapper {0}")]
    UnsupportedMapper(u8),
}

/// A parsed cartridge image. Immutable after load.
#[derive(Debug, Clone)]
pub struct Rom {
    /// PRG-ROM bytes; length is a multiple of 16KB and never zero.
    pub prg_rom: Vec<u8>,
    /// CHR data: ROM contents from the file, or 8KB of zeroed CHR-RAM.
    pub chr: Vec<u8>,
    /// True when `chr` is RAM (the header declared zero CHR-ROM banks).
    pub chr_is_ram: bool,
    /// Nametable arrangement.
    pub mirroring: Mirroring,
    /// iNES mapper number.
    pub mapper: u8,
}

impl Rom {
    /// iNES magic: "NES" plus MS-DOS EOF.
    const MAGIC: [u8; 4] = [0x4E, 0x45, 0x53, 0x1A];
    /// Header length.
    const HEADER_LEN: usize = 16;
    /// Trainer length when flag 6 bit 2 is set.
    const TRAINER_LEN: usize = 512;

    /// Parse an iNES image from raw file contents.
    ///
    /// # Errors
    ///
    /// Returns [`RomError::BadSignature`] when the magic is missing,
    /// [`RomError::ShortRead`] when the file is smaller than the header
    /// claims, and [`RomError::EmptyProgramRom`] when byte 4 is zero.
    pub fn parse(data: &[u8]) -> Result<Self, RomError> {
        if data.len() < Self::HEADER_LEN {
            return Err(RomError::ShortRead {
                expected: Self::HEADER_LEN,
                actual: data.len(),
            });
        }

        let magic = [data[0], data[1], data[2], data[3]];
        if magic != Self::MAGIC {
            return Err(RomError::BadSignature(magic));
        }

        let prg_size = usize::from(data[4]) * PRG_BANK_SIZE;
        let chr_size = usize::from(data[5]) * CHR_SIZE;
        if prg_size == 0 {
            return Err(RomError::EmptyProgramRom);
        }

        let flags6 = data[6];
        let flags7 = data[7];
        let has_trainer = flags6 & 0x04 != 0;
        let trainer_len = if has_trainer { Self::TRAINER_LEN } else { 0 };

        let expected = Self::HEADER_LEN + trainer_len + prg_size + chr_size;
        if data.len() < expected {
            return Err(RomError::ShortRead {
                expected,
                actual: data.len(),
            });
        }

        let mirroring = match (flags6 & 0x01) | ((flags6 & 0x08) >> 2) {
            0 => Mirroring::Horizontal,
            1 => Mirroring::Vertical,
            _ => Mirroring::FourScreen,
        };
        let mapper = (flags6 >> 4) | (flags7 & 0xF0);

        let prg_start = Self::HEADER_LEN + trainer_len;
        let chr_start = prg_start + prg_size;

        let chr_is_ram = chr_size == 0;
        let chr = if chr_is_ram {
            vec![0; CHR_SIZE]
        } else {
            data[chr_start..chr_start + chr_size].to_vec()
        };

        log::debug!(
            "loaded iNES image: mapper {mapper}, {}KB PRG, {}KB CHR{}, {mirroring:?} mirroring",
            prg_size / 1024,
            chr.len() / 1024,
            if chr_is_ram { " (RAM)" } else { "" },
        );

        Ok(Self {
            prg_rom: data[prg_start..chr_start].to_vec(),
            chr,
            chr_is_ram,
            mirroring,
            mapper,
        })
    }

    /// Number of 16KB PRG-ROM banks.
    #[must_use]
    pub fn prg_banks(&self) -> usize {
        self.prg_rom.len() / PRG_BANK_SIZE
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a minimal iNES image: `prg_banks` 16KB PRG banks (each filled
    /// with its bank index), `chr_banks` 8KB CHR banks, and the given
    /// flags-6 byte.
    pub(crate) fn build_rom(prg_banks: u8, chr_banks: u8, flags6: u8) -> Vec<u8> {
        let mut data = vec![0x4E, 0x45, 0x53, 0x1A, prg_banks, chr_banks, flags6, 0x00];
        data.resize(16, 0);
        for bank in 0..prg_banks {
            data.extend(std::iter::repeat(bank).take(PRG_BANK_SIZE));
        }
        data.extend(std::iter::repeat(0xCC).take(usize::from(chr_banks) * CHR_SIZE));
        data
    }

    #[test]
    fn parses_basic_header() {
        let rom = Rom::parse(&build_rom(2, 1, 0x01)).unwrap();
        assert_eq!(rom.prg_rom.len(), 2 * PRG_BANK_SIZE);
        assert_eq!(rom.chr.len(), CHR_SIZE);
        assert!(!rom.chr_is_ram);
        assert_eq!(rom.mirroring, Mirroring::Vertical);
        assert_eq!(rom.mapper, 0);
    }

    #[test]
    fn rejects_bad_signature() {
        let mut data = build_rom(1, 1, 0x00);
        data[3] = 0x00;
        assert!(matches!(
            Rom::parse(&data),
            Err(RomError::BadSignature([0x4E, 0x45, 0x53, 0x00]))
        ));
    }

    #[test]
    fn rejects_truncated_file() {
        let mut data = build_rom(2, 1, 0x00);
        data.truncate(data.len() - 1);
        let err = Rom::parse(&data).unwrap_err();
        assert!(matches!(err, RomError::ShortRead { .. }));
    }

    #[test]
    fn rejects_empty_prg() {
        let data = build_rom(0, 1, 0x00);
        assert_eq!(Rom::parse(&data).unwrap_err(), RomError::EmptyProgramRom);
    }

    #[test]
    fn zero_chr_banks_allocates_chr_ram() {
        let rom = Rom::parse(&build_rom(1, 0, 0x00)).unwrap();
        assert!(rom.chr_is_ram);
        assert_eq!(rom.chr.len(), CHR_SIZE);
        assert!(rom.chr.iter().all(|&b| b == 0));
    }

    #[test]
    fn trainer_is_skipped() {
        let mut data = vec![0x4E, 0x45, 0x53, 0x1A, 1, 0, 0x04, 0x00];
        data.resize(16, 0);
        data.extend(std::iter::repeat(0xEE).take(512)); // trainer
        data.extend(std::iter::repeat(0xAB).take(PRG_BANK_SIZE));
        let rom = Rom::parse(&data).unwrap();
        assert_eq!(rom.prg_rom[0], 0xAB);
    }

    #[test]
    fn mapper_number_spans_both_nibbles() {
        let mut data = build_rom(1, 0, 0x20); // low nibble 2
        data[7] = 0x10; // high nibble 1
        let rom = Rom::parse(&data).unwrap();
        assert_eq!(rom.mapper, 0x12);
    }

    #[test]
    fn four_screen_flag_wins_over_mirroring_bit() {
        let rom = Rom::parse(&build_rom(1, 0, 0x09)).unwrap();
        assert_eq!(rom.mirroring, Mirroring::FourScreen);
    }
}
