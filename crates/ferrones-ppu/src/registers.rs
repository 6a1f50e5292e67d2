//! The PPU's CPU-visible registers.
//!
//! ```text
//! $2000 PPUCTRL   (W)  frame configuration, NMI enable
//! $2001 PPUMASK   (W)  rendering switches
//! $2002 PPUSTATUS (R)  vblank / sprite flags; read clears vblank and w
//! ```
//!
//! The remaining registers ($2003-$2007) are address/data ports handled
//! directly by the [`crate::Ppu`] implementation.

use bitflags::bitflags;

bitflags! {
    /// Control register ($2000).
    ///
    /// ```text
    /// 7  6  5  4  3  2  1  0
    /// V  P  H  B  S  I  N  N
    /// │  │  │  │  │  │  └──┴─ Base nametable (0=$2000 1=$2400 2=$2800 3=$2C00)
    /// │  │  │  │  │  └─────── VRAM increment (0: add 1, 1: add 32)
    /// │  │  │  │  └────────── Sprite pattern table for 8x8 sprites
    /// │  │  │  └───────────── Background pattern table
    /// │  │  └──────────────── Sprite size (0: 8x8, 1: 8x16)
    /// │  └─────────────────── Master/slave select (unused here)
    /// └────────────────────── NMI at start of vblank
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Ctrl: u8 {
        /// Base nametable select, low bit.
        const NAMETABLE_LO = 1 << 0;
        /// Base nametable select, high bit.
        const NAMETABLE_HI = 1 << 1;
        /// VRAM address increment per $2007 access (0: 1, 1: 32).
        const VRAM_INCREMENT = 1 << 2;
        /// Pattern table for 8x8 sprites (0: $0000, 1: $1000).
        const SPRITE_PATTERN = 1 << 3;
        /// Pattern table for the background (0: $0000, 1: $1000).
        const BG_PATTERN = 1 << 4;
        /// Sprite size (0: 8x8, 1: 8x16).
        const SPRITE_SIZE = 1 << 5;
        /// Master/slave select; no effect in this implementation.
        const MASTER_SLAVE = 1 << 6;
        /// Generate an NMI when vblank begins.
        const NMI_ENABLE = 1 << 7;
    }
}

impl Ctrl {
    /// Base nametable index (0-3). The low bit contributes 256 to the
    /// effective x scroll, the high bit 240 to the y scroll.
    #[inline]
    #[must_use]
    pub const fn base_nametable(self) -> u8 {
        self.bits() & 0x03
    }

    /// VRAM address step applied after each $2007 access.
    #[inline]
    #[must_use]
    pub const fn vram_increment(self) -> u16 {
        if self.contains(Self::VRAM_INCREMENT) {
            32
        } else {
            1
        }
    }

    /// Pattern-table base for the background.
    #[inline]
    #[must_use]
    pub const fn background_pattern_base(self) -> usize {
        if self.contains(Self::BG_PATTERN) {
            0x1000
        } else {
            0x0000
        }
    }

    /// Pattern-table base for 8x8 sprites. Ignored in 8x16 mode, where
    /// bit 0 of the OAM tile byte selects the table instead.
    #[inline]
    #[must_use]
    pub const fn sprite_pattern_base(self) -> usize {
        if self.contains(Self::SPRITE_PATTERN) {
            0x1000
        } else {
            0x0000
        }
    }

    /// Sprite height in pixels (8 or 16).
    #[inline]
    #[must_use]
    pub const fn sprite_height(self) -> usize {
        if self.contains(Self::SPRITE_SIZE) {
            16
        } else {
            8
        }
    }
}

bitflags! {
    /// Mask register ($2001).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Mask: u8 {
        /// Grayscale: palette reads are ANDed with $30.
        const GRAYSCALE = 1 << 0;
        /// Show the background in the leftmost 8 pixels.
        const BG_LEFT = 1 << 1;
        /// Show sprites in the leftmost 8 pixels.
        const SPRITE_LEFT = 1 << 2;
        /// Render the background.
        const SHOW_BG = 1 << 3;
        /// Render sprites.
        const SHOW_SPRITES = 1 << 4;
        /// Emphasize red; no effect in this implementation.
        const EMPHASIZE_RED = 1 << 5;
        /// Emphasize green; no effect in this implementation.
        const EMPHASIZE_GREEN = 1 << 6;
        /// Emphasize blue; no effect in this implementation.
        const EMPHASIZE_BLUE = 1 << 7;
    }
}

bitflags! {
    /// Status register ($2002). Bits 0-4 read as zero.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Status: u8 {
        /// More than eight sprites were requested on one scanline.
        const SPRITE_OVERFLOW = 1 << 5;
        /// Sprite 0 overlapped opaque background output.
        const SPRITE_ZERO_HIT = 1 << 6;
        /// The PPU is in vertical blank.
        const VBLANK = 1 << 7;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_decodes_increment() {
        assert_eq!(Ctrl::empty().vram_increment(), 1);
        assert_eq!(Ctrl::VRAM_INCREMENT.vram_increment(), 32);
    }

    #[test]
    fn ctrl_decodes_pattern_bases() {
        assert_eq!(Ctrl::empty().background_pattern_base(), 0x0000);
        assert_eq!(Ctrl::BG_PATTERN.background_pattern_base(), 0x1000);
        assert_eq!(Ctrl::SPRITE_PATTERN.sprite_pattern_base(), 0x1000);
    }

    #[test]
    fn ctrl_decodes_nametable_and_size() {
        let ctrl = Ctrl::from_bits_truncate(0x03);
        assert_eq!(ctrl.base_nametable(), 3);
        assert_eq!(ctrl.sprite_height(), 8);
        assert_eq!(Ctrl::SPRITE_SIZE.sprite_height(), 16);
    }
}
