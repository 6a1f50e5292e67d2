//! Background rasterisation.
//!
//! The visible image is a 512x480 logical plane made of four nametable
//! quadrants; the screen shows the 256x240 window at (scroll_x, scroll_y),
//! where the base nametable from $2000 decides which logical nametable
//! sits in each quadrant. One call renders the pixel row for a single
//! scanline by walking that window.

use crate::palette;
use crate::registers::{Ctrl, Mask};
use crate::vram::Vram;
use crate::{FRAME_WIDTH, PATTERN_SIZE};

/// Attribute area offset within a nametable.
const ATTRIBUTE_BASE: usize = 0x3C0;

/// Render the background pixels of one visible scanline into `frame`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn render_scanline(
    frame: &mut [u32],
    scanline: usize,
    chr: &[u8],
    vram: &Vram,
    ctrl: Ctrl,
    mask: Mask,
    scroll_x: u8,
    scroll_y: u8,
) {
    let world_y = scanline + usize::from(scroll_y);
    if world_y >= 480 {
        // The window has scrolled past the bottom of the logical plane.
        return;
    }
    let bottom = world_y >= 240;
    let quad_y = world_y % 240;
    let tile_y = quad_y / 8;
    let fine_y = quad_y % 8;

    let pattern_base = ctrl.background_pattern_base();
    let base_nametable = ctrl.base_nametable();
    let palette_ram = vram.palette_ram();
    let first_x = if mask.contains(Mask::BG_LEFT) { 0 } else { 8 };

    for x in first_x..FRAME_WIDTH {
        let world_x = x + usize::from(scroll_x);
        let right = world_x >= 256;
        let quad_x = world_x % 256;
        let tile_x = quad_x / 8;
        let fine_x = quad_x % 8;

        let quadrant = u8::from(right) | (u8::from(bottom) << 1);
        let nametable = vram.quadrant(base_nametable, quadrant);

        let tile = usize::from(nametable[tile_x + 32 * tile_y]);
        let pattern = pattern_base + PATTERN_SIZE * tile;
        let plane_lo = chr[pattern + fine_y];
        let plane_hi = chr[pattern + fine_y + 8];
        let bit = 7 - fine_x;
        let color_index = ((plane_lo >> bit) & 1) | (((plane_hi >> bit) & 1) << 1);

        let attribute = nametable[ATTRIBUTE_BASE + tile_x / 4 + 8 * (tile_y / 4)];
        let shift = 2 * ((tile_x / 2) & 1) + 4 * ((tile_y / 2) & 1);
        let palette_select = usize::from((attribute >> shift) & 0x03);

        // Color 0 of every background palette shows the backdrop entry.
        let color_value = if color_index == 0 {
            palette_ram[0]
        } else {
            palette_ram[4 * palette_select + usize::from(color_index)]
        };
        frame[x + FRAME_WIDTH * scanline] = palette::color(color_value);
    }
}
