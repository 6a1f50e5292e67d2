//! The CPU-visible system bus.
//!
//! ```text
//! $0000-$1FFF  2KB internal RAM, mirrored every $0800
//! $2000-$3FFF  eight PPU registers, mirrored every 8 bytes
//! $4000-$4013  APU channel registers
//! $4014        OAM DMA trigger (value = source page)
//! $4015        APU status (unmodelled: writes ignored, reads 0)
//! $4016        controller port 1 (read) / strobe for both pads (write)
//! $4017        controller port 2 / frame counter (reads 0 here)
//! $4020-$7FFF  unmapped; any access is a fatal fault
//! $8000-$FFFF  cartridge PRG windows via the mapper
//! ```
//!
//! The bus also owns the shared CPU cycle counter: [`NesBus::tick`] is
//! the single point where cycles are added, and it advances the PPU by
//! three dots per cycle, which keeps the 3:1 ratio exact by construction.
//!
//! The CPU-facing [`Bus`] trait deals in plain bytes, so faults from
//! mid-instruction accesses (unmapped ranges) are latched here and
//! surfaced by the console after the instruction finishes.

use crate::input::Controller;
use crate::CoreError;
use ferrones_apu::Apu;
use ferrones_cpu::Bus;
use ferrones_mappers::Mapper;
use ferrones_ppu::Ppu;

/// Memory-mapped router between the CPU and every other component.
pub struct NesBus {
    /// 2KB internal RAM.
    ram: [u8; 0x0800],
    /// Picture processing unit.
    pub ppu: Ppu,
    /// Audio processing unit.
    pub apu: Apu,
    /// Cartridge PRG banking.
    mapper: Box<dyn Mapper>,
    /// Controller port 1.
    pub controller1: Controller,
    /// Controller port 2.
    pub controller2: Controller,
    /// Shared CPU cycle counter; all accounting funnels through `tick`.
    cycles: u64,
    /// First fatal fault raised by a CPU-driven access, if any.
    fault: Option<CoreError>,
}

impl NesBus {
    /// Assemble a bus around the console's components.
    #[must_use]
    pub fn new(ppu: Ppu, apu: Apu, mapper: Box<dyn Mapper>) -> Self {
        Self {
            ram: [0; 0x0800],
            ppu,
            apu,
            mapper,
            controller1: Controller::new(),
            controller2: Controller::new(),
            cycles: 0,
            fault: None,
        }
    }

    /// Charge CPU cycles and advance the PPU by three dots each.
    pub fn tick(&mut self, cycles: u32) {
        self.cycles += u64::from(cycles);
        self.ppu.tick(cycles * 3);
    }

    /// Total CPU cycles charged so far.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Take the first fault latched since the last call.
    pub fn take_fault(&mut self) -> Option<CoreError> {
        self.fault.take()
    }

    /// Direct RAM view, for inspection by hosts and tests.
    #[must_use]
    pub fn ram(&self) -> &[u8] {
        &self.ram
    }

    fn latch_fault(&mut self, error: CoreError) {
        if self.fault.is_none() {
            log::error!("bus fault: {error}");
            self.fault = Some(error);
        }
    }

    /// OAM DMA: copy 256 bytes from `page << 8` into OAM through the
    /// $2004 write path, charging one or two alignment cycles (by cycle
    /// parity) plus two cycles per byte.
    fn oam_dma(&mut self, page: u8) {
        let align: u32 = if self.cycles % 2 == 0 { 1 } else { 2 };
        let base = u16::from(page) << 8;
        for offset in 0..256 {
            let value = self.read(base + offset);
            self.ppu.write_oam_dma(value);
        }
        self.tick(align + 512);
    }
}

impl Bus for NesBus {
    fn read(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram[usize::from(addr & 0x07FF)],
            0x2000..=0x3FFF => self.ppu.read_register(addr & 0x0007),
            // Channel registers and the DMA port are write-only.
            0x4000..=0x4014 => 0,
            // APU status is unmodelled.
            0x4015 => 0,
            0x4016 => self.controller1.read(),
            // Port 2 is not wired to anything in this core.
            0x4017 => 0,
            // Disabled APU/IO test registers.
            0x4018..=0x401F => 0,
            0x4020..=0x7FFF => {
                self.latch_fault(CoreError::UnsupportedAddress(addr));
                0
            }
            0x8000..=0xBFFF => self.mapper.read_low(addr),
            0xC000..=0xFFFF => self.mapper.read_high(addr),
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram[usize::from(addr & 0x07FF)] = value,
            0x2000..=0x3FFF => self.ppu.write_register(addr & 0x0007, value),
            0x4000..=0x4013 => self.apu.write_register(addr, value),
            0x4014 => self.oam_dma(value),
            // APU status and the frame counter are unmodelled.
            0x4015 | 0x4017 => {}
            // One strobe line feeds both pads.
            0x4016 => {
                self.controller1.write(value);
                self.controller2.write(value);
            }
            0x4018..=0x401F => {}
            0x4020..=0x7FFF => self.latch_fault(CoreError::UnsupportedAddress(addr)),
            0x8000..=0xFFFF => self.mapper.write(addr, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrones_mappers::{create_mapper, Mirroring as RomMirroring, Rom};
    use ferrones_ppu::Mirroring;

    /// Build a bus over a synthetic cartridge. `mapper2` selects UxROM
    /// with eight PRG banks, each filled with its own bank index.
    fn test_bus(mapper2: bool) -> NesBus {
        let (prg_banks, chr_banks, flags6) = if mapper2 { (8, 0, 0x20) } else { (2, 1, 0x00) };
        let mut data = vec![0x4E, 0x45, 0x53, 0x1A, prg_banks, chr_banks, flags6, 0x00];
        data.resize(16, 0);
        for bank in 0..prg_banks {
            data.extend(std::iter::repeat(bank).take(16 * 1024));
        }
        data.extend(std::iter::repeat(0u8).take(usize::from(chr_banks) * 8 * 1024));

        let rom = Rom::parse(&data).unwrap();
        assert_eq!(rom.mirroring, RomMirroring::Horizontal);
        let mapper = create_mapper(&rom).unwrap();
        let ppu = Ppu::new(rom.chr, rom.chr_is_ram, Mirroring::Horizontal);
        NesBus::new(ppu, Apu::new(), mapper)
    }

    #[test]
    fn ram_mirrors_every_0800() {
        let mut bus = test_bus(false);
        bus.write(0x0123, 0xAB);
        assert_eq!(bus.read(0x0123), 0xAB);
        assert_eq!(bus.read(0x0923), 0xAB);
        assert_eq!(bus.read(0x1123), 0xAB);
        assert_eq!(bus.read(0x1923), 0xAB);

        bus.write(0x1FFF, 0xCD);
        assert_eq!(bus.read(0x07FF), 0xCD);
    }

    #[test]
    fn ppu_registers_mirror_every_eight_bytes() {
        let mut bus = test_bus(false);
        // Set the VRAM address through the $2006 mirror at $3FF6 and
        // write data through the mirror at $200F.
        bus.write(0x3FF6, 0x21);
        bus.write(0x3FF6, 0x00);
        bus.write(0x200F, 0x77);

        bus.write(0x2006, 0x21);
        bus.write(0x2006, 0x00);
        bus.read(0x2007); // prime the buffer
        assert_eq!(bus.read(0x2007), 0x77);
    }

    #[test]
    fn tick_keeps_the_three_to_one_ratio() {
        let mut bus = test_bus(false);
        bus.tick(7);
        bus.tick(100);
        bus.tick(1);
        let dots = bus.ppu.scanline() * 341 + bus.ppu.dot();
        assert_eq!(u64::from(dots), 3 * bus.cycles());
    }

    #[test]
    fn oam_dma_copies_a_page_and_charges_cycles() {
        let mut bus = test_bus(false);
        for i in 0..256u16 {
            bus.write(0x0300 + i, i as u8);
        }

        // Even cycle count: 513 cycles.
        assert_eq!(bus.cycles() % 2, 0);
        bus.write(0x4014, 0x03);
        assert_eq!(bus.cycles(), 513);

        // OAM now holds the page, observable through $2004.
        bus.write(0x2003, 0x00);
        for i in 0..4u16 {
            bus.write(0x2003, i as u8);
            assert_eq!(bus.read(0x2004), i as u8);
        }
        bus.write(0x2003, 0xFF);
        assert_eq!(bus.read(0x2004), 0xFF);

        // The counter now sits at 513 (odd), so the next DMA takes 514.
        let before = bus.cycles();
        bus.write(0x4014, 0x03);
        assert_eq!(bus.cycles() - before, 514);
    }

    #[test]
    fn controller_port_shifts_the_strobed_bitmap() {
        let mut bus = test_bus(false);
        bus.controller1.set_buttons(0xA5);
        bus.write(0x4016, 1);
        bus.write(0x4016, 0);

        let bits: Vec<u8> = (0..8).map(|_| bus.read(0x4016)).collect();
        assert_eq!(bits, vec![1, 0, 1, 0, 0, 1, 0, 1]);
        assert_eq!(bus.read(0x4016), 1);
    }

    #[test]
    fn port_two_reads_zero() {
        let mut bus = test_bus(false);
        bus.controller2.set_buttons(0xFF);
        bus.write(0x4016, 1);
        bus.write(0x4016, 0);
        assert_eq!(bus.read(0x4017), 0);
    }

    #[test]
    fn apu_status_reads_zero_and_ignores_writes() {
        let mut bus = test_bus(false);
        bus.write(0x4015, 0x1F);
        assert_eq!(bus.read(0x4015), 0);
        assert!(bus.take_fault().is_none());
    }

    #[test]
    fn unmapped_range_latches_a_fault() {
        let mut bus = test_bus(false);
        assert_eq!(bus.read(0x5000), 0);
        assert!(matches!(
            bus.take_fault(),
            Some(CoreError::UnsupportedAddress(0x5000))
        ));
        assert!(bus.take_fault().is_none());

        bus.write(0x6000, 0x12);
        assert!(matches!(
            bus.take_fault(),
            Some(CoreError::UnsupportedAddress(0x6000))
        ));
    }

    #[test]
    fn first_fault_wins() {
        let mut bus = test_bus(false);
        bus.read(0x4020);
        bus.read(0x7FFF);
        assert!(matches!(
            bus.take_fault(),
            Some(CoreError::UnsupportedAddress(0x4020))
        ));
    }

    #[test]
    fn cartridge_window_reads_through_the_mapper() {
        let mut bus = test_bus(false);
        assert_eq!(bus.read(0x8000), 0);
        assert_eq!(bus.read(0xC000), 1);
    }

    #[test]
    fn uxrom_bank_select_through_the_bus() {
        let mut bus = test_bus(true);
        assert_eq!(bus.read(0x8000), 0);
        assert_eq!(bus.read(0xC000), 7, "high window pinned to last bank");

        bus.write(0x8000, 0x01);
        assert_eq!(bus.read(0x8000), 1);
        bus.write(0x8000, 0xFF);
        assert_eq!(bus.read(0x8000), 7, "selection clamps to the last bank");
        assert_eq!(bus.read(0xC000), 7);
    }

    #[test]
    fn apu_registers_reach_the_channels() {
        let mut bus = test_bus(false);
        let handle = bus.apu.handle();
        bus.write(0x4000, 0x8F);
        assert_eq!(handle.square1.duty(), 0.5);
        assert_eq!(handle.square1.volume(), 1.0);
        assert_eq!(bus.read(0x4000), 0, "channel registers are write-only");
    }
}
