//! The assembled machine and its frame loop.

use crate::bus::NesBus;
use crate::CoreError;
use ferrones_apu::{Apu, ApuHandle};
use ferrones_cpu::{Cpu, TraceEntry};
use ferrones_mappers::{create_mapper, Mirroring as CartMirroring, Rom};
use ferrones_ppu::{Mirroring, Ppu};

/// CPU cycles consumed by the reset sequence.
const RESET_CYCLES: u32 = 7;

/// A complete NES: CPU plus the bus that owns everything else.
pub struct Console {
    cpu: Cpu,
    bus: NesBus,
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}

impl Console {
    /// Load an iNES image and power the machine on.
    ///
    /// # Errors
    ///
    /// Fails on malformed images, unsupported mappers, and four-screen
    /// cartridges.
    pub fn load(rom_data: &[u8]) -> Result<Self, CoreError> {
        let rom = Rom::parse(rom_data)?;
        let mapper = create_mapper(&rom)?;
        let mirroring = match rom.mirroring {
            CartMirroring::Horizontal => Mirroring::Horizontal,
            CartMirroring::Vertical => Mirroring::Vertical,
            CartMirroring::FourScreen => {
                return Err(CoreError::UnsupportedPpu(
                    "four-screen mirroring".to_string(),
                ))
            }
        };

        let ppu = Ppu::new(rom.chr, rom.chr_is_ram, mirroring);
        let mut bus = NesBus::new(ppu, Apu::new(), mapper);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        bus.tick(RESET_CYCLES);
        log::info!("console powered on (mapper {})", rom.mapper);

        Ok(Self { cpu, bus })
    }

    /// Execute one CPU instruction and propagate its cycles to the PPU.
    ///
    /// An NMI the PPU raises during this step is handed to the CPU
    /// afterwards, so it is taken at the start of the next instruction.
    ///
    /// # Errors
    ///
    /// Surfaces unknown opcodes and bus faults; both are fatal.
    pub fn step(&mut self) -> Result<u8, CoreError> {
        let cycles = self.cpu.step(&mut self.bus)?;
        self.bus.tick(u32::from(cycles));
        if let Some(fault) = self.bus.take_fault() {
            return Err(fault);
        }
        if self.bus.ppu.take_nmi() {
            self.cpu.trigger_nmi();
        }
        Ok(cycles)
    }

    /// Run instructions until the PPU publishes the next frame.
    ///
    /// # Errors
    ///
    /// Propagates any fatal error from [`step`](Self::step).
    pub fn step_frame(&mut self) -> Result<(), CoreError> {
        loop {
            self.step()?;
            if self.bus.ppu.take_frame_complete() {
                return Ok(());
            }
        }
    }

    /// Format the next instruction as a nestest-style trace line, or
    /// `None` when the byte at PC is not a dispatched opcode.
    pub fn trace_next(&mut self) -> Option<String> {
        let entry = TraceEntry::capture(&self.cpu, &mut self.bus)?;
        let scanline = self.bus.ppu.scanline();
        let dot = self.bus.ppu.dot();
        Some(entry.format(scanline, dot, self.bus.cycles()))
    }

    /// The published 256x240 framebuffer (0x00RRGGBB).
    #[must_use]
    pub fn framebuffer(&self) -> &[u32] {
        self.bus.ppu.framebuffer()
    }

    /// Update controller 1's button bitmap.
    pub fn set_buttons(&mut self, bitmap: u8) {
        self.bus.controller1.set_buttons(bitmap);
    }

    /// Parameter handles for the host's audio thread.
    #[must_use]
    pub fn audio_handle(&self) -> ApuHandle {
        self.bus.apu.handle()
    }

    /// Total CPU cycles charged since power-on.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.bus.cycles()
    }

    /// Force the program counter, bypassing the reset vector. Test ROMs
    /// with a headless automation entry point need this.
    pub fn force_pc(&mut self, pc: u16) {
        self.cpu.pc = pc;
    }

    /// The system bus, for hosts and tests that inspect component state.
    #[must_use]
    pub fn bus(&self) -> &NesBus {
        &self.bus
    }

    /// Mutable access to the system bus.
    pub fn bus_mut(&mut self) -> &mut NesBus {
        &mut self.bus
    }
}
