//! Shared helpers for building synthetic test cartridges.

/// Build a 32KB NROM image with `program` at $8000, an NMI handler at
/// $9000 that increments $0010 and returns, and vectors pointing at both.
#[must_use]
pub fn nrom_with_program(program: &[u8]) -> Vec<u8> {
    let mut prg = vec![0u8; 32 * 1024];
    prg[..program.len()].copy_from_slice(program);

    // NMI handler: INC $10; RTI.
    prg[0x1000] = 0xE6;
    prg[0x1001] = 0x10;
    prg[0x1002] = 0x40;

    // Vectors: NMI $9000, RESET $8000, IRQ $8000.
    prg[0x7FFA] = 0x00;
    prg[0x7FFB] = 0x90;
    prg[0x7FFC] = 0x00;
    prg[0x7FFD] = 0x80;
    prg[0x7FFE] = 0x00;
    prg[0x7FFF] = 0x80;

    let mut image = vec![0x4E, 0x45, 0x53, 0x1A, 2, 1, 0x00, 0x00];
    image.resize(16, 0);
    image.extend_from_slice(&prg);
    image.extend(std::iter::repeat(0u8).take(8 * 1024)); // CHR
    image
}
