// OAM DMA - suspension length and transfer integrity at console level

mod common;

use common::{nes_with_program, run_instructions};

/// Program: fill nothing, just trigger DMA from page $02 and then spin
const DMA_PROGRAM: &[u8] = &[
    0xA9, 0x02, // LDA #$02
    0x8D, 0x14, 0x40, // STA $4014
    0x4C, 0x05, 0xC0, // JMP (hold)
];

#[test]
fn dma_transfers_the_full_page_into_oam() {
    let mut nes = nes_with_program(DMA_PROGRAM);

    // Source page $0200-$02FF with a recognizable ramp
    for i in 0..256u16 {
        nes.bus.write(0x0200 + i, (i as u8).wrapping_mul(3));
    }
    nes.bus.ppu.write_register(3, 0x37); // oam_addr must survive

    run_instructions(&mut nes, 2); // LDA + STA trigger the DMA

    // Run the console until the engine releases the CPU
    let mut guard = 0;
    while nes.bus.dma_active() {
        nes.clock();
        guard += 1;
        assert!(guard < 10_000, "DMA must terminate");
    }

    for i in 0..=255u8 {
        assert_eq!(
            nes.bus.ppu.read_oam(i),
            i.wrapping_mul(3),
            "OAM byte {} mismatches",
            i
        );
    }
    assert_eq!(
        nes.bus.ppu.oam_addr(),
        0x37,
        "oam_addr must match its pre-DMA value"
    );
}

#[test]
fn cpu_does_not_execute_during_dma() {
    let mut nes = nes_with_program(DMA_PROGRAM);
    run_instructions(&mut nes, 2);
    assert!(nes.bus.dma_active());

    let cycles_at_suspend = nes.cpu.total_cycles;
    let pc_at_suspend = nes.cpu.pc;

    let mut cpu_slots = 0u64;
    while nes.bus.dma_active() {
        let before = nes.clock_count();
        nes.clock();
        // Count the CPU-rate slots spent inside DMA
        if before % 3 == 0 {
            cpu_slots += 1;
        }
    }

    assert_eq!(
        nes.cpu.total_cycles, cycles_at_suspend,
        "no instruction may retire while DMA runs"
    );
    assert_eq!(nes.cpu.pc, pc_at_suspend);
    assert!(
        cpu_slots == 513 || cpu_slots == 514,
        "DMA stole {} CPU cycles",
        cpu_slots
    );
}

#[test]
fn cpu_resumes_after_dma() {
    let mut nes = nes_with_program(DMA_PROGRAM);
    run_instructions(&mut nes, 2);

    while nes.bus.dma_active() {
        nes.clock();
    }

    let cycles_after_dma = nes.cpu.total_cycles;
    run_instructions(&mut nes, 1); // the JMP
    assert!(nes.cpu.total_cycles > cycles_after_dma);
    assert_eq!(nes.cpu.pc, 0xC005, "the hold loop continues after DMA");
}
