// APU behavior - length counters, frame IRQ, and $4015 through the bus

mod common;

use common::nes_with_program;
use famicore::apu::components::LENGTH_TABLE;
use famicore::emulator::Nes;

fn idle_nes() -> Nes {
    nes_with_program(&[0x4C, 0x00, 0xC0])
}

#[test]
fn length_counter_loads_clocks_and_clears() {
    let mut nes = idle_nes();

    nes.bus.write(0x4015, 0xFF);
    nes.bus.write(0x4003, 0x80); // length index 16
    let loaded = LENGTH_TABLE[16];

    assert_eq!(
        nes.bus.peek(0x4015) & 0x01,
        0x01,
        "pulse 1 reports active after the load"
    );

    nes.bus.apu.clock_half_frame();
    assert_eq!(nes.bus.apu.pulse1.length.counter(), loaded - 1);

    nes.bus.write(0x4015, 0x00);
    assert_eq!(nes.bus.apu.pulse1.length.counter(), 0);
    assert_eq!(nes.bus.peek(0x4015) & 0x01, 0, "disable reads back silent");
}

#[test]
fn frame_irq_reaches_the_cpu() {
    // Main: CLI, then spin. IRQ handler at $C100: acknowledge via $4015,
    // count the interrupt in $10, return.
    let mut program = vec![0u8; 0x106];
    program[0..4].copy_from_slice(&[0x58, 0x4C, 0x01, 0xC0]);
    program[0x100..0x106].copy_from_slice(&[
        0xAD, 0x15, 0x40, // LDA $4015 (acknowledge)
        0xE6, 0x10, //       INC $10
        0x40, //             RTI
    ]);
    let mut nes = nes_with_program(&program);

    // 4-step mode with IRQ allowed
    nes.bus.write(0x4017, 0x00);

    // Two frames comfortably cover a full 4-step sequence
    nes.step_frame();
    nes.step_frame();

    assert!(
        nes.bus.peek(0x0010) > 0,
        "the IRQ handler should have run at least once"
    );
}

#[test]
fn inhibited_frame_counter_never_interrupts() {
    let mut nes = nes_with_program(&[0x58, 0x4C, 0x01, 0xC0]);

    nes.bus.write(0x4017, 0x40); // inhibit set

    nes.step_frame();
    nes.step_frame();

    assert!(!nes.bus.apu.irq_pending());
    assert!(
        (0xC001..=0xC003).contains(&nes.cpu.pc),
        "CPU must stay in the spin loop, pc={:04X}",
        nes.cpu.pc
    );
}

#[test]
fn five_step_mode_never_interrupts() {
    let mut nes = nes_with_program(&[0x58, 0x4C, 0x01, 0xC0]);

    nes.bus.write(0x4017, 0x80); // 5-step, IRQ not inhibited explicitly

    nes.step_frame();
    nes.step_frame();

    assert!(!nes.bus.apu.irq_pending(), "5-step mode has no frame IRQ");
}

#[test]
fn status_read_acknowledges_frame_irq() {
    let mut nes = idle_nes();
    nes.bus.write(0x4017, 0x00);

    // Run CPU-side time until the sequencer completes a 4-step pass
    for _ in 0..(14916 * 2) {
        nes.bus.apu.clock();
    }
    assert!(nes.bus.apu.irq_pending());

    let status = nes.bus.read(0x4015);
    assert_eq!(status & 0x40, 0x40);
    assert!(!nes.bus.apu.irq_pending(), "the read acknowledged the IRQ");
}

#[test]
fn audio_queue_fills_at_sample_rate() {
    let mut nes = idle_nes();

    nes.step_frame();
    let samples = nes.send_samples();

    // One NTSC frame is ~1/60 s: about 735 samples at 44.1 kHz
    assert!(
        (700..=800).contains(&samples.len()),
        "unexpected sample count {}",
        samples.len()
    );

    nes.step_frame();
    let next = nes.send_samples();
    assert!((700..=800).contains(&next.len()));
}
