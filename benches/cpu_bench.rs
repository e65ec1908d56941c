// CPU benchmark - instruction throughput on a tight arithmetic loop

use criterion::{criterion_group, criterion_main, Criterion};
use famicore::bus::Bus;
use famicore::cpu::Cpu;

/// Program: a mix of loads, arithmetic, and a backward branch
fn setup() -> (Cpu, Bus) {
    let mut cpu = Cpu::new();
    let mut bus = Bus::new();

    let program: &[u8] = &[
        0xA9, 0x10, // LDA #$10
        0x69, 0x01, // ADC #$01
        0x85, 0x20, // STA $20
        0xA6, 0x20, // LDX $20
        0xE8, // INX
        0xC8, // INY
        0x4C, 0x00, 0x02, // JMP $0200
    ];
    for (i, &byte) in program.iter().enumerate() {
        bus.write(0x0200 + i as u16, byte);
    }
    cpu.pc = 0x0200;

    (cpu, bus)
}

fn cpu_throughput(c: &mut Criterion) {
    c.bench_function("cpu_10k_instructions", |b| {
        b.iter(|| {
            let (mut cpu, mut bus) = setup();
            for _ in 0..10_000 {
                cpu.step(&mut bus);
            }
            std::hint::black_box(cpu.total_cycles)
        })
    });
}

criterion_group!(benches, cpu_throughput);
criterion_main!(benches);
