// Instruction set - decode tables and executor for all 256 opcodes
//
// Decoding uses three parallel 256-entry tables (operation, addressing
// mode, base cycles) assembled into an `OpcodeInfo` on fetch. Illegal
// slots carry operation `ILL` and execute as no-ops at their table cycle
// cost; the stable undocumented opcodes (LAX SAX DCP ISC SLO RLA SRE RRA
// and the wide NOPs) are implemented for real.

use crate::bus::Bus;
use crate::cpu::addressing::{AddressingMode, AddressingResult};
use crate::cpu::flags;

/// Operations, documented and undocumented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Operation {
    // illegal slot
    ILL,
    // load and store
    LDA, LDX, LDY, STA, STX, STY,
    // transfer
    TAX, TAY, TSX, TXA, TXS, TYA,
    // stack
    PHA, PHP, PLA, PLP,
    // shift
    ASL, LSR, ROL, ROR,
    // logic
    AND, EOR, ORA, BIT,
    // arithmetic
    ADC, SBC, CMP, CPX, CPY,
    // increment and decrement
    INC, INX, INY, DEC, DEX, DEY,
    // control
    JMP, JSR, BRK, RTI, RTS,
    // branch
    BCC, BCS, BEQ, BMI, BNE, BPL, BVC, BVS,
    // flag
    CLC, CLD, CLI, CLV, SEC, SED, SEI,
    // undocumented
    LAX, SAX, DCP, ISC, SLO, RLA, SRE, RRA,
    // no op
    NOP,
}

impl Operation {
    /// Three-letter mnemonic for disassembly; illegal slots print "???"
    pub fn mnemonic(self) -> &'static str {
        match self {
            Operation::ILL => "???",
            Operation::LDA => "LDA", Operation::LDX => "LDX", Operation::LDY => "LDY",
            Operation::STA => "STA", Operation::STX => "STX", Operation::STY => "STY",
            Operation::TAX => "TAX", Operation::TAY => "TAY", Operation::TSX => "TSX",
            Operation::TXA => "TXA", Operation::TXS => "TXS", Operation::TYA => "TYA",
            Operation::PHA => "PHA", Operation::PHP => "PHP", Operation::PLA => "PLA",
            Operation::PLP => "PLP",
            Operation::ASL => "ASL", Operation::LSR => "LSR", Operation::ROL => "ROL",
            Operation::ROR => "ROR",
            Operation::AND => "AND", Operation::EOR => "EOR", Operation::ORA => "ORA",
            Operation::BIT => "BIT",
            Operation::ADC => "ADC", Operation::SBC => "SBC", Operation::CMP => "CMP",
            Operation::CPX => "CPX", Operation::CPY => "CPY",
            Operation::INC => "INC", Operation::INX => "INX", Operation::INY => "INY",
            Operation::DEC => "DEC", Operation::DEX => "DEX", Operation::DEY => "DEY",
            Operation::JMP => "JMP", Operation::JSR => "JSR", Operation::BRK => "BRK",
            Operation::RTI => "RTI", Operation::RTS => "RTS",
            Operation::BCC => "BCC", Operation::BCS => "BCS", Operation::BEQ => "BEQ",
            Operation::BMI => "BMI", Operation::BNE => "BNE", Operation::BPL => "BPL",
            Operation::BVC => "BVC", Operation::BVS => "BVS",
            Operation::CLC => "CLC", Operation::CLD => "CLD", Operation::CLI => "CLI",
            Operation::CLV => "CLV", Operation::SEC => "SEC", Operation::SED => "SED",
            Operation::SEI => "SEI",
            Operation::LAX => "LAX", Operation::SAX => "SAX", Operation::DCP => "DCP",
            Operation::ISC => "ISC", Operation::SLO => "SLO", Operation::RLA => "RLA",
            Operation::SRE => "SRE", Operation::RRA => "RRA",
            Operation::NOP => "NOP",
        }
    }
}

/// Decoded facts about one opcode
#[derive(Debug, Clone, Copy)]
pub struct OpcodeInfo {
    pub operation: Operation,
    pub mode: AddressingMode,
    /// Base cycle cost before page-cross and branch penalties
    pub cycles: u8,
    /// Whether a page cross during addressing adds one cycle
    pub page_cycle: bool,
    /// Instruction length in bytes including the opcode
    pub bytes: u8,
}

// Short aliases keep the 16-per-row tables legible
use Operation::*;
const ABS: AddressingMode = AddressingMode::Absolute;
const ABX: AddressingMode = AddressingMode::AbsoluteX;
const ABY: AddressingMode = AddressingMode::AbsoluteY;
const ACC: AddressingMode = AddressingMode::Accumulator;
const IMM: AddressingMode = AddressingMode::Immediate;
const IMP: AddressingMode = AddressingMode::Implied;
const IND: AddressingMode = AddressingMode::Indirect;
const IZX: AddressingMode = AddressingMode::IndexedIndirect;
const IZY: AddressingMode = AddressingMode::IndirectIndexed;
const REL: AddressingMode = AddressingMode::Relative;
const ZPG: AddressingMode = AddressingMode::ZeroPage;
const ZPX: AddressingMode = AddressingMode::ZeroPageX;
const ZPY: AddressingMode = AddressingMode::ZeroPageY;

#[rustfmt::skip]
static OPERATION_TABLE: [Operation; 256] = [
//      00   01   02   03   04   05   06   07   08   09   0A   0B   0C   0D   0E   0F
/*00*/ BRK, ORA, ILL, SLO, NOP, ORA, ASL, SLO, PHP, ORA, ASL, ILL, NOP, ORA, ASL, SLO,
/*10*/ BPL, ORA, ILL, SLO, NOP, ORA, ASL, SLO, CLC, ORA, NOP, SLO, NOP, ORA, ASL, SLO,
/*20*/ JSR, AND, ILL, RLA, BIT, AND, ROL, RLA, PLP, AND, ROL, ILL, BIT, AND, ROL, RLA,
/*30*/ BMI, AND, ILL, RLA, NOP, AND, ROL, RLA, SEC, AND, NOP, RLA, NOP, AND, ROL, RLA,
/*40*/ RTI, EOR, ILL, SRE, NOP, EOR, LSR, SRE, PHA, EOR, LSR, ILL, JMP, EOR, LSR, SRE,
/*50*/ BVC, EOR, ILL, SRE, NOP, EOR, LSR, SRE, CLI, EOR, NOP, SRE, NOP, EOR, LSR, SRE,
/*60*/ RTS, ADC, ILL, RRA, NOP, ADC, ROR, RRA, PLA, ADC, ROR, ILL, JMP, ADC, ROR, RRA,
/*70*/ BVS, ADC, ILL, RRA, NOP, ADC, ROR, RRA, SEI, ADC, NOP, RRA, NOP, ADC, ROR, RRA,
/*80*/ NOP, STA, NOP, SAX, STY, STA, STX, SAX, DEY, NOP, TXA, ILL, STY, STA, STX, SAX,
/*90*/ BCC, STA, ILL, ILL, STY, STA, STX, SAX, TYA, STA, TXS, ILL, ILL, STA, ILL, ILL,
/*A0*/ LDY, LDA, LDX, LAX, LDY, LDA, LDX, LAX, TAY, LDA, TAX, LAX, LDY, LDA, LDX, LAX,
/*B0*/ BCS, LDA, ILL, LAX, LDY, LDA, LDX, LAX, CLV, LDA, TSX, ILL, LDY, LDA, LDX, LAX,
/*C0*/ CPY, CMP, NOP, DCP, CPY, CMP, DEC, DCP, INY, CMP, DEX, ILL, CPY, CMP, DEC, DCP,
/*D0*/ BNE, CMP, ILL, DCP, NOP, CMP, DEC, DCP, CLD, CMP, NOP, DCP, NOP, CMP, DEC, DCP,
/*E0*/ CPX, SBC, NOP, ISC, CPX, SBC, INC, ISC, INX, SBC, NOP, SBC, CPX, SBC, INC, ISC,
/*F0*/ BEQ, SBC, ILL, ISC, NOP, SBC, INC, ISC, SED, SBC, NOP, ISC, NOP, SBC, INC, ISC,
];

#[rustfmt::skip]
static MODE_TABLE: [AddressingMode; 256] = [
//      00   01   02   03   04   05   06   07   08   09   0A   0B   0C   0D   0E   0F
/*00*/ IMP, IZX, IMP, IZX, ZPG, ZPG, ZPG, ZPG, IMP, IMM, ACC, IMM, ABS, ABS, ABS, ABS,
/*10*/ REL, IZY, IMP, IZY, ZPX, ZPX, ZPX, ZPX, IMP, ABY, IMP, ABY, ABX, ABX, ABX, ABX,
/*20*/ ABS, IZX, IMP, IZX, ZPG, ZPG, ZPG, ZPG, IMP, IMM, ACC, IMM, ABS, ABS, ABS, ABS,
/*30*/ REL, IZY, IMP, IZY, ZPX, ZPX, ZPX, ZPX, IMP, ABY, IMP, ABY, ABX, ABX, ABX, ABX,
/*40*/ IMP, IZX, IMP, IZX, ZPG, ZPG, ZPG, ZPG, IMP, IMM, ACC, IMM, ABS, ABS, ABS, ABS,
/*50*/ REL, IZY, IMP, IZY, ZPX, ZPX, ZPX, ZPX, IMP, ABY, IMP, ABY, ABX, ABX, ABX, ABX,
/*60*/ IMP, IZX, IMP, IZX, ZPG, ZPG, ZPG, ZPG, IMP, IMM, ACC, IMM, IND, ABS, ABS, ABS,
/*70*/ REL, IZY, IMP, IZY, ZPX, ZPX, ZPX, ZPX, IMP, ABY, IMP, ABY, ABX, ABX, ABX, ABX,
/*80*/ IMM, IZX, IMM, IZX, ZPG, ZPG, ZPG, ZPG, IMP, IMM, IMP, IMM, ABS, ABS, ABS, ABS,
/*90*/ REL, IZY, IMP, IZY, ZPX, ZPX, ZPY, ZPY, IMP, ABY, IMP, ABY, ABX, ABX, ABY, ABY,
/*A0*/ IMM, IZX, IMM, IZX, ZPG, ZPG, ZPG, ZPG, IMP, IMM, IMP, IMM, ABS, ABS, ABS, ABS,
/*B0*/ REL, IZY, IMP, IZY, ZPX, ZPX, ZPY, ZPY, IMP, ABY, IMP, ABY, ABX, ABX, ABY, ABY,
/*C0*/ IMM, IZX, IMM, IZX, ZPG, ZPG, ZPG, ZPG, IMP, IMM, IMP, IMM, ABS, ABS, ABS, ABS,
/*D0*/ REL, IZY, IMP, IZY, ZPX, ZPX, ZPX, ZPX, IMP, ABY, IMP, ABY, ABX, ABX, ABX, ABX,
/*E0*/ IMM, IZX, IMM, IZX, ZPG, ZPG, ZPG, ZPG, IMP, IMM, IMP, IMM, ABS, ABS, ABS, ABS,
/*F0*/ REL, IZY, IMP, IZY, ZPX, ZPX, ZPX, ZPX, IMP, ABY, IMP, ABY, ABX, ABX, ABX, ABX,
];

#[rustfmt::skip]
static CYCLE_TABLE: [u8; 256] = [
//     00  01  02  03  04  05  06  07  08  09  0A  0B  0C  0D  0E  0F
/*00*/  7,  6,  0,  8,  3,  3,  5,  5,  3,  2,  2,  2,  4,  4,  6,  6,
/*10*/  2,  5,  0,  8,  4,  4,  6,  6,  2,  4,  2,  7,  4,  4,  7,  7,
/*20*/  6,  6,  0,  8,  3,  3,  5,  5,  4,  2,  2,  2,  4,  4,  6,  6,
/*30*/  2,  5,  0,  8,  4,  4,  6,  6,  2,  4,  2,  7,  4,  4,  7,  7,
/*40*/  6,  6,  0,  8,  3,  3,  5,  5,  3,  2,  2,  2,  3,  4,  6,  6,
/*50*/  2,  5,  0,  8,  4,  4,  6,  6,  2,  4,  2,  7,  4,  4,  7,  7,
/*60*/  6,  6,  0,  8,  3,  3,  5,  5,  4,  2,  2,  2,  5,  4,  6,  6,
/*70*/  2,  5,  0,  8,  4,  4,  6,  6,  2,  4,  2,  7,  4,  4,  7,  7,
/*80*/  2,  6,  2,  6,  3,  3,  3,  3,  2,  2,  2,  2,  4,  4,  4,  4,
/*90*/  2,  6,  0,  6,  4,  4,  4,  4,  2,  5,  2,  5,  5,  5,  5,  5,
/*A0*/  2,  6,  2,  6,  3,  3,  3,  3,  2,  2,  2,  2,  4,  4,  4,  4,
/*B0*/  2,  5,  0,  5,  4,  4,  4,  4,  2,  4,  2,  4,  4,  4,  4,  4,
/*C0*/  2,  6,  2,  8,  3,  3,  5,  5,  2,  2,  2,  2,  4,  4,  6,  6,
/*D0*/  2,  5,  0,  8,  4,  4,  6,  6,  2,  4,  2,  7,  4,  4,  7,  7,
/*E0*/  2,  6,  2,  8,  3,  3,  5,  5,  2,  2,  2,  2,  4,  4,  6,  6,
/*F0*/  2,  5,  0,  8,  4,  4,  6,  6,  2,  4,  2,  7,  4,  4,  7,  7,
];

fn instruction_bytes(mode: AddressingMode) -> u8 {
    match mode {
        AddressingMode::Absolute
        | AddressingMode::AbsoluteX
        | AddressingMode::AbsoluteY
        | AddressingMode::Indirect => 3,
        AddressingMode::Accumulator | AddressingMode::Implied => 1,
        _ => 2,
    }
}

/// Decode one opcode byte into its table facts
pub fn decode(code: u8) -> OpcodeInfo {
    let mode = MODE_TABLE[code as usize];
    let cycles = CYCLE_TABLE[code as usize];

    // The extra read cycle on page cross applies exactly to the indexed
    // read forms, which are the ones whose base cost excludes the penalty.
    let page_cycle = match mode {
        AddressingMode::AbsoluteX | AddressingMode::AbsoluteY => cycles == 4,
        AddressingMode::IndirectIndexed => cycles == 5,
        _ => false,
    };

    OpcodeInfo {
        operation: OPERATION_TABLE[code as usize],
        mode,
        cycles,
        page_cycle,
        bytes: instruction_bytes(mode),
    }
}

impl super::Cpu {
    /// Execute one instruction and return its full cycle cost
    pub fn step(&mut self, bus: &mut Bus) -> u8 {
        let code = self.fetch(bus);
        let info = decode(code);

        let addr = match info.mode {
            AddressingMode::Implied => self.addr_implied(),
            AddressingMode::Accumulator => self.addr_accumulator(),
            AddressingMode::Immediate => self.addr_immediate(bus),
            AddressingMode::ZeroPage => self.addr_zero_page(bus),
            AddressingMode::ZeroPageX => self.addr_zero_page_x(bus),
            AddressingMode::ZeroPageY => self.addr_zero_page_y(bus),
            AddressingMode::Relative => self.addr_relative(bus),
            AddressingMode::Absolute => self.addr_absolute(bus),
            AddressingMode::AbsoluteX => self.addr_absolute_x(bus),
            AddressingMode::AbsoluteY => self.addr_absolute_y(bus),
            AddressingMode::Indirect => self.addr_indirect(bus),
            AddressingMode::IndexedIndirect => self.addr_indexed_indirect(bus),
            AddressingMode::IndirectIndexed => self.addr_indirect_indexed(bus),
        };

        let extra = self.execute(bus, &info, &addr);

        let mut cycles = info.cycles;
        if info.page_cycle && addr.page_crossed {
            cycles += 1;
        }
        cycles += extra;

        self.total_cycles += cycles as u64;
        cycles
    }

    /// Operand fetch shared by read instructions
    #[inline]
    fn read_operand(&self, bus: &mut Bus, addr: &AddressingResult) -> u8 {
        match addr.value {
            Some(value) => value,
            None => bus.read(addr.address),
        }
    }

    /// A := A + M + C with carry and signed overflow
    fn add_to_accumulator(&mut self, data: u8) {
        let a = self.a as u16;
        let m = data as u16;
        let c = self.get_flag(flags::CARRY) as u16;
        let result = a + m + c;

        self.update_flag(flags::CARRY, result > 0xFF);
        // Overflow iff the operands agree in sign and the result does not
        self.update_flag(
            flags::OVERFLOW,
            (a ^ m) & 0x80 == 0 && (a ^ result) & 0x80 != 0,
        );
        self.a = result as u8;
        self.update_zero_and_negative_flags(self.a);
    }

    fn compare(&mut self, register: u8, data: u8) {
        self.update_flag(flags::CARRY, register >= data);
        self.update_zero_and_negative_flags(register.wrapping_sub(data));
    }

    /// Taken branches pay 1 cycle, 2 when the target is on another page
    fn branch_if(&mut self, addr: &AddressingResult, condition: bool) -> u8 {
        if !condition {
            return 0;
        }

        self.pc = addr.address;
        1 + addr.page_crossed as u8
    }

    // Shift/rotate cores shared by the ACC and memory forms. Memory forms
    // return the written value so the undocumented combos can reuse them.

    fn asl_value(&mut self, data: u8) -> u8 {
        self.update_flag(flags::CARRY, data & 0x80 != 0);
        let result = data << 1;
        self.update_zero_and_negative_flags(result);
        result
    }

    fn lsr_value(&mut self, data: u8) -> u8 {
        self.update_flag(flags::CARRY, data & 0x01 != 0);
        let result = data >> 1;
        self.update_zero_and_negative_flags(result);
        result
    }

    fn rol_value(&mut self, data: u8) -> u8 {
        let carry = self.get_flag(flags::CARRY) as u8;
        self.update_flag(flags::CARRY, data & 0x80 != 0);
        let result = (data << 1) | carry;
        self.update_zero_and_negative_flags(result);
        result
    }

    fn ror_value(&mut self, data: u8) -> u8 {
        let carry = self.get_flag(flags::CARRY) as u8;
        self.update_flag(flags::CARRY, data & 0x01 != 0);
        let result = (data >> 1) | (carry << 7);
        self.update_zero_and_negative_flags(result);
        result
    }

    /// Apply a shift/rotate core to the accumulator or to memory
    fn read_modify_write(
        &mut self,
        bus: &mut Bus,
        info: &OpcodeInfo,
        addr: &AddressingResult,
        op: fn(&mut Self, u8) -> u8,
    ) -> u8 {
        if info.mode == AddressingMode::Accumulator {
            let value = self.a;
            let result = op(self, value);
            self.a = result;
            result
        } else {
            let data = bus.read(addr.address);
            let result = op(self, data);
            bus.write(addr.address, result);
            result
        }
    }

    #[allow(clippy::too_many_lines)]
    fn execute(&mut self, bus: &mut Bus, info: &OpcodeInfo, addr: &AddressingResult) -> u8 {
        match info.operation {
            // Load and store
            Operation::LDA => {
                self.a = self.read_operand(bus, addr);
                self.update_zero_and_negative_flags(self.a);
            }
            Operation::LDX => {
                self.x = self.read_operand(bus, addr);
                self.update_zero_and_negative_flags(self.x);
            }
            Operation::LDY => {
                self.y = self.read_operand(bus, addr);
                self.update_zero_and_negative_flags(self.y);
            }
            Operation::STA => bus.write(addr.address, self.a),
            Operation::STX => bus.write(addr.address, self.x),
            Operation::STY => bus.write(addr.address, self.y),

            // Transfers
            Operation::TAX => {
                self.x = self.a;
                self.update_zero_and_negative_flags(self.x);
            }
            Operation::TAY => {
                self.y = self.a;
                self.update_zero_and_negative_flags(self.y);
            }
            Operation::TSX => {
                self.x = self.sp;
                self.update_zero_and_negative_flags(self.x);
            }
            Operation::TXA => {
                self.a = self.x;
                self.update_zero_and_negative_flags(self.a);
            }
            Operation::TXS => self.sp = self.x,
            Operation::TYA => {
                self.a = self.y;
                self.update_zero_and_negative_flags(self.a);
            }

            // Stack
            Operation::PHA => self.stack_push(bus, self.a),
            // PHP pushes with B and U set
            Operation::PHP => {
                let pushed = self.status | flags::BREAK | flags::UNUSED;
                self.stack_push(bus, pushed);
            }
            Operation::PLA => {
                self.a = self.stack_pop(bus);
                self.update_zero_and_negative_flags(self.a);
            }
            Operation::PLP => {
                let popped = self.stack_pop(bus);
                self.set_status(popped);
            }

            // Shift and rotate
            Operation::ASL => {
                self.read_modify_write(bus, info, addr, Self::asl_value);
            }
            Operation::LSR => {
                self.read_modify_write(bus, info, addr, Self::lsr_value);
            }
            Operation::ROL => {
                self.read_modify_write(bus, info, addr, Self::rol_value);
            }
            Operation::ROR => {
                self.read_modify_write(bus, info, addr, Self::ror_value);
            }

            // Logic
            Operation::AND => {
                self.a &= self.read_operand(bus, addr);
                self.update_zero_and_negative_flags(self.a);
            }
            Operation::EOR => {
                self.a ^= self.read_operand(bus, addr);
                self.update_zero_and_negative_flags(self.a);
            }
            Operation::ORA => {
                self.a |= self.read_operand(bus, addr);
                self.update_zero_and_negative_flags(self.a);
            }
            Operation::BIT => {
                let data = self.read_operand(bus, addr);
                self.update_flag(flags::ZERO, self.a & data == 0);
                self.update_flag(flags::NEGATIVE, data & flags::NEGATIVE != 0);
                self.update_flag(flags::OVERFLOW, data & flags::OVERFLOW != 0);
            }

            // Arithmetic
            Operation::ADC => {
                let data = self.read_operand(bus, addr);
                self.add_to_accumulator(data);
            }
            // A - M - ~C == A + ~M + C by one's complement identity
            Operation::SBC => {
                let data = self.read_operand(bus, addr);
                self.add_to_accumulator(!data);
            }
            Operation::CMP => {
                let data = self.read_operand(bus, addr);
                self.compare(self.a, data);
            }
            Operation::CPX => {
                let data = self.read_operand(bus, addr);
                self.compare(self.x, data);
            }
            Operation::CPY => {
                let data = self.read_operand(bus, addr);
                self.compare(self.y, data);
            }

            // Increment and decrement
            Operation::INC => {
                let data = bus.read(addr.address).wrapping_add(1);
                self.update_zero_and_negative_flags(data);
                bus.write(addr.address, data);
            }
            Operation::INX => {
                self.x = self.x.wrapping_add(1);
                self.update_zero_and_negative_flags(self.x);
            }
            Operation::INY => {
                self.y = self.y.wrapping_add(1);
                self.update_zero_and_negative_flags(self.y);
            }
            Operation::DEC => {
                let data = bus.read(addr.address).wrapping_sub(1);
                self.update_zero_and_negative_flags(data);
                bus.write(addr.address, data);
            }
            Operation::DEX => {
                self.x = self.x.wrapping_sub(1);
                self.update_zero_and_negative_flags(self.x);
            }
            Operation::DEY => {
                self.y = self.y.wrapping_sub(1);
                self.update_zero_and_negative_flags(self.y);
            }

            // Control flow
            Operation::JMP => self.pc = addr.address,
            Operation::JSR => {
                // Push the address of the jump's last byte
                self.stack_push_word(bus, self.pc.wrapping_sub(1));
                self.pc = addr.address;
            }
            Operation::BRK => {
                // One byte of padding after the opcode, B set in the push
                self.stack_push_word(bus, self.pc.wrapping_add(1));
                let pushed = self.status | flags::BREAK | flags::UNUSED;
                self.stack_push(bus, pushed);
                self.set_flag(flags::INTERRUPT_DISABLE);
                self.pc = self.read_word(bus, crate::cpu::vectors::IRQ);
            }
            Operation::RTI => {
                let popped = self.stack_pop(bus);
                self.set_status(popped);
                self.pc = self.stack_pop_word(bus);
            }
            Operation::RTS => {
                self.pc = self.stack_pop_word(bus).wrapping_add(1);
            }

            // Branches
            Operation::BCC => return self.branch_if(addr, !self.get_flag(flags::CARRY)),
            Operation::BCS => return self.branch_if(addr, self.get_flag(flags::CARRY)),
            Operation::BEQ => return self.branch_if(addr, self.get_flag(flags::ZERO)),
            Operation::BMI => return self.branch_if(addr, self.get_flag(flags::NEGATIVE)),
            Operation::BNE => return self.branch_if(addr, !self.get_flag(flags::ZERO)),
            Operation::BPL => return self.branch_if(addr, !self.get_flag(flags::NEGATIVE)),
            Operation::BVC => return self.branch_if(addr, !self.get_flag(flags::OVERFLOW)),
            Operation::BVS => return self.branch_if(addr, self.get_flag(flags::OVERFLOW)),

            // Flag manipulation
            Operation::CLC => self.clear_flag(flags::CARRY),
            Operation::CLD => self.clear_flag(flags::DECIMAL),
            Operation::CLI => self.clear_flag(flags::INTERRUPT_DISABLE),
            Operation::CLV => self.clear_flag(flags::OVERFLOW),
            Operation::SEC => self.set_flag(flags::CARRY),
            Operation::SED => self.set_flag(flags::DECIMAL),
            Operation::SEI => self.set_flag(flags::INTERRUPT_DISABLE),

            // Undocumented
            Operation::LAX => {
                let data = self.read_operand(bus, addr);
                self.a = data;
                self.x = data;
                self.update_zero_and_negative_flags(data);
            }
            Operation::SAX => bus.write(addr.address, self.a & self.x),
            Operation::DCP => {
                let data = bus.read(addr.address).wrapping_sub(1);
                self.update_zero_and_negative_flags(data);
                bus.write(addr.address, data);
                self.compare(self.a, data);
            }
            Operation::ISC => {
                let data = bus.read(addr.address).wrapping_add(1);
                self.update_zero_and_negative_flags(data);
                bus.write(addr.address, data);
                self.add_to_accumulator(!data);
            }
            Operation::SLO => {
                let result = self.read_modify_write(bus, info, addr, Self::asl_value);
                self.a |= result;
                self.update_zero_and_negative_flags(self.a);
            }
            Operation::RLA => {
                let result = self.read_modify_write(bus, info, addr, Self::rol_value);
                self.a &= result;
                self.update_zero_and_negative_flags(self.a);
            }
            Operation::SRE => {
                let result = self.read_modify_write(bus, info, addr, Self::lsr_value);
                self.a ^= result;
                self.update_zero_and_negative_flags(self.a);
            }
            Operation::RRA => {
                let result = self.read_modify_write(bus, info, addr, Self::ror_value);
                self.add_to_accumulator(result);
            }

            // Illegal slots fall through as no-ops at table cost
            Operation::NOP | Operation::ILL => {
                #[cfg(debug_assertions)]
                if info.operation == Operation::ILL {
                    eprintln!("illegal opcode executed at {:04X}", self.pc.wrapping_sub(1));
                }
            }
        }

        0
    }
}
