// This file is part of m6800as, a Motorola 6800 assembler.
//
// SPDX-License-Identifier: GPL-3.0-or-later
//
// m6800as is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published
// by the Free Software Foundation, either version 3 of the License,
// or (at your option) any later version.
//
// m6800as is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with m6800as.  If not, see <http://www.gnu.org/licenses/>.

//! Per-mnemonic byte encoding.
//!
//! [`encode`] is the sole entry point: it translates one instruction to
//! its object bytes, then runs the status-flag post-processor over the
//! register bank. Most mnemonics are handled by the generic instruction
//! families in [`table`]; `ABA` and `ADC` are special-cased because their
//! accumulator mutation is exact rather than family-wide.

mod table;

use std::collections::VecDeque;

use crate::num::U8;
use crate::parser::parse_immediate_value;
use crate::registers::{flag, Registers};
use crate::token::{AddressingMode, Mnemonic, Register, Token, Yylex};

/// Translates one instruction to its object bytes and updates `registers`
/// accordingly, then resets and recomputes the status flags.
pub fn encode(
    mnemonic: Mnemonic,
    mode: AddressingMode,
    operands: &VecDeque<Yylex>,
    registers: &mut Registers,
) -> Vec<u8> {
    let bytes = translate(mnemonic, mode, operands, registers);
    post_process(operands, registers);
    bytes
}

/// The register appearing as the *last* element of the operand deque, if
/// any - the accumulator selector for two-operand forms like `ADD A #$10`.
fn operand_register(operands: &VecDeque<Yylex>) -> Option<Register> {
    operands.back().and_then(|y| match y.token {
        Token::Register(r) => Some(r),
        _ => None,
    })
}

/// The first literal-valued operand in the deque (immediate, direct,
/// extended, or displacement), regardless of its position - indexed forms
/// like `ADD A $10,X` carry the register ahead of the literal.
fn literal_operand(operands: &VecDeque<Yylex>) -> Option<&Yylex> {
    operands.iter().find(|y| {
        matches!(
            y.token,
            Token::ImmU8 | Token::ImmU16 | Token::DirAddrU8 | Token::ExtAddrU16 | Token::DispAddrI8
        )
    })
}

/// Decodes an operand's literal text to bytes. Falls back to a single
/// placeholder byte for a displacement that names an unresolved label
/// rather than a numeric literal - this assembler does no linking, so a
/// forward branch target cannot be resolved at encode time.
fn operand_bytes(text: &str) -> Vec<u8> {
    parse_immediate_value(text).unwrap_or_else(|| vec![0x00])
}

fn translate(
    mnemonic: Mnemonic,
    mode: AddressingMode,
    operands: &VecDeque<Yylex>,
    registers: &mut Registers,
) -> Vec<u8> {
    use Mnemonic::*;

    match mnemonic {
        Aba => return encode_aba(mode, registers),
        Adc => return encode_adc(mode, operands, registers),
        _ => {}
    }

    if let Some(op) = table::inherent_opcode(mnemonic) {
        return vec![op];
    }

    if let Some(op) = table::branch_opcode(mnemonic) {
        let disp = literal_operand(operands)
            .map(|y| operand_bytes(&y.text))
            .and_then(|b| b.first().copied())
            .unwrap_or(0);
        return vec![op, disp];
    }

    if matches!(mnemonic, Psh | Pul) {
        return operand_register(operands)
            .and_then(|reg| table::push_pull_opcode(mnemonic, reg))
            .map(|op| vec![op])
            .unwrap_or_default();
    }

    if let Some(nibble) = table::unary_nibble(mnemonic) {
        let reg = operand_register(operands);
        return match table::unary_base(mode, reg) {
            Some(base) => {
                let mut bytes = vec![base | nibble];
                match mode {
                    AddressingMode::Idx | AddressingMode::Ext => {
                        if let Some(lit) = literal_operand(operands) {
                            bytes.extend(operand_bytes(&lit.text));
                        }
                    }
                    AddressingMode::Acc => {
                        if let Some(r) = reg {
                            apply_unary(mnemonic, r, registers);
                        }
                    }
                    _ => {}
                }
                bytes
            }
            None => Vec::new(),
        };
    }

    if let Some(nibble) = table::arith_nibble(mnemonic) {
        if mnemonic == Sta && mode == AddressingMode::Imm {
            return Vec::new();
        }
        if let Some(reg) = operand_register(operands) {
            if let Some(base) = table::arith_base(mode, reg) {
                let mut bytes = vec![base | nibble];
                if let Some(lit) = literal_operand(operands) {
                    let data = operand_bytes(&lit.text);
                    if mode == AddressingMode::Imm {
                        apply_arith(mnemonic, reg, &data, registers);
                    }
                    bytes.extend(data);
                }
                return bytes;
            }
        }
        return Vec::new();
    }

    if let Some(op) = table::simple16_opcode(mnemonic, mode) {
        let mut bytes = vec![op];
        if let Some(lit) = literal_operand(operands) {
            bytes.extend(operand_bytes(&lit.text));
        }
        return bytes;
    }

    Vec::new()
}

/// `ABA`: `AccA += AccB`, inherent addressing only mutates when the parsed
/// mode is `ACC` (spec example 1).
fn encode_aba(mode: AddressingMode, registers: &mut Registers) -> Vec<u8> {
    if mode == AddressingMode::Acc {
        let amount = registers.acc_b.num as i32;
        registers.acc_a = registers.acc_a.add(amount);
    }
    vec![0x1B]
}

/// `ADC`: immediate mode folds the current carry bit into the operand
/// before adding (spec example 2 - a repeated `ADC A #$10` with Carry set
/// from the prior call emits `0x30` instead of `0x10`). `DIR`/`IDX`/`EXT`
/// forms fall back to the generic arithmetic-group encoding since there is
/// no memory to fetch a value from.
fn encode_adc(mode: AddressingMode, operands: &VecDeque<Yylex>, registers: &mut Registers) -> Vec<u8> {
    let reg = operand_register(operands).unwrap_or(Register::A);

    if mode != AddressingMode::Imm {
        let nibble = table::arith_nibble(Mnemonic::Adc).expect("ADC is in the arithmetic group");
        return match table::arith_base(mode, reg) {
            Some(base) => {
                let mut bytes = vec![base | nibble];
                if let Some(lit) = literal_operand(operands) {
                    bytes.extend(operand_bytes(&lit.text));
                }
                bytes
            }
            None => Vec::new(),
        };
    }

    let op = if reg == Register::B { 0xC9 } else { 0x89 };
    let immediate = literal_operand(operands)
        .map(|y| operand_bytes(&y.text))
        .and_then(|b| b.first().copied())
        .unwrap_or(0) as i32;
    let carry_in = if registers.carry() { 1 } else { 0 };
    let effective = immediate | (carry_in << 5);

    let acc = if reg == Register::B { &mut registers.acc_b } else { &mut registers.acc_a };
    *acc = acc.add(effective);

    vec![op, (effective & 0xFF) as u8]
}

/// Applies the read-modify-write unary group's effect to the selected
/// accumulator when addressed in `ACC` mode. `TST` only sets flags, so it
/// leaves the accumulator untouched.
fn apply_unary(mnemonic: Mnemonic, reg: Register, registers: &mut Registers) {
    use Mnemonic::*;
    let acc = if reg == Register::B { &mut registers.acc_b } else { &mut registers.acc_a };
    let value = acc.num as i32;
    *acc = match mnemonic {
        Neg => U8::new(-value),
        Com => U8::new(!value),
        Lsr => U8::new(value >> 1),
        Asr => U8::new((value >> 1) | (value & 0x80)),
        Asl => acc.add(value),
        Ror => {
            let carry_in = if registers.sr[flag::CARRY] { 0x80 } else { 0 };
            U8::new((value >> 1) | carry_in)
        }
        Rol => {
            let carry_in = if registers.sr[flag::CARRY] { 1 } else { 0 };
            U8::new(((value << 1) & 0xFF) | carry_in)
        }
        Dec => acc.sub(1),
        Inc => acc.add(1),
        Clr => U8::new(0),
        Tst => *acc,
        _ => *acc,
    };
}

/// Applies the accumulator arithmetic group's immediate-mode effect.
/// `CMP`, `BIT`, and `STA` never mutate the accumulator on real hardware.
fn apply_arith(mnemonic: Mnemonic, reg: Register, data: &[u8], registers: &mut Registers) {
    use Mnemonic::*;
    let value = *data.first().unwrap_or(&0) as i32;
    let acc = if reg == Register::B { &mut registers.acc_b } else { &mut registers.acc_a };
    *acc = match mnemonic {
        Sub => acc.sub(value),
        Sbc => {
            let borrow = if registers.sr[flag::CARRY] { 1 } else { 0 };
            acc.sub(value + borrow)
        }
        And => U8::new((acc.num as i32) & value),
        Lda => U8::new(value),
        Eor => U8::new((acc.num as i32) ^ value),
        Ora => U8::new((acc.num as i32) | value),
        Add => acc.add(value),
        Cmp | Bit | Sta | Adc => *acc,
        _ => *acc,
    };
}

/// Resets the status register, then - when the operand deque carries more
/// than one element and its last element is an accumulator register -
/// recomputes Carry, Sign, Overflow, and Zero from that accumulator's
/// post-operation state.
fn post_process(operands: &VecDeque<Yylex>, registers: &mut Registers) {
    registers.reset_sr();

    if operands.len() <= 1 {
        return;
    }

    let reg = match operands.back().map(|y| y.token) {
        Some(Token::Register(r @ (Register::A | Register::B))) => r,
        _ => return,
    };

    let acc = if reg == Register::B { registers.acc_b } else { registers.acc_a };
    if acc.raw > 255 {
        registers.sr[flag::CARRY] = true;
    }
    if acc.raw < 0 {
        registers.sr[flag::SIGN] = true;
        registers.sr[flag::OVERFLOW] = true;
    }
    if acc.num == 0 {
        registers.sr[flag::ZERO] = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Yylex;

    fn deque(items: Vec<Yylex>) -> VecDeque<Yylex> {
        items.into_iter().collect()
    }

    #[test]
    fn aba_adds_acc_b_into_acc_a_in_acc_mode() {
        let mut regs = Registers::new();
        regs.acc_a = crate::num::U8::new(5);
        regs.acc_b = crate::num::U8::new(10);
        let bytes = encode(Mnemonic::Aba, AddressingMode::Acc, &VecDeque::new(), &mut regs);
        assert_eq!(bytes, vec![0x1B]);
        assert_eq!(regs.acc_a.num, 15);
    }

    #[test]
    fn adc_immediate_prepends_carry_on_repeated_calls() {
        let mut regs = Registers::new();
        regs.acc_a = crate::num::U8::new(255);
        let ops = deque(vec![
            Yylex::new(Token::ImmU8, "#$10"),
            Yylex::new(Token::Register(Register::A), "A"),
        ]);

        let first = encode(Mnemonic::Adc, AddressingMode::Imm, &ops, &mut regs);
        assert_eq!(first, vec![0x89, 0x10]);
        assert!(regs.carry());

        let second = encode(Mnemonic::Adc, AddressingMode::Imm, &ops, &mut regs);
        assert_eq!(second, vec![0x89, 0x30]);
    }

    #[test]
    fn adc_on_acc_b_uses_the_b_opcode() {
        let mut regs = Registers::new();
        let ops = deque(vec![
            Yylex::new(Token::ImmU8, "#$10"),
            Yylex::new(Token::Register(Register::B), "B"),
        ]);
        let bytes = encode(Mnemonic::Adc, AddressingMode::Imm, &ops, &mut regs);
        assert_eq!(bytes, vec![0xC9, 0x10]);
    }

    #[test]
    fn add_immediate_sets_carry_and_zero_flags() {
        let mut regs = Registers::new();
        regs.acc_a = crate::num::U8::new(255);
        let ops = deque(vec![
            Yylex::new(Token::ImmU8, "#$01"),
            Yylex::new(Token::Register(Register::A), "A"),
        ]);
        let bytes = encode(Mnemonic::Add, AddressingMode::Imm, &ops, &mut regs);
        assert_eq!(bytes, vec![0x8B, 0x01]);
        assert_eq!(regs.acc_a.num, 0);
        assert!(regs.carry());
        assert!(regs.sr[flag::ZERO]);
    }

    #[test]
    fn sub_underflow_sets_sign_and_overflow_but_not_carry() {
        // Carry is driven only by raw > 255 (spec §4.G step 3); an
        // underflowing result must not also set it.
        let mut regs = Registers::new();
        regs.acc_a = crate::num::U8::new(0);
        let ops = deque(vec![
            Yylex::new(Token::ImmU8, "#$01"),
            Yylex::new(Token::Register(Register::A), "A"),
        ]);
        let bytes = encode(Mnemonic::Sub, AddressingMode::Imm, &ops, &mut regs);
        assert_eq!(bytes, vec![0x80, 0x01]);
        assert_eq!(regs.acc_a.num, 255);
        assert!(!regs.carry());
        assert!(regs.sr[flag::SIGN]);
        assert!(regs.sr[flag::OVERFLOW]);
    }

    #[test]
    fn sta_direct_emits_bytes_without_mutating_registers() {
        let mut regs = Registers::new();
        let before = regs.acc_a;
        let ops = deque(vec![
            Yylex::new(Token::DirAddrU8, "$10"),
            Yylex::new(Token::Register(Register::A), "A"),
        ]);
        let bytes = encode(Mnemonic::Sta, AddressingMode::Dir, &ops, &mut regs);
        assert_eq!(bytes, vec![0x97, 0x10]);
        assert_eq!(regs.acc_a, before);
    }

    #[test]
    fn sta_has_no_immediate_encoding() {
        let mut regs = Registers::new();
        let ops = deque(vec![
            Yylex::new(Token::ImmU8, "#$10"),
            Yylex::new(Token::Register(Register::A), "A"),
        ]);
        assert!(encode(Mnemonic::Sta, AddressingMode::Imm, &ops, &mut regs).is_empty());
    }

    #[test]
    fn jsr_extended_emits_opcode_and_16_bit_address() {
        let mut regs = Registers::new();
        let ops = deque(vec![Yylex::new(Token::ExtAddrU16, "$FCBC")]);
        let bytes = encode(Mnemonic::Jsr, AddressingMode::Ext, &ops, &mut regs);
        assert_eq!(bytes, vec![0xBD, 0xFC, 0xBC]);
    }

    #[test]
    fn bne_relative_emits_opcode_and_placeholder_displacement_for_a_label() {
        let mut regs = Registers::new();
        let ops = deque(vec![Yylex::new(Token::DispAddrI8, "WAIT")]);
        let bytes = encode(Mnemonic::Bne, AddressingMode::Rel, &ops, &mut regs);
        assert_eq!(bytes, vec![0x26, 0x00]);
    }

    #[test]
    fn psh_and_pul_select_opcode_by_register() {
        let mut regs = Registers::new();
        let a = deque(vec![Yylex::new(Token::Register(Register::A), "A")]);
        let b = deque(vec![Yylex::new(Token::Register(Register::B), "B")]);
        assert_eq!(encode(Mnemonic::Psh, AddressingMode::Acc, &a, &mut regs), vec![0x36]);
        assert_eq!(encode(Mnemonic::Pul, AddressingMode::Acc, &b, &mut regs), vec![0x33]);
    }

    #[test]
    fn clr_accumulator_zeroes_it_and_inherent_ops_ignore_operands() {
        let mut regs = Registers::new();
        regs.acc_b = crate::num::U8::new(42);
        let ops = deque(vec![Yylex::new(Token::Register(Register::B), "B")]);
        let bytes = encode(Mnemonic::Clr, AddressingMode::Acc, &ops, &mut regs);
        assert_eq!(bytes, vec![0x5F]);
        assert_eq!(regs.acc_b.num, 0);

        let bytes = encode(Mnemonic::Nop, AddressingMode::Inh, &VecDeque::new(), &mut regs);
        assert_eq!(bytes, vec![0x01]);
    }

    #[test]
    fn post_process_skips_single_operand_instructions() {
        // A bare `CLR A` has a one-element operand deque; per the spec the
        // flag recompute only triggers once the deque holds more than one
        // operand, so no flags are set here even though the accumulator
        // became zero.
        let mut regs = Registers::new();
        regs.sr[flag::ZERO] = true;
        let ops = deque(vec![Yylex::new(Token::Register(Register::A), "A")]);
        post_process(&ops, &mut regs);
        assert!(!regs.sr[flag::ZERO]);
    }
}
