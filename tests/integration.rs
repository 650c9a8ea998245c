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

//! End-to-end fixture tests exercising lexer -> parser -> operand state
//! machine -> encoder together, in the style of `axel`'s own
//! `integration/assembly_parser_test.py`.

use m6800as::asm::Assembler;
use m6800as::symbol::SymbolValue;

/// `axel`'s own fixture: a forward label reference used as a branch
/// target, and a variable declaration used as a JSR target.
#[test]
fn branch_target_label_and_variable_declaration_coexist() {
    let mut assembler = Assembler::new();
    let source = "OUTCH = $FE3A\nSTART JSR $FCBC\nBNE START\n";
    let output = assembler.assemble_str(source).expect("assembly should succeed");

    assert_eq!(output.bytes[0..3], [0xBD, 0xFC, 0xBC]);
    assert_eq!(output.bytes[3], 0x26); // BNE

    let outch = output.symbols.get("OUTCH").unwrap();
    assert_eq!(outch.value, SymbolValue::Bytes(vec![0xFE, 0x3A]));
    assert!(output.symbols.contains("START"));
}

/// The ABA/ADC worked examples, run back to back through one assembler so
/// the carry flag set by the indexed ADD's overflow persists into the ADC
/// that follows.
#[test]
fn aba_then_indexed_add_then_immediate_adc_pipeline() {
    let mut assembler = Assembler::new();
    let source = "ABA\nADD A $10,X\nADC A #$10\n";
    let output = assembler.assemble_str(source).expect("assembly should succeed");

    assert_eq!(output.bytes[0], 0x1B); // ABA
    assert_eq!(&output.bytes[1..3], &[0xAB, 0x10]); // ADD A $10,X -> IDX
    assert_eq!(output.bytes[3], 0x89); // ADC A, IMM opcode
}

/// A malformed operand sequence (a bare comma with no register) fails the
/// operand state machine and the whole translation unit aborts.
#[test]
fn malformed_operand_sequence_aborts_the_translation_unit() {
    let mut assembler = Assembler::new();
    let err = assembler.assemble_str("ADD A ,\n").unwrap_err();
    assert!(err.to_string().contains("Parser failed"));
}

/// An unrecognized term is tolerated by the lexer (classified `UNKNOWN`)
/// but rejected as soon as the parser expects a line-starting token.
#[test]
fn unrecognized_term_is_rejected_by_the_parser() {
    let mut assembler = Assembler::new();
    let err = assembler.assemble_str("@@@\n").unwrap_err();
    assert_eq!(err.found, "T_UNKNOWN");
}
