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

//! Top-level assembler interface.

use std::fs;
use std::io::{stdin, Read};

use crate::encoder;
use crate::message::ParserError;
use crate::operand::addressing_mode;
use crate::parser::{Line, Parser};
use crate::registers::Registers;
use crate::symbol::SymbolTable;

/// The bytes and final symbol table produced by a successful assembly.
#[derive(Debug)]
pub struct AssemblyOutput {
    pub bytes: Vec<u8>,
    pub symbols: SymbolTable,
}

/// Top-level assembler interface. Each `assemble_*` method runs one
/// independent two-pass translation unit over its own register bank.
#[derive(Debug, Default)]
pub struct Assembler {
    registers: Registers,
}

impl Assembler {
    pub fn new() -> Self {
        Self { registers: Registers::new() }
    }

    /// Assembles the file at the given `path`.
    pub fn assemble_file(&mut self, path: &str) -> Result<AssemblyOutput, ParserError> {
        let source = fs::read_to_string(path)
            .map_err(|e| ParserError::new("", vec!["readable file".into()], e.to_string(), 0))?;
        self.assemble_str(&source)
    }

    /// Assembles the bytes read from standard input.
    pub fn assemble_stdin(&mut self) -> Result<AssemblyOutput, ParserError> {
        let mut source = String::new();
        stdin()
            .read_to_string(&mut source)
            .map_err(|e| ParserError::new("", vec!["readable stdin".into()], e.to_string(), 0))?;
        self.assemble_str(&source)
    }

    /// Runs the full two-pass pipeline over `source`: the parser re-drives
    /// the lexer line by line, each instruction's addressing mode is
    /// determined from its operand deque, and the encoder appends object
    /// bytes while mutating the shared register bank.
    pub fn assemble_str(&mut self, source: &str) -> Result<AssemblyOutput, ParserError> {
        let mut parser = Parser::new(source);
        let mut bytes = Vec::new();

        loop {
            match parser.line()? {
                Line::Eof => break,
                Line::Variable => continue,
                Line::Instruction(mnemonic, operands) => {
                    let mode = addressing_mode(&parser, &operands)?;
                    bytes.extend(encoder::encode(mnemonic, mode, &operands, &mut self.registers));
                }
            }
        }

        Ok(AssemblyOutput { bytes, symbols: parser.lexer.symbols })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembles_a_bare_instruction_to_its_opcode() {
        let mut asm = Assembler::new();
        let out = asm.assemble_str("ABA\n").unwrap();
        assert_eq!(out.bytes, vec![0x1B]);
    }

    #[test]
    fn variable_declarations_emit_no_bytes_and_populate_the_symbol_table() {
        let mut asm = Assembler::new();
        let out = asm.assemble_str("OUTCH = $FE3A\nJSR $FCBC\n").unwrap();
        assert_eq!(out.bytes, vec![0xBD, 0xFC, 0xBC]);
        assert!(out.symbols.contains("OUTCH"));
    }

    #[test]
    fn unrecognized_term_surfaces_as_a_parser_error() {
        let mut asm = Assembler::new();
        assert!(asm.assemble_str("@@@\n").is_err());
    }
}
