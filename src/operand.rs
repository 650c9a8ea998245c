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

//! The operand addressing-mode state machine.
//!
//! Given a collected operand deque, determines the addressing mode by
//! recursing on the deque's length and popping one operand per step. A
//! comma encountered at position 1 is stripped before the length is
//! re-examined. The returned mode is the *first* (bottommost) one pushed,
//! corresponding to the earliest-parsed operand.

use std::collections::VecDeque;

use crate::message::ParserError;
use crate::parser::Parser;
use crate::token::{AddressingMode, Register, Token, Yylex};

const SECOND_OPERAND_SET: &str = "T_IMM_U8, T_IMM_U16, T_DIR_ADDR_U8, T_EXT_ADDR_U16, T_X";
const FIRST_OPERAND_SET: &str = "T_IMM_U16, T_DIR_ADDR_U8, T_DISP_ADDR_I8, T_EXT_ADDR_U16, T_A, T_B";

/// Determines the addressing mode of an instruction from its operand deque,
/// operating on a copy so the caller's deque is left untouched.
pub fn addressing_mode(parser: &Parser, operands: &VecDeque<Yylex>) -> Result<AddressingMode, ParserError> {
    operand_state_machine(parser, operands.clone(), Vec::new())
}

fn operand_state_machine(
    parser: &Parser,
    mut operands: VecDeque<Yylex>,
    mut mode_stack: Vec<AddressingMode>,
) -> Result<AddressingMode, ParserError> {
    if operands.is_empty() {
        return Ok(*mode_stack.first().unwrap_or(&AddressingMode::Inh));
    }

    if operands.len() > 1 && operands[1].token == Token::Comma {
        operands.remove(1);
    }

    let test = operands[0].token;
    let mode = match operands.len() {
        3 => match test {
            Token::Register(Register::X) => Ok(AddressingMode::Idx),
            _ => Err(("T_X".to_string(), test)),
        },
        2 => match test {
            Token::ImmU8 => Ok(AddressingMode::Imm),
            Token::ImmU16 => Ok(AddressingMode::Imm),
            Token::DirAddrU8 => Ok(AddressingMode::Dir),
            Token::ExtAddrU16 => Ok(AddressingMode::Ext),
            Token::Register(Register::X) => Ok(AddressingMode::Idx),
            _ => Err((SECOND_OPERAND_SET.to_string(), test)),
        },
        1 => match test {
            Token::ImmU16 => Ok(AddressingMode::Imm),
            Token::DirAddrU8 => Ok(AddressingMode::Dir),
            Token::DispAddrI8 => Ok(AddressingMode::Rel),
            Token::ExtAddrU16 => Ok(AddressingMode::Ext),
            Token::Register(Register::A) => Ok(AddressingMode::Acc),
            Token::Register(Register::B) => Ok(AddressingMode::Acc),
            _ => Err((FIRST_OPERAND_SET.to_string(), test)),
        },
        _ => unreachable!("operand deque did not shrink to 0..=3 after comma strip"),
    };

    match mode {
        Ok(m) => {
            operands.pop_front();
            mode_stack.push(m);
            operand_state_machine(parser, operands, mode_stack)
        }
        Err((expected, found)) => Err(parser.context_error(expected, found)),
    }
}
