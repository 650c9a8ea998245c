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

//! Lexical tokens, registers, mnemonics, and addressing modes.
//!
//! The taxonomy is closed and declarative; the only operations are equality,
//! set membership, and lookup from the uppercase textual form of a term.

use std::fmt::{self, Display, Formatter};

/// A lexical token tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Token {
    /// A bare label name at the start of a line.
    Label,

    /// A `name = value` declaration name.
    Variable,

    /// `=`
    Equal,

    /// `,`
    Comma,

    /// A recognized instruction mnemonic.
    Mnemonic(Mnemonic),

    /// A recognized register name.
    Register(Register),

    /// A term that matched none of the classification rules.
    Unknown,

    /// `#$XX` - an 8-bit immediate.
    ImmU8,

    /// `#$XXXX` - a 16-bit immediate.
    ImmU16,

    /// `$XX` - an 8-bit direct address.
    DirAddrU8,

    /// `$XXXX` - a 16-bit extended address.
    ExtAddrU16,

    /// A signed 8-bit branch displacement.
    DispAddrI8,

    /// End of logical line.
    Eol,

    /// End of source.
    Eof,
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Token::Label => write!(f, "T_LABEL"),
            Token::Variable => write!(f, "T_VARIABLE"),
            Token::Equal => write!(f, "T_EQUAL"),
            Token::Comma => write!(f, "T_COMMA"),
            Token::Mnemonic(m) => write!(f, "T_{}", m),
            Token::Register(r) => write!(f, "T_{}", r),
            Token::Unknown => write!(f, "T_UNKNOWN"),
            Token::ImmU8 => write!(f, "T_IMM_U8"),
            Token::ImmU16 => write!(f, "T_IMM_U16"),
            Token::DirAddrU8 => write!(f, "T_DIR_ADDR_U8"),
            Token::ExtAddrU16 => write!(f, "T_EXT_ADDR_U16"),
            Token::DispAddrI8 => write!(f, "T_DISP_ADDR_I8"),
            Token::Eol => write!(f, "T_EOL"),
            Token::Eof => write!(f, "T_EOF"),
        }
    }
}

/// A 6800 CPU register name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Register {
    A,
    B,
    X,
    Pc,
    Sp,
    Sr,
}

impl Register {
    /// Looks up a register by its uppercase textual form, if any.
    pub fn lookup(term: &str) -> Option<Self> {
        Some(match term {
            "A" => Register::A,
            "B" => Register::B,
            "X" => Register::X,
            "PC" => Register::Pc,
            "SP" => Register::Sp,
            "SR" => Register::Sr,
            _ => return None,
        })
    }
}

impl Display for Register {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            Register::A => "A",
            Register::B => "B",
            Register::X => "X",
            Register::Pc => "PC",
            Register::Sp => "SP",
            Register::Sr => "SR",
        };
        write!(f, "{}", s)
    }
}

/// The addressing mode an instruction was assembled with.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum AddressingMode {
    Acc,
    Imm,
    Dir,
    Ext,
    Idx,
    Inh,
    Rel,
}

impl Display for AddressingMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            AddressingMode::Acc => "ACC",
            AddressingMode::Imm => "IMM",
            AddressingMode::Dir => "DIR",
            AddressingMode::Ext => "EXT",
            AddressingMode::Idx => "IDX",
            AddressingMode::Inh => "INH",
            AddressingMode::Rel => "REL",
        };
        write!(f, "{}", s)
    }
}

/// A 6800 instruction mnemonic. All 72 mnemonics of the ISA.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Mnemonic {
    Aba, Adc, Add, And, Asl, Asr, Bcc, Bcs, Beq, Bge,
    Bgt, Bhi, Bit, Ble, Bls, Blt, Bmi, Bne, Bpl, Bra,
    Bsr, Bvc, Bvs, Cba, Clc, Cli, Clr, Clv, Cmp, Com,
    Cpx, Daa, Dec, Des, Dex, Eor, Inc, Ins, Inx, Jmp,
    Jsr, Lda, Lds, Ldx, Lsr, Neg, Nop, Ora, Psh, Pul,
    Rol, Ror, Rti, Rts, Sba, Sbc, Sec, Sei, Sev, Sta,
    Sts, Stx, Sub, Swi, Tab, Tap, Tba, Tpa, Tst, Tsx,
    Txs, Wai,
}

impl Mnemonic {
    /// Looks up a mnemonic by its uppercase 3-letter textual form, if any.
    pub fn lookup(term: &str) -> Option<Self> {
        use Mnemonic::*;
        Some(match term {
            "ABA" => Aba, "ADC" => Adc, "ADD" => Add, "AND" => And,
            "ASL" => Asl, "ASR" => Asr, "BCC" => Bcc, "BCS" => Bcs,
            "BEQ" => Beq, "BGE" => Bge, "BGT" => Bgt, "BHI" => Bhi,
            "BIT" => Bit, "BLE" => Ble, "BLS" => Bls, "BLT" => Blt,
            "BMI" => Bmi, "BNE" => Bne, "BPL" => Bpl, "BRA" => Bra,
            "BSR" => Bsr, "BVC" => Bvc, "BVS" => Bvs, "CBA" => Cba,
            "CLC" => Clc, "CLI" => Cli, "CLR" => Clr, "CLV" => Clv,
            "CMP" => Cmp, "COM" => Com, "CPX" => Cpx, "DAA" => Daa,
            "DEC" => Dec, "DES" => Des, "DEX" => Dex, "EOR" => Eor,
            "INC" => Inc, "INS" => Ins, "INX" => Inx, "JMP" => Jmp,
            "JSR" => Jsr, "LDA" => Lda, "LDS" => Lds, "LDX" => Ldx,
            "LSR" => Lsr, "NEG" => Neg, "NOP" => Nop, "ORA" => Ora,
            "PSH" => Psh, "PUL" => Pul, "ROL" => Rol, "ROR" => Ror,
            "RTI" => Rti, "RTS" => Rts, "SBA" => Sba, "SBC" => Sbc,
            "SEC" => Sec, "SEI" => Sei, "SEV" => Sev, "STA" => Sta,
            "STS" => Sts, "STX" => Stx, "SUB" => Sub, "SWI" => Swi,
            "TAB" => Tab, "TAP" => Tap, "TBA" => Tba, "TPA" => Tpa,
            "TST" => Tst, "TSX" => Tsx, "TXS" => Txs, "WAI" => Wai,
            _ => return None,
        })
    }

    /// Whether this mnemonic is a branch or jump, i.e. takes a relative
    /// displacement operand (lexer classification rule 10).
    pub fn is_branch_or_jump(self) -> bool {
        use Mnemonic::*;
        matches!(
            self,
            Bcc | Bcs | Beq | Bge | Bgt | Bhi | Ble | Bls | Blt | Bmi
                | Bne | Bpl | Bra | Bsr | Bvc | Bvs | Jmp | Jsr
        )
    }
}

impl Display for Mnemonic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use Mnemonic::*;
        let s = match self {
            Aba => "ABA", Adc => "ADC", Add => "ADD", And => "AND",
            Asl => "ASL", Asr => "ASR", Bcc => "BCC", Bcs => "BCS",
            Beq => "BEQ", Bge => "BGE", Bgt => "BGT", Bhi => "BHI",
            Bit => "BIT", Ble => "BLE", Bls => "BLS", Blt => "BLT",
            Bmi => "BMI", Bne => "BNE", Bpl => "BPL", Bra => "BRA",
            Bsr => "BSR", Bvc => "BVC", Bvs => "BVS", Cba => "CBA",
            Clc => "CLC", Cli => "CLI", Clr => "CLR", Clv => "CLV",
            Cmp => "CMP", Com => "COM", Cpx => "CPX", Daa => "DAA",
            Dec => "DEC", Des => "DES", Dex => "DEX", Eor => "EOR",
            Inc => "INC", Ins => "INS", Inx => "INX", Jmp => "JMP",
            Jsr => "JSR", Lda => "LDA", Lds => "LDS", Ldx => "LDX",
            Lsr => "LSR", Neg => "NEG", Nop => "NOP", Ora => "ORA",
            Psh => "PSH", Pul => "PUL", Rol => "ROL", Ror => "ROR",
            Rti => "RTI", Rts => "RTS", Sba => "SBA", Sbc => "SBC",
            Sec => "SEC", Sei => "SEI", Sev => "SEV", Sta => "STA",
            Sts => "STS", Stx => "STX", Sub => "SUB", Swi => "SWI",
            Tab => "TAB", Tap => "TAP", Tba => "TBA", Tpa => "TPA",
            Tst => "TST", Tsx => "TSX", Txs => "TXS", Wai => "WAI",
        };
        write!(f, "{}", s)
    }
}

/// A scanned token together with its original source text.
///
/// Named after `axel`'s `yylex` record: the raw text is retained so later
/// stages (the parser's `parse_immediate_value`, the operand state machine)
/// can reparse the literal without the lexer re-deriving it.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Yylex {
    pub token: Token,
    pub text: String,
}

impl Yylex {
    pub fn new(token: Token, text: impl Into<String>) -> Self {
        Self { token, text: text.into() }
    }
}
