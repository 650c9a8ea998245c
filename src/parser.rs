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

//! Recursive-descent parser: line grammar, operand collection, and
//! variable/label reconciliation.

use std::collections::VecDeque;

use crate::lexer::Lexer;
use crate::message::ParserError;
use crate::symbol::{SymbolKind, SymbolValue};
use crate::token::{Mnemonic, Token, Yylex};

const WINDOW_LEN: usize = 12;

/// The outcome of parsing one logical line (spec §4.E's `line()`).
pub enum Line {
    /// Source exhausted.
    Eof,

    /// A `name = value` declaration.
    Variable,

    /// A labeled or bare instruction, with its collected operand deque.
    Instruction(Mnemonic, VecDeque<Yylex>),
}

pub struct Parser {
    pub lexer: Lexer,
    line: u32,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Self { lexer: Lexer::new(source), line: 1 }
    }

    fn error(&self, expected: Vec<String>, found: Token) -> ParserError {
        let window = self.lexer.window(self.lexer.last_addr, WINDOW_LEN);
        ParserError::new(window, expected, found.to_string(), self.line)
    }

    /// Builds a parser error from an already-formatted expected-set
    /// description, for contexts (the operand state machine) that report
    /// on a deque the cursor has already moved past.
    pub(crate) fn context_error(&self, expected: impl Into<String>, found: Token) -> ParserError {
        self.error(vec![expected.into()], found)
    }

    /// Consumes one token; if its tag is not in `expected`, retracts the
    /// lexer and raises a parser error. Never swallows a token on failure.
    pub fn take(&mut self, expected: &[Token]) -> Result<Token, ParserError> {
        let found = self.lexer.next();
        if expected.contains(&found) {
            Ok(found)
        } else {
            self.lexer.retract();
            let labels = expected.iter().map(Token::to_string).collect();
            Err(self.error(labels, found))
        }
    }

    fn expect_mnemonic(&mut self) -> Result<Mnemonic, ParserError> {
        let found = self.lexer.next();
        if let Token::Mnemonic(m) = found {
            Ok(m)
        } else {
            self.lexer.retract();
            Err(self.error(vec!["T_MNEMONIC".into()], found))
        }
    }

    /// Parses one logical line. Skips leading `EOL` tokens, counting lines.
    pub fn line(&mut self) -> Result<Line, ParserError> {
        let mut current = self.lexer.next();
        while current == Token::Eol {
            self.line += 1;
            current = self.lexer.next();
        }

        match current {
            Token::Eof => Ok(Line::Eof),

            Token::Label => {
                let mnemonic = self.expect_mnemonic()?;
                let operands = self.operands();
                self.take(&[Token::Eol])?;
                self.line += 1;
                Ok(Line::Instruction(mnemonic, operands))
            }

            Token::Variable => {
                let name = self.lexer.yylex.text.clone();
                self.variable(&name)?;
                self.take(&[Token::Eol])?;
                self.line += 1;
                Ok(Line::Variable)
            }

            Token::Mnemonic(m) => {
                let operands = self.operands();
                self.take(&[Token::Eol])?;
                self.line += 1;
                Ok(Line::Instruction(m, operands))
            }

            other => Err(self.error(
                vec!["T_LABEL".into(), "T_VARIABLE".into(), "T_MNEMONIC".into()],
                other,
            )),
        }
    }

    /// Consumes `EQUAL` then a direct/extended address, decodes the
    /// variable's pending raw-text value, and rewrites its symbol table
    /// entry with the decoded bytes.
    fn variable(&mut self, name: &str) -> Result<(), ParserError> {
        self.take(&[Token::Equal])?;
        self.take(&[Token::DirAddrU8, Token::ExtAddrU16])?;

        let addr = self.lexer.symbols.get(name).map(|e| e.address);
        let raw = self.lexer.symbols.get(name).and_then(|e| match &e.value {
            SymbolValue::Text(s) => Some(s.clone()),
            _ => None,
        });

        match (addr, raw) {
            (Some(addr), Some(raw)) => {
                let bytes = parse_immediate_value(&raw)
                    .ok_or_else(|| self.error(vec!["hex literal".into()], Token::Unknown))?;
                self.lexer.symbols.set(name, addr, SymbolKind::Variable, SymbolValue::Bytes(bytes));
                Ok(())
            }
            _ => Err(self.error(vec!["variable data".into()], Token::Unknown)),
        }
    }

    /// Greedily consumes registers, commas, and numeric-literal operands.
    /// Each accepted token is prepended, so the primary operand ends up at
    /// the back of the deque. Stops, with retraction, on the first
    /// unexpected token or on end-of-stream.
    fn operands(&mut self) -> VecDeque<Yylex> {
        let mut deque = VecDeque::new();
        loop {
            let found = self.lexer.next();
            let accepted = matches!(
                found,
                Token::Register(_)
                    | Token::Comma
                    | Token::ImmU8
                    | Token::ImmU16
                    | Token::DirAddrU8
                    | Token::ExtAddrU16
                    | Token::DispAddrI8
            );
            if accepted {
                deque.push_front(self.lexer.yylex.clone());
            } else {
                self.lexer.retract();
                break;
            }
        }
        deque
    }
}

/// Parses `#$XX`/`#$XXXX` or `$XX`/`$XXXX` hexadecimal literals into bytes.
pub fn parse_immediate_value(text: &str) -> Option<Vec<u8>> {
    let hex = if let Some(rest) = text.strip_prefix("#$") {
        rest
    } else {
        text.strip_prefix('$')?
    };
    hex_to_bytes(hex)
}

fn hex_to_bytes(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_immediate_value_hash_and_bare_dollar_agree() {
        assert_eq!(parse_immediate_value("#$10"), Some(vec![0x10]));
        assert_eq!(parse_immediate_value("$10"), Some(vec![0x10]));
    }

    #[test]
    fn variable_declaration_parses_then_decodes() {
        let mut parser = Parser::new("OUTCH = $FE3A\n");
        match parser.line().unwrap() {
            Line::Variable => {}
            _ => panic!("expected a variable line"),
        }
        let entry = parser.lexer.symbols.get("OUTCH").unwrap();
        assert_eq!(entry.value, SymbolValue::Bytes(vec![0xFE, 0x3A]));
    }

    #[test]
    fn labeled_instruction_yields_mnemonic_and_operands() {
        let mut parser = Parser::new("START JSR $FCBC\n");
        match parser.line().unwrap() {
            Line::Instruction(m, ops) => {
                assert_eq!(m, Mnemonic::Jsr);
                assert_eq!(ops.len(), 1);
                assert_eq!(ops[0].token, Token::ExtAddrU16);
            }
            _ => panic!("expected an instruction line"),
        }
        assert!(parser.lexer.symbols.contains("START"));
    }

    #[test]
    fn bare_instruction_with_no_operands() {
        let mut parser = Parser::new("ABA\n");
        match parser.line().unwrap() {
            Line::Instruction(m, ops) => {
                assert_eq!(m, Mnemonic::Aba);
                assert!(ops.is_empty());
            }
            _ => panic!("expected an instruction line"),
        }
    }

    #[test]
    fn unrecognized_term_rejects_a_mnemonic_expectation() {
        // "FAIL" lexes to UNKNOWN (spec §7: tolerated until the parser
        // rejects it), so `take` on an unrelated expectation fails here
        // rather than after skipping ahead.
        let mut parser = Parser::new("FAIL\nADD B #$10\n");
        let err = parser.take(&[Token::Mnemonic(Mnemonic::Add)]).unwrap_err();
        assert_eq!(err.found, "T_UNKNOWN");
    }

    #[test]
    fn take_rejects_an_unexpected_but_valid_token() {
        let mut parser = Parser::new("ADD B #$10\n");
        let err = parser.take(&[Token::Variable]).unwrap_err();
        assert_eq!(err.found, "T_ADD");
    }

    #[test]
    fn eof_on_empty_source() {
        let mut parser = Parser::new("");
        match parser.line().unwrap() {
            Line::Eof => {}
            _ => panic!("expected Eof"),
        }
    }
}
