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

//! The LL(1) lexical scanner.
//!
//! A term-based cursor scanner, not a character-class DFA: a "term" is the
//! maximal run of non-separator characters, and each term is run through an
//! ordered classification pipeline that commits at the first matching rule.
//! The cursor walks `char` positions rather than raw byte offsets, which is
//! equivalent for the ASCII-only source this language accepts.

use crate::num::U16;
use crate::symbol::{SymbolKind, SymbolTable, SymbolValue};
use crate::token::{Mnemonic, Register, Token, Yylex};

const SEPARATORS: [char; 4] = [',', '\t', '\n', ' '];

/// The set of mnemonics that take a relative displacement operand
/// (classification rule 10).
fn is_branch_or_jump(m: Mnemonic) -> bool {
    m.is_branch_or_jump()
}

/// The LL(1) scanner described in spec §4.D.
pub struct Lexer {
    source: Vec<char>,
    pointer: usize,

    /// Cursor position before the most recently returned token.
    pub last_addr: usize,

    /// The most recent (tag, text) pair.
    pub yylex: Yylex,

    /// The previous cursor position, restored by `retract()`.
    prev_addr: Option<usize>,

    /// The tag of the last token emitted, consulted by the displacement rule.
    last_token: Option<Token>,

    /// Whether the current term begins a new logical line.
    at_line_start: bool,

    /// At most one pending label and one pending variable declaration,
    /// per spec §9's "encode as two optional fields" design note.
    pending_label: Option<String>,
    pending_variable: Option<String>,

    pub symbols: SymbolTable,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            pointer: 0,
            last_addr: 0,
            yylex: Yylex::new(Token::Eof, ""),
            prev_addr: None,
            last_token: None,
            at_line_start: true,
            pending_label: None,
            pending_variable: None,
            symbols: SymbolTable::new(),
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.source.get(self.pointer).copied()
    }

    fn at_end(&self) -> bool {
        self.pointer >= self.source.len()
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek_char() {
                Some(' ') | Some('\t') => self.pointer += 1,
                Some(';') => {
                    while !self.at_end() && self.peek_char() != Some('\n') {
                        self.pointer += 1;
                    }
                }
                _ => break,
            }
        }
    }

    /// Reads the next term: an EOL sequence, a lone comma, or the maximal
    /// run of characters up to (not including) the next separator.
    fn read_term(&mut self) -> String {
        match self.peek_char() {
            Some('\r') if self.source.get(self.pointer + 1) == Some(&'\n') => {
                self.pointer += 2;
                "\r\n".to_string()
            }
            Some('\n') => {
                self.pointer += 1;
                "\n".to_string()
            }
            Some(',') => {
                self.pointer += 1;
                ",".to_string()
            }
            _ => {
                let start = self.pointer;
                while let Some(c) = self.peek_char() {
                    if SEPARATORS.contains(&c) {
                        break;
                    }
                    self.pointer += 1;
                }
                self.source[start..self.pointer].iter().collect()
            }
        }
    }

    /// Reads the next term without permanently moving the cursor.
    fn peek_term(&mut self) -> String {
        let saved = self.pointer;
        self.skip_whitespace_and_comments();
        let term = if self.at_end() { String::new() } else { self.read_term() };
        self.pointer = saved;
        term
    }

    /// Rewinds the cursor to the position before the last returned token.
    /// Composed with `next()`, this is the identity on the cursor.
    pub fn retract(&mut self) {
        if let Some(addr) = self.prev_addr {
            self.pointer = addr;
        }
    }

    /// Returns up to `len` characters of source text starting at `start`,
    /// with newlines replaced by spaces, for use in parser error messages.
    pub fn window(&self, start: usize, len: usize) -> String {
        let end = (start + len).min(self.source.len());
        self.source[start.min(end)..end]
            .iter()
            .map(|&c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect()
    }

    /// Returns the next token, or `Token::Eof` once the source is exhausted.
    pub fn next(&mut self) -> Token {
        // Captured before this call touches the cursor, so `retract()`
        // lands exactly where the previous call left off (not at that
        // call's own `last_addr`, which would rewind an extra token).
        self.prev_addr = Some(self.pointer);
        self.skip_whitespace_and_comments();
        self.last_addr = self.pointer;

        if self.at_end() {
            self.set(Token::Eof, "");
            return Token::Eof;
        }

        let was_line_start = self.at_line_start;
        let term = self.read_term();
        let token = self.classify(&term, was_line_start);
        self.set(token, &term);
        self.at_line_start = matches!(token, Token::Eol);
        self.last_token = Some(token);

        // Symbol construction during the scan (spec §4.D): a mnemonic
        // resolves a pending label; an `=` resolves a pending variable.
        if matches!(token, Token::Mnemonic(_)) {
            self.resolve_pending_label();
        } else if token == Token::Equal {
            self.resolve_pending_variable();
        }

        token
    }

    fn set(&mut self, token: Token, text: &str) {
        self.yylex = Yylex::new(token, text);
    }

    fn classify(&mut self, term: &str, at_line_start: bool) -> Token {
        // Rule 1: EOL.
        if term == "\n" || term == "\r\n" {
            return Token::Eol;
        }

        let upper = term.to_ascii_uppercase();

        // Rule 2: register term (generalizes the X-after-comma index case
        // to every register name, matching `axel`'s register_token tests).
        if let Some(reg) = Register::lookup(&upper) {
            return Token::Register(reg);
        }

        // Rule 3: mnemonic, with the `LDAA`-style 4-letter convention.
        if term.len() == 3 {
            if let Some(m) = Mnemonic::lookup(&upper) {
                return Token::Mnemonic(m);
            }
        }
        if term.len() == 4 {
            let (head, tail) = term.split_at(3);
            if let Some(m) = Mnemonic::lookup(&head.to_ascii_uppercase()) {
                if tail == "A" || tail == "B" {
                    // Put the register letter back for the next term.
                    self.pointer -= 1;
                    return Token::Mnemonic(m);
                }
            }
        }

        // Rule 4: comma.
        if term == "," {
            return Token::Comma;
        }

        // Rule 5: equal.
        if term == "=" {
            return Token::Equal;
        }

        // Rule 6: immediate numeric.
        if let Some(hex) = term.strip_prefix("#$") {
            match hex.len() {
                2 => return Token::ImmU8,
                4 => return Token::ImmU16,
                _ => {}
            }
        }

        // Rule 7: direct/extended numeric.
        if let Some(hex) = term.strip_prefix('$') {
            match hex.len() {
                2 => return Token::DirAddrU8,
                4 => return Token::ExtAddrU16,
                _ => {}
            }
        }

        // Rule 8: equal, re-tested (dead per spec §9's open question; kept
        // for parity with the teacher's own dead-code tolerance).
        if term == "=" {
            return Token::Equal;
        }

        // Rule 9: label.
        let lookahead = self.peek_term();
        let lookahead_is_mnemonic = Mnemonic::lookup(&lookahead.to_ascii_uppercase()).is_some();
        if at_line_start && (lookahead_is_mnemonic || term.ends_with(':')) {
            self.pending_label = Some(term.trim_end_matches(':').to_string());
            return Token::Label;
        }

        // Rule 10: displacement.
        let last_was_branch = matches!(self.last_token, Some(Token::Mnemonic(m)) if is_branch_or_jump(m));
        if last_was_branch && Register::lookup(&upper).is_none() && lookahead != "=" {
            return Token::DispAddrI8;
        }

        // Rule 11: variable.
        if lookahead == "=" {
            self.pending_variable = Some(term.to_string());
            return Token::Variable;
        }

        // Rule 12: fall through, with alias resolution.
        if let Some(entry) = self.symbols.get(term) {
            if let SymbolValue::Text(alias) = entry.value.clone() {
                return self.classify(&alias, at_line_start);
            }
        }
        Token::Unknown
    }

    /// Resolves a pending label against the mnemonic token that was just
    /// produced (spec §4.D, "symbol construction during the scan").
    fn resolve_pending_label(&mut self) {
        if let Some(name) = self.pending_label.take() {
            let addr = U16::from(self.last_addr.saturating_sub(name.len() + 1));
            self.symbols.set(name, addr, SymbolKind::Label, SymbolValue::Address(addr));
        }
    }

    /// Resolves a pending variable declaration against the `EQUAL` token
    /// that was just produced, using its right-hand-side raw text.
    fn resolve_pending_variable(&mut self) {
        if let Some(name) = self.pending_variable.take() {
            let rhs = self.peek_term();
            let addr = U16::from(self.last_addr.saturating_sub(name.len() + 1));
            self.symbols.set(name, addr, SymbolKind::Variable, SymbolValue::Text(rhs));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_terms_separated_by_whitespace() {
        let mut lex = Lexer::new(" ADD  B   #$10  ");
        lex.skip_whitespace_and_comments();
        assert_eq!(lex.read_term(), "ADD");
        lex.skip_whitespace_and_comments();
        assert_eq!(lex.read_term(), "B");
        lex.skip_whitespace_and_comments();
        assert_eq!(lex.read_term(), "#$10");
    }

    #[test]
    fn retract_then_next_is_identity() {
        let mut lex = Lexer::new("ABA\nNOP\n");
        let before = lex.pointer;
        let _ = lex.next();
        lex.retract();
        assert_eq!(lex.pointer, before);
    }

    #[test]
    fn retract_after_second_call_undoes_only_the_second_token() {
        // Regression test: retract() must land right after the first
        // token, not rewind all the way back past it too.
        let mut lex = Lexer::new("ABA\n");
        assert_eq!(lex.next(), Token::Mnemonic(Mnemonic::Aba));
        let after_first = lex.pointer;
        assert_eq!(lex.next(), Token::Eol);
        lex.retract();
        assert_eq!(lex.pointer, after_first);
        assert_eq!(lex.next(), Token::Eol);
    }

    #[test]
    fn mnemonic_four_letter_form_splits_register() {
        let mut lex = Lexer::new("LDAA #$01\n");
        assert_eq!(lex.next(), Token::Mnemonic(Mnemonic::Lda));
        assert_eq!(lex.next(), Token::Register(Register::A));
    }

    #[test]
    fn immediate_and_direct_numeric_widths() {
        let mut lex = Lexer::new("LDA A #$01\n");
        assert_eq!(lex.next(), Token::Mnemonic(Mnemonic::Lda));
        assert_eq!(lex.next(), Token::Register(Register::A));
        assert_eq!(lex.next(), Token::ImmU8);
    }

    #[test]
    fn label_then_mnemonic_then_eol() {
        let mut lex = Lexer::new("START JSR $FCBC\n");
        assert_eq!(lex.next(), Token::Label);
        let mn = lex.next();
        assert_eq!(mn, Token::Mnemonic(Mnemonic::Jsr));
        assert!(lex.symbols.contains("START"));
        assert_eq!(lex.next(), Token::ExtAddrU16);
        assert_eq!(lex.next(), Token::Eol);
    }

    #[test]
    fn variable_declaration_is_recognized() {
        let mut lex = Lexer::new("OUTCH = $FE3A\n");
        assert_eq!(lex.next(), Token::Variable);
        let eq = lex.next();
        assert_eq!(eq, Token::Equal);
        assert!(lex.symbols.contains("OUTCH"));
        assert_eq!(lex.next(), Token::ExtAddrU16);
    }

    #[test]
    fn displacement_after_branch_mnemonic() {
        let mut lex = Lexer::new("BNE WAIT\n");
        assert_eq!(lex.next(), Token::Mnemonic(Mnemonic::Bne));
        assert_eq!(lex.next(), Token::DispAddrI8);
    }
}
