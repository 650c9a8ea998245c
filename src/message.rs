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

//! Assembler messages and the single parser error surface.

use std::error;
use std::fmt::{self, Display, Formatter};

/// Trait for assembler message types.
pub trait Message: Display {
    /// Returns the severity level of the message.
    #[inline]
    fn severity(&self) -> Severity { Severity::Normal }
}

impl Message for str    {}
impl Message for String {}

/// Message severity levels.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Severity {
    /// For informational messages.
    Normal,

    /// For potential problems that do not prevent complete assembly.
    Warning,

    /// For problems that prevent complete assembly.
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match *self {
            Severity::Normal  => "",
            Severity::Warning => "warning: ",
            Severity::Error   => "error: ",
        })
    }
}

/// The assembler's single error kind (spec §7): lexical-unknown tokens,
/// parser `take()` mismatches, operand-shape mismatches, and semantic
/// failures (a malformed variable re-decode) all surface as this one type.
///
/// There is no recovery: the translation unit aborts at the first one
/// raised.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ParserError {
    /// Up to 12 characters of source text at the point of failure.
    pub window: String,

    /// The tag(s) that would have been accepted.
    pub expected: Vec<String>,

    /// The tag that was actually found.
    pub found: String,

    /// The 1-based line number of the failure.
    pub line: u32,
}

impl ParserError {
    pub fn new(window: impl Into<String>, expected: Vec<String>, found: impl Into<String>, line: u32) -> Self {
        Self { window: window.into(), expected, found: found.into(), line }
    }
}

impl Display for ParserError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let expected = self.expected.join(", ");
        write!(
            f,
            "Parser failed near \"{}\", expected one of {}, but found \"{}\" on line {}.",
            self.window, expected, self.found, self.line,
        )
    }
}

impl Message for ParserError {
    fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl error::Error for ParserError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parser_error_matches_message_template() {
        let err = ParserError::new("FAIL\n", vec!["T_ADD".into()], "T_EOL", 2);
        assert_eq!(
            err.to_string(),
            "Parser failed near \"FAIL\n\", expected one of T_ADD, but found \"T_EOL\" on line 2.",
        );
    }

    #[test]
    fn parser_error_has_error_severity() {
        let err = ParserError::new("", vec![], "", 1);
        assert_eq!(err.severity(), Severity::Error);
    }
}
