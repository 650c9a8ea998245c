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

use std::env::args;
use std::fs;
use std::io::{stdin, Read};
use std::process::exit;

use colored::Colorize;

use m6800as::asm::{Assembler, AssemblyOutput};
use m6800as::lexer::Lexer;
use m6800as::message::Message;
use m6800as::symbol::SymbolTable;
use m6800as::token::Token;

/// The name of the assembler.
pub const PROGRAM_NAME: &str = "m6800as";

fn main() {
    let paths: Vec<String> = args().skip(1).collect();

    let ok = if paths.is_empty() {
        process("stdin", &read_stdin())
    } else {
        paths.iter().all(|path| match read_source(path) {
            Ok(source) => process(path, &source),
            Err(e) => {
                eprintln!("{} {}: {}", "error:".red().bold(), path, e);
                false
            }
        })
    };

    if !ok {
        exit(1);
    }
}

fn read_source(path: &str) -> std::io::Result<String> {
    if path == "-" {
        Ok(read_stdin())
    } else {
        fs::read_to_string(path)
    }
}

fn read_stdin() -> String {
    let mut buffer = String::new();
    let _ = stdin().read_to_string(&mut buffer);
    buffer
}

/// Assembles one source unit, printing its token stream and (on success)
/// its symbol table and byte output. Returns whether assembly succeeded.
fn process(label: &str, source: &str) -> bool {
    println!("== {} ==", label);
    print_tokens(source);

    match Assembler::new().assemble_str(source) {
        Ok(output) => {
            print_symbol_table(&output.symbols);
            print_bytes(&output);
            true
        }
        Err(err) => {
            eprintln!("{}", format!("{}{}", err.severity(), err).red().bold());
            false
        }
    }
}

fn print_tokens(source: &str) {
    println!("{:<12} | text", "token");
    println!("{}", "-".repeat(40));
    let mut lexer = Lexer::new(source);
    loop {
        let token = lexer.next();
        println!("{:<12} | {}", token.to_string(), lexer.yylex.text);
        if token == Token::Eof {
            break;
        }
    }
    println!();
}

fn print_symbol_table(symbols: &SymbolTable) {
    println!("{:<12} | kind     | address | value", "symbol");
    println!("{}", "-".repeat(40));
    for (name, entry) in symbols.iter() {
        println!("{:<12} | {:<8?} | {:#06X}  | {:?}", name, entry.kind, entry.address.num, entry.value);
    }
    println!();
}

fn print_bytes(output: &AssemblyOutput) {
    for chunk in output.bytes.chunks(8) {
        let line: Vec<String> = chunk.iter().map(|b| format!("{:02X}", b)).collect();
        println!("{}", line.join(" "));
    }
}
