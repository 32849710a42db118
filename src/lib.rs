//! LineScript - a small line-oriented scripting language
//!
//! Source is split into statements, structured blocks are desugared into
//! labels and jumps, and the flat program runs on a slot-addressed VM.

pub mod token;
pub mod lexer;
pub mod parser;
pub mod value;
pub mod environment;
pub mod error;
pub mod registry;
pub mod bytecode;
pub mod desugar;
pub mod loader;
pub mod vm;
mod builtins;

use std::io::{BufRead, Write};

pub use bytecode::Program;
pub use error::{ErrorKind, Result, ScriptError};
pub use parser::Parser;
pub use value::Value;
pub use vm::VM;

use desugar::Desugarer;
use loader::Loader;
use registry::Registry;

/// Parse, desugar and load a program
pub fn compile(source: &str) -> Result<Program> {
    let statements = Parser::new(source).parse()?;
    let registry = Registry::new();
    let flat = Desugarer::new(registry.names()).desugar(statements)?;
    Loader::new(&registry).load(flat)
}

/// Convenience function to run LineScript code on stdin/stdout
pub fn run(source: &str) -> Result<i32> {
    let program = compile(source).map_err(|e| e.with_source(source))?;
    VM::new().run(&program).map_err(|e| e.with_source(source))
}

/// Run with caller-supplied input and output
pub fn run_with_io(source: &str, input: impl BufRead, output: impl Write) -> Result<i32> {
    let program = compile(source).map_err(|e| e.with_source(source))?;
    VM::with_io(input, output)
        .run(&program)
        .map_err(|e| e.with_source(source))
}

/// Version of the LineScript interpreter
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
