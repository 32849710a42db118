//! Instruction registry for LineScript
//!
//! Maps an instruction name plus the exact token shape that follows it to
//! an opcode. Statements whose head is not an instruction name go through
//! the separate variable-statement table.

use std::collections::HashMap;

use crate::bytecode::OpCode;
use crate::error::{ErrorKind, Result};
use crate::token::TokenKind::{self, *};

/// One accepted token shape of an instruction
#[derive(Debug, Clone, Copy)]
pub struct Overload {
    pub signature: &'static [TokenKind],
    pub op: OpCode,
}

const NONE: &[TokenKind] = &[];
const EMPTY_CALL: &[TokenKind] = &[OpenParen, CloseParen];
const UNARY_CALL: &[TokenKind] = &[OpenParen, Argument, CloseParen];
const UNARY_COLON: &[TokenKind] = &[Colon, Argument];
const BINARY_CALL: &[TokenKind] = &[OpenParen, Argument, Comma, Argument, CloseParen];
const BINARY_COLON: &[TokenKind] = &[Colon, Argument, Comma, Argument];
const TERNARY_CALL: &[TokenKind] = &[
    OpenParen, Argument, Comma, Argument, Comma, Argument, CloseParen,
];
const TERNARY_COLON: &[TokenKind] = &[Colon, Argument, Comma, Argument, Comma, Argument];

/// Registered instructions and their overloads
#[derive(Debug)]
pub struct Registry {
    instructions: HashMap<&'static str, Vec<Overload>>,
    variable_statements: Vec<Overload>,
}

impl Registry {
    pub fn new() -> Self {
        let mut registry = Self {
            instructions: HashMap::new(),
            variable_statements: Vec::new(),
        };
        registry.define_builtins();
        registry
    }

    fn define_builtins(&mut self) {
        // Output and input
        self.define_unary("print", OpCode::Print);
        self.define_unary("printl", OpCode::PrintLine);
        self.define_nullary("endl", OpCode::Endl);
        self.define_nullary("cls", OpCode::Clear);
        self.define_unary("input", OpCode::Input);
        self.define("input", BINARY_CALL, OpCode::InputPrompt);
        self.define("input", BINARY_COLON, OpCode::InputPrompt);

        // Operand stack
        self.define_unary("push", OpCode::Push);
        self.define_unary("pop", OpCode::Pop);
        self.define_nullary("pop", OpCode::PopDiscard);

        // Variables
        self.define("var", &[Argument, Assign, Argument], OpCode::Declare);
        self.define("var", &[Argument], OpCode::DeclareUninit);
        self.define_unary("delete", OpCode::Delete);

        // Control flow
        self.define_unary("exit", OpCode::Exit);
        self.define("exit", NONE, OpCode::Halt);
        self.define_unary("jump", OpCode::Jump);
        self.define_unary("call", OpCode::Call);
        self.define("return", NONE, OpCode::Return);
        self.define("return", &[Argument], OpCode::ReturnValue);
        self.define("return", UNARY_CALL, OpCode::ReturnValue);
        self.define(
            "if",
            &[Argument, Comparison, Argument, Comma, Argument],
            OpCode::IfCompare,
        );
        self.define("if", &[Argument, Comma, Argument], OpCode::IfTruthy);
        self.define("if", &[Negation, Argument, Comma, Argument], OpCode::IfFalsy);

        // Math and timing
        self.define_unary("sqrt", OpCode::Sqrt);
        self.define_unary("abs", OpCode::Abs);
        self.define("rand", TERNARY_CALL, OpCode::Rand);
        self.define("rand", TERNARY_COLON, OpCode::Rand);
        self.define_unary("millis", OpCode::Millis);
        self.define_unary("seconds", OpCode::Seconds);
        self.define_unary("delay", OpCode::Delay);

        // Bare identifier statements
        self.variable_statements = vec![
            Overload {
                signature: &[Argument, Assign, Argument],
                op: OpCode::Assign,
            },
            Overload {
                signature: &[Argument, CompoundOp, Argument],
                op: OpCode::Compound,
            },
            Overload {
                signature: &[Argument, CompoundOp],
                op: OpCode::Step,
            },
        ];
    }

    /// Register one overload of an instruction
    pub fn define(&mut self, name: &'static str, signature: &'static [TokenKind], op: OpCode) {
        self.instructions
            .entry(name)
            .or_default()
            .push(Overload { signature, op });
    }

    /// `name(x)` and `name: x`
    fn define_unary(&mut self, name: &'static str, op: OpCode) {
        self.define(name, UNARY_CALL, op);
        self.define(name, UNARY_COLON, op);
    }

    /// `name;` and `name();`
    fn define_nullary(&mut self, name: &'static str, op: OpCode) {
        self.define(name, NONE, op);
        self.define(name, EMPTY_CALL, op);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.instructions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.instructions.keys().copied()
    }

    /// Find the overload of `name` whose signature equals `signature`
    pub fn resolve(&self, name: &str, signature: &[TokenKind]) -> Result<OpCode> {
        let overloads = self
            .instructions
            .get(name)
            .ok_or_else(|| ErrorKind::UnknownInstruction(name.to_string()))?;

        overloads
            .iter()
            .find(|o| o.signature == signature)
            .map(|o| o.op)
            .ok_or_else(|| {
                ErrorKind::NoMatchingOverload {
                    name: name.to_string(),
                    signature: describe(signature),
                }
                .into()
            })
    }

    /// Resolve a statement headed by a variable name. `head` is only used
    /// for the diagnostic.
    pub fn resolve_variable_statement(&self, head: &str, signature: &[TokenKind]) -> Result<OpCode> {
        self.variable_statements
            .iter()
            .find(|o| o.signature == signature)
            .map(|o| o.op)
            .ok_or_else(|| ErrorKind::UnknownInstruction(head.to_string()).into())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a token shape for diagnostics
pub fn describe(signature: &[TokenKind]) -> String {
    if signature.is_empty() {
        return "no arguments".to_string();
    }
    let parts: Vec<String> = signature.iter().map(|k| k.to_string()).collect();
    format!("[{}]", parts.join(" "))
}
