//! Loaded program representation for the LineScript VM
//!
//! A program is an arena of slots. Each slot is either a label (a named
//! position with no behaviour) or an instruction bound to its operands.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::{ErrorKind, Result};

/// Operations the VM can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    // Output and input
    Print,
    PrintLine,
    Endl,
    Clear,
    Input,
    InputPrompt,

    // Operand stack
    Push,
    Pop,
    PopDiscard,

    // Variables
    Declare,
    DeclareUninit,
    Assign,
    Compound, // target, operator, operand
    Step,     // target, ++ or --
    Delete,

    // Control flow
    Exit,
    Halt,
    Jump,
    Call,
    Return,
    ReturnValue,
    IfCompare, // lhs, cmp, rhs, label
    IfTruthy,  // value, label: jump when falsy
    IfFalsy,   // value, label: jump when truthy

    // Math and timing
    Sqrt,
    Abs,
    Rand,
    Millis,
    Seconds,
    Delay,
}

/// Position of a slot in a loaded program
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(usize);

impl SlotId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// An operation bound to its operand lexemes
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub op: OpCode,
    pub args: Vec<String>,
    pub line: usize,
}

impl Instruction {
    pub fn new(op: OpCode, args: Vec<String>, line: usize) -> Self {
        Self { op, args, line }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Label(String),
    Instruction(Instruction),
}

/// A fully loaded program
#[derive(Debug, Clone, Default)]
pub struct Program {
    slots: Vec<Slot>,
    labels: HashMap<String, SlotId>,
    reserved: HashSet<String>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a label at the next slot position
    pub fn push_label(&mut self, name: &str) -> Result<SlotId> {
        if self.labels.contains_key(name) {
            return Err(ErrorKind::DuplicateLabel(name.to_string()).into());
        }
        let id = SlotId(self.slots.len());
        self.labels.insert(name.to_string(), id);
        self.slots.push(Slot::Label(name.to_string()));
        Ok(id)
    }

    pub fn push(&mut self, instruction: Instruction) -> SlotId {
        let id = SlotId(self.slots.len());
        self.slots.push(Slot::Instruction(instruction));
        id
    }

    pub fn get(&self, id: SlotId) -> Option<&Slot> {
        self.slots.get(id.0)
    }

    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    pub fn label(&self, name: &str) -> Option<SlotId> {
        self.labels.get(name).copied()
    }

    /// The slot after `id`, used as a return address
    pub fn next(&self, id: SlotId) -> SlotId {
        SlotId(id.0 + 1)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Names the VM must refuse as variable names
    pub fn reserve<I: IntoIterator<Item = String>>(&mut self, names: I) {
        self.reserved.extend(names);
    }

    pub fn reserved_names(&self) -> impl Iterator<Item = &str> {
        self.reserved.iter().map(String::as_str)
    }

    /// Disassemble for debugging
    pub fn disassemble(&self, name: &str) -> String {
        let mut result = format!("== {} ==\n", name);

        for (index, slot) in self.slots.iter().enumerate() {
            let line = match slot {
                Slot::Label(label) => format!("{:04}      ={}", index, label),
                Slot::Instruction(instr) if instr.args.is_empty() => {
                    format!("{:04} {:4} {:?}", index, instr.line, instr.op)
                }
                Slot::Instruction(instr) => format!(
                    "{:04} {:4} {:?} {}",
                    index,
                    instr.line,
                    instr.op,
                    instr.args.join(" ")
                ),
            };
            result.push_str(&line);
            result.push('\n');
        }

        result
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.disassemble("program"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_alias_positions() {
        let mut program = Program::new();
        program.push(Instruction::new(OpCode::Endl, vec![], 1));
        let top = program.push_label("top").unwrap();
        program.push(Instruction::new(OpCode::Jump, vec!["top".into()], 2));

        assert_eq!(top.index(), 1);
        assert_eq!(program.label("top"), Some(top));
        assert_eq!(program.label("missing"), None);
        assert_eq!(program.len(), 3);
        assert!(matches!(program.get(top), Some(Slot::Label(_))));
    }

    #[test]
    fn test_duplicate_label() {
        let mut program = Program::new();
        program.push_label("again").unwrap();
        let err = program.push_label("again").unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateLabel("again".into()));
    }

    #[test]
    fn test_disassemble() {
        let mut program = Program::new();
        program.push_label("start").unwrap();
        program.push(Instruction::new(OpCode::PrintLine, vec!["\"hi\"".into()], 3));
        program.push(Instruction::new(OpCode::Return, vec![], 4));

        let disasm = program.disassemble("test");
        assert!(disasm.starts_with("== test =="));
        assert!(disasm.contains("=start"));
        assert!(disasm.contains("0001    3 PrintLine \"hi\""));
        assert!(disasm.contains("Return"));
    }
}
