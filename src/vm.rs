//! Execution engine for LineScript
//!
//! Steps a slot counter through a loaded program. Control transfer
//! (`jump`, `call`, `return`, `if`) is done by ordinary operations that
//! overwrite the counter.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace};

use crate::bytecode::{Instruction, OpCode, Program, Slot, SlotId};
use crate::environment::{is_identifier, Environment, ERROR_LEVEL};
use crate::error::{ErrorKind, Result, ScriptError};
use crate::value::{ArithOp, CompareOp, Value};

/// What the engine does after an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Next,
    Halt(i32),
}

/// The Virtual Machine
pub struct VM<'io> {
    /// Next slot to execute
    pc: SlotId,

    pub(crate) env: Environment,

    /// Parameter and return value passing
    operands: Vec<Value>,

    /// Return addresses
    calls: Vec<SlotId>,

    /// Set by the `return` just executed: whether it left a value
    returned: Option<bool>,

    pub(crate) error_level: i64,
    pub(crate) started: Instant,
    pub(crate) rng: StdRng,
    pub(crate) input: Box<dyn BufRead + 'io>,
    pub(crate) output: Box<dyn Write + 'io>,
}

impl VM<'static> {
    /// A VM reading stdin and writing stdout
    pub fn new() -> Self {
        VM::with_io(io::stdin().lock(), io::stdout())
    }
}

impl Default for VM<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'io> VM<'io> {
    pub fn with_io(input: impl BufRead + 'io, output: impl Write + 'io) -> Self {
        Self {
            pc: SlotId::default(),
            env: Environment::new(),
            operands: Vec::new(),
            calls: Vec::new(),
            returned: None,
            error_level: 0,
            started: Instant::now(),
            rng: StdRng::from_entropy(),
            input: Box::new(input),
            output: Box::new(output),
        }
    }

    /// Make `rand` deterministic
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn error_level(&self) -> i64 {
        self.error_level
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.env.get(name).ok()
    }

    /// Run a program to completion and return its exit code
    pub fn run(&mut self, program: &Program) -> Result<i32> {
        self.env.reserve(program.reserved_names());
        self.pc = SlotId::default();

        let result = self.execute(program);
        let flushed = self.output.flush().map_err(io_error);
        let code = result?;
        flushed?;

        debug!(code, "program finished");
        Ok(code)
    }

    fn execute(&mut self, program: &Program) -> Result<i32> {
        loop {
            let current = self.pc;
            let Some(slot) = program.get(current) else {
                return Ok(0);
            };
            self.pc = program.next(current);

            let Slot::Instruction(instr) = slot else {
                continue;
            };
            trace!(slot = %current, line = instr.line, op = ?instr.op, "exec");

            let flow = self.dispatch(program, instr).map_err(|e| e.or_line(instr.line))?;
            if !matches!(instr.op, OpCode::Return | OpCode::ReturnValue) {
                self.returned = None;
            }
            match flow {
                Flow::Next => {}
                Flow::Halt(code) => return Ok(code),
            }
        }
    }

    fn dispatch(&mut self, program: &Program, instr: &Instruction) -> Result<Flow> {
        let args: Vec<&str> = instr.args.iter().map(String::as_str).collect();

        match (instr.op, args.as_slice()) {
            (OpCode::Print, [value]) => self.print(value, false)?,
            (OpCode::PrintLine, [value]) => self.print(value, true)?,
            (OpCode::Endl, []) => self.endl()?,
            (OpCode::Clear, []) => self.clear_screen()?,
            (OpCode::Input, [target]) => self.input(target, None)?,
            (OpCode::InputPrompt, [prompt, target]) => self.input(target, Some(*prompt))?,

            (OpCode::Push, [value]) => {
                let value = self.resolve(value)?;
                self.operands.push(value);
            }
            (OpCode::Pop, [target]) => self.pop_into(target)?,
            // Discarding after a valueless return leaves the caller's operands alone
            (OpCode::PopDiscard, []) if self.returned == Some(false) => {}
            (OpCode::PopDiscard, []) => {
                self.error_level = 0;
                if self.operands.pop().is_none() {
                    self.error_level = 1;
                }
            }

            (OpCode::Declare, [name, value]) => {
                let value = self.resolve(value)?;
                self.env.declare(name, value)?;
            }
            (OpCode::DeclareUninit, [name]) => self.env.declare(name, Value::Uninitialized)?,
            (OpCode::Assign, [target, value]) => {
                let value = self.resolve(value)?;
                self.store(target, value)?;
            }
            (OpCode::Compound, [target, op, value]) => {
                let op = ArithOp::parse(op)
                    .ok_or_else(|| ErrorKind::InvalidOperator(op.to_string()))?;
                self.writable(target)?;
                let rhs = self.resolve(value)?;
                let result = self.resolve(target)?.apply(op, &rhs)?;
                self.env.set(target, result)?;
            }
            (OpCode::Step, [target, op]) => self.step(target, op)?,
            (OpCode::Delete, [name]) => {
                self.error_level = 0;
                if self.env.remove(name).is_none() {
                    self.error_level = 1;
                }
            }

            (OpCode::Exit, [code]) => return self.exit(code),
            (OpCode::Halt, []) => return Ok(Flow::Halt(0)),
            (OpCode::Jump, [label]) => self.pc = target(program, label)?,
            (OpCode::Call, [label]) => {
                let entry = target(program, label)?;
                self.calls.push(self.pc);
                self.pc = entry;
            }
            (OpCode::Return, []) => {
                self.returned = Some(false);
                return Ok(self.return_to());
            }
            (OpCode::ReturnValue, [value]) => {
                let result = self.resolve(value)?;
                if Value::from_literal(value).is_none() {
                    self.env.remove(value);
                }
                self.operands.push(result);
                self.returned = Some(true);
                return Ok(self.return_to());
            }
            (OpCode::IfCompare, [lhs, cmp, rhs, label]) => {
                let op = CompareOp::parse(cmp)
                    .ok_or_else(|| ErrorKind::InvalidOperator(cmp.to_string()))?;
                let lhs = self.resolve(lhs)?;
                let rhs = self.resolve(rhs)?;
                if !lhs.compare(op, &rhs)? {
                    self.pc = target(program, label)?;
                }
            }
            (OpCode::IfTruthy, [value, label]) => {
                if !self.resolve(value)?.is_truthy()? {
                    self.pc = target(program, label)?;
                }
            }
            (OpCode::IfFalsy, [value, label]) => {
                if self.resolve(value)?.is_truthy()? {
                    self.pc = target(program, label)?;
                }
            }

            (OpCode::Sqrt, [name]) => self.sqrt(name)?,
            (OpCode::Abs, [name]) => self.abs(name)?,
            (OpCode::Rand, [name, low, high]) => self.random(name, low, high)?,
            (OpCode::Millis, [name]) => self.millis(name)?,
            (OpCode::Seconds, [name]) => self.seconds(name)?,
            (OpCode::Delay, [ms]) => self.delay(ms)?,

            (op, args) => {
                return Err(ErrorKind::BadOperands {
                    op,
                    count: args.len(),
                }
                .into())
            }
        }

        Ok(Flow::Next)
    }

    /// Value of a literal, `errorLevel`, or an initialized variable
    pub(crate) fn resolve(&self, operand: &str) -> Result<Value> {
        if let Some(value) = Value::from_literal(operand) {
            return Ok(value);
        }
        if Value::is_numeric_literal(operand) {
            return Err(ErrorKind::InvalidLiteral(operand.to_string()).into());
        }
        if operand == ERROR_LEVEL {
            return Ok(Value::Int(self.error_level));
        }
        match self.env.get(operand)? {
            Value::Uninitialized => {
                Err(ErrorKind::UninitializedVariable(operand.to_string()).into())
            }
            value => Ok(value.clone()),
        }
    }

    /// Whether `name` may be the destination of a write
    pub(crate) fn writable(&self, name: &str) -> Result<()> {
        if name == ERROR_LEVEL {
            return Err(ErrorKind::ReadOnlyVariable(name.to_string()).into());
        }
        if !is_identifier(name) {
            return Err(ErrorKind::InvalidIdentifier(name.to_string()).into());
        }
        Ok(())
    }

    /// Write into an existing variable, converting to its type
    pub(crate) fn store(&mut self, name: &str, value: Value) -> Result<()> {
        self.writable(name)?;
        let value = value.coerce_to(self.env.get(name)?)?;
        self.env.set(name, value)
    }

    /// Pop into a variable of the same type; an Uninitialized one adopts
    /// the value's type
    fn pop_into(&mut self, target: &str) -> Result<()> {
        self.writable(target)?;
        let current = self.env.get(target)?;
        let typed = !matches!(current, Value::Uninitialized);
        let current = current.type_name();

        self.error_level = 0;
        let popped = match self.returned {
            Some(false) => None,
            _ => self.operands.pop(),
        };
        let Some(value) = popped else {
            self.error_level = 1;
            return Ok(());
        };

        if typed && current != value.type_name() {
            return Err(ErrorKind::type_mismatch(current, value.type_name()).into());
        }
        self.env.set(target, value)
    }

    fn step(&mut self, target: &str, op: &str) -> Result<()> {
        let delta = match op {
            "++" => 1,
            "--" => -1,
            other => return Err(ErrorKind::InvalidOperator(other.to_string()).into()),
        };
        self.writable(target)?;

        let value = match self.resolve(target)? {
            Value::Int(n) => Value::Int(n.wrapping_add(delta)),
            Value::Double(n) => Value::Double(n + delta as f64),
            other => {
                return Err(ErrorKind::InvalidOperatorForType {
                    op: op.to_string(),
                    ty: other.type_name().to_string(),
                }
                .into())
            }
        };
        self.env.set(target, value)
    }

    fn exit(&self, operand: &str) -> Result<Flow> {
        match self.resolve(operand)? {
            Value::Int(code) => {
                let code = i32::try_from(code).map_err(|_| {
                    ErrorKind::InvalidArgument(format!("exit code {} is out of range", code))
                })?;
                Ok(Flow::Halt(code))
            }
            other => Err(ErrorKind::type_mismatch("int", other.type_name()).into()),
        }
    }

    /// Pop the call history; an empty history ends the program
    fn return_to(&mut self) -> Flow {
        match self.calls.pop() {
            Some(slot) => {
                self.pc = slot;
                Flow::Next
            }
            None => Flow::Halt(0),
        }
    }
}

fn target(program: &Program, label: &str) -> Result<SlotId> {
    program
        .label(label)
        .ok_or_else(|| ErrorKind::UndefinedLabel(label.to_string()).into())
}

pub(crate) fn io_error(err: io::Error) -> ScriptError {
    ErrorKind::Io(err.to_string()).into()
}
