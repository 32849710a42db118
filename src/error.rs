//! Error types for LineScript
//!
//! Every fault is fatal and carries the source line it originated from.
//! Soft failures (`pop` on an empty stack, `input` type mismatch, `delete`
//! of an unknown name) never surface here; they only set `errorLevel`.

use std::fmt;
use thiserror::Error;

use crate::bytecode::OpCode;

/// Error kinds in LineScript
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    // Lexer errors
    #[error("missing closing quote")]
    UnterminatedString,

    // Desugar errors
    #[error("malformed {keyword} header: {reason}")]
    MalformedHeader {
        keyword: String,
        reason: &'static str,
    },
    #[error("'{0}' block is never closed")]
    UnterminatedBlock(String),
    #[error("else without a preceding if")]
    DanglingElse,
    #[error("else cannot follow a '{0}' block")]
    MisplacedElse(String),
    #[error("closing token without an open block")]
    HangingClose,
    #[error("break outside of loop")]
    BreakOutsideLoop,
    #[error("continue outside of loop")]
    ContinueOutsideLoop,
    #[error("return outside of function")]
    ReturnOutsideFunction,
    #[error("function '{0}' cannot be defined inside another block")]
    NestedFunction(String),
    #[error("function '{0}' is already defined")]
    FunctionRedefinition(String),
    #[error("'{name}' takes {expected} arguments, got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("malformed call to '{0}'")]
    MalformedCall(String),
    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),
    #[error("invalid label '{0}'")]
    InvalidLabel(String),

    // Loader errors
    #[error("missing semicolon")]
    MissingSemicolon,
    #[error("no instruction or identifier named '{0}'")]
    UnknownInstruction(String),
    #[error("no overload of '{name}' matches {signature}")]
    NoMatchingOverload { name: String, signature: String },
    #[error("label '{0}' is already defined")]
    DuplicateLabel(String),

    // Runtime errors
    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),
    #[error("variable '{0}' used before initialization")]
    UninitializedVariable(String),
    #[error("variable '{0}' is already defined")]
    VariableRedefinition(String),
    #[error("'{0}' is a reserved name")]
    ReservedName(String),
    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),
    #[error("'{0}' is read-only")]
    ReadOnlyVariable(String),
    #[error("type mismatch: expected {expected}, got {found}")]
    TypeMismatch { expected: String, found: String },
    #[error("operator '{op}' cannot be applied to {ty}")]
    InvalidOperatorForType { op: String, ty: String },
    #[error("unknown operator '{0}'")]
    InvalidOperator(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("jump to undefined label '{0}'")]
    UndefinedLabel(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("invalid numeric literal '{0}'")]
    InvalidLiteral(String),
    #[error("{op:?} received {count} operands")]
    BadOperands { op: OpCode, count: usize },
    #[error("i/o error: {0}")]
    Io(String),
}

impl ErrorKind {
    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        ErrorKind::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

/// A LineScript error with the line it was raised on
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptError {
    pub kind: ErrorKind,
    pub line: Option<usize>,
    pub source_line: Option<String>,
}

impl ScriptError {
    pub fn new(kind: ErrorKind, line: Option<usize>) -> Self {
        Self {
            kind,
            line,
            source_line: None,
        }
    }

    /// Attach a line unless one was recorded closer to the fault
    pub fn or_line(mut self, line: usize) -> Self {
        if self.line.is_none() {
            self.line = Some(line);
        }
        self
    }

    pub fn with_source(mut self, source: &str) -> Self {
        if let Some(line) = self.line {
            if let Some(text) = line.checked_sub(1).and_then(|i| source.lines().nth(i)) {
                self.source_line = Some(text.trim().to_string());
            }
        }
        self
    }
}

impl From<ErrorKind> for ScriptError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind, None)
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => {
                write!(f, "[line {}] Error: {}", line, self.kind)?;
                if let Some(ref text) = self.source_line {
                    write!(f, "\n  | {}", text)?;
                }
            }
            None => write!(f, "Error: {}", self.kind)?,
        }
        Ok(())
    }
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Result type for LineScript operations
pub type Result<T> = std::result::Result<T, ScriptError>;
