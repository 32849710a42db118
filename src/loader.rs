//! Program loader for LineScript
//!
//! Binds every flat statement to an opcode through the registry and lays
//! the result out as slots, recording label positions as it goes.

use tracing::debug;

use crate::bytecode::{Instruction, Program};
use crate::desugar::{FlatProgram, FlatStmt};
use crate::error::{ErrorKind, Result};
use crate::parser::Statement;
use crate::registry::Registry;
use crate::token::{Token, TokenKind};

pub struct Loader<'r> {
    registry: &'r Registry,
}

impl<'r> Loader<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn load(&self, flat: FlatProgram) -> Result<Program> {
        let mut program = Program::new();
        let mut labels = Vec::new();

        for stmt in flat.statements {
            let line = stmt.line();
            let loaded = match stmt {
                FlatStmt::Label { name, .. } => program.push_label(&name).map(|_| labels.push(name)),
                FlatStmt::Statement(stmt) => self.bind(&stmt).map(|instruction| {
                    program.push(instruction);
                }),
            };
            loaded.map_err(|e| e.or_line(line))?;
        }

        debug!(
            slots = program.len(),
            labels = labels.len(),
            functions = flat.functions.len(),
            "program loaded"
        );

        program.reserve(self.registry.names().map(str::to_string));
        program.reserve(labels);
        Ok(program)
    }

    /// Resolve one statement. A head that names an instruction selects it;
    /// anything else is a statement on a variable.
    fn bind(&self, stmt: &Statement) -> Result<Instruction> {
        let body = match stmt.tokens.split_last() {
            Some((last, body)) if last.kind == TokenKind::Semicolon => body,
            _ => return Err(ErrorKind::MissingSemicolon.into()),
        };
        let Some(head) = body.first() else {
            return Err(ErrorKind::UnexpectedToken(";".to_string()).into());
        };

        if head.is_argument() && self.registry.contains(&head.lexeme) {
            let rest = &body[1..];
            let op = self.registry.resolve(&head.lexeme, &signature(rest))?;
            Ok(Instruction::new(op, operands(rest), stmt.line))
        } else {
            let op = self
                .registry
                .resolve_variable_statement(&head.lexeme, &signature(body))?;
            Ok(Instruction::new(op, operands(body), stmt.line))
        }
    }
}

fn signature(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind).collect()
}

/// Lexemes the operation consumes: arguments and operators
fn operands(tokens: &[Token]) -> Vec<String> {
    tokens
        .iter()
        .filter(|t| {
            matches!(
                t.kind,
                TokenKind::Argument | TokenKind::CompoundOp | TokenKind::Comparison
            )
        })
        .map(|t| t.lexeme.clone())
        .collect()
}
