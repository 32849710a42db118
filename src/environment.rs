//! Variable store for LineScript
//!
//! One flat table per run. Names follow the identifier rules and may not
//! collide with keywords, type names, instruction names or labels.

use std::collections::{HashMap, HashSet};

use crate::error::{ErrorKind, Result, ScriptError};
use crate::token::KEYWORDS;
use crate::value::Value;

/// Read-only pseudo-variable exposing the soft-failure flag
pub const ERROR_LEVEL: &str = "errorLevel";

pub const TYPE_NAMES: &[&str] = &["string", "int", "double", "bool"];

/// Alphanumeric or `_`, and not purely numeric
pub fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.chars().all(|c| c.is_ascii_digit())
}

/// Name → value table
#[derive(Debug)]
pub struct Environment {
    values: HashMap<String, Value>,
    reserved: HashSet<String>,
}

impl Environment {
    pub fn new() -> Self {
        let reserved = KEYWORDS
            .iter()
            .chain(TYPE_NAMES)
            .chain(&[ERROR_LEVEL, "true", "false"])
            .map(|s| s.to_string())
            .collect();

        Self {
            values: HashMap::new(),
            reserved,
        }
    }

    /// Reserve additional names (instructions, labels)
    pub fn reserve<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved.extend(names.into_iter().map(Into::into));
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.contains(name)
    }

    /// Declare a new variable
    pub fn declare(&mut self, name: &str, value: Value) -> Result<()> {
        if !is_identifier(name) {
            return Err(error(ErrorKind::InvalidIdentifier(name.to_string())));
        }
        if self.is_reserved(name) {
            return Err(error(ErrorKind::ReservedName(name.to_string())));
        }
        if self.values.contains_key(name) {
            return Err(error(ErrorKind::VariableRedefinition(name.to_string())));
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Value> {
        self.values
            .get(name)
            .ok_or_else(|| error(ErrorKind::UndefinedVariable(name.to_string())))
    }

    /// Overwrite an existing variable. Type rules are the caller's job.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(error(ErrorKind::UndefinedVariable(name.to_string()))),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

fn error(kind: ErrorKind) -> ScriptError {
    ScriptError::new(kind, None)
}
