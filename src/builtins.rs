//! Library instructions: output, input, math helpers and timing

use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;

use rand::Rng;

use crate::error::{ErrorKind, Result, ScriptError};
use crate::value::Value;
use crate::vm::{io_error, VM};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[1;1H";

impl<'io> VM<'io> {
    pub(crate) fn print(&mut self, operand: &str, newline: bool) -> Result<()> {
        let value = self.resolve(operand)?;
        write!(self.output, "{}", value).map_err(io_error)?;
        if newline {
            writeln!(self.output).map_err(io_error)?;
        }
        Ok(())
    }

    pub(crate) fn endl(&mut self) -> Result<()> {
        writeln!(self.output).map_err(io_error)
    }

    pub(crate) fn clear_screen(&mut self) -> Result<()> {
        writeln!(self.output, "{}", CLEAR_SCREEN).map_err(io_error)
    }

    /// Read one line into `target`. A line that does not fit the
    /// variable's type leaves it untouched and sets errorLevel.
    pub(crate) fn input(&mut self, target: &str, prompt: Option<&str>) -> Result<()> {
        if let Some(prompt) = prompt {
            let prompt = self.resolve(prompt)?;
            write!(self.output, "{}", prompt).map_err(io_error)?;
            self.output.flush().map_err(io_error)?;
        }

        self.writable(target)?;
        let current = self.env.get(target)?.clone();
        self.error_level = 0;

        let mut line = String::new();
        self.input.read_line(&mut line).map_err(io_error)?;
        let text = line.trim_end_matches(|c: char| c == '\n' || c == '\r');

        let parsed = match Value::from_literal(text) {
            Some(Value::Str(_)) | None => Value::Str(text.to_string()),
            Some(value) => value,
        };

        let stored = match (&current, parsed) {
            (Value::Uninitialized, value) => Some(value),
            (Value::Str(_), _) => Some(Value::Str(text.to_string())),
            (Value::Double(_), Value::Int(n)) => Some(Value::Double(n as f64)),
            (current, value) if current.type_name() == value.type_name() => Some(value),
            _ => None,
        };

        match stored {
            Some(value) => self.env.set(target, value),
            None => {
                self.error_level = 1;
                Ok(())
            }
        }
    }

    pub(crate) fn sqrt(&mut self, name: &str) -> Result<()> {
        self.writable(name)?;
        let result = match self.resolve(name)? {
            Value::Int(n) if n >= 0 => Value::Int((n as f64).sqrt() as i64),
            Value::Double(n) if n >= 0.0 => Value::Double(n.sqrt()),
            Value::Int(_) | Value::Double(_) => {
                return Err(ErrorKind::InvalidArgument(format!(
                    "sqrt of negative value in '{}'",
                    name
                ))
                .into())
            }
            other => return Err(operator_error("sqrt", &other)),
        };
        self.env.set(name, result)
    }

    pub(crate) fn abs(&mut self, name: &str) -> Result<()> {
        self.writable(name)?;
        let result = match self.resolve(name)? {
            Value::Int(n) => Value::Int(n.wrapping_abs()),
            Value::Double(n) => Value::Double(n.abs()),
            other => return Err(operator_error("abs", &other)),
        };
        self.env.set(name, result)
    }

    /// Uniform value in `[low, high]`; Int bounds give an Int
    pub(crate) fn random(&mut self, name: &str, low: &str, high: &str) -> Result<()> {
        self.writable(name)?;
        let current = self.env.get(name)?.clone();
        let low = self.resolve(low)?;
        let high = self.resolve(high)?;

        let value = match (&low, &high) {
            (Value::Int(a), Value::Int(b)) if a <= b => Value::Int(self.rng.gen_range(*a..=*b)),
            _ => match (low.as_f64(), high.as_f64()) {
                (Some(a), Some(b)) if !(b - a).is_finite() => {
                    return Err(ErrorKind::InvalidArgument(format!(
                        "rand range is not finite: {} to {}",
                        a, b
                    ))
                    .into())
                }
                (Some(a), Some(b)) if a <= b => Value::Double(self.rng.gen_range(a..=b)),
                (Some(a), Some(b)) => {
                    return Err(ErrorKind::InvalidArgument(format!(
                        "rand bounds are reversed: {} > {}",
                        a, b
                    ))
                    .into())
                }
                _ => {
                    let found = if low.is_numeric() { &high } else { &low };
                    return Err(ErrorKind::type_mismatch("int or double", found.type_name()).into());
                }
            },
        };

        let value = value.coerce_to(&current)?;
        self.env.set(name, value)
    }

    pub(crate) fn millis(&mut self, name: &str) -> Result<()> {
        let elapsed = self.started.elapsed().as_millis();
        self.store(name, Value::Int(i64::try_from(elapsed).unwrap_or(i64::MAX)))
    }

    pub(crate) fn seconds(&mut self, name: &str) -> Result<()> {
        let elapsed = self.started.elapsed().as_secs_f64();
        self.store(name, Value::Double(elapsed))
    }

    pub(crate) fn delay(&mut self, operand: &str) -> Result<()> {
        match self.resolve(operand)? {
            Value::Int(ms) if ms >= 0 => {
                self.output.flush().map_err(io_error)?;
                thread::sleep(Duration::from_millis(ms as u64));
                Ok(())
            }
            Value::Int(ms) => {
                Err(ErrorKind::InvalidArgument(format!("delay of {} ms", ms)).into())
            }
            other => Err(ErrorKind::type_mismatch("int", other.type_name()).into()),
        }
    }
}

fn operator_error(op: &str, value: &Value) -> ScriptError {
    ErrorKind::InvalidOperatorForType {
        op: op.to_string(),
        ty: value.type_name().to_string(),
    }
    .into()
}
