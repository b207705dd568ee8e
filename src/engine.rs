use std::io::Write;

use tracing::{debug, trace};

use crate::arg::{Arg, VarRef};
use crate::error::Error;
use crate::frame::FrameHolder;
use crate::instruction::Instruction;
use crate::io::InputStream;
use crate::label::LabelTable;
use crate::opcode::Opcode;
use crate::value::Value;

/// Owns every piece of mutable state a run needs: frames, the two stacks,
/// the input stream, the output sink, and the program itself. There is
/// exactly one of these per run; nothing here is shared or thread-safe by
/// design (see the concurrency model: IPPcode23 execution is strictly
/// single-threaded). Output is injected as a `Write` rather than hardcoded
/// to `Stdout` so tests can assert on `WRITE`'s exact byte output.
pub struct Engine {
    instructions: Vec<Instruction>,
    labels: LabelTable,
    frames: FrameHolder,
    call_stack: Vec<usize>,
    data_stack: Vec<Value>,
    input: InputStream,
    output: Box<dyn Write>,
}

impl Engine {
    pub fn new(
        instructions: Vec<Instruction>,
        labels: LabelTable,
        input: InputStream,
        output: Box<dyn Write>,
    ) -> Engine {
        Engine {
            instructions,
            labels,
            frames: FrameHolder::new(),
            call_stack: Vec::new(),
            data_stack: Vec::new(),
            input,
            output,
        }
    }

    /// Runs to completion. `Ok(())` on falling off the end (exit 0);
    /// `Err(Error::Exit(code))` on an explicit `EXIT`; any other `Err` is a
    /// runtime violation that should terminate the process with its own
    /// exit code.
    pub fn run(&mut self) -> Result<(), Error> {
        let mut ip = 0usize;
        while ip < self.instructions.len() {
            trace!(ip, opcode = ?self.instructions[ip].opcode, "dispatch");
            ip = self.step(ip)?;
            debug!(ip, frames = ?self.frames, "post-step");
        }
        Ok(())
    }

    /// Executes the instruction at `ip` and returns the next `ip` to run.
    /// This is the do-step model: branches, calls, and returns compute the
    /// next index directly instead of mutating a shared counter that a
    /// caller then increments.
    fn step(&mut self, ip: usize) -> Result<usize, Error> {
        let instruction = self.instructions[ip].clone();
        let args = &instruction.args;

        match instruction.opcode {
            Opcode::MOVE => {
                let value = self.resolve(&args[1])?;
                self.write_var(&args[0], value)?;
            }
            Opcode::CREATEFRAME => self.frames.create_frame(),
            Opcode::PUSHFRAME => self.frames.push_frame()?,
            Opcode::POPFRAME => self.frames.pop_frame()?,
            Opcode::DEFVAR => {
                let var = Self::var(&args[0])?;
                self.frames.define(var.scope, &var.name)?;
            }
            Opcode::CALL => {
                self.call_stack.push(ip);
                let target = self.label_target(&args[0])?;
                return Ok(target);
            }
            Opcode::RETURN => {
                let target = self
                    .call_stack
                    .pop()
                    .ok_or_else(|| Error::MissingValue("call stack is empty".to_string()))?;
                return Ok(target + 1);
            }
            Opcode::PUSHS => {
                let value = self.resolve(&args[0])?;
                self.data_stack.push(value);
            }
            Opcode::POPS => {
                let value = self
                    .data_stack
                    .pop()
                    .ok_or_else(|| Error::MissingValue("data stack is empty".to_string()))?;
                self.write_var(&args[0], value)?;
            }
            Opcode::ADD | Opcode::SUB | Opcode::MUL | Opcode::IDIV => {
                let (a, b) = self.int_pair(&args[1], &args[2])?;
                let result = match instruction.opcode {
                    Opcode::ADD => a.checked_add(b),
                    Opcode::SUB => a.checked_sub(b),
                    Opcode::MUL => a.checked_mul(b),
                    Opcode::IDIV => {
                        if b == 0 {
                            return Err(Error::InvalidOperandValue("division by zero".to_string()));
                        }
                        Some(floor_div(a, b))
                    }
                    _ => unreachable!(),
                }
                .ok_or_else(|| Error::InvalidOperandValue("integer overflow".to_string()))?;
                self.write_var(&args[0], Value::Int(result))?;
            }
            Opcode::LT | Opcode::GT => {
                let a = self.resolve(&args[1])?;
                let b = self.resolve(&args[2])?;
                if matches!(a, Value::Nil) || matches!(b, Value::Nil) {
                    return Err(Error::InvalidOperands(
                        "LT/GT do not accept nil".to_string(),
                    ));
                }
                let ordering = a.partial_cmp(&b).ok_or_else(|| {
                    Error::InvalidOperands("LT/GT require matching operand types".to_string())
                })?;
                let result = match instruction.opcode {
                    Opcode::LT => ordering.is_lt(),
                    Opcode::GT => ordering.is_gt(),
                    _ => unreachable!(),
                };
                self.write_var(&args[0], Value::Bool(result))?;
            }
            Opcode::EQ => {
                let a = self.resolve(&args[1])?;
                let b = self.resolve(&args[2])?;
                let same_tag = std::mem::discriminant(&a) == std::mem::discriminant(&b);
                if !same_tag && !matches!(a, Value::Nil) && !matches!(b, Value::Nil) {
                    return Err(Error::InvalidOperands(
                        "EQ requires matching types or nil".to_string(),
                    ));
                }
                self.write_var(&args[0], Value::Bool(a == b))?;
            }
            Opcode::AND | Opcode::OR => {
                let a = self.resolve_bool(&args[1])?;
                let b = self.resolve_bool(&args[2])?;
                let result = match instruction.opcode {
                    Opcode::AND => a && b,
                    Opcode::OR => a || b,
                    _ => unreachable!(),
                };
                self.write_var(&args[0], Value::Bool(result))?;
            }
            Opcode::NOT => {
                let a = self.resolve_bool(&args[1])?;
                self.write_var(&args[0], Value::Bool(!a))?;
            }
            Opcode::INT2CHAR => {
                let code = self.resolve_int(&args[1])?;
                let ch = u32::try_from(code)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| {
                        Error::InvalidStringOperation(format!("not a valid code point: {}", code))
                    })?;
                self.write_var(&args[0], Value::Str(ch.to_string()))?;
            }
            Opcode::STRI2INT => {
                let s = self.resolve_str(&args[1])?;
                let i = self.resolve_int(&args[2])?;
                let ch = char_at(&s, i)?;
                self.write_var(&args[0], Value::Int(ch as i64))?;
            }
            Opcode::READ => {
                let var = Self::var(&args[0])?;
                let ty = match &args[1] {
                    Arg::Type(ty) => ty.clone(),
                    _ => {
                        return Err(Error::InvalidOperands(
                            "READ's second argument must be a type".to_string(),
                        ))
                    }
                };
                let value = self.read_typed(&ty)?;
                self.frames.set(var.scope, &var.name, value)?;
            }
            Opcode::WRITE => {
                let value = self.resolve(&args[0])?;
                write!(self.output, "{}", value).map_err(|source| Error::InvalidFile {
                    path: "<output>".to_string(),
                    source,
                })?;
            }
            Opcode::CONCAT => {
                let a = self.resolve_str(&args[1])?;
                let b = self.resolve_str(&args[2])?;
                self.write_var(&args[0], Value::Str(a + &b))?;
            }
            Opcode::STRLEN => {
                let s = self.resolve_str(&args[1])?;
                self.write_var(&args[0], Value::Int(s.chars().count() as i64))?;
            }
            Opcode::GETCHAR => {
                let s = self.resolve_str(&args[1])?;
                let i = self.resolve_int(&args[2])?;
                let ch = char_at(&s, i)?;
                self.write_var(&args[0], Value::Str(ch.to_string()))?;
            }
            Opcode::SETCHAR => {
                let var = Self::var(&args[0])?;
                let current = self.resolve_str(&args[0])?;
                let i = self.resolve_int(&args[1])?;
                let replacement = self.resolve_str(&args[2])?;
                let replacement_ch = replacement.chars().next().ok_or_else(|| {
                    Error::InvalidStringOperation("SETCHAR source string is empty".to_string())
                })?;
                let mut chars: Vec<char> = current.chars().collect();
                let index = usize::try_from(i).ok().filter(|idx| *idx < chars.len());
                let index = index.ok_or_else(|| {
                    Error::InvalidStringOperation(format!("index {} out of range", i))
                })?;
                chars[index] = replacement_ch;
                self.frames
                    .set(var.scope, &var.name, Value::Str(chars.into_iter().collect()))?;
            }
            Opcode::TYPE => {
                let ty = self.read_raw_type_name(&args[1])?;
                self.write_var(&args[0], Value::Str(ty.to_string()))?;
            }
            Opcode::LABEL => {}
            Opcode::JUMP => {
                let target = self.label_target(&args[0])?;
                return Ok(target);
            }
            Opcode::JUMPIFEQ | Opcode::JUMPIFNEQ => {
                let a = self.resolve(&args[1])?;
                let b = self.resolve(&args[2])?;
                let same_tag = std::mem::discriminant(&a) == std::mem::discriminant(&b);
                if !same_tag && !matches!(a, Value::Nil) && !matches!(b, Value::Nil) {
                    return Err(Error::InvalidOperands(
                        "JUMPIFEQ/JUMPIFNEQ require matching types or nil".to_string(),
                    ));
                }
                let equal = a == b;
                let take = match instruction.opcode {
                    Opcode::JUMPIFEQ => equal,
                    Opcode::JUMPIFNEQ => !equal,
                    _ => unreachable!(),
                };
                if take {
                    let target = self.label_target(&args[0])?;
                    return Ok(target);
                }
            }
            Opcode::EXIT => {
                let code = self.resolve_int(&args[0])?;
                if !(0..=49).contains(&code) {
                    return Err(Error::InvalidOperandValue(format!(
                        "exit code {} out of range [0, 49]",
                        code
                    )));
                }
                return Err(Error::Exit(code as u8));
            }
            Opcode::DPRINT => {
                let value = self.resolve(&args[0])?;
                debug!(%value, "DPRINT");
            }
            Opcode::BREAK => {
                debug!(ip, call_stack = ?self.call_stack, "BREAK");
            }
        }

        Ok(ip + 1)
    }

    fn var(arg: &Arg) -> Result<&VarRef, Error> {
        match arg {
            Arg::Var(v) => Ok(v),
            _ => Err(Error::InvalidOperands("expected a variable".to_string())),
        }
    }

    fn write_var(&mut self, arg: &Arg, value: Value) -> Result<(), Error> {
        let var = Self::var(arg)?;
        self.frames.set(var.scope, &var.name, value)
    }

    /// Resolves a `symb` argument to its value, failing if the slot is
    /// declared but never assigned.
    fn resolve(&self, arg: &Arg) -> Result<Value, Error> {
        let value = self.resolve_raw(arg)?;
        if matches!(value, Value::Undefined) {
            return Err(Error::MissingValue("read of an unassigned variable".to_string()));
        }
        Ok(value)
    }

    /// Resolves a `symb` argument without rejecting `Undefined`; only
    /// `TYPE` is allowed to see it.
    fn resolve_raw(&self, arg: &Arg) -> Result<Value, Error> {
        match arg {
            Arg::Var(v) => self.frames.get(v.scope, &v.name).map(Value::clone),
            Arg::Int(i) => Ok(Value::Int(*i)),
            Arg::Bool(b) => Ok(Value::Bool(*b)),
            Arg::Str(s) => Ok(Value::Str(s.clone())),
            Arg::Nil => Ok(Value::Nil),
            Arg::Type(_) | Arg::Label(_) => {
                Err(Error::InvalidOperands("not a readable value".to_string()))
            }
        }
    }

    fn read_raw_type_name(&self, arg: &Arg) -> Result<&'static str, Error> {
        Ok(self.resolve_raw(arg)?.type_name())
    }

    fn resolve_int(&self, arg: &Arg) -> Result<i64, Error> {
        match self.resolve(arg)? {
            Value::Int(i) => Ok(i),
            other => Err(Error::InvalidOperands(format!(
                "expected int, found {}",
                other.type_name()
            ))),
        }
    }

    fn resolve_bool(&self, arg: &Arg) -> Result<bool, Error> {
        match self.resolve(arg)? {
            Value::Bool(b) => Ok(b),
            other => Err(Error::InvalidOperands(format!(
                "expected bool, found {}",
                other.type_name()
            ))),
        }
    }

    fn resolve_str(&self, arg: &Arg) -> Result<String, Error> {
        match self.resolve(arg)? {
            Value::Str(s) => Ok(s),
            other => Err(Error::InvalidOperands(format!(
                "expected string, found {}",
                other.type_name()
            ))),
        }
    }

    fn int_pair(&self, a: &Arg, b: &Arg) -> Result<(i64, i64), Error> {
        Ok((self.resolve_int(a)?, self.resolve_int(b)?))
    }

    fn label_target(&self, arg: &Arg) -> Result<usize, Error> {
        match arg {
            Arg::Label(name) => self.labels.resolve(name),
            _ => Err(Error::InvalidOperands("expected a label".to_string())),
        }
    }

    /// Reads one line and interprets it per `ty`. End-of-stream and parse
    /// failures both yield `Nil` (except for `bool`, which only fails to
    /// yield `Nil` on end-of-stream; any non-matching text is `false`).
    fn read_typed(&mut self, ty: &str) -> Result<Value, Error> {
        let line = match self.input.read_line()? {
            Some(line) => line,
            None => return Ok(Value::Nil),
        };
        let value = match ty {
            "int" => crate::arg::parse_int(&line)
                .map(Value::Int)
                .unwrap_or(Value::Nil),
            "bool" => Value::Bool(line.eq_ignore_ascii_case("true")),
            "string" => Value::Str(line),
            "nil" => {
                return Err(Error::InvalidOperands(
                    "READ does not accept type nil".to_string(),
                ))
            }
            other => {
                return Err(Error::InvalidOperands(format!(
                    "unknown read type: {}",
                    other
                )))
            }
        };
        Ok(value)
    }
}

/// Floor division (rounds toward negative infinity), not Rust's default
/// truncating `/`.
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

fn char_at(s: &str, index: i64) -> Result<char, Error> {
    let idx = usize::try_from(index).ok();
    idx.and_then(|idx| s.chars().nth(idx))
        .ok_or_else(|| Error::InvalidStringOperation(format!("index {} out of range", index)))
}
