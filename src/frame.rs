use std::collections::HashMap;

use crate::error::Error;
use crate::value::Value;

/// The frame prefix a variable reference resolves against.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Scope {
    Global,
    Temporary,
    Local,
}

impl Scope {
    pub fn parse(s: &str) -> Option<Scope> {
        match s {
            "GF" => Some(Scope::Global),
            "TF" => Some(Scope::Temporary),
            "LF" => Some(Scope::Local),
            _ => None,
        }
    }
}

/// A single named variable container. Slots are created only by `DEFVAR`;
/// they hold `Value::Undefined` until assigned.
#[derive(Default, Debug)]
pub struct Frame {
    vars: HashMap<String, Value>,
}

impl Frame {
    pub fn define(&mut self, name: &str) -> Result<(), Error> {
        if self.vars.contains_key(name) {
            return Err(Error::InvalidSemantics(format!(
                "variable {} already defined in this frame",
                name
            )));
        }
        self.vars.insert(name.to_string(), Value::Undefined);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Value, Error> {
        self.vars
            .get(name)
            .ok_or_else(|| Error::InvalidVariable(name.to_string()))
    }

    pub fn set(&mut self, name: &str, value: Value) -> Result<(), Error> {
        match self.vars.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::InvalidVariable(name.to_string())),
        }
    }
}

/// Owns the global frame, the (possibly absent) temporary frame, and the
/// stack of local frames. Mirrors the original interpreter's frame holder:
/// `LF` always addresses the top of the local-frame stack.
#[derive(Default, Debug)]
pub struct FrameHolder {
    global: Frame,
    temporary: Option<Frame>,
    locals: Vec<Frame>,
}

impl FrameHolder {
    pub fn new() -> Self {
        FrameHolder::default()
    }

    pub fn create_frame(&mut self) {
        self.temporary = Some(Frame::default());
    }

    pub fn push_frame(&mut self) -> Result<(), Error> {
        let frame = self
            .temporary
            .take()
            .ok_or_else(|| Error::InvalidFrame("no temporary frame to push".to_string()))?;
        self.locals.push(frame);
        Ok(())
    }

    pub fn pop_frame(&mut self) -> Result<(), Error> {
        let frame = self
            .locals
            .pop()
            .ok_or_else(|| Error::InvalidFrame("local frame stack is empty".to_string()))?;
        self.temporary = Some(frame);
        Ok(())
    }

    fn frame(&self, scope: Scope) -> Result<&Frame, Error> {
        match scope {
            Scope::Global => Ok(&self.global),
            Scope::Temporary => self
                .temporary
                .as_ref()
                .ok_or_else(|| Error::InvalidFrame("temporary frame does not exist".to_string())),
            Scope::Local => self
                .locals
                .last()
                .ok_or_else(|| Error::InvalidFrame("local frame stack is empty".to_string())),
        }
    }

    fn frame_mut(&mut self, scope: Scope) -> Result<&mut Frame, Error> {
        match scope {
            Scope::Global => Ok(&mut self.global),
            Scope::Temporary => self
                .temporary
                .as_mut()
                .ok_or_else(|| Error::InvalidFrame("temporary frame does not exist".to_string())),
            Scope::Local => self
                .locals
                .last_mut()
                .ok_or_else(|| Error::InvalidFrame("local frame stack is empty".to_string())),
        }
    }

    pub fn define(&mut self, scope: Scope, name: &str) -> Result<(), Error> {
        self.frame_mut(scope)?.define(name)
    }

    pub fn get(&self, scope: Scope, name: &str) -> Result<&Value, Error> {
        self.frame(scope)?.get(name)
    }

    pub fn set(&mut self, scope: Scope, name: &str, value: Value) -> Result<(), Error> {
        self.frame_mut(scope)?.set(name, value)
    }
}
