// SPDX-License-Identifier: GPL-3.0-only

//! Host message representation
//!
//! Messages are a selector followed by atoms, written in patch-file syntax:
//!
//! ```text
//! angle 15;
//! led 4;
//! accel;
//! ```
//!
//! Inbound messages drive the adapter, outbound messages are emitted through
//! an [`Outlet`].

use std::fmt;

use crate::errors::{AdapterError, AdapterResult};

/// A single message argument
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Float(f32),
    Symbol(String),
}

impl Atom {
    /// Numbers become floats, everything else a symbol
    pub fn parse(token: &str) -> Self {
        match token.parse::<f32>() {
            Ok(f) if f.is_finite() => Atom::Float(f),
            _ => Atom::Symbol(token.to_string()),
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Atom::Float(f) => Some(*f),
            Atom::Symbol(_) => None,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Float(v) => write!(f, "{}", v),
            Atom::Symbol(s) => write!(f, "{}", s),
        }
    }
}

/// Split a line into messages
///
/// `;` and `,` end a message; empty messages are dropped. Each message is
/// returned as its list of atoms, the first being the selector.
pub fn parse_line(line: &str) -> Vec<Vec<Atom>> {
    line.split([';', ','])
        .map(|chunk| chunk.split_whitespace().map(Atom::parse).collect::<Vec<_>>())
        .filter(|atoms| !atoms.is_empty())
        .collect()
}

/// Messages understood by the adapter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Inbound {
    /// `bang` or `status`: log devices and capabilities
    Status,
    /// `accel`: emit accelerometer and tilt angle
    Accel,
    /// `angle <deg>`: move the motor
    Angle(f32),
    /// `led <code>`: set the indicator
    Led(f32),
}

impl Inbound {
    /// Interpret a selector and its arguments
    ///
    /// Float methods behave like typed host methods: a missing argument is
    /// 0 and extra arguments are ignored.
    pub fn parse(selector: &str, args: &[Atom]) -> AdapterResult<Self> {
        match selector {
            "bang" | "status" => Ok(Inbound::Status),
            "accel" => Ok(Inbound::Accel),
            "angle" => float_arg(selector, args).map(Inbound::Angle),
            "led" => float_arg(selector, args).map(Inbound::Led),
            other => Err(AdapterError::InvalidMessage(format!(
                "no method for '{}'",
                other
            ))),
        }
    }

    /// Interpret a full message (selector first)
    pub fn from_atoms(atoms: &[Atom]) -> AdapterResult<Self> {
        match atoms.split_first() {
            Some((Atom::Symbol(selector), args)) => Self::parse(selector, args),
            Some((Atom::Float(_), _)) => Err(AdapterError::InvalidMessage(
                "no method for 'float'".to_string(),
            )),
            None => Ok(Inbound::Status),
        }
    }
}

fn float_arg(selector: &str, args: &[Atom]) -> AdapterResult<f32> {
    match args.first() {
        None => Ok(0.0),
        Some(atom) => atom.as_float().ok_or_else(|| {
            AdapterError::InvalidMessage(format!("{}: bad argument '{}'", selector, atom))
        }),
    }
}

/// A message emitted back to the host
#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub selector: &'static str,
    pub args: Vec<Atom>,
}

impl Outbound {
    pub fn floats(selector: &'static str, values: &[f32]) -> Self {
        Self {
            selector,
            args: values.iter().copied().map(Atom::Float).collect(),
        }
    }
}

impl fmt::Display for Outbound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.selector)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        write!(f, ";")
    }
}

/// Outbound message channel
pub trait Outlet {
    fn emit(&mut self, message: Outbound);
}

impl Outlet for Vec<Outbound> {
    fn emit(&mut self, message: Outbound) {
        self.push(message);
    }
}

impl<O: Outlet + ?Sized> Outlet for Box<O> {
    fn emit(&mut self, message: Outbound) {
        (**self).emit(message);
    }
}
