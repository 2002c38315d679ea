use crate::error::GuiError;
use serde::{Deserialize, Serialize};
use std::any::{TypeId, type_name};
use std::fmt;

/// The kinds of value a prompt can collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Str,
}

impl ValueKind {
    /// Map a Rust type to its response kind.
    ///
    /// Integer and float widths all collapse onto [`ValueKind::Int`] and
    /// [`ValueKind::Float`]; `String` and `&'static str` both map to [`ValueKind::Str`].
    ///
    /// Integers are stored as `i64`, so only types that fit it losslessly are accepted:
    /// `u64`, `usize`, `i128` and `u128` are rejected.
    ///
    /// # Errors
    /// [`GuiError::UnsupportedValueType`] for any other type.
    pub fn of<T: 'static + ?Sized>() -> Result<Self, GuiError> {
        let id = TypeId::of::<T>();
        let kind = if id == TypeId::of::<bool>() {
            ValueKind::Bool
        } else if [
            TypeId::of::<i8>(),
            TypeId::of::<i16>(),
            TypeId::of::<i32>(),
            TypeId::of::<i64>(),
            TypeId::of::<u8>(),
            TypeId::of::<u16>(),
            TypeId::of::<u32>(),
            TypeId::of::<isize>(),
        ]
        .contains(&id)
        {
            ValueKind::Int
        } else if id == TypeId::of::<f64>() || id == TypeId::of::<f32>() {
            ValueKind::Float
        } else if id == TypeId::of::<String>()
            || id == TypeId::of::<&'static str>()
            || id == TypeId::of::<str>()
        {
            ValueKind::Str
        } else {
            return Err(GuiError::UnsupportedValueType(type_name::<T>()));
        };
        Ok(kind)
    }

    /// The falsy value a prompt is re-armed to
    pub fn zero(self) -> Value {
        match self {
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Int => Value::Int(0),
            ValueKind::Float => Value::Float(0.0),
            ValueKind::Str => Value::Str(String::new()),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "string",
        };
        f.write_str(name)
    }
}

/// A response value held by a prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

/// A collected answer: the value and the clock reading at submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub value: Value,
    pub timestamp: f64,
}
