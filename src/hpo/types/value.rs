//! Concrete hyperparameter values

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single hyperparameter value.
///
/// Serialized untagged so persisted trials read naturally
/// (`{"units": 64, "learning_rate": 0.001, "activation": "relu"}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// One concrete value per hyperparameter name.
pub type Assignment = BTreeMap<String, ParameterValue>;

impl ParameterValue {
    /// Get as float (converts int to float if needed)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParameterValue::Float(v) => Some(*v),
            ParameterValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Get as int (floats are not narrowed)
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParameterValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParameterValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Name of the value kind, used in error messages and summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            ParameterValue::Bool(_) => "bool",
            ParameterValue::Int(_) => "int",
            ParameterValue::Float(_) => "float",
            ParameterValue::Str(_) => "str",
        }
    }

    pub(crate) fn same_kind(&self, other: &ParameterValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Bool(v) => write!(f, "{v}"),
            ParameterValue::Int(v) => write!(f, "{v}"),
            ParameterValue::Float(v) => write!(f, "{v}"),
            ParameterValue::Str(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident as $conv:ty),* $(,)?) => {
        $(
            impl From<$ty> for ParameterValue {
                fn from(v: $ty) -> Self {
                    ParameterValue::$variant(v as $conv)
                }
            }
        )*
    };
}

impl_from_value!(
    i64 => Int as i64,
    i32 => Int as i64,
    usize => Int as i64,
    f64 => Float as f64,
    f32 => Float as f64,
);

impl From<bool> for ParameterValue {
    fn from(v: bool) -> Self {
        ParameterValue::Bool(v)
    }
}

impl From<&str> for ParameterValue {
    fn from(v: &str) -> Self {
        ParameterValue::Str(v.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(v: String) -> Self {
        ParameterValue::Str(v)
    }
}

/// Conversion from a [`ParameterValue`] back into a Rust type.
pub trait FromParameterValue: Sized {
    fn from_value(value: &ParameterValue) -> Option<Self>;
}

impl FromParameterValue for ParameterValue {
    fn from_value(value: &ParameterValue) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromParameterValue for i64 {
    fn from_value(value: &ParameterValue) -> Option<Self> {
        value.as_int()
    }
}

impl FromParameterValue for i32 {
    fn from_value(value: &ParameterValue) -> Option<Self> {
        value.as_int().and_then(|v| i32::try_from(v).ok())
    }
}

impl FromParameterValue for usize {
    fn from_value(value: &ParameterValue) -> Option<Self> {
        value.as_int().and_then(|v| usize::try_from(v).ok())
    }
}

impl FromParameterValue for f64 {
    fn from_value(value: &ParameterValue) -> Option<Self> {
        value.as_float()
    }
}

impl FromParameterValue for bool {
    fn from_value(value: &ParameterValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromParameterValue for String {
    fn from_value(value: &ParameterValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}
