// Author: Dustin Pilgrim
// License: MIT

use std::collections::HashMap;

use crate::{ChainError, Value};

/// JSON literals map onto runtime values one to one; `null` becomes absent.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Absent,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::array(items.into_iter().map(Value::from)),
            serde_json::Value::Object(map) => {
                Value::object(map.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

fn type_error(expected: &str, value: &Value, hint: &str, code: u32) -> ChainError {
    ChainError::TypeError {
        message: format!("Expected {}, got {} ({})", expected, value.type_name(), value.describe()),
        hint: Some(hint.into()),
        code: Some(code),
    }
}

impl TryFrom<Value> for String {
    type Error = ChainError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(type_error("string", &other, "The chain did not end on a string", 401)),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = ChainError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(n) => Ok(n),
            other => Err(type_error("number", &other, "The chain did not end on a number", 402)),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = ChainError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(type_error("boolean", &other, "The chain did not end on true/false", 404)),
        }
    }
}

macro_rules! integer_conversion {
    ($($t:ty),*) => {
        $(impl TryFrom<Value> for $t {
            type Error = ChainError;

            fn try_from(value: Value) -> Result<Self, Self::Error> {
                let n = f64::try_from(value)?;
                if n.fract() == 0.0 && n >= <$t>::MIN as f64 && n <= <$t>::MAX as f64 {
                    Ok(n as $t)
                } else {
                    Err(ChainError::TypeError {
                        message: format!("Number {} out of range for {}", n, stringify!($t)),
                        hint: Some(format!(
                            "Use a whole number between {} and {}",
                            <$t>::MIN,
                            <$t>::MAX
                        )),
                        code: Some(403),
                    })
                }
            }
        })*
    };
}

integer_conversion!(i32, i64, u8, u16, u32, u64, usize);

impl<T> TryFrom<Value> for Vec<T>
where
    T: TryFrom<Value, Error = ChainError>,
{
    type Error = ChainError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(items) => {
                let items = items.borrow().clone();
                items.into_iter().map(T::try_from).collect()
            }
            other => Err(type_error("array", &other, "The chain did not end on an array", 405)),
        }
    }
}

/// Absent maps to `None`; anything else must convert to `T`.
impl<T> TryFrom<Value> for Option<T>
where
    T: TryFrom<Value, Error = ChainError>,
{
    type Error = ChainError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Absent => Ok(None),
            other => T::try_from(other).map(Some),
        }
    }
}

impl TryFrom<Value> for HashMap<String, Value> {
    type Error = ChainError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(map
                .borrow()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()),
            other => Err(type_error("object", &other, "The chain did not end on an object", 406)),
        }
    }
}
