// Author: Dustin Pilgrim
// License: MIT

use crate::ast::{Key, Operand};
use crate::utils::parse_index;
use crate::value::Function;
use crate::{ChainError, Value};

/// Read a named member. Missing members are absent, never an error.
pub(super) fn read_name(target: &Value, name: &str) -> Value {
    match target {
        Value::Object(map) => map.borrow().get(name).cloned().unwrap_or_default(),
        Value::Array(items) => {
            let items = items.borrow();
            if name == "length" {
                Value::Number(items.len() as f64)
            } else {
                parse_index(name)
                    .and_then(|i| items.get(i).cloned())
                    .unwrap_or_default()
            }
        }
        Value::String(s) => {
            if name == "length" {
                Value::Number(s.chars().count() as f64)
            } else {
                parse_index(name).map_or(Value::Absent, |i| char_at(s, i))
            }
        }
        Value::Function(func) if name == "name" => Value::String(func.name().to_string()),
        _ => Value::Absent,
    }
}

pub(super) fn read_key(target: &Value, key: &Key) -> Value {
    match key {
        Key::Name(name) => read_name(target, name),
        Key::Index(i) => match target {
            Value::Object(map) => map.borrow().get(&i.to_string()).cloned().unwrap_or_default(),
            Value::Array(items) => items.borrow().get(*i).cloned().unwrap_or_default(),
            Value::String(s) => char_at(s, *i),
            _ => Value::Absent,
        },
    }
}

fn char_at(s: &str, i: usize) -> Value {
    s.chars()
        .nth(i)
        .map_or(Value::Absent, |c| Value::String(c.to_string()))
}

/// Resolve operands left to right, then call. No borrow of any composite is
/// held across the call.
pub(super) fn invoke(func: &Function, this: &Value, args: &[Operand]) -> Result<Value, ChainError> {
    let args = args
        .iter()
        .map(Operand::resolve)
        .collect::<Result<Vec<_>, _>>()?;
    func.call(this, &args)
}

/// Remove a member. Missing members and scalars are left alone; the result
/// is always `true`.
pub(super) fn delete_key(target: &Value, key: &Key) -> Value {
    match target {
        Value::Object(map) => {
            let name = match key {
                Key::Name(name) => name.clone(),
                Key::Index(i) => i.to_string(),
            };
            map.borrow_mut().shift_remove(&name);
        }
        Value::Array(items) => {
            let mut items = items.borrow_mut();
            if let Some(slot) = array_slot(key).and_then(|i| items.get_mut(i)) {
                *slot = Value::Absent;
            }
        }
        _ => {}
    }
    Value::Bool(true)
}

/// Largest index an array slot can have (2^32 - 2).
pub(super) const MAX_ARRAY_INDEX: usize = 4_294_967_294;

/// Most absent holes a single write may add to the end of an array.
pub(super) const MAX_ARRAY_GROWTH: usize = 1 << 20;

/// Store a member. Arrays grow with absent holes; writes to scalars are
/// dropped.
pub(super) fn write_key(target: &Value, key: &Key, value: Value) -> Result<(), ChainError> {
    match target {
        Value::Object(map) => {
            let name = match key {
                Key::Name(name) => name.clone(),
                Key::Index(i) => i.to_string(),
            };
            map.borrow_mut().insert(name, value);
        }
        Value::Array(items) => {
            if let Some(i) = array_slot(key) {
                let mut items = items.borrow_mut();
                if i > MAX_ARRAY_INDEX {
                    return Err(ChainError::RangeError {
                        message: format!("index {} is beyond the largest array index {}", i, MAX_ARRAY_INDEX),
                        hint: Some("Use an object if the key is an arbitrary number".into()),
                        code: Some(507),
                    });
                }
                if i >= items.len() {
                    let holes = i - items.len();
                    if holes > MAX_ARRAY_GROWTH {
                        return Err(ChainError::RangeError {
                            message: format!(
                                "writing index {} would add {} empty slots to an array of length {}",
                                i,
                                holes,
                                items.len()
                            ),
                            hint: Some(format!("A single write may extend an array by at most {} slots", MAX_ARRAY_GROWTH)),
                            code: Some(507),
                        });
                    }
                    items.resize(i + 1, Value::Absent);
                }
                items[i] = value;
            }
        }
        _ => {}
    }
    Ok(())
}

fn array_slot(key: &Key) -> Option<usize> {
    match key {
        Key::Index(i) => Some(*i),
        Key::Name(name) => parse_index(name),
    }
}
