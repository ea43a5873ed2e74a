// Author: Dustin Pilgrim
// License: MIT

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::ChainError;

/// Signature of a native function: `(this, args) -> result`.
pub type NativeFnInner = dyn Fn(&Value, &[Value]) -> Result<Value, ChainError>;

/// An invocable value.
#[derive(Clone)]
pub struct Function {
    name: String,
    func: Rc<NativeFnInner>,
}

impl Function {
    pub fn new(
        name: impl Into<String>,
        f: impl Fn(&Value, &[Value]) -> Result<Value, ChainError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Rc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, this: &Value, args: &[Value]) -> Result<Value, ChainError> {
        (self.func)(this, args)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name)
    }
}

pub type ObjectRef = Rc<RefCell<IndexMap<String, Value>>>;
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;

/// A runtime datum. `Absent` is the only non-present case; composites are
/// shared, so a mutation through one handle is seen through every clone.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Absent,
    Bool(bool),
    Number(f64),
    String(String),
    Array(ArrayRef),
    Object(ObjectRef),
    Function(Function),
}

impl Value {
    /// Build an object, keeping the given field order.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v))
            .collect::<IndexMap<_, _>>();
        Value::Object(Rc::new(RefCell::new(map)))
    }

    pub fn empty_object() -> Self {
        Value::Object(Rc::new(RefCell::new(IndexMap::new())))
    }

    pub fn array<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::Array(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    pub fn function(
        name: impl Into<String>,
        f: impl Fn(&Value, &[Value]) -> Result<Value, ChainError> + 'static,
    ) -> Self {
        Value::Function(Function::new(name, f))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn is_present(&self) -> bool {
        !self.is_absent()
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        if let Value::Number(n) = self {
            Some(*n)
        } else {
            None
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Bool(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        if let Value::Object(map) = self {
            Some(map)
        } else {
            None
        }
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        if let Value::Array(items) = self {
            Some(items)
        } else {
            None
        }
    }

    /// Field names of an object in insertion order; empty for anything else.
    pub fn keys(&self) -> Vec<String> {
        match self {
            Value::Object(map) => map.borrow().keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// True when both values are the same shared composite.
    pub fn same_ref(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(&a.func, &b.func),
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if self.same_ref(other) {
            return true;
        }
        match (self, other) {
            (Value::Absent, Value::Absent) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => *a.borrow() == *b.borrow(),
            (Value::Object(a), Value::Object(b)) => *a.borrow() == *b.borrow(),
            _ => false,
        }
    }
}

/// Strings longer than this are cut short in `Value::describe`.
const DESCRIBE_MAX_CHARS: usize = 32;

/// Whole numbers below 2^53 print without a fraction.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{}", n)
    }
}

/// Render `value`, printing `[Circular]` for a composite that is already
/// being rendered further up.
fn write_value(f: &mut fmt::Formatter<'_>, value: &Value, seen: &mut Vec<*const ()>) -> fmt::Result {
    match value {
        Value::Absent => write!(f, "undefined"),
        Value::Bool(b) => write!(f, "{}", b),
        Value::Number(n) => write_number(f, *n),
        Value::String(s) => write!(f, "{}", s),
        Value::Array(items) => {
            let ptr = Rc::as_ptr(items) as *const ();
            if seen.contains(&ptr) {
                return write!(f, "[Circular]");
            }
            seen.push(ptr);
            write!(f, "[")?;
            for (i, item) in items.borrow().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write_value(f, item, seen)?;
            }
            seen.pop();
            write!(f, "]")
        }
        Value::Object(map) => {
            let ptr = Rc::as_ptr(map) as *const ();
            if seen.contains(&ptr) {
                return write!(f, "[Circular]");
            }
            seen.push(ptr);
            write!(f, "{{")?;
            for (i, (k, v)) in map.borrow().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: ", k)?;
                write_value(f, v, seen)?;
            }
            seen.pop();
            write!(f, "}}")
        }
        Value::Function(func) => write!(f, "{:?}", func),
    }
}

impl Value {
    /// Short, bounded description for error messages and logs. Composites
    /// are named by kind only and long strings are cut.
    pub fn describe(&self) -> String {
        match self {
            Value::String(s) if s.chars().count() > DESCRIBE_MAX_CHARS => {
                let head: String = s.chars().take(DESCRIBE_MAX_CHARS).collect();
                format!("{:?}…", head)
            }
            Value::String(s) => format!("{:?}", s),
            Value::Array(_) => "<array>".into(),
            Value::Object(_) => "<object>".into(),
            Value::Function(func) => format!("{:?}", func),
            scalar => scalar.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, &mut Vec::new())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Absent, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composites_are_shared() {
        let user = Value::object([("name", Value::from("Ami"))]);
        let alias = user.clone();

        if let Some(map) = alias.as_object() {
            map.borrow_mut().shift_remove("name");
        }

        assert!(user.keys().is_empty());
        assert!(user.same_ref(&alias));
    }

    #[test]
    fn test_structural_equality() {
        let a = Value::object([("x", Value::from(1))]);
        let b = Value::object([("x", Value::from(1))]);
        assert_eq!(a, b);
        assert!(!a.same_ref(&b));
        assert_ne!(Value::from(0), Value::Absent);
    }

    #[test]
    fn test_function_equality_is_identity() {
        let f = Value::function("f", |_, _| Ok(Value::Absent));
        let g = Value::function("f", |_, _| Ok(Value::Absent));
        assert_eq!(f, f.clone());
        assert_ne!(f, g);
    }

    #[test]
    fn test_display() {
        let user = Value::object([
            ("name", Value::from("Shelly")),
            ("age", Value::from(30)),
            ("tags", Value::array([Value::from(true), Value::Absent])),
        ]);
        assert_eq!(user.to_string(), "{name: Shelly, age: 30, tags: [true, undefined]}");
    }

    #[test]
    fn test_large_whole_numbers() {
        assert_eq!(Value::from(1e20).to_string(), "100000000000000000000");
        assert_eq!(Value::from(9_007_199_254_740_991.0).to_string(), "9007199254740991");
        assert_eq!(Value::from(-42.0).to_string(), "-42");
        assert_eq!(Value::from(0.5).to_string(), "0.5");
    }

    #[test]
    fn test_display_marks_cycles() {
        let node = Value::object([("name", Value::from("loop"))]);
        if let Some(map) = node.as_object() {
            map.borrow_mut().insert("self".into(), node.clone());
        }
        let list = Value::array([Value::from(1)]);
        if let Some(items) = list.as_array() {
            items.borrow_mut().push(list.clone());
        }

        assert_eq!(node.to_string(), "{name: loop, self: [Circular]}");
        assert_eq!(list.to_string(), "[1, [Circular]]");
    }

    #[test]
    fn test_shared_but_acyclic_is_not_circular() {
        let leaf = Value::array([Value::from(1)]);
        let pair = Value::array([leaf.clone(), leaf]);
        assert_eq!(pair.to_string(), "[[1], [1]]");
    }

    #[test]
    fn test_describe_is_bounded() {
        let long = Value::from("x".repeat(100));
        assert_eq!(long.describe(), format!("{:?}…", "x".repeat(32)));
        assert_eq!(Value::from("Ami").describe(), "\"Ami\"");
        assert_eq!(Value::empty_object().describe(), "<object>");
        assert_eq!(Value::array([]).describe(), "<array>");
        assert_eq!(Value::from(3).describe(), "3");
    }

    #[test]
    fn test_option_conversion() {
        assert!(Value::from(None::<&str>).is_absent());
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }
}
