// Author: Dustin Pilgrim
// License: MIT

use std::fmt;
use std::rc::Rc;

use crate::utils::format_member;
use crate::{ChainError, Value};

/// A property name or a position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Name(String),
    Index(usize),
}

impl Key {
    fn member(&self, optional: bool) -> String {
        match self {
            Key::Name(name) => format_member(name, optional),
            Key::Index(i) if optional => format!("?.[{}]", i),
            Key::Index(i) => format!("[{}]", i),
        }
    }

    fn bracket(&self, optional: bool) -> String {
        let inner = match self {
            Key::Name(name) => format!("{:?}", name),
            Key::Index(i) => i.to_string(),
        };
        if optional {
            format!("?.[{}]", inner)
        } else {
            format!("[{}]", inner)
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => write!(f, "{}", name),
            Key::Index(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i)
    }
}

pub type Thunk = Rc<dyn Fn() -> Result<Value, ChainError>>;

/// A call argument. Lazy operands run only if the call itself runs.
#[derive(Clone)]
pub enum Operand {
    Value(Value),
    Lazy(Thunk),
}

impl Operand {
    pub fn lazy(f: impl Fn() -> Result<Value, ChainError> + 'static) -> Self {
        Operand::Lazy(Rc::new(f))
    }

    pub fn resolve(&self) -> Result<Value, ChainError> {
        match self {
            Operand::Value(v) => Ok(v.clone()),
            Operand::Lazy(thunk) => thunk(),
        }
    }
}

impl fmt::Debug for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Value(v) => write!(f, "Value({})", v.describe()),
            Operand::Lazy(_) => write!(f, "<lazy>"),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Value(v) => write!(f, "{}", v.describe()),
            Operand::Lazy(_) => write!(f, "…"),
        }
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Value(v)
    }
}

macro_rules! operand_from {
    ($($t:ty),*) => {
        $(impl From<$t> for Operand {
            fn from(v: $t) -> Self {
                Operand::Value(Value::from(v))
            }
        })*
    };
}

operand_from!(bool, f64, i32, &str, String);

#[derive(Debug, Clone)]
pub enum StepKind {
    Property(String),
    Index(Key),
    Invoke(Vec<Operand>),
    Delete(Key),
}

/// One link of a chain. `optional` marks a `?.` guard in front of the step.
#[derive(Debug, Clone)]
pub struct Step {
    pub kind: StepKind,
    pub optional: bool,
}

impl Step {
    pub fn new(kind: StepKind, optional: bool) -> Self {
        Self { kind, optional }
    }

    /// Property and index reads are the only steps that can be written through.
    pub fn is_access(&self) -> bool {
        matches!(self.kind, StepKind::Property(_) | StepKind::Index(_))
    }

    fn access_key(&self) -> Option<Key> {
        match &self.kind {
            StepKind::Property(name) => Some(Key::Name(name.clone())),
            StepKind::Index(key) => Some(key.clone()),
            _ => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            StepKind::Property(name) => write!(f, "{}", format_member(name, self.optional)),
            StepKind::Index(key) => write!(f, "{}", key.bracket(self.optional)),
            StepKind::Invoke(args) => {
                let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                let guard = if self.optional { "?." } else { "" };
                write!(f, "{}({})", guard, args.join(", "))
            }
            StepKind::Delete(key) => write!(f, "delete {}", key.member(self.optional)),
        }
    }
}

/// An ordered list of steps, applied left to right to a root value.
///
/// # Examples
/// ```
/// use safe_chain::Chain;
///
/// // user?.address?.street
/// let chain = Chain::new().opt_prop("address").opt_prop("street");
/// assert_eq!(chain.to_string(), "?.address?.street");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Chain {
    steps: Vec<Step>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn prop(self, name: impl Into<String>) -> Self {
        self.push(Step::new(StepKind::Property(name.into()), false))
    }

    pub fn opt_prop(self, name: impl Into<String>) -> Self {
        self.push(Step::new(StepKind::Property(name.into()), true))
    }

    pub fn index(self, key: impl Into<Key>) -> Self {
        self.push(Step::new(StepKind::Index(key.into()), false))
    }

    pub fn opt_index(self, key: impl Into<Key>) -> Self {
        self.push(Step::new(StepKind::Index(key.into()), true))
    }

    pub fn call(self, args: Vec<Operand>) -> Self {
        self.push(Step::new(StepKind::Invoke(args), false))
    }

    pub fn opt_call(self, args: Vec<Operand>) -> Self {
        self.push(Step::new(StepKind::Invoke(args), true))
    }

    pub fn delete(self, key: impl Into<Key>) -> Self {
        self.push(Step::new(StepKind::Delete(key.into()), false))
    }

    pub fn opt_delete(self, key: impl Into<Key>) -> Self {
        self.push(Step::new(StepKind::Delete(key.into()), true))
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Turn `a?.b` into `delete a?.b`: the trailing read becomes a delete of
    /// the same key, keeping its guard.
    pub fn into_delete(mut self) -> Result<Chain, ChainError> {
        let last = self.steps.pop();
        match last.as_ref().and_then(|s| s.access_key().map(|k| (k, s.optional))) {
            Some((key, optional)) => {
                self.steps.push(Step::new(StepKind::Delete(key), optional));
                Ok(self)
            }
            None => Err(ChainError::InvalidChain {
                message: format!(
                    "cannot delete through '{}'",
                    last.map_or_else(|| "<empty chain>".to_string(), |s| s.to_string())
                ),
                hint: Some("Only a chain ending in a property or index access can be deleted".into()),
                code: Some(506),
            }),
        }
    }

    /// Check that this chain can be written through. Rejects any guarded
    /// step, since a short-circuited chain has no target.
    pub fn assignment_target(&self) -> Result<AssignmentTarget, ChainError> {
        AssignmentTarget::try_from(self)
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.steps.split_last() {
            Some((last, init)) => {
                if let StepKind::Delete(key) = &last.kind {
                    write!(f, "delete ")?;
                    for step in init {
                        write!(f, "{}", step)?;
                    }
                    write!(f, "{}", key.member(last.optional))
                } else {
                    for step in &self.steps {
                        write!(f, "{}", step)?;
                    }
                    Ok(())
                }
            }
            None => Ok(()),
        }
    }
}

/// A chain that passed the static assignment check: every step mandatory,
/// ending in a property or index access.
#[derive(Debug, Clone)]
pub struct AssignmentTarget {
    pub(crate) path: Vec<Step>,
    pub(crate) key: Key,
}

impl AssignmentTarget {
    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn path(&self) -> &[Step] {
        &self.path
    }
}

impl TryFrom<&Chain> for AssignmentTarget {
    type Error = ChainError;

    fn try_from(chain: &Chain) -> Result<Self, Self::Error> {
        let reject = |message: String, hint: &str| ChainError::InvalidAssignmentTarget {
            target: chain.to_string(),
            message,
            hint: Some(hint.into()),
            code: Some(503),
        };

        if let Some(pos) = chain.steps.iter().position(|s| s.optional) {
            return Err(reject(
                format!("optional step {} cannot be assigned through", pos),
                "A short-circuited chain evaluates to an absent value, which has no target",
            ));
        }

        let (last, init) = chain.steps.split_last().ok_or_else(|| {
            reject(
                "an empty chain names no field".into(),
                "Assign to a property or index of the root value",
            )
        })?;

        let key = last.access_key().ok_or_else(|| {
            reject(
                format!("'{}' is not a property or index access", last),
                "Only property and index accesses can be assigned",
            )
        })?;

        if let Some(step) = init.iter().find(|s| matches!(s.kind, StepKind::Delete(_))) {
            return Err(reject(
                format!("'{}' cannot appear inside an assignment target", step),
                "Remove the delete step",
            ));
        }

        Ok(Self {
            path: init.to_vec(),
            key,
        })
    }
}
