// Author: Dustin Pilgrim
// License: MIT

use indexmap::IndexMap;
use tracing::debug;

use crate::ast::Chain;
use crate::config::EvalOptions;
use crate::evaluator::Evaluator;
use crate::utils::is_identifier;
use crate::{ChainError, Value};

/// Binds root identifiers to values.
///
/// Guards in a chain only cover values; they never cover a name that was
/// not declared. `Scope::evaluate("myUser", ..)` on an unknown name fails
/// with `UndeclaredIdentifier` whatever the chain looks like.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: IndexMap<String, Value>,
    evaluator: Evaluator,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EvalOptions) -> Self {
        Self {
            bindings: IndexMap::new(),
            evaluator: Evaluator::with_options(options),
        }
    }

    /// Declare (or redeclare) `name`.
    pub fn declare(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ChainError> {
        if !is_identifier(name) {
            return Err(ChainError::InvalidIdentifier {
                name: name.to_string(),
                hint: Some("Identifiers start with a letter, '_' or '$' followed by letters, digits, '_' or '$'".into()),
                code: Some(505),
            });
        }
        debug!(name, "declared binding");
        self.bindings.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Rebind an existing name (`user = null`).
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ChainError> {
        match self.bindings.get_mut(name) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(undeclared(name)),
        }
    }

    pub fn lookup(&self, name: &str) -> Result<Value, ChainError> {
        self.bindings.get(name).cloned().ok_or_else(|| undeclared(name))
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.bindings.keys().cloned().collect()
    }

    /// `name<chain>`, e.g. `user?.address?.street`.
    pub fn evaluate(&self, name: &str, chain: &Chain) -> Result<Value, ChainError> {
        let root = self.lookup(name)?;
        self.evaluator.evaluate(&root, chain)
    }

    /// `name<target> = value`. The target is checked before the name is
    /// even looked up.
    pub fn assign(&self, name: &str, target: &Chain, value: impl Into<Value>) -> Result<Value, ChainError> {
        let target = target.assignment_target()?;
        let root = self.lookup(name)?;
        self.evaluator.assign_to(&root, &target, value.into())
    }

    /// `delete name<chain>`.
    pub fn delete(&self, name: &str, chain: &Chain) -> Result<Value, ChainError> {
        let chain = chain.clone().into_delete()?;
        let root = self.lookup(name)?;
        self.evaluator.evaluate(&root, &chain)
    }
}

fn undeclared(name: &str) -> ChainError {
    ChainError::UndeclaredIdentifier {
        name: name.to_string(),
        hint: Some(format!("Declare '{}' before accessing it, even with ?.", name)),
        code: Some(504),
    }
}

// -- Tests --
