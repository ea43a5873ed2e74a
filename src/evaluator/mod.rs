// Author: Dustin Pilgrim
// License: MIT

use tracing::{debug, trace};

use crate::ast::{AssignmentTarget, Chain, Key, StepKind};
use crate::config::{EvalOptions, ShortCircuit};
use crate::{ChainError, Value};

mod step;

/// Evaluates accessor chains against root values.
///
/// An evaluator holds only its options; every call is independent.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    options: EvalOptions,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EvalOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EvalOptions {
        &self.options
    }

    /// Apply `chain` to `root`, left to right.
    ///
    /// A guarded step that finds an absent value ends the chain with
    /// `Value::Absent`; nothing to its right runs, including call operands
    /// and deletes. A mandatory step on an absent value fails with
    /// `AccessOnAbsentValue`.
    ///
    /// # Examples
    /// ```
    /// use safe_chain::{Chain, Evaluator, Value};
    ///
    /// let user = Value::empty_object();
    /// let street = Evaluator::new()
    ///     .evaluate(&user, &Chain::new().opt_prop("address").opt_prop("street"))
    ///     .unwrap();
    /// assert!(street.is_absent());
    /// ```
    #[tracing::instrument(level = "trace", skip_all, fields(chain = %chain))]
    pub fn evaluate(&self, root: &Value, chain: &Chain) -> Result<Value, ChainError> {
        self.check_chain(chain)?;

        let mut current = root.clone();
        // Container the current value was read from; `this` for an invoke.
        let mut receiver = Value::Absent;

        for (position, step) in chain.steps().iter().enumerate() {
            if current.is_absent() {
                if !step.optional {
                    return Err(ChainError::AccessOnAbsentValue {
                        step: step.to_string(),
                        position,
                        hint: Some("Use ?. in front of this step if the value may be absent".into()),
                        code: Some(501),
                    });
                }
                match self.options.short_circuit {
                    ShortCircuit::Chain => {
                        debug!(position, step = %step, "short-circuited on absent value");
                        return Ok(Value::Absent);
                    }
                    ShortCircuit::Step => {
                        debug!(position, step = %step, "guarded step skipped on absent value");
                        receiver = Value::Absent;
                        continue;
                    }
                }
            }

            trace!(position, step = %step, "applying step");

            let next = match &step.kind {
                StepKind::Property(name) => step::read_name(&current, name),
                StepKind::Index(key) => step::read_key(&current, key),
                StepKind::Invoke(args) => match &current {
                    Value::Function(func) => step::invoke(func, &receiver, args)?,
                    other if step.optional && self.options.lenient_invoke => {
                        debug!(position, found = other.type_name(), "guarded call on non-function");
                        if self.options.short_circuit == ShortCircuit::Chain {
                            return Ok(Value::Absent);
                        }
                        Value::Absent
                    }
                    other => {
                        return Err(ChainError::NotInvocable {
                            step: step.to_string(),
                            position,
                            found: other.type_name(),
                            hint: Some("?. only guards against an absent function, not a value of the wrong type".into()),
                            code: Some(502),
                        });
                    }
                },
                StepKind::Delete(key) => step::delete_key(&current, key),
            };

            receiver = if step.is_access() { current } else { Value::Absent };
            current = next;
        }

        Ok(current)
    }

    /// Write `value` through `target` (`root.a[0].b = value`).
    ///
    /// The target is checked before anything is evaluated: a guarded step or
    /// a final step that is not a property/index access fails with
    /// `InvalidAssignmentTarget` and nothing is read or written.
    #[tracing::instrument(level = "trace", skip_all, fields(target = %target))]
    pub fn assign(&self, root: &Value, target: &Chain, value: Value) -> Result<Value, ChainError> {
        let target = target.assignment_target()?;
        self.assign_to(root, &target, value)
    }

    /// Write through an already-checked target.
    pub fn assign_to(&self, root: &Value, target: &AssignmentTarget, value: Value) -> Result<Value, ChainError> {
        let path = target.path().iter().cloned().fold(Chain::new(), Chain::push);
        let container = self.evaluate(root, &path)?;

        if container.is_absent() {
            return Err(ChainError::AccessOnAbsentValue {
                step: describe_write(target.key()),
                position: path.len(),
                hint: Some("The object being written to does not exist".into()),
                code: Some(501),
            });
        }

        step::write_key(&container, target.key(), value.clone())?;
        Ok(value)
    }

    /// `delete <chain>`: the chain's trailing access becomes a delete.
    pub fn delete(&self, root: &Value, chain: &Chain) -> Result<Value, ChainError> {
        let chain = chain.clone().into_delete()?;
        self.evaluate(root, &chain)
    }

    fn check_chain(&self, chain: &Chain) -> Result<(), ChainError> {
        if chain.len() > self.options.max_chain_length {
            return Err(ChainError::InvalidChain {
                message: format!(
                    "chain has {} steps, limit is {}",
                    chain.len(),
                    self.options.max_chain_length
                ),
                hint: Some("Raise `max_chain_length` in the evaluator options".into()),
                code: Some(506),
            });
        }

        let last = chain.len().saturating_sub(1);
        if let Some(pos) = chain
            .steps()
            .iter()
            .position(|s| matches!(s.kind, StepKind::Delete(_)))
            .filter(|&pos| pos != last)
        {
            return Err(ChainError::InvalidChain {
                message: format!("'{}' at step {} is not the last step", chain.steps()[pos], pos),
                hint: Some("A delete applies to the whole chain and must come last".into()),
                code: Some(506),
            });
        }

        Ok(())
    }
}

fn describe_write(key: &Key) -> String {
    match key {
        Key::Name(name) => format!("{} =", crate::utils::format_member(name, false)),
        Key::Index(i) => format!("[{}] =", i),
    }
}

/// Evaluate with default options.
pub fn evaluate(root: &Value, chain: &Chain) -> Result<Value, ChainError> {
    Evaluator::new().evaluate(root, chain)
}
