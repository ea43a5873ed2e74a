// Author: Dustin Pilgrim
// License: MIT

use std::fmt;

/// The main error type for chain evaluation, scoping and option loading.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainError {
    /// A mandatory step was applied to an absent value.
    AccessOnAbsentValue {
        step: String,
        position: usize,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// An invoke step reached a present value that is not a function.
    NotInvocable {
        step: String,
        position: usize,
        found: &'static str,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised before evaluation when a chain cannot be written through.
    InvalidAssignmentTarget {
        target: String,
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    UndeclaredIdentifier {
        name: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    InvalidIdentifier {
        name: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// The chain is malformed as a whole (misplaced delete, too many steps).
    InvalidChain {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// An array write past the largest index an array can hold.
    RangeError {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    TypeError {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    ValidationError {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    FileError {
        message: String,
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    ConfigError {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
    /// Raised by native functions and lazy call operands.
    RuntimeError {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },
}

impl ChainError {
    /// Convenience constructor for errors raised from inside native functions.
    pub fn runtime(message: impl Into<String>) -> Self {
        ChainError::RuntimeError {
            message: message.into(),
            hint: None,
            code: Some(510),
        }
    }

    pub fn code(&self) -> Option<u32> {
        match self {
            ChainError::AccessOnAbsentValue { code, .. }
            | ChainError::NotInvocable { code, .. }
            | ChainError::InvalidAssignmentTarget { code, .. }
            | ChainError::UndeclaredIdentifier { code, .. }
            | ChainError::InvalidIdentifier { code, .. }
            | ChainError::InvalidChain { code, .. }
            | ChainError::RangeError { code, .. }
            | ChainError::TypeError { code, .. }
            | ChainError::ValidationError { code, .. }
            | ChainError::FileError { code, .. }
            | ChainError::ConfigError { code, .. }
            | ChainError::RuntimeError { code, .. } => *code,
        }
    }
}

fn suffix(hint: &Option<String>, code: &Option<u32>) -> String {
    format!(
        "{}{}",
        hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
        code.map_or(String::new(), |c| format!(" Code: {}", c))
    )
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainError::AccessOnAbsentValue { step, position, hint, code } =>
                write!(f, "[CHAIN] Cannot apply '{}' (step {}) to an absent value{}",
                    step, position, suffix(hint, code)),
            ChainError::NotInvocable { step, position, found, hint, code } =>
                write!(f, "[CHAIN] '{}' (step {}) is not invocable: found {}{}",
                    step, position, found, suffix(hint, code)),
            ChainError::InvalidAssignmentTarget { target, message, hint, code } =>
                write!(f, "[CHAIN] Invalid assignment target '{}': {}{}",
                    target, message, suffix(hint, code)),
            ChainError::UndeclaredIdentifier { name, hint, code } =>
                write!(f, "[CHAIN] '{}' is not defined{}", name, suffix(hint, code)),
            ChainError::InvalidIdentifier { name, hint, code } =>
                write!(f, "[CHAIN] '{}' is not a valid identifier{}", name, suffix(hint, code)),
            ChainError::InvalidChain { message, hint, code } =>
                write!(f, "[CHAIN] Invalid chain: {}{}", message, suffix(hint, code)),
            ChainError::RangeError { message, hint, code } =>
                write!(f, "[CHAIN] Range Error: {}{}", message, suffix(hint, code)),
            ChainError::TypeError { message, hint, code } =>
                write!(f, "[CHAIN] Type Error: {}{}", message, suffix(hint, code)),
            ChainError::ValidationError { message, hint, code } =>
                write!(f, "[CHAIN] Validation Error: {}{}", message, suffix(hint, code)),
            ChainError::FileError { message, path, hint, code } =>
                write!(f, "[CHAIN] File Error '{}': {}{}", path, message, suffix(hint, code)),
            ChainError::ConfigError { message, hint, code } =>
                write!(f, "[CHAIN] Config Error: {}{}", message, suffix(hint, code)),
            ChainError::RuntimeError { message, hint, code } =>
                write!(f, "[CHAIN] Runtime Error: {}{}", message, suffix(hint, code)),
        }
    }
}

impl std::error::Error for ChainError {}
