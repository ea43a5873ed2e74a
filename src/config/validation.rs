// Author: Dustin Pilgrim
// License: MIT

use super::*;

impl EvalOptions {
    /// Check option values that deserialize fine but make no sense.
    pub fn validate(&self) -> Result<(), ChainError> {
        if self.max_chain_length == 0 {
            return Err(ChainError::ValidationError {
                message: "Invalid value for `max_chain_length`\nExpected: a positive step count".into(),
                hint: Some("Use a value of at least 1 (default 256)".into()),
                code: Some(450),
            });
        }
        Ok(())
    }
}
