pub mod ast;
pub mod error;
pub mod evaluator;
pub mod export;
pub mod resolver;
pub mod utils;
pub mod config;
pub mod conversion;
pub mod value;

pub use ast::{AssignmentTarget, Chain, Key, Operand, Step, StepKind};
pub use config::{EvalOptions, ShortCircuit};
pub use error::ChainError;
pub use evaluator::{evaluate, Evaluator};
pub use export::export_value_to_json;
pub use resolver::Scope;
pub use value::{Function, Value};
