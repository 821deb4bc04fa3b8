//! TaiScript tree-walking interpreter.
//!
//! Executes a parsed [`Program`](tai_types::ast::Program) directly from the
//! AST. Every statement outside a small meta set is gated by the
//! [`BribeManager`], which charges against payments made with `ghoos lo`.

pub mod bribe;
pub mod complexity;
pub mod config;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod input;
pub mod value;

pub use bribe::{BribeError, BribeManager, Regime};
pub use complexity::cost_factor;
pub use config::{BribeConfig, InterpreterConfig};
pub use env::Environment;
pub use error::{EvalError, EvalResult};
pub use evaluator::Interpreter;
pub use input::{InputSource, ScriptedInput, StdinInput};
pub use value::Value;
