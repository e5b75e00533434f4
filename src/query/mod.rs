//! Query handles and their comparable options.
//!
//! # Architecture
//!
//! - **Condition**: operator alias table behind generated scope names (`Operator`)
//! - **Options**: comparable representation of applied scopes (`ProxyOptions`)
//! - **Select**: the chainable query handle (`Scope`) and its SQL rendering
//! - **Execution**: materialization methods (`all`, `first`, `count`, `load`)

pub mod condition;
#[doc(inline)]
pub use condition::Operator;

pub mod options;
#[doc(inline)]
pub use options::{Direction, OrderBy, Predicate, ProxyOptions};

pub mod select;
#[doc(inline)]
pub use select::Scope;

pub mod execution;
