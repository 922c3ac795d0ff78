//! Nodefuse Runtime - node-fusion interpreter core
//!
//! A minimal expression/statement evaluator built to study how node
//! representation affects interpretation overhead. This library provides:
//! - The polymorphic `Node` abstraction and its baseline-generic inventory
//! - The `ExecutionContext` argument stack and call protocol
//! - Fused node kinds that merge node pairs into single specialized nodes
//! - Four equivalent evaluation strategies over one fixed program
//!
//! The strategies differ only in dispatch cost; their observable behavior is
//! identical for every input.

/// Nodefuse runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Public API modules
pub mod context;
pub mod direct;
pub mod fused;
pub mod node;
pub mod program;
pub mod strategy;

// Re-export commonly used types
pub use context::{ControlFlow, ExecutionContext, STACK_CAPACITY};
pub use direct::{CallAnyNode, IfElseNode};
pub use fused::{LessArgConstNode, LessConstNode, SubArgConstNode, SubConstNode};
pub use node::{
    AddNode, ArgNode, CallNode, ConstNode, Function, IfNode, LessNode, Node, ReturnNode, SubNode,
};
pub use program::{evaluate, fib_program, Callable};
pub use strategy::{Strategy, StrategyError};
