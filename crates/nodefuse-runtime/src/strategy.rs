//! Evaluation strategies
//!
//! The four strategies are performance variants of one semantics: the same
//! logical program, assembled from node inventories with progressively more
//! fusion. The interpreter machinery (context, call protocol, statement
//! loop) is shared; only the program builder differs per strategy.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::program::{evaluate, fib_program};

/// Which node inventory the program builder uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Every operation is its own polymorphic node; all dispatch is dynamic.
    Generic,
    /// Comparison-against-constant and subtract-constant are merged into
    /// dedicated node kinds.
    ConstFusion,
    /// Additionally holds the argument/constant leaves by value inside the
    /// fused nodes, reading them through non-virtual accessors.
    LeafFusion,
    /// Generalizes the call target to any evaluable node; an `IfElseNode`
    /// expression serves as the whole function body.
    DirectCall,
}

impl Strategy {
    /// All strategies, in increasing fusion order.
    pub const ALL: [Strategy; 4] = [
        Strategy::Generic,
        Strategy::ConstFusion,
        Strategy::LeafFusion,
        Strategy::DirectCall,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Generic => "generic",
            Strategy::ConstFusion => "const-fusion",
            Strategy::LeafFusion => "leaf-fusion",
            Strategy::DirectCall => "direct-call",
        }
    }

    /// Build the Fibonacci program for this strategy and evaluate it.
    pub fn fib(self, n: u32) -> u32 {
        evaluate(&fib_program(self), n)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognized strategy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy `{0}` (expected generic, const-fusion, leaf-fusion, or direct-call)")]
pub struct StrategyError(String);

impl FromStr for Strategy {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generic" => Ok(Strategy::Generic),
            "const-fusion" => Ok(Strategy::ConstFusion),
            "leaf-fusion" => Ok(Strategy::LeafFusion),
            "direct-call" => Ok(Strategy::DirectCall),
            other => Err(StrategyError(other.to_string())),
        }
    }
}
