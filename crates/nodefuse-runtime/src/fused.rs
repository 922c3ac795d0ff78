//! Fused node kinds
//!
//! Each fused node collapses a parent and one or both of its children into a
//! single node whose evaluation inlines the merged steps, removing a layer
//! of dynamic dispatch (and the allocation of the merged child). Fused nodes
//! are semantically identical to the unfused composition and interchangeable
//! with it in any program.
//!
//! Two tiers exist:
//! - operation + constant operand (`LessConstNode`, `SubConstNode`): the
//!   constant is stored inline, the remaining operand stays polymorphic;
//! - operation + both leaves (`LessArgConstNode`, `SubArgConstNode`): the
//!   leaf nodes are held by value and read through their non-virtual `get`
//!   accessors, so the whole comparison compiles to straight-line code.

use crate::context::ExecutionContext;
use crate::node::{ArgNode, ConstNode, Node};

/// `LessNode` with its right operand folded into the node.
pub struct LessConstNode {
    lhs: Box<dyn Node>,
    constant: u32,
}

impl LessConstNode {
    pub fn new(lhs: Box<dyn Node>, constant: u32) -> Self {
        Self { lhs, constant }
    }
}

impl Node for LessConstNode {
    fn eval(&self, ctx: &mut ExecutionContext) -> u32 {
        (self.lhs.eval(ctx) < self.constant) as u32
    }
}

/// `SubNode` with its right operand folded into the node. Wrapping, like the
/// unfused subtraction.
pub struct SubConstNode {
    lhs: Box<dyn Node>,
    constant: u32,
}

impl SubConstNode {
    pub fn new(lhs: Box<dyn Node>, constant: u32) -> Self {
        Self { lhs, constant }
    }
}

impl Node for SubConstNode {
    fn eval(&self, ctx: &mut ExecutionContext) -> u32 {
        self.lhs.eval(ctx).wrapping_sub(self.constant)
    }
}

/// Argument-vs-constant comparison with both leaves held by value.
pub struct LessArgConstNode {
    lhs: ArgNode,
    rhs: ConstNode,
}

impl LessArgConstNode {
    pub fn new(lhs: ArgNode, rhs: ConstNode) -> Self {
        Self { lhs, rhs }
    }
}

impl Node for LessArgConstNode {
    fn eval(&self, ctx: &mut ExecutionContext) -> u32 {
        (self.lhs.get(ctx) < self.rhs.get()) as u32
    }
}

/// Argument-minus-constant with both leaves held by value. Wrapping.
pub struct SubArgConstNode {
    lhs: ArgNode,
    rhs: ConstNode,
}

impl SubArgConstNode {
    pub fn new(lhs: ArgNode, rhs: ConstNode) -> Self {
        Self { lhs, rhs }
    }
}

impl Node for SubArgConstNode {
    fn eval(&self, ctx: &mut ExecutionContext) -> u32 {
        self.lhs.get(ctx).wrapping_sub(self.rhs.get())
    }
}
